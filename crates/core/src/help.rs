//! Help output as a styled document.
//!
//! The core does not print. It builds a [`HelpDocument`]: lines of text spans, each span
//! tagged with a semantic [`Tone`]. The cli crate maps tones to colors, and `Display`
//! gives the plain text.

use std::fmt::{Display, Formatter};

use crate::operation::OptionInfo;

/// Column where option descriptions start.
const OPTION_COLUMN: usize = 20;

/// Width of the selected operation name column, after the two-space indent.
const SELECTED_NAME_WIDTH: usize = 15;

/// Column where operation help texts start in the operation list.
const OPERATION_COLUMN: usize = 18;

/// What a span of help text is, independent of how it ends up colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// The general program description.
    Title,
    /// Section headings such as `Operations:`.
    Heading,
    /// Operation names, option flags and the program name.
    Name,
    /// Descriptions and help texts.
    Text,
    /// Secondary detail such as usage patterns and enum members.
    Hint,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub tone: Tone,
    pub text: String,
}

impl Span {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpLine {
    pub spans: Vec<Span>,
}

impl HelpLine {
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.spans.iter().all(|span| span.text.is_empty())
    }
}

impl Display for HelpLine {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        for span in &self.spans {
            formatter.write_str(&span.text)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpDocument {
    pub lines: Vec<HelpLine>,
}

impl HelpDocument {
    fn line(&mut self, spans: Vec<Span>) {
        self.lines.push(HelpLine { spans });
    }

    fn blank(&mut self) {
        self.lines.push(HelpLine::default());
    }

    /// The plain text of every line, without trailing newlines.
    #[must_use]
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }
}

impl Display for HelpDocument {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(formatter, "{line}")?;
        }
        Ok(())
    }
}

/// Help shown when no operation is selected: usage, general options and every operation.
///
/// # Arguments
///
/// * `program_name` - Executable name shown in the usage line
/// * `description` - General description; left out when empty
/// * `operations` - `(name, help text)` pairs in registration order
pub fn general_help<'a>(
    program_name: &str,
    description: &str,
    operations: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> HelpDocument {
    let mut document = header(program_name, description);

    document.blank();
    document.line(vec![Span::new(Tone::Heading, "Operations:")]);
    for (name, help_text) in operations {
        document.line(vec![
            Span::new(Tone::Name, pad(&format!("  {name}"), OPERATION_COLUMN)),
            Span::new(Tone::Text, help_text),
        ]);
    }

    document
}

/// Help for a selected operation: usage, general options, the operation and its options.
///
/// Enum and flags options get an extra line listing their members as `Name(ordinal)`.
pub fn operation_help(
    program_name: &str,
    description: &str,
    operation_name: &str,
    help_text: &str,
    options: &[OptionInfo],
) -> HelpDocument {
    let mut document = header(program_name, description);

    document.blank();
    document.line(vec![Span::new(Tone::Heading, "Selected operation: ")]);
    document.line(vec![
        Span::new(
            Tone::Name,
            format!("  {}", pad(operation_name, SELECTED_NAME_WIDTH)),
        ),
        Span::new(Tone::Text, help_text),
    ]);

    if !options.is_empty() {
        document.line(vec![Span::new(Tone::Heading, "Selected operation options:")]);
    }

    for option in options {
        document.line(vec![
            Span::new(
                Tone::Name,
                pad(&format!("  {}", option.descriptor), OPTION_COLUMN),
            ),
            Span::new(Tone::Text, option.descriptor.description()),
        ]);

        if let Some(spec) = option.kind.enum_spec() {
            document.line(vec![
                Span::new(Tone::Heading, format!("{}Enums: ", " ".repeat(OPTION_COLUMN))),
                Span::new(Tone::Hint, spec.describe()),
            ]);
        }
    }

    document
}

fn header(program_name: &str, description: &str) -> HelpDocument {
    let mut document = HelpDocument::default();

    if !description.is_empty() {
        document.line(vec![Span::new(Tone::Title, description)]);
    }

    let program_name = if program_name.is_empty() {
        "program"
    } else {
        program_name
    };

    document.blank();
    document.line(vec![
        Span::new(Tone::Heading, "Usage: "),
        Span::new(Tone::Name, program_name),
        Span::new(Tone::Hint, " [operation] [options]"),
    ]);
    document.line(vec![Span::new(Tone::Heading, "General options:")]);
    document.line(vec![
        Span::new(Tone::Name, pad("  --help|--h", SELECTED_NAME_WIDTH + 2)),
        Span::new(Tone::Text, "Display help."),
    ]);
    document.line(vec![
        Span::new(Tone::Name, pad("  --version|--v", SELECTED_NAME_WIDTH + 2)),
        Span::new(Tone::Text, "Display version."),
    ]);

    document
}

/// Pads `text` with spaces to `width` characters; longer text is left as is.
fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}
