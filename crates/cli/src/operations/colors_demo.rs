use crossterm::style::Color;

use opkit_core::error::Result;
use opkit_core::operation::{Operation, OptionField};
use opkit_core::option::OptionDescriptor;

use crate::output::colors::{ColorScheme, COLOR_SCHEMES};
use crate::output::console;

const GRID_RULE: &str = "---------------------------------------------------------------------";

const DARK_COLORS: [(&str, Color); 8] = [
    ("Black", Color::Black),
    ("Dark Red", Color::DarkRed),
    ("Dark Green", Color::DarkGreen),
    ("Dark Yellow", Color::DarkYellow),
    ("Dark Blue", Color::DarkBlue),
    ("Dark Magenta", Color::DarkMagenta),
    ("Dark Cyan", Color::DarkCyan),
    ("Dark Gray", Color::DarkGrey),
];

const LIGHT_COLORS: [(&str, Color); 8] = [
    ("Gray", Color::Grey),
    ("Red", Color::Red),
    ("Green", Color::Green),
    ("Yellow", Color::Yellow),
    ("Blue", Color::Blue),
    ("Magenta", Color::Magenta),
    ("Cyan", Color::Cyan),
    ("White", Color::White),
];

/// Switches to a color scheme and shows every foreground on every dark background.
#[derive(Debug, Default)]
pub struct ColorsDemo {
    pub scheme: Option<ColorScheme>,
}

fn short_name(name: &str) -> String {
    name.replace("Dark ", "").chars().take(3).collect()
}

/// Grid cell for one foreground color: ` [Red] `.
#[must_use]
pub fn swatch(name: &str) -> String {
    format!(" [{}] ", short_name(name))
}

/// Row heading naming the background: `Magenta    | `.
#[must_use]
pub fn row_label(name: &str) -> String {
    format!("{:<11}| ", name.replace("Dark ", ""))
}

fn draw_color_grid() -> Result<()> {
    console::write_line_on("Background | Foreground colors", Color::Grey, Color::Black)?;
    console::write_line_on(GRID_RULE, Color::Grey, Color::Black)?;

    for (background_name, background) in DARK_COLORS {
        let mut terminal = console::lock();
        terminal.write("Dark       | ", Color::Grey, Some(Color::Black))?;
        for (name, color) in DARK_COLORS {
            terminal.write(&swatch(name), color, Some(background))?;
        }
        terminal.new_line()?;

        terminal.write(&row_label(background_name), Color::Grey, Some(Color::Black))?;
        for (name, color) in LIGHT_COLORS {
            terminal.write(&swatch(name), color, Some(background))?;
        }
        terminal.new_line()?;

        terminal.write(GRID_RULE, Color::Grey, Some(Color::Black))?;
        terminal.new_line()?;
    }

    console::new_line()?;
    console::write_line("Green text indicating some success", Color::Green)?;
    console::write_line("This is problem message", Color::Red)?;
    console::write_line_on("This is fatal problem message", Color::Yellow, Color::Red)?;
    console::write_formatted_line(
        "This is formatted output with: {0}",
        Color::DarkCyan,
        Color::Cyan,
        &["value"],
    )?;
    console::write_formatted_line(
        "This is {0} with {1} placeholders in {2}",
        Color::DarkMagenta,
        Color::Magenta,
        &["a template", "multiple", "it"],
    )
}

impl Operation for ColorsDemo {
    fn name(&self) -> &str {
        "colors"
    }

    fn help_text(&self) -> &str {
        "Command to show color scheme variations on console output."
    }

    fn is_ready(&self) -> bool {
        self.scheme.is_some()
    }

    fn run(&mut self) -> Result<i32> {
        console::set_color_scheme(self.scheme.unwrap_or_default())?;
        draw_color_grid()?;
        Ok(0)
    }

    fn option_fields() -> Result<Vec<OptionField<Self>>> {
        Ok(vec![OptionField::enumeration(
            OptionDescriptor::new(
                "scheme",
                Some("s"),
                "Color scheme to use: Default, Vintage, Campbell, HalfDark or Raspberry",
            )?,
            &COLOR_SCHEMES,
            |demo: &mut Self, member| demo.scheme = ColorScheme::from_member(member),
        )])
    }
}
