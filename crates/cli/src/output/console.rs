use std::fmt::Display;
use std::io::{stdout, Stdout, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crossterm::cursor::{self, MoveTo, MoveToColumn, RestorePosition, SavePosition};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use leon::{Item, Template};
use log::debug;

use opkit_core::error::{Error, Result};
use opkit_core::help::HelpDocument;

use super::colors::{AsTermColor, ColorScheme};

/// Terminal state shared by every writer in the process.
struct State {
    scheme: ColorScheme,
}

static TERMINAL: Mutex<State> = Mutex::new(State {
    scheme: ColorScheme::Default,
});

/// Exclusive access to the terminal for a sequence of writes.
///
/// Background widgets and foreground output take this lock for each styled write, so
/// their output never interleaves mid-line. Colors are reset and output flushed when the
/// guard is dropped. The lock is not reentrant: never call the free functions of this
/// module while holding a `Terminal`.
pub struct Terminal {
    state: MutexGuard<'static, State>,
    out: Stdout,
}

/// Takes the process-wide terminal lock.
#[must_use]
pub fn lock() -> Terminal {
    Terminal {
        state: TERMINAL.lock().unwrap_or_else(PoisonError::into_inner),
        out: stdout(),
    }
}

impl Terminal {
    /// Writes `text` in `color`, optionally on `background`.
    pub fn write(&mut self, text: &str, color: Color, background: Option<Color>) -> Result<()> {
        write_styled(&mut self.out, self.state.scheme, text, color, background)?;
        Ok(())
    }

    pub fn new_line(&mut self) -> Result<()> {
        queue!(self.out, ResetColor, Print("\n"))?;
        Ok(())
    }

    /// Clears the whole current line and moves to its first column.
    pub fn clear_line(&mut self) -> Result<()> {
        queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        Ok(())
    }

    /// Clears from the cursor to the end of the line.
    pub fn clear_rest_of_line(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::UntilNewLine))?;
        Ok(())
    }

    /// Clears from the cursor to the end of the screen.
    pub fn clear_below(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::FromCursorDown))?;
        Ok(())
    }

    pub fn move_to_column(&mut self, column: u16) -> Result<()> {
        queue!(self.out, MoveToColumn(column))?;
        Ok(())
    }

    /// Moves up `lines` lines, to the first column.
    pub fn move_up(&mut self, lines: u16) -> Result<()> {
        if lines > 0 {
            queue!(self.out, cursor::MoveToPreviousLine(lines))?;
        }
        Ok(())
    }

    /// Writes at a saved position and puts the cursor back where it was.
    pub fn write_at(&mut self, position: CursorPosition, text: &str, color: Color) -> Result<()> {
        queue!(self.out, SavePosition, MoveTo(position.column, position.row))?;
        self.write(text, color, None)?;
        queue!(self.out, RestorePosition)?;
        Ok(())
    }

    /// Switches the palette every later write resolves colors through, and clears the
    /// screen.
    pub fn set_color_scheme(&mut self, scheme: ColorScheme) -> Result<()> {
        debug!("Switching color scheme to {scheme:?}");
        self.state.scheme = scheme;
        queue!(self.out, ResetColor, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = queue!(self.out, ResetColor);
        let _ = self.out.flush();
    }
}

/// Queues one styled piece of text onto `out`, mapping colors through `scheme`.
pub fn write_styled<W: Write>(
    out: &mut W,
    scheme: ColorScheme,
    text: &str,
    color: Color,
    background: Option<Color>,
) -> std::io::Result<()> {
    queue!(out, SetForegroundColor(scheme.resolve(color)))?;
    if let Some(background) = background {
        queue!(out, SetBackgroundColor(scheme.resolve(background)))?;
    }
    queue!(out, Print(text), ResetColor)
}

pub fn write(text: &str, color: Color) -> Result<()> {
    lock().write(text, color, None)
}

pub fn write_line(text: &str, color: Color) -> Result<()> {
    let mut terminal = lock();
    terminal.write(text, color, None)?;
    terminal.new_line()
}

pub fn write_on(text: &str, color: Color, background: Color) -> Result<()> {
    lock().write(text, color, Some(background))
}

pub fn write_line_on(text: &str, color: Color, background: Color) -> Result<()> {
    let mut terminal = lock();
    terminal.write(text, color, Some(background))?;
    terminal.new_line()
}

pub fn new_line() -> Result<()> {
    lock().new_line()
}

/// A piece of a formatted template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal template text.
    Text(String),
    /// The rendered value of a `{n}` placeholder.
    Argument(String),
}

/// Splits `template` into literal text and rendered arguments.
///
/// Placeholders are zero-based argument indexes: `"{0} of {1}"`.
///
/// # Errors
///
/// Returns [`Error::Template`] if the template does not parse or a placeholder is not
/// the index of a given argument.
pub fn format_segments<D: Display>(template: &str, args: &[D]) -> Result<Vec<Segment>> {
    let parsed = Template::parse(template).map_err(|e| Error::Template(e.to_string()))?;

    parsed
        .items
        .iter()
        .map(|item| match item {
            Item::Text(text) => Ok(Segment::Text((*text).to_string())),
            Item::Key(key) => key
                .parse::<usize>()
                .ok()
                .and_then(|index| args.get(index))
                .map(|arg| Segment::Argument(arg.to_string()))
                .ok_or_else(|| {
                    Error::Template(format!(
                        "placeholder `{{{key}}}` has no matching argument among {}",
                        args.len()
                    ))
                }),
        })
        .collect()
}

/// Writes a template with its text in `color` and its arguments in `argument_color`.
pub fn write_formatted<D: Display>(
    template: &str,
    color: Color,
    argument_color: Color,
    args: &[D],
) -> Result<()> {
    let segments = format_segments(template, args)?;
    let mut terminal = lock();
    write_segments(&mut terminal, &segments, color, argument_color)
}

pub fn write_formatted_line<D: Display>(
    template: &str,
    color: Color,
    argument_color: Color,
    args: &[D],
) -> Result<()> {
    let segments = format_segments(template, args)?;
    let mut terminal = lock();
    write_segments(&mut terminal, &segments, color, argument_color)?;
    terminal.new_line()
}

fn write_segments(
    terminal: &mut Terminal,
    segments: &[Segment],
    color: Color,
    argument_color: Color,
) -> Result<()> {
    for segment in segments {
        match segment {
            Segment::Text(text) => terminal.write(text, color, None)?,
            Segment::Argument(text) => terminal.write(text, argument_color, None)?,
        }
    }
    Ok(())
}

pub fn clear_line() -> Result<()> {
    lock().clear_line()
}

/// Replaces the current line with `text`.
pub fn write_over(text: &str, color: Color) -> Result<()> {
    let mut terminal = lock();
    terminal.clear_line()?;
    terminal.write(text, color, None)
}

pub fn write_line_over(text: &str, color: Color) -> Result<()> {
    let mut terminal = lock();
    terminal.clear_line()?;
    terminal.write(text, color, None)?;
    terminal.new_line()
}

pub fn cursor_to_column(column: u16) -> Result<()> {
    lock().move_to_column(column)
}

/// Palette in use for every styled write.
#[must_use]
pub fn color_scheme() -> ColorScheme {
    lock().state.scheme
}

pub fn set_color_scheme(scheme: ColorScheme) -> Result<()> {
    lock().set_color_scheme(scheme)
}

/// A remembered cursor location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub column: u16,
    pub row: u16,
}

impl CursorPosition {
    #[must_use]
    pub fn new(column: u16, row: u16) -> Self {
        Self { column, row }
    }

    /// Reads the cursor location from the terminal.
    pub fn current() -> Result<Self> {
        let (column, row) = cursor::position()?;
        Ok(Self { column, row })
    }

    /// Replaces the stored location with the cursor's current one.
    pub fn store_current(&mut self) -> Result<()> {
        *self = Self::current()?;
        Ok(())
    }

    pub fn move_to(&self) -> Result<()> {
        let mut out = stdout();
        execute!(out, MoveTo(self.column, self.row))?;
        Ok(())
    }

    /// Writes at this position without moving the cursor.
    pub fn write(&self, text: &str, color: Color) -> Result<()> {
        lock().write_at(*self, text, color)
    }
}

/// Hides the cursor until dropped.
pub struct HiddenCursor;

impl HiddenCursor {
    pub fn hide() -> Result<Self> {
        execute!(stdout(), cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for HiddenCursor {
    fn drop(&mut self) {
        let _ = execute!(stdout(), cursor::Show);
    }
}

/// Prints a help document, coloring each span by its tone.
pub fn print_help(document: &HelpDocument) -> Result<()> {
    let mut terminal = lock();
    for line in &document.lines {
        for span in &line.spans {
            terminal.write(&span.text, span.tone.as_crossterm_color(), None)?;
        }
        terminal.new_line()?;
    }
    Ok(())
}
