use std::thread;
use std::time::Duration;

use crossterm::style::Color;

use opkit_core::error::Result;
use opkit_core::operation::{Operation, OptionField};

use crate::menu::{select_single, MenuSettings};
use crate::output::console::{self, CursorPosition};
use crate::progress::ProgressBar;
use crate::spinner::{Spinner, SpinnerSettings, SpinnerType};

pub const MENU_ITEMS: [&str; 6] = [
    "Output yellow text",
    "Output yellow text on red background",
    "Output interpolated bi-color text",
    "Spinner - Long process busy indicator",
    "Progress bar - stepped process visualization",
    "Exit output demo",
];

const SPINNER_STAGES: [(&str, u64); 3] = [
    ("Opening connections", 2132),
    ("Doing Work", 5174),
    ("Teardown/Cleanup", 2163),
];

const PROGRESS_STEPS: usize = 69;

/// Menu-driven tour of colored output, the spinner and the progress bar.
#[derive(Debug, Default)]
pub struct OutputDemo;

/// Writes differently colored pieces on one line.
fn write_pieces(pieces: &[(&str, Color)]) -> Result<()> {
    let mut terminal = console::lock();
    for (text, color) in pieces {
        terminal.write(text, *color, None)?;
    }
    terminal.new_line()
}

fn used_method(call: &[(&str, Color)]) -> Result<()> {
    console::write_line("Used method: ", Color::Grey)?;
    write_pieces(call)?;
    console::new_line()
}

fn output_colored_text() -> Result<()> {
    console::new_line()?;
    console::write_line("This text output is colored yellow.", Color::Yellow)?;
    used_method(&[
        ("console", Color::Blue),
        ("::", Color::Reset),
        ("write_line(", Color::DarkCyan),
        ("\"This text output is colored yellow.\"", Color::DarkRed),
        (", ", Color::Reset),
        ("Color", Color::DarkCyan),
        ("::", Color::Reset),
        ("Yellow", Color::DarkYellow),
        (");", Color::Reset),
    ])
}

fn output_colored_text_with_background() -> Result<()> {
    console::new_line()?;
    console::write_line_on("This is emphasized problem!", Color::Yellow, Color::Red)?;
    used_method(&[
        ("console", Color::Blue),
        ("::", Color::Reset),
        ("write_line_on(", Color::DarkCyan),
        ("\"This is emphasized problem!\"", Color::DarkRed),
        (", ", Color::Reset),
        ("Color", Color::DarkCyan),
        ("::", Color::Reset),
        ("Yellow", Color::DarkYellow),
        (", ", Color::Reset),
        ("Color", Color::DarkCyan),
        ("::", Color::Reset),
        ("Red", Color::DarkRed),
        (");", Color::Reset),
    ])
}

fn output_interpolated_text() -> Result<()> {
    console::new_line()?;
    console::write_formatted_line(
        "Children can count from {0} to {1} in {2} seconds.",
        Color::DarkCyan,
        Color::Cyan,
        &[1, 100, 45],
    )?;
    used_method(&[
        ("console", Color::Blue),
        ("::", Color::Reset),
        ("write_formatted_line(", Color::DarkCyan),
        ("\"Children can count from {0} to {1} in {2} seconds.\"", Color::DarkRed),
        (", ", Color::Reset),
        ("Color", Color::DarkCyan),
        ("::", Color::Reset),
        ("DarkCyan", Color::DarkCyan),
        (", ", Color::Reset),
        ("Color", Color::DarkCyan),
        ("::", Color::Reset),
        ("Cyan", Color::Cyan),
        (", &[1, 100, 45]);", Color::Reset),
    ])
}

fn output_spinner() -> Result<()> {
    let mut spinner = Spinner::new(SpinnerSettings {
        kind: SpinnerType::Cross,
        show_time: true,
        color: Color::Green,
        ..SpinnerSettings::default()
    });
    spinner.add_progress_bar(SPINNER_STAGES.len() + 1)?;

    spinner.start_with("Process initialization")?;
    thread::sleep(Duration::from_millis(3123));
    for (step, (message, pause)) in SPINNER_STAGES.iter().enumerate() {
        spinner.set_progress(message, step + 1);
        thread::sleep(Duration::from_millis(*pause));
    }

    spinner.stop_with("Spinner work is finished.", Color::Yellow)
}

/// Pause for one progress step; varies between 10 and 499 ms.
fn step_pause(step: usize) -> Duration {
    Duration::from_millis(10 + (step as u64 * 137) % 490)
}

/// Formats seconds as `ss.fff`.
fn format_seconds(elapsed: Duration) -> String {
    format!("{:02}.{:03}", elapsed.as_secs() % 60, elapsed.subsec_millis())
}

fn output_progress() -> Result<()> {
    let mut progress_bar = ProgressBar::new(PROGRESS_STEPS, Color::Green)?;

    // Make room for the bar and the iteration line before remembering positions, so
    // scrolling at the bottom of the screen cannot shift them.
    console::new_line()?;
    console::new_line()?;
    console::lock().move_up(2)?;

    let bar_line = CursorPosition::current()?;
    console::new_line()?;
    console::write("Current iteration: ", Color::Grey)?;
    let iteration_position = CursorPosition::current()?;
    bar_line.move_to()?;

    progress_bar.start()?;
    for step in 0..PROGRESS_STEPS {
        progress_bar.set_current_step(step);
        iteration_position.write(&step.to_string(), Color::Cyan)?;
        thread::sleep(step_pause(step));
    }
    progress_bar.stop()?;

    console::write_formatted_line(
        "Progress bar process ended in {0} sec.",
        Color::DarkYellow,
        Color::Yellow,
        &[format_seconds(progress_bar.elapsed())],
    )?;
    console::new_line()
}

impl Operation for OutputDemo {
    fn name(&self) -> &str {
        "output"
    }

    fn help_text(&self) -> &str {
        "Command to show possibilities of output extensions."
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn run(&mut self) -> Result<i32> {
        let settings = MenuSettings::default();

        loop {
            let selected = select_single(&MENU_ITEMS, 0, &settings)?;
            console::write_formatted_line("Selected item index: {0}", Color::Grey, Color::Cyan, &[selected])?;

            match selected {
                0 => output_colored_text()?,
                1 => output_colored_text_with_background()?,
                2 => output_interpolated_text()?,
                3 => output_spinner()?,
                4 => output_progress()?,
                _ => break,
            }
        }

        Ok(0)
    }

    fn option_fields() -> Result<Vec<OptionField<Self>>> {
        Ok(Vec::new())
    }
}
