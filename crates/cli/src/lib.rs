//! opkit CLI Library
//!
//! This crate provides the console side of opkit: colored output, keyboard input and
//! the interactive widgets, plus the demo operations run by the `opkit` binary.
//!
//! # Key Features
//!
//! - **Colored Output**: Foreground/background writes, two-tone templates, line
//!   overwrites and cursor positions, all serialized through one terminal lock
//! - **Color Schemes**: Fixed RGB palettes for the 16 console colors
//! - **Keyboard Input**: Waiting for specific keys, yes/no answers and secret input
//! - **Menu**: Single selection with arrow keys
//! - **Spinner and Progress Bar**: Busy indicators redrawn from a background thread
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`output`]: Colored output and color schemes
//! - [`input`]: Key reading in raw mode
//! - [`menu`], [`spinner`], [`progress`]: Widgets; [`redraw`] runs their draw threads
//! - [`operations`]: Demo operations and their dispatcher
//!
//! # Examples
//!
//! ```bash
//! # List operations
//! opkit --help
//!
//! # Bind options onto the `args` operation and run it
//! opkit args --readycheck --number 42 --enum Salsa --days Monday,Friday
//!
//! # Read option values from a settings file first
//! opkit --config-file ./settings.yml args --rc
//!
//! # Show a color scheme
//! opkit colors --scheme Campbell
//! ```

pub mod cli_args;
pub mod input;
pub mod menu;
pub mod operations;
pub mod output;
pub mod progress;
pub mod redraw;
pub mod spinner;

use opkit_core::error::Error;

/// Text shown when an invocation ends with an error. Invalid operation or option
/// metadata is a startup failure, not a problem with the given input.
#[must_use]
pub fn failure_message(error: &Error) -> String {
    if error.is_configuration_error() {
        format!("Startup failure, the operations are not set up correctly: {error}")
    } else {
        error.to_string()
    }
}

/// Converts an operation result into a process exit status. Negative codes wrap the
/// way the operating system truncates them, so `-1` becomes `255`.
#[must_use]
pub fn exit_status(code: i32) -> u8 {
    code as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(0), 0);
        assert_eq!(exit_status(3), 3);
        assert_eq!(exit_status(-1), 255);
    }

    #[test]
    fn test_failure_message_marks_startup_failures() {
        let duplicate = Error::NonUniqueOperationName("args".to_string());
        assert_eq!(
            failure_message(&duplicate),
            format!("Startup failure, the operations are not set up correctly: {duplicate}")
        );

        assert_eq!(failure_message(&Error::InputCancelled), "Input was cancelled");
    }
}
