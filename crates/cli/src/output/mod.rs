//! Colorized console output.
//!
//! Every write goes through the process-wide [`console::Terminal`] lock, so the
//! redraw threads of widgets and the foreground never interleave within a line.

pub mod colors;
pub mod console;

pub use colors::{AsTermColor, ColorScheme, COLOR_SCHEMES};
pub use console::{
    clear_line, cursor_to_column, lock, new_line, print_help, set_color_scheme, write,
    write_formatted, write_formatted_line, write_line, write_line_on, write_line_over, write_on,
    write_over, CursorPosition, HiddenCursor, Segment, Terminal,
};
