//! Demonstration operations shipped with the `opkit` binary.

pub mod args_demo;
pub mod colors_demo;
pub mod input_demo;
pub mod output_demo;

use opkit_core::dispatch::Dispatcher;
use opkit_core::error::Result;

pub use args_demo::ArgsDemo;
pub use colors_demo::ColorsDemo;
pub use input_demo::InputDemo;
pub use output_demo::OutputDemo;

pub const PROGRAM_NAME: &str = "opkit";

pub const PROGRAM_DESCRIPTION: &str =
    "Demonstrates option binding, colored output and console widgets of opkit.";

/// A dispatcher with every demo operation registered.
pub fn dispatcher() -> Result<Dispatcher> {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register::<ArgsDemo>()?;
    dispatcher.register::<ColorsDemo>()?;
    dispatcher.register::<OutputDemo>()?;
    dispatcher.register::<InputDemo>()?;
    Ok(dispatcher)
}
