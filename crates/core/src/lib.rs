//! opkit Core Library
//!
//! This crate provides the option-binding and operation-dispatch engine behind opkit, a
//! toolkit for console applications made of named operations whose typed fields are
//! filled from a configuration file and the command line.
//!
//! # Key Features
//!
//! - **Option Descriptors**: Validated name, short name and description for every field
//! - **Value Coercion**: Locale-invariant parsing into booleans, numbers, dates, text,
//!   enums and flags-enums
//! - **Binding**: Configuration first, command line second, with recoverable warnings
//! - **Dispatch**: Operation selection, readiness and help documents
//! - **Configuration Management**: YAML/JSON configuration files and their paths
//! - **Error Handling**: Error types for configuration mistakes and I/O failures
//!
//! # Examples
//!
//! Preparing an operation from the command line:
//!
//! ```
//! use opkit_core::dispatch::{Dispatcher, Preparation};
//! use opkit_core::error::Result;
//! use opkit_core::operation::{Operation, OptionField};
//! use opkit_core::option::OptionDescriptor;
//!
//! #[derive(Default)]
//! struct Sum {
//!     left: i64,
//!     right: i64,
//! }
//!
//! impl Operation for Sum {
//!     fn name(&self) -> &str {
//!         "sum"
//!     }
//!
//!     fn help_text(&self) -> &str {
//!         "Adds two numbers."
//!     }
//!
//!     fn is_ready(&self) -> bool {
//!         true
//!     }
//!
//!     fn run(&mut self) -> Result<i32> {
//!         Ok((self.left + self.right) as i32)
//!     }
//!
//!     fn option_fields() -> Result<Vec<OptionField<Self>>> {
//!         Ok(vec![
//!             OptionField::integer(OptionDescriptor::new("left", Some("l"), "Left side")?, |sum: &mut Self, value| sum.left = value),
//!             OptionField::integer(OptionDescriptor::new("right", Some("r"), "Right side")?, |sum: &mut Self, value| sum.right = value),
//!         ])
//!     }
//! }
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register::<Sum>()?;
//!
//! let preparation = dispatcher.prepare(&["sum", "--l", "2", "--right", "3"], None)?;
//! assert_eq!(preparation, Preparation::Ready);
//! assert_eq!(dispatcher.run_selected()?, 5);
//! # Ok::<(), opkit_core::error::Error>(())
//! ```

pub mod binder;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod help;
pub mod operation;
pub mod option;
pub mod value;
