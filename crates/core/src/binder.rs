//! Binding of configuration and command-line values onto an operation's fields.
//!
//! Two sources are merged for every option field, in this order:
//!
//! 1. the operation's configuration section, keyed by option name
//! 2. the command line, `--name value` or `--short value` (`--name` alone for booleans)
//!
//! The command line is applied last, so it wins when both sources give a value. A field
//! neither source mentions keeps its default. Values that cannot be coerced are logged,
//! recorded as [`CoercionWarning`]s and otherwise ignored; binding always visits every
//! field.

use std::fmt::{Display, Formatter};

use log::{debug, info, warn};

use crate::config::ConfigSection;
use crate::operation::{Accessor, OptionField};
use crate::option::OptionDescriptor;
use crate::value::{coerce, CoercionError, OptionValue};

/// Where a bound value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Configuration,
    Arguments,
}

impl Display for Source {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Configuration => formatter.write_str("configuration"),
            Source::Arguments => formatter.write_str("arguments"),
        }
    }
}

/// A value written onto a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub option: String,
    pub source: Source,
    pub value: OptionValue,
}

/// A value that could not be written onto a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionWarning {
    pub option: String,
    pub source: Source,
    pub raw: Option<String>,
    pub error: CoercionError,
}

impl Display for CoercionWarning {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.raw {
            Some(raw) => write!(
                formatter,
                "option \"{}\" value \"{}\" from {} cannot be set: {}",
                self.option, raw, self.source, self.error
            ),
            None => write!(
                formatter,
                "option \"{}\" from {} cannot be set: {}",
                self.option, self.source, self.error
            ),
        }
    }
}

/// Everything a bind pass did, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindReport {
    pub assignments: Vec<Assignment>,
    pub warnings: Vec<CoercionWarning>,
}

impl BindReport {
    /// The value that ended up on the field, if any source set it.
    #[must_use]
    pub fn value_of(&self, option: &str) -> Option<&OptionValue> {
        self.assignments
            .iter()
            .rev()
            .find(|assignment| assignment.option == option)
            .map(|assignment| &assignment.value)
    }

    /// The source of the value that ended up on the field.
    #[must_use]
    pub fn source_of(&self, option: &str) -> Option<Source> {
        self.assignments
            .iter()
            .rev()
            .find(|assignment| assignment.option == option)
            .map(|assignment| assignment.source)
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn warnings_for<'a>(&'a self, option: &'a str) -> impl Iterator<Item = &'a CoercionWarning> {
        self.warnings
            .iter()
            .filter(move |warning| warning.option == option)
    }

    fn record(&mut self, option: &str, source: Source, value: OptionValue) {
        self.assignments.push(Assignment {
            option: option.to_string(),
            source,
            value,
        });
    }

    fn warn(&mut self, option: &str, source: Source, raw: Option<&str>, error: CoercionError) {
        let warning = CoercionWarning {
            option: option.to_string(),
            source,
            raw: raw.map(ToString::to_string),
            error,
        };
        warn!("  - {warning}.");
        self.warnings.push(warning);
    }
}

/// Finds the position of `--name`, falling back to `--short` when the full name is absent.
#[must_use]
pub fn find_option_token<S: AsRef<str>>(args: &[S], descriptor: &OptionDescriptor) -> Option<usize> {
    let flag = descriptor.flag();
    let position = args.iter().position(|arg| arg.as_ref() == flag);

    if position.is_some() {
        return position;
    }

    let short_flag = descriptor.short_flag()?;
    args.iter().position(|arg| arg.as_ref() == short_flag)
}

/// Binds configuration and argument values onto `target`.
///
/// # Arguments
///
/// * `target` - The operation instance whose fields are written
/// * `operation_name` - Name used in log entries
/// * `fields` - The operation's option fields
/// * `section` - The operation's configuration section, if the configuration has one
/// * `args` - The raw command-line tokens
///
/// # Returns
///
/// A [`BindReport`] listing every assignment and every value that was rejected.
pub fn bind<T, S: AsRef<str>>(
    target: &mut T,
    operation_name: &str,
    fields: &[OptionField<T>],
    section: Option<&ConfigSection<'_>>,
    args: &[S],
) -> BindReport {
    let mut report = BindReport::default();

    match section {
        Some(section) => {
            for field in fields {
                bind_from_configuration(target, field, section, &mut report);
            }
        }
        None => debug!(
            "Operation \"{}\" does not have a section in configuration (optional - not necessary).",
            operation_name
        ),
    }

    for field in fields {
        bind_from_arguments(target, field, args, &mut report);
    }

    for field in fields {
        let option = field.descriptor.name();
        match report.value_of(option) {
            Some(value) => info!(
                "Operation \"{}\" option \"{}\" = {}",
                operation_name, option, value
            ),
            None => info!(
                "Operation \"{}\" option \"{}\" is left at its default",
                operation_name, option
            ),
        }
    }

    report
}

fn bind_from_configuration<T>(
    target: &mut T,
    field: &OptionField<T>,
    section: &ConfigSection<'_>,
    report: &mut BindReport,
) {
    let option = field.descriptor.name();
    let Some(raw) = section.get(option) else {
        debug!("  - option \"{}\" is not found in configuration.", option);
        return;
    };

    assign_raw(target, field, &raw, Source::Configuration, report);
}

fn bind_from_arguments<T, S: AsRef<str>>(
    target: &mut T,
    field: &OptionField<T>,
    args: &[S],
    report: &mut BindReport,
) {
    let option = field.descriptor.name();
    let Some(index) = find_option_token(args, &field.descriptor) else {
        debug!("  - option \"{}\" is not found in arguments.", option);
        return;
    };

    // Booleans are presence-only, nothing after the flag is consumed
    if let Accessor::Bool(set) = &field.accessor {
        set(target, true);
        debug!("  - option \"{}\" is set from arguments to TRUE.", option);
        report.record(option, Source::Arguments, OptionValue::Bool(true));
        return;
    }

    let Some(raw) = args.get(index + 1) else {
        report.warn(option, Source::Arguments, None, CoercionError::MissingValue);
        return;
    };

    assign_raw(target, field, raw.as_ref(), Source::Arguments, report);
}

fn assign_raw<T>(
    target: &mut T,
    field: &OptionField<T>,
    raw: &str,
    source: Source,
    report: &mut BindReport,
) {
    let option = field.descriptor.name();
    let result = coerce(field.kind(), raw).and_then(|value| {
        field.accessor.assign(target, value.clone())?;
        Ok(value)
    });

    match result {
        Ok(value) => {
            debug!(
                "  - option \"{}\" value is set to {} from {}.",
                option, value, source
            );
            report.record(option, source, value);
        }
        Err(error) => report.warn(option, source, Some(raw), error),
    }
}
