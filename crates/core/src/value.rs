//! Conversion of raw string tokens into typed option values.
//!
//! Every bindable field has a destination type tag ([`ValueKind`]). [`coerce`] does a
//! single match on that tag and runs the matching parser. Parsing is locale-invariant:
//! `.` is the only decimal separator and dates are read in a fixed set of formats.
//!
//! Coercion failures are [`CoercionError`]s. They are input mistakes, so callers log them
//! and move on rather than aborting.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use log::warn;
use thiserror::Error;

/// Date/time layouts accepted after RFC 3339, tried in order.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts; the time part becomes midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("`{}` is not a boolean (expected true or false)", .0)]
    InvalidBoolean(String),

    #[error("`{}` is not an integer", .0)]
    InvalidInteger(String),

    #[error("`{}` is not a number", .0)]
    InvalidFloat(String),

    #[error("`{}` is not a recognised date/time", .0)]
    InvalidDateTime(String),

    #[error("`{}` does not match any member of {}", .value, .enum_name)]
    UnknownEnumMember { enum_name: String, value: String },

    #[error("`{}` does not fit in a {} flags value", .value, .enum_name)]
    FlagsOverflow { enum_name: String, value: String },

    #[error("no value follows the option")]
    MissingValue,

    #[error("a {} value cannot be stored in a {} field", .value, .field)]
    KindMismatch { value: String, field: String },
}

/// One named member of an enumeration, with its underlying ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumMember {
    pub name: &'static str,
    pub ordinal: i64,
}

impl EnumMember {
    #[must_use]
    pub const fn new(name: &'static str, ordinal: i64) -> Self {
        Self { name, ordinal }
    }
}

impl Display for EnumMember {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}({})", self.name, self.ordinal)
    }
}

/// Static description of an enumeration type, used for coercion and help output.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumSpec {
    pub type_name: &'static str,
    pub members: &'static [EnumMember],
}

impl EnumSpec {
    #[must_use]
    pub const fn new(type_name: &'static str, members: &'static [EnumMember]) -> Self {
        Self { type_name, members }
    }

    #[must_use]
    pub fn by_ordinal(&self, ordinal: i64) -> Option<&'static EnumMember> {
        self.members.iter().find(|member| member.ordinal == ordinal)
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&'static EnumMember> {
        self.members
            .iter()
            .find(|member| member.name.eq_ignore_ascii_case(name))
    }

    /// Names of the non-zero members whose bits are all set in `value`.
    #[must_use]
    pub fn flag_names(&self, value: i64) -> Vec<&'static str> {
        self.members
            .iter()
            .filter(|member| member.ordinal != 0 && value & member.ordinal == member.ordinal)
            .map(|member| member.name)
            .collect()
    }

    /// Member names with ordinals, comma separated: `Tango(0),Salsa(1)`.
    #[must_use]
    pub fn describe(&self) -> String {
        self.members.iter().join(",")
    }
}

/// Destination type tag of a bindable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Integer,
    Float,
    DateTime,
    Text,
    Enum(&'static EnumSpec),
    Flags(&'static EnumSpec),
}

impl ValueKind {
    #[must_use]
    pub fn enum_spec(&self) -> Option<&'static EnumSpec> {
        match self {
            Self::Enum(spec) | Self::Flags(spec) => Some(*spec),
            _ => None,
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool => formatter.write_str("boolean"),
            Self::Integer => formatter.write_str("integer"),
            Self::Float => formatter.write_str("float"),
            Self::DateTime => formatter.write_str("date/time"),
            Self::Text => formatter.write_str("text"),
            Self::Enum(spec) => write!(formatter, "enum {}", spec.type_name),
            Self::Flags(spec) => write!(formatter, "flags {}", spec.type_name),
        }
    }
}

/// A successfully coerced value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    DateTime(NaiveDateTime),
    Text(String),
    Enum(EnumMember),
    Flags(i64),
}

impl OptionValue {
    /// Short type label, used in mismatch messages.
    #[must_use]
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::DateTime(_) => "date/time",
            Self::Text(_) => "text",
            Self::Enum(_) => "enum",
            Self::Flags(_) => "flags",
        }
    }
}

impl Display for OptionValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::DateTime(value) => write!(formatter, "{}", value.format("%Y-%m-%d %H:%M:%S")),
            Self::Text(value) => write!(formatter, "\"{value}\""),
            Self::Enum(member) => formatter.write_str(member.name),
            Self::Flags(value) => write!(formatter, "{value} (flags)"),
        }
    }
}

/// Whether the token is non-empty and made only of digits once trimmed.
#[must_use]
pub fn is_integer(token: &str) -> bool {
    let trimmed = token.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Converts `raw` into a value of the given kind.
///
/// Booleans here are the textual form used by configuration files (`true`/`false`, any
/// case); on the command line booleans are presence-only flags and never reach this
/// function.
///
/// # Errors
///
/// Returns a [`CoercionError`] describing why the token does not fit the kind.
///
/// # Examples
///
/// ```
/// use opkit_core::value::{coerce, OptionValue, ValueKind};
///
/// assert_eq!(coerce(ValueKind::Integer, "42"), Ok(OptionValue::Integer(42)));
/// assert!(coerce(ValueKind::Integer, "forty-two").is_err());
/// ```
pub fn coerce(kind: ValueKind, raw: &str) -> Result<OptionValue, CoercionError> {
    match kind {
        ValueKind::Bool => coerce_bool(raw),
        ValueKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(OptionValue::Integer)
            .map_err(|_| CoercionError::InvalidInteger(raw.to_string())),
        ValueKind::Float => coerce_float(raw),
        ValueKind::DateTime => parse_date_time(raw)
            .map(OptionValue::DateTime)
            .ok_or_else(|| CoercionError::InvalidDateTime(raw.to_string())),
        ValueKind::Text => Ok(OptionValue::Text(raw.to_string())),
        ValueKind::Enum(spec) => coerce_enum(spec, raw).map(OptionValue::Enum),
        ValueKind::Flags(spec) => coerce_flags(spec, raw).map(OptionValue::Flags),
    }
}

fn coerce_bool(raw: &str) -> Result<OptionValue, CoercionError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(OptionValue::Bool(true))
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(OptionValue::Bool(false))
    } else {
        Err(CoercionError::InvalidBoolean(raw.to_string()))
    }
}

fn coerce_float(raw: &str) -> Result<OptionValue, CoercionError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(OptionValue::Float(value)),
        _ => Err(CoercionError::InvalidFloat(raw.to_string())),
    }
}

/// Parses a date/time in one of the invariant formats.
#[must_use]
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(with_offset.naive_local());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Resolves a single enum member, by ordinal when the token is numeric, by name otherwise.
///
/// # Errors
///
/// Returns [`CoercionError::UnknownEnumMember`] when nothing matches.
pub fn coerce_enum(spec: &'static EnumSpec, raw: &str) -> Result<EnumMember, CoercionError> {
    let member = if is_integer(raw) {
        raw.trim()
            .parse::<i64>()
            .ok()
            .and_then(|ordinal| spec.by_ordinal(ordinal))
    } else {
        spec.by_name(raw.trim())
    };

    member.copied().ok_or_else(|| CoercionError::UnknownEnumMember {
        enum_name: spec.type_name.to_string(),
        value: raw.to_string(),
    })
}

/// Resolves a flags value: a numeric token is taken literally, otherwise the ordinals of
/// the comma-separated member names are summed.
///
/// Names that match no member add nothing. They are skipped with a warning.
///
/// # Errors
///
/// Returns an error if a numeric token does not fit in an `i64` or if the summed
/// ordinals overflow.
pub fn coerce_flags(spec: &'static EnumSpec, raw: &str) -> Result<i64, CoercionError> {
    if is_integer(raw) {
        return raw
            .trim()
            .parse::<i64>()
            .map_err(|_| CoercionError::InvalidInteger(raw.to_string()));
    }

    let mut combined: i64 = 0;
    for name in raw.split(',').map(str::trim) {
        match spec.by_name(name) {
            Some(member) => {
                combined = combined.checked_add(member.ordinal).ok_or_else(|| {
                    CoercionError::FlagsOverflow {
                        enum_name: spec.type_name.to_string(),
                        value: raw.to_string(),
                    }
                })?;
            }
            None => warn!(
                "  - `{}` is not a member of {}, it is skipped.",
                name, spec.type_name
            ),
        }
    }

    Ok(combined)
}
