//! Operations and their option fields.
//!
//! An operation is a named unit of work. It declares the fields that can be bound from
//! configuration or the command line through [`Operation::option_fields`]: a list of
//! [`OptionField`]s, each pairing an [`OptionDescriptor`] with a typed setter. The
//! dispatcher builds that list once when the operation is registered.

use chrono::NaiveDateTime;

use crate::error::Error::{
    EmptyHelpText, EmptyOperationName, OperationNameTooLong, OperationNameWithSpace,
};
use crate::error::Result;
use crate::option::{validate_token, OptionDescriptor, TokenProblem, MAX_NAME_LENGTH};
use crate::value::{CoercionError, EnumMember, EnumSpec, OptionValue, ValueKind};

/// A unit of work selected and configured from the invocation.
///
/// # Examples
///
/// ```
/// use opkit_core::error::Result;
/// use opkit_core::operation::{Operation, OptionField};
/// use opkit_core::option::OptionDescriptor;
///
/// #[derive(Default)]
/// struct Greet {
///     who: Option<String>,
/// }
///
/// impl Operation for Greet {
///     fn name(&self) -> &str {
///         "greet"
///     }
///
///     fn help_text(&self) -> &str {
///         "Greets someone."
///     }
///
///     fn is_ready(&self) -> bool {
///         self.who.is_some()
///     }
///
///     fn run(&mut self) -> Result<i32> {
///         println!("Hello {}!", self.who.as_deref().unwrap_or_default());
///         Ok(0)
///     }
///
///     fn option_fields() -> Result<Vec<OptionField<Self>>> {
///         Ok(vec![OptionField::text(
///             OptionDescriptor::new("who", Some("w"), "Who to greet")?,
///             |greet: &mut Self, value| greet.who = Some(value),
///         )])
///     }
/// }
/// ```
pub trait Operation {
    /// Name used to select the operation from the command line and to find its
    /// configuration section.
    fn name(&self) -> &str;

    /// Text shown in help output.
    fn help_text(&self) -> &str;

    /// Whether the bound field values are sufficient to run.
    fn is_ready(&self) -> bool;

    /// Does the work.
    ///
    /// # Errors
    ///
    /// Returns an error if the work fails; the value otherwise becomes the exit code.
    fn run(&mut self) -> Result<i32>;

    /// The bindable fields of this operation.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any descriptor is invalid.
    fn option_fields() -> Result<Vec<OptionField<Self>>>
    where
        Self: Sized;
}

/// Typed write access to one field, tagged by destination type.
pub enum Accessor<T> {
    Bool(fn(&mut T, bool)),
    Integer(fn(&mut T, i64)),
    Float(fn(&mut T, f64)),
    DateTime(fn(&mut T, NaiveDateTime)),
    Text(fn(&mut T, String)),
    Enum(&'static EnumSpec, fn(&mut T, EnumMember)),
    Flags(&'static EnumSpec, fn(&mut T, i64)),
}

impl<T> Accessor<T> {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Text(_) => ValueKind::Text,
            Self::Enum(spec, _) => ValueKind::Enum(*spec),
            Self::Flags(spec, _) => ValueKind::Flags(*spec),
        }
    }

    /// Writes `value` onto `target`.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError::KindMismatch`] if the value variant does not fit this
    /// accessor; the target is left untouched.
    pub fn assign(&self, target: &mut T, value: OptionValue) -> std::result::Result<(), CoercionError> {
        match (self, value) {
            (Self::Bool(set), OptionValue::Bool(value)) => set(target, value),
            (Self::Integer(set), OptionValue::Integer(value)) => set(target, value),
            (Self::Float(set), OptionValue::Float(value)) => set(target, value),
            (Self::DateTime(set), OptionValue::DateTime(value)) => set(target, value),
            (Self::Text(set), OptionValue::Text(value)) => set(target, value),
            (Self::Enum(_, set), OptionValue::Enum(member)) => set(target, member),
            (Self::Flags(_, set), OptionValue::Flags(value)) => set(target, value),
            (accessor, value) => {
                return Err(CoercionError::KindMismatch {
                    value: value.kind_label().to_string(),
                    field: accessor.kind().to_string(),
                })
            }
        }

        Ok(())
    }
}

/// An option descriptor paired with the accessor for the field it describes.
pub struct OptionField<T> {
    pub descriptor: OptionDescriptor,
    pub accessor: Accessor<T>,
}

impl<T> OptionField<T> {
    pub fn new(descriptor: OptionDescriptor, accessor: Accessor<T>) -> Self {
        Self {
            descriptor,
            accessor,
        }
    }

    /// A presence-only boolean flag.
    pub fn flag(descriptor: OptionDescriptor, set: fn(&mut T, bool)) -> Self {
        Self::new(descriptor, Accessor::Bool(set))
    }

    pub fn integer(descriptor: OptionDescriptor, set: fn(&mut T, i64)) -> Self {
        Self::new(descriptor, Accessor::Integer(set))
    }

    pub fn float(descriptor: OptionDescriptor, set: fn(&mut T, f64)) -> Self {
        Self::new(descriptor, Accessor::Float(set))
    }

    pub fn date_time(descriptor: OptionDescriptor, set: fn(&mut T, NaiveDateTime)) -> Self {
        Self::new(descriptor, Accessor::DateTime(set))
    }

    pub fn text(descriptor: OptionDescriptor, set: fn(&mut T, String)) -> Self {
        Self::new(descriptor, Accessor::Text(set))
    }

    pub fn enumeration(
        descriptor: OptionDescriptor,
        spec: &'static EnumSpec,
        set: fn(&mut T, EnumMember),
    ) -> Self {
        Self::new(descriptor, Accessor::Enum(spec, set))
    }

    pub fn flags(descriptor: OptionDescriptor, spec: &'static EnumSpec, set: fn(&mut T, i64)) -> Self {
        Self::new(descriptor, Accessor::Flags(spec, set))
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.accessor.kind()
    }

    #[must_use]
    pub fn info(&self) -> OptionInfo {
        OptionInfo {
            descriptor: self.descriptor.clone(),
            kind: self.kind(),
        }
    }
}

/// Type-erased view of an option field, for help output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionInfo {
    pub descriptor: OptionDescriptor,
    pub kind: ValueKind,
}

/// Checks an operation's own metadata: its name must be a single word of at most
/// [`MAX_NAME_LENGTH`] characters and its help text must not be blank.
///
/// # Errors
///
/// Returns the matching configuration error.
pub fn validate_operation(operation: &dyn Operation) -> Result<()> {
    let name = operation.name();
    match validate_token(name) {
        Ok(()) => {}
        Err(TokenProblem::Empty) => return Err(EmptyOperationName.logged()),
        Err(TokenProblem::ContainsWhitespace) => {
            return Err(OperationNameWithSpace(name.to_string()).logged())
        }
        Err(TokenProblem::TooLong) => {
            return Err(OperationNameTooLong(name.to_string(), MAX_NAME_LENGTH).logged())
        }
    }

    if operation.help_text().trim().is_empty() {
        return Err(EmptyHelpText(name.to_string()).logged());
    }

    Ok(())
}
