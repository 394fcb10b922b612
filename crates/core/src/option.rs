//! Option descriptors: the metadata attached to every bindable operation field.
//!
//! A descriptor is validated once when it is created. An invalid name or a missing
//! description is a mistake in the program itself, so construction fails straight away
//! instead of surfacing later as a usage problem.

use std::fmt::{Display, Formatter};

use crate::error::Error::{
    EmptyOptionDescription, EmptyOptionName, InvalidShortName, OptionNameTooLong,
    OptionNameWithSpace,
};
use crate::error::Result;

/// Longest name accepted for options and operations.
pub const MAX_NAME_LENGTH: usize = 12;

/// Why a name is not a usable single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenProblem {
    Empty,
    ContainsWhitespace,
    TooLong,
}

/// Checks that `name` is a non-empty single word of at most [`MAX_NAME_LENGTH`] characters.
///
/// # Errors
///
/// Returns the first [`TokenProblem`] found.
pub fn validate_token(name: &str) -> std::result::Result<(), TokenProblem> {
    if name.trim().is_empty() {
        return Err(TokenProblem::Empty);
    }

    if name.chars().any(char::is_whitespace) {
        return Err(TokenProblem::ContainsWhitespace);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(TokenProblem::TooLong);
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDescriptor {
    name: String,
    short_name: Option<String>,
    description: String,
}

impl OptionDescriptor {
    /// Creates a validated option descriptor.
    ///
    /// # Arguments
    ///
    /// * `name` - Option name, used on the command line as `--name` and as the key in the
    ///   operation's configuration section
    /// * `short_name` - Optional alias, used as `--short`. An empty alias counts as none
    /// * `description` - Help text shown for the option
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the name is empty, contains whitespace or is
    /// longer than [`MAX_NAME_LENGTH`], if the short name breaks the same rules, or if
    /// the description is blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use opkit_core::option::OptionDescriptor;
    ///
    /// let descriptor = OptionDescriptor::new("number", Some("n"), "Some integer")?;
    /// assert_eq!(descriptor.flag(), "--number");
    /// assert!(OptionDescriptor::new("two words", None, "Broken").is_err());
    /// # Ok::<(), opkit_core::error::Error>(())
    /// ```
    pub fn new(name: &str, short_name: Option<&str>, description: &str) -> Result<Self> {
        match validate_token(name) {
            Ok(()) => {}
            Err(TokenProblem::Empty) => return Err(EmptyOptionName.logged()),
            Err(TokenProblem::ContainsWhitespace) => {
                return Err(OptionNameWithSpace(name.to_string()).logged())
            }
            Err(TokenProblem::TooLong) => {
                return Err(OptionNameTooLong(name.to_string(), MAX_NAME_LENGTH).logged())
            }
        }

        let short_name = short_name.filter(|short| !short.is_empty());
        if let Some(short) = short_name {
            if validate_token(short).is_err() {
                return Err(
                    InvalidShortName(name.to_string(), short.to_string(), MAX_NAME_LENGTH)
                        .logged(),
                );
            }
        }

        if description.trim().is_empty() {
            return Err(EmptyOptionDescription(name.to_string()).logged());
        }

        Ok(Self {
            name: name.to_string(),
            short_name: short_name.map(ToString::to_string),
            description: description.to_string(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The command-line token for the full name, e.g. `--number`.
    #[must_use]
    pub fn flag(&self) -> String {
        format!("--{}", self.name)
    }

    /// The command-line token for the short name, e.g. `--n`.
    #[must_use]
    pub fn short_flag(&self) -> Option<String> {
        self.short_name.as_ref().map(|short| format!("--{short}"))
    }
}

impl Display for OptionDescriptor {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.flag())?;

        if let Some(short_flag) = self.short_flag() {
            write!(formatter, "|{short_flag}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_valid_descriptor() {
        let descriptor = OptionDescriptor::new("readycheck", Some("rc"), "Must be given").unwrap();
        assert_eq!(descriptor.name(), "readycheck");
        assert_eq!(descriptor.short_name(), Some("rc"));
        assert_eq!(descriptor.description(), "Must be given");
        assert_eq!(descriptor.flag(), "--readycheck");
        assert_eq!(descriptor.short_flag(), Some("--rc".to_string()));
    }

    #[test]
    fn test_empty_name_fails() {
        assert!(matches!(
            OptionDescriptor::new("", None, "Description"),
            Err(Error::EmptyOptionName)
        ));
        assert!(matches!(
            OptionDescriptor::new("   ", None, "Description"),
            Err(Error::EmptyOptionName)
        ));
    }

    #[test]
    fn test_name_with_whitespace_fails() {
        assert!(matches!(
            OptionDescriptor::new("two words", None, "Description"),
            Err(Error::OptionNameWithSpace(_))
        ));
        assert!(matches!(
            OptionDescriptor::new("tab\tname", None, "Description"),
            Err(Error::OptionNameWithSpace(_))
        ));
    }

    #[test]
    fn test_name_length_limit() {
        assert!(OptionDescriptor::new("twelve_chars", None, "Description").is_ok());
        assert!(matches!(
            OptionDescriptor::new("thirteen_char", None, "Description"),
            Err(Error::OptionNameTooLong(_, MAX_NAME_LENGTH))
        ));
    }

    #[test]
    fn test_empty_description_fails() {
        assert!(matches!(
            OptionDescriptor::new("text", None, ""),
            Err(Error::EmptyOptionDescription(_))
        ));
        assert!(matches!(
            OptionDescriptor::new("text", None, "  \n"),
            Err(Error::EmptyOptionDescription(_))
        ));
    }

    #[test]
    fn test_short_name_rules() {
        let descriptor = OptionDescriptor::new("text", Some(""), "Description").unwrap();
        assert_eq!(descriptor.short_name(), None);
        assert_eq!(descriptor.short_flag(), None);

        assert!(matches!(
            OptionDescriptor::new("text", Some("t x"), "Description"),
            Err(Error::InvalidShortName(..))
        ));
    }

    #[test]
    fn test_display() {
        let with_short = OptionDescriptor::new("text", Some("t"), "Description").unwrap();
        assert_eq!(with_short.to_string(), "--text|--t");

        let without_short = OptionDescriptor::new("text", None, "Description").unwrap();
        assert_eq!(without_short.to_string(), "--text");
    }

    #[test]
    fn test_validate_token() {
        assert_eq!(validate_token("args"), Ok(()));
        assert_eq!(validate_token(""), Err(TokenProblem::Empty));
        assert_eq!(validate_token("a b"), Err(TokenProblem::ContainsWhitespace));
        assert_eq!(validate_token("abcdefghijklm"), Err(TokenProblem::TooLong));
    }
}
