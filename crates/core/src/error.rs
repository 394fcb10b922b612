use log::error;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid option name: name may not be empty")]
    EmptyOptionName,

    #[error("Invalid option name `{}`: name should be a single word", .0)]
    OptionNameWithSpace(String),

    #[error("Invalid option name `{}`: name should have no more than {} characters", .0, .1)]
    OptionNameTooLong(String, usize),

    #[error("Invalid short name `{}` for option `{}`: short name should be a single word of no more than {} characters", .1, .0, .2)]
    InvalidShortName(String, String, usize),

    #[error("Option `{}` should have a description", .0)]
    EmptyOptionDescription(String),

    #[error("Console operation is missing a name")]
    EmptyOperationName,

    #[error("Invalid operation name `{}`: name should be a single word", .0)]
    OperationNameWithSpace(String),

    #[error("Invalid operation name `{}`: name should have no more than {} characters", .0, .1)]
    OperationNameTooLong(String, usize),

    #[error("Operation `{}` should have help text specified", .0)]
    EmptyHelpText(String),

    #[error("Found a non-unique operation name: `{}`", .0)]
    NonUniqueOperationName(String),

    #[error("Found a non-unique option name on operation {}: `{}`", .0, .1)]
    NonUniqueOptionName(String, String),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("The configuration at `{}` should be a mapping of operation names to option values", .path)]
    ConfigurationRoot { path: String },

    #[error("No operation is selected")]
    NoOperationSelected,

    #[error("Terminal error: {}", .0)]
    Terminal(#[from] std::io::Error),

    #[error("Error parsing output template: {}", .0)]
    Template(String),

    #[error("Menu needs more than one item to choose from, got {}", .0)]
    MenuTooShort(usize),

    #[error("Progress bar needs at least {} steps, got {}", .0, .1)]
    ProgressStepsTooFew(usize, usize),

    #[error("Progress bar is not supported with growing spinner types")]
    ProgressOnGrowingSpinner,

    #[error("Input was cancelled")]
    InputCancelled,
}

impl Error {
    /// Whether this error is a developer mistake in operation or option metadata.
    ///
    /// These are raised while registering or validating operations and should abort
    /// startup rather than being shown as a usage problem.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyOptionName
                | Self::OptionNameWithSpace(_)
                | Self::OptionNameTooLong(..)
                | Self::InvalidShortName(..)
                | Self::EmptyOptionDescription(_)
                | Self::EmptyOperationName
                | Self::OperationNameWithSpace(_)
                | Self::OperationNameTooLong(..)
                | Self::EmptyHelpText(_)
                | Self::NonUniqueOperationName(_)
                | Self::NonUniqueOptionName(..)
        )
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    /// Logs a configuration error and hands it back, for use in `map_err`/`Err(..)` chains.
    pub fn logged(self) -> Self {
        error!("{self}");
        self
    }
}
