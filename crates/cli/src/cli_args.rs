//! Command-line argument parsing.
//!
//! `clap` only handles the binary's own switches. Everything from the operation name on
//! is collected verbatim and handed to the dispatcher, which binds `--name value` pairs
//! onto the selected operation.

use clap::Parser;

/// Command-line arguments for the `opkit` binary.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use opkit_cli::cli_args::Args;
///
/// let args = Args::parse_from(["opkit", "args", "--number", "42", "--readycheck"]);
/// assert_eq!(args.tokens, ["args", "--number", "42", "--readycheck"]);
/// ```
#[derive(Parser, Debug)]
#[command(term_width = 0, disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Path to the operation settings file (YAML or JSON).
    ///
    /// If not provided, defaults to `~/.opkit/settings.yml`. Must come before the
    /// operation name.
    #[arg(long = "config-file")]
    pub config_path: Option<String>,

    /// Operation name and its options, e.g. `args --text hello --readycheck`.
    ///
    /// `--help`/`--h` and `--version`/`--v` are recognized anywhere among them.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub tokens: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_values() {
        let args = Args::parse_from(["opkit"]);

        assert!(args.config_path.is_none());
        assert!(args.tokens.is_empty());
    }

    #[test]
    fn test_config_file_before_operation() {
        let args = Args::parse_from([
            "opkit",
            "--config-file",
            "/custom/settings.yml",
            "args",
            "--text",
            "hello",
        ]);

        assert_eq!(args.config_path, Some("/custom/settings.yml".to_string()));
        assert_eq!(args.tokens, ["args", "--text", "hello"]);
    }

    #[test]
    fn test_operation_tokens_are_kept_verbatim() {
        let args = Args::parse_from(["opkit", "colors", "--s", "Campbell", "--help"]);

        assert!(args.config_path.is_none());
        assert_eq!(args.tokens, ["colors", "--s", "Campbell", "--help"]);
    }

    #[test]
    fn test_config_file_after_operation_belongs_to_tokens() {
        let args = Args::parse_from(["opkit", "args", "--config-file", "x.yml"]);

        assert!(args.config_path.is_none());
        assert_eq!(args.tokens, ["args", "--config-file", "x.yml"]);
    }
}
