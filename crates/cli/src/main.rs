use std::env;
use std::process::ExitCode;

use clap::Parser;
use crossterm::style::Color;
use log::{debug, info};

use opkit_cli::cli_args::Args;
use opkit_cli::{exit_status, failure_message};
use opkit_cli::operations::{self, PROGRAM_DESCRIPTION, PROGRAM_NAME};
use opkit_cli::output::console;
use opkit_core::config::{self, Configuration};
use opkit_core::dispatch::{detect_general_request, Dispatcher, GeneralRequest, Preparation};
use opkit_core::error::Result;

/// Exit code for "nothing was run": no selection, not ready or failed.
const NOT_RUN: i32 = -1;

/// Load the settings file, if there is one
fn initialize_config(args: &Args) -> Result<Option<Configuration>> {
    let config_path = config::get_config_path(&args.config_path);
    debug!("Config path: `{}`", config_path);

    Configuration::load_optional(&config_path)
}

fn print_help(dispatcher: &Dispatcher) -> Result<()> {
    console::print_help(&dispatcher.help(PROGRAM_NAME, PROGRAM_DESCRIPTION))
}

fn print_bind_warnings(dispatcher: &Dispatcher) -> Result<()> {
    if let Some(report) = dispatcher.last_report() {
        for warning in &report.warnings {
            console::write_line(&warning.to_string(), Color::DarkYellow)?;
        }
    }
    Ok(())
}

fn execute(args: &Args) -> Result<i32> {
    let mut dispatcher = operations::dispatcher()?;
    let configuration = initialize_config(args)?;

    let preparation = dispatcher.prepare(&args.tokens, configuration.as_ref())?;

    match detect_general_request(&args.tokens) {
        Some(GeneralRequest::Help) => {
            print_help(&dispatcher)?;
            return Ok(0);
        }
        Some(GeneralRequest::Version) => {
            console::write_formatted_line(
                "Version: {0}",
                Color::Grey,
                Color::Cyan,
                &[env!("CARGO_PKG_VERSION")],
            )?;
            return Ok(0);
        }
        None => {}
    }

    print_bind_warnings(&dispatcher)?;

    if preparation == Preparation::Ready {
        return dispatcher.run_selected();
    }

    info!("Nothing to run ({preparation:?}), showing help");
    print_help(&dispatcher)?;
    Ok(NOT_RUN)
}

fn main() -> ExitCode {
    env_logger::init();

    // Operation tokens that clap cannot place (e.g. a leading `--help`) are passed on as is
    let args = Args::try_parse().unwrap_or_else(|e| {
        debug!("Falling back to raw tokens: {e}");
        Args {
            config_path: None,
            tokens: env::args().skip(1).collect(),
        }
    });

    let code = match execute(&args) {
        Ok(code) => code,
        Err(e) => {
            let message = failure_message(&e);
            if console::write_line(&message, Color::Red).is_err() {
                eprintln!("{message}");
            }
            NOT_RUN
        }
    };

    ExitCode::from(exit_status(code))
}
