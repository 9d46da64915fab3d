//! Main application entry point.
//!
//! Parses the command line and dispatches to the sensor loop or one of the
//! one-shot commands. Errors are reported through the logger and turn into a
//! non-zero exit status.

use anyhow::Result;

use daylight::{
    Daylight,
    args::{self, CliAction, ParsedArgs},
    commands,
    common::constants::{EXIT_FAILURE, EXIT_SUCCESS},
    config, log_error_exit, log_indented,
    logger::Log,
};

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let code = match dispatch(parsed_args.action) {
        Ok(code) => code,
        Err(e) => {
            // `get --json` silences the logger; errors must still be shown
            Log::set_enabled(true);
            log_error_exit!("{e}");
            for cause in e.chain().skip(1) {
                log_indented!("Caused by: {cause}");
            }
            EXIT_FAILURE
        }
    };

    std::process::exit(code);
}

fn dispatch(action: CliAction) -> Result<i32> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(EXIT_SUCCESS)
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(EXIT_SUCCESS)
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            Ok(EXIT_FAILURE)
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            Daylight::new(debug_enabled).run()?;
            Ok(EXIT_SUCCESS)
        }
        CliAction::Get { json, config_dir } => {
            config::set_config_dir(config_dir)?;
            commands::get::handle_get_command(json)?;
            Ok(EXIT_SUCCESS)
        }
        CliAction::Simulate {
            debug_enabled,
            start_time,
            end_time,
            multiplier,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::simulate::handle_simulate_command(
                &start_time,
                &end_time,
                multiplier,
                debug_enabled,
            )?;

            // Headers already shown by the simulate command
            Daylight::new(debug_enabled).without_headers().run()?;
            Ok(EXIT_SUCCESS)
        }
    }
}
