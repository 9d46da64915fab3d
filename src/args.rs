//! Command-line argument parsing and processing.
//!
//! Flags may appear anywhere on the command line. The first positional
//! argument selects a command; without one the sensor loop runs.

use crate::common::constants::DEFAULT_SIMULATION_MULTIPLIER;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the sensor loop
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Print a single reading and exit
    Get {
        json: bool,
        config_dir: Option<String>,
    },
    /// Run the sensor loop against simulated time
    Simulate {
        debug_enabled: bool,
        start_time: String,
        end_time: String,
        multiplier: f64,
        config_dir: Option<String>,
    },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to invalid arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments, including the program name.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ParsedArgs {
            action: parse_action(args),
        }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

fn parse_action<I, S>(args: I) -> CliAction
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut debug_enabled = false;
    let mut display_help = false;
    let mut display_version = false;
    let mut json = false;
    let mut config_dir: Option<String> = None;
    let mut positionals: Vec<String> = Vec::new();
    let mut unknown_arg_found = false;

    let mut iter = args.into_iter().skip(1).map(|s| s.as_ref().to_string());
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--debug" | "-d" => debug_enabled = true,
            "--help" | "-h" => display_help = true,
            "--version" | "-V" | "-v" => display_version = true,
            "--json" | "-j" => json = true,
            "--config" | "-c" => match iter.next() {
                Some(dir) if !dir.starts_with('-') => config_dir = Some(dir),
                _ => {
                    log_warning!("Missing directory for --config");
                    unknown_arg_found = true;
                }
            },
            flag if flag.starts_with('-') && flag.len() > 1 && flag.parse::<f64>().is_err() => {
                log_warning!("Unknown argument: {flag}");
                unknown_arg_found = true;
            }
            _ => positionals.push(arg),
        }
    }

    // Version and help take precedence over everything else
    if display_version {
        return CliAction::ShowVersion;
    }
    if display_help {
        return CliAction::ShowHelp;
    }
    if unknown_arg_found {
        return CliAction::ShowHelpDueToError;
    }

    let Some((command, rest)) = positionals.split_first() else {
        if json {
            log_warning!("--json is only valid with the get command");
            return CliAction::ShowHelpDueToError;
        }
        return CliAction::Run {
            debug_enabled,
            config_dir,
        };
    };

    match command.as_str() {
        "get" | "g" if rest.is_empty() => CliAction::Get { json, config_dir },
        "simulate" | "S" if !json => match rest {
            [start, end] => CliAction::Simulate {
                debug_enabled,
                start_time: start.clone(),
                end_time: end.clone(),
                multiplier: DEFAULT_SIMULATION_MULTIPLIER,
                config_dir,
            },
            [start, end, multiplier] => match multiplier.parse::<f64>() {
                Ok(m) if m.is_finite() && m >= 0.0 => CliAction::Simulate {
                    debug_enabled,
                    start_time: start.clone(),
                    end_time: end.clone(),
                    multiplier: m,
                    config_dir,
                },
                _ => {
                    log_warning!("Invalid multiplier '{multiplier}': expected a number >= 0");
                    CliAction::ShowHelpDueToError
                }
            },
            _ => {
                log_warning!("Usage: daylight simulate <start> <end> [multiplier]");
                CliAction::ShowHelpDueToError
            }
        },
        other => {
            log_warning!("Unexpected argument: {other}");
            CliAction::ShowHelpDueToError
        }
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("daylight [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Log every published value");
    log_indented!("-h, --help             Print help information");
    log_indented!("-j, --json             Print the reading of 'get' as JSON");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("get, g                 Print the current light level and exit");
    log_indented!("simulate, S <start> <end> [multiplier]");
    log_indented!("                       Run with simulated time (\"YYYY-MM-DD HH:MM:SS\")");
    log_indented!("                       multiplier 0 fast-forwards, default 3600");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        ParsedArgs::parse(std::iter::once("daylight").chain(args.iter().copied())).action
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(
            parse(&[]),
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_debug_and_config() {
        assert_eq!(
            parse(&["-d", "--config", "/tmp/daylight"]),
            CliAction::Run {
                debug_enabled: true,
                config_dir: Some("/tmp/daylight".to_string()),
            }
        );
    }

    #[test]
    fn test_help_and_version_take_precedence() {
        assert_eq!(parse(&["--debug", "--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["--version", "--help", "get"]), CliAction::ShowVersion);
        assert_eq!(parse(&["-v"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_get() {
        assert_eq!(
            parse(&["get"]),
            CliAction::Get {
                json: false,
                config_dir: None,
            }
        );
        assert_eq!(
            parse(&["--json", "g", "-c", "cfg"]),
            CliAction::Get {
                json: true,
                config_dir: Some("cfg".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_simulate_default_multiplier() {
        assert_eq!(
            parse(&["simulate", "2026-03-20 00:00:00", "2026-03-21 00:00:00"]),
            CliAction::Simulate {
                debug_enabled: false,
                start_time: "2026-03-20 00:00:00".to_string(),
                end_time: "2026-03-21 00:00:00".to_string(),
                multiplier: DEFAULT_SIMULATION_MULTIPLIER,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_simulate_fast_forward() {
        assert_eq!(
            parse(&["-d", "S", "2026-03-20 00:00:00", "2026-03-21 00:00:00", "0"]),
            CliAction::Simulate {
                debug_enabled: true,
                start_time: "2026-03-20 00:00:00".to_string(),
                end_time: "2026-03-21 00:00:00".to_string(),
                multiplier: 0.0,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(parse(&["--unknown"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--config"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--json"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["get", "extra"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["simulate", "2026-03-20 00:00:00"]), CliAction::ShowHelpDueToError);
        assert_eq!(
            parse(&["simulate", "a", "b", "fast"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(parse(&["simulate", "a", "b", "-1"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["reload"]), CliAction::ShowHelpDueToError);
    }
}
