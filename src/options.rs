//! Command-line options.
//!
//! Mode selection is mutually exclusive: `--constraints` (derive the
//! inequality system, the default) or `--schedule` (solve for one concrete
//! schedule). Either combines with a date representation, a post-processing
//! form and a verbosity; `--parse-only` validates both inputs and skips the
//! engine. Input format and output encoding resolve as explicit flag >
//! file extension > default.
use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, Command};

use crate::constraint::{DateRepr, SystemForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Derive the constraint system characterizing every feasible timing.
    Constraints,
    /// Extract one concrete feasible schedule.
    Schedule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Explicit,
    Summary,
    /// Re-encode the solution as a timed firing sequence; schedule mode only.
    Replay,
}

#[derive(Debug, Clone)]
pub struct Options {
    pub net_path: PathBuf,
    pub scenario_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub mode: Mode,
    pub repr: DateRepr,
    pub form: SystemForm,
    pub verbosity: Verbosity,
    pub parse_only: bool,
}

fn make_options_parser() -> Command {
    Command::new("tpan")
        .about("Temporal constraint analysis of firing sequences on time Petri nets")
        .version("v0.1.0")
        .arg(
            Arg::new("net")
                .value_name("NET")
                .required(true)
                .help("Time Petri net in .net format"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_parser(["net"])
                .help("Net input format; overrides extension-based detection"),
        )
        .arg(
            Arg::new("scenario")
                .short('s')
                .long("scenario")
                .value_name("FILE")
                .help("Firing sequence file; standard input when absent"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output destination; standard output when absent"),
        )
        .arg(
            Arg::new("constraints")
                .short('c')
                .long("constraints")
                .action(ArgAction::SetTrue)
                .conflicts_with("schedule")
                .help("Derive the inequality system (default)"),
        )
        .arg(
            Arg::new("schedule")
                .short('x')
                .long("schedule")
                .action(ArgAction::SetTrue)
                .help("Solve for one concrete schedule"),
        )
        .arg(
            Arg::new("relative")
                .short('r')
                .long("relative")
                .action(ArgAction::SetTrue)
                .conflicts_with("absolute")
                .help("Express dates as delays since the previous event"),
        )
        .arg(
            Arg::new("absolute")
                .short('a')
                .long("absolute")
                .action(ArgAction::SetTrue)
                .help("Express dates from the sequence start (default)"),
        )
        .arg(
            Arg::new("form")
                .long("form")
                .value_parser(["raw", "canonical", "minimal"])
                .default_value("canonical")
                .help("Post-processing applied to the derived system"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .value_parser(["explicit", "summary", "replay"])
                .help("Output verbosity [default: explicit]"),
        )
        .arg(
            Arg::new("parse-only")
                .long("parse-only")
                .action(ArgAction::SetTrue)
                .help("Validate the net and sequence, skip the analysis"),
        )
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

impl Options {
    pub fn parse_from_args<I, S>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let app = make_options_parser();
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let matches = app.try_get_matches_from(args)?;

        let net_path = PathBuf::from(matches.get_one::<String>("net").cloned().unwrap_or_default());
        match matches.get_one::<String>("format").map(String::as_str) {
            Some("net") => {}
            Some(other) => return Err(format!("unsupported net format '{}'", other).into()),
            None => {
                if !has_extension(&net_path, "net") {
                    return Err(format!(
                        "cannot infer the format of '{}'; pass --format net",
                        net_path.display()
                    )
                    .into());
                }
            }
        }

        let mode = if matches.get_flag("schedule") {
            Mode::Schedule
        } else {
            Mode::Constraints
        };
        let repr = if matches.get_flag("relative") {
            DateRepr::Relative
        } else {
            DateRepr::Absolute
        };
        let form = match matches.get_one::<String>("form").map(String::as_str) {
            Some("raw") => SystemForm::Raw,
            Some("minimal") => SystemForm::Minimal,
            _ => SystemForm::Canonical,
        };

        let output_path = matches.get_one::<String>("output").map(PathBuf::from);
        let verbosity = match matches.get_one::<String>("verbosity").map(String::as_str) {
            Some("summary") => Verbosity::Summary,
            Some("replay") => Verbosity::Replay,
            Some(_) => Verbosity::Explicit,
            // No explicit flag: a .scn output extension selects replay
            // encoding in schedule mode.
            None => match &output_path {
                Some(path) if mode == Mode::Schedule && has_extension(path, "scn") => {
                    Verbosity::Replay
                }
                _ => Verbosity::Explicit,
            },
        };
        if verbosity == Verbosity::Replay && mode != Mode::Schedule {
            return Err("replay output requires --schedule".into());
        }

        Ok(Options {
            net_path,
            scenario_path: matches.get_one::<String>("scenario").map(PathBuf::from),
            output_path,
            mode,
            repr,
            form,
            verbosity,
            parse_only: matches.get_flag("parse-only"),
        })
    }
}
