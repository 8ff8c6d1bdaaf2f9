//! Pipeline driver: loads the net and the scenario per the options and
//! threads them through builder, closure, reducer/solver, projector and
//! report. All mode state travels in the explicit [`Options`] value.
use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use log::info;

use crate::constraint::{
    DateRepr, InequationSystem, SystemForm, build, close, durations, earliest, minimize,
    solution_to_relative, to_absolute, to_relative,
};
use crate::net::{Net, parse_net_file};
use crate::options::{Mode, Options, Verbosity};
use crate::report;
use crate::sequence::{FiringSequence, parse_sequence_file, parse_sequence_reader};

fn load_inputs(options: &Options) -> Result<(Net, FiringSequence)> {
    let net = parse_net_file(&options.net_path)
        .with_context(|| format!("reading net '{}'", options.net_path.display()))?;
    let sequence = match &options.scenario_path {
        Some(path) => parse_sequence_file(&net, path)
            .with_context(|| format!("reading scenario '{}'", path.display()))?,
        None => parse_sequence_reader(&net, io::stdin().lock())
            .context("reading scenario from standard input")?,
    };
    info!(
        "loaded net '{}' ({} places, {} transitions) and a {}-step scenario",
        net.name.as_deref().unwrap_or("<anonymous>"),
        net.places_len(),
        net.transitions_len(),
        sequence.len()
    );
    Ok((net, sequence))
}

fn project(system: InequationSystem, repr: DateRepr) -> InequationSystem {
    match repr {
        DateRepr::Absolute => to_absolute(&system),
        DateRepr::Relative => to_relative(&system),
    }
}

/// Run the analysis, writing the report to `out`.
pub fn run_to<W: Write>(options: &Options, out: &mut W) -> Result<()> {
    let (net, sequence) = load_inputs(options)?;
    if options.parse_only {
        info!("parse-only: skipping the analysis");
        return Ok(());
    }

    let raw = build(&net, &sequence)?;
    match options.mode {
        Mode::Constraints => {
            let system = match options.form {
                SystemForm::Raw => raw,
                SystemForm::Canonical => close(raw)?,
                SystemForm::Minimal => minimize(&close(raw)?),
            };
            let system = project(system, options.repr);
            match options.verbosity {
                Verbosity::Explicit => report::write_system_explicit(&system, out)?,
                // Only closure entries are true bounds, so the summary always
                // reads from the canonical closure of the rendered system.
                Verbosity::Summary => {
                    let canonical = close(system)?;
                    let bounds = durations(&canonical)?;
                    report::write_system_summary(&canonical, Some(bounds), out)?;
                }
                Verbosity::Replay => unreachable!("rejected during option parsing"),
            }
        }
        Mode::Schedule => {
            let canonical = close(raw)?;
            let solution = earliest(&canonical)?;
            let solution = match options.repr {
                DateRepr::Absolute => solution,
                DateRepr::Relative => solution_to_relative(&solution),
            };
            match options.verbosity {
                Verbosity::Explicit => report::write_solution(&canonical, &solution, out)?,
                Verbosity::Summary => {
                    report::write_solution(&canonical, &solution, out)?;
                    report::write_durations(durations(&canonical)?, out)?;
                }
                Verbosity::Replay => report::write_replay(&net, &canonical, &solution, out)?,
            }
        }
    }
    Ok(())
}

/// Run the analysis with the output destination resolved from the options.
pub fn run(options: &Options) -> Result<()> {
    match &options.output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output '{}'", path.display()))?;
            let mut out = BufWriter::new(file);
            run_to(options, &mut out)?;
            out.flush()?;
            Ok(())
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            run_to(options, &mut out)
        }
    }
}
