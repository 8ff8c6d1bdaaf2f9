//! Textual rendering of constraint systems and solutions, and the replay
//! writer for solved schedules.
//!
//! Explicit verbosity lists every inequality of the system; summary prints
//! per-event bounds plus the duration line; replay re-encodes a solution as
//! a timed firing sequence in the scenario syntax of [`crate::sequence`].
use std::io::{self, Write};

use itertools::Itertools;
use log::debug;

use crate::constraint::{
    DateRepr, DurationBounds, InequationSystem, PathSolution, START, VarId, VarKind,
    solution_to_absolute,
};
use crate::net::{Net, TimeBound};

/// Render the pair `(lo <=) expr (<= hi)`; `None` when both sides are
/// unbounded.
fn bound_line(lo: Option<i64>, hi: TimeBound, expr: &str) -> Option<String> {
    match (lo, hi) {
        (Some(lo), TimeBound::Finite(hi)) => Some(format!("{} <= {} <= {}", lo, expr, hi)),
        (Some(lo), TimeBound::Infinite) => Some(format!("{} <= {}", lo, expr)),
        (None, TimeBound::Finite(hi)) => Some(format!("{} <= {}", expr, hi)),
        (None, TimeBound::Infinite) => None,
    }
}

/// The left-hand expression for the pair `(from, to)` in the current
/// representation basis.
fn pair_expr(system: &InequationSystem, from: VarId, to: VarId) -> String {
    match system.repr() {
        DateRepr::Absolute => {
            if from == START {
                system.var(to).name.clone()
            } else {
                format!("{} - {}", system.var(to).name, system.var(from).name)
            }
        }
        DateRepr::Relative => {
            // Under delta_i = date(i) - date(i-1) the difference
            // date(to) - date(from) is the sum of the delays it spans.
            let names = system
                .var_ids()
                .filter(|v| *v > from && *v <= to)
                .map(|v| format!("d({})", system.var(v).name));
            names.collect::<Vec<_>>().join(" + ")
        }
    }
}

/// Every inequality of the system, one per line, tightest pair first.
pub fn write_system_explicit<W: Write>(
    system: &InequationSystem,
    out: &mut W,
) -> io::Result<()> {
    writeln!(
        out,
        "# {} system, {} dates: {} variables, {} constraints",
        system.form(),
        match system.repr() {
            DateRepr::Absolute => "absolute",
            DateRepr::Relative => "relative",
        },
        system.var_count(),
        system.edge_count()
    )?;
    for (from, to) in system.var_ids().tuple_combinations() {
        let lo = system.weight(to, from).finite().map(|w| -w);
        let hi = system.weight(from, to);
        if let Some(line) = bound_line(lo, hi, &pair_expr(system, from, to)) {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}

/// Per-event bounds, then the duration line. Absolute representation bounds
/// each date against `start`; relative representation bounds each delay
/// against the preceding event.
pub fn write_system_summary<W: Write>(
    system: &InequationSystem,
    bounds: Option<DurationBounds>,
    out: &mut W,
) -> io::Result<()> {
    for (var, info) in system.event_vars() {
        let (from, expr) = match system.repr() {
            DateRepr::Absolute => (START, info.name.clone()),
            DateRepr::Relative => (VarId::new(var.raw() - 1), format!("d({})", info.name)),
        };
        let lo = system.weight(var, from).finite().map(|w| -w);
        let hi = system.weight(from, var);
        if let Some(line) = bound_line(lo, hi, &expr) {
            writeln!(out, "{}", line)?;
        }
    }
    if let Some(bounds) = bounds {
        write_durations(bounds, out)?;
    }
    Ok(())
}

pub fn write_durations<W: Write>(bounds: DurationBounds, out: &mut W) -> io::Result<()> {
    writeln!(out, "shortest duration: {}", bounds.shortest)?;
    match bounds.longest {
        TimeBound::Finite(longest) => writeln!(out, "longest duration: {}", longest),
        TimeBound::Infinite => writeln!(out, "longest duration: unbounded"),
    }
}

/// One `name = date` (or `d(name) = delay`) line per event.
pub fn write_solution<W: Write>(
    system: &InequationSystem,
    solution: &PathSolution,
    out: &mut W,
) -> io::Result<()> {
    for (var, info) in system.event_vars() {
        match solution.repr {
            DateRepr::Absolute => writeln!(out, "{} = {}", info.name, solution.dates[var])?,
            DateRepr::Relative => writeln!(out, "d({}) = {}", info.name, solution.dates[var])?,
        }
    }
    Ok(())
}

/// Re-encode a solution as a timed firing sequence consumable by a
/// companion simulator (and by this tool's own scenario reader).
pub fn write_replay<W: Write>(
    net: &Net,
    system: &InequationSystem,
    solution: &PathSolution,
    out: &mut W,
) -> io::Result<()> {
    let absolute = solution_to_absolute(solution);
    for (var, info) in system.event_vars() {
        let VarKind::Event { transition, .. } = info.kind else {
            continue;
        };
        writeln!(
            out,
            "{} @ {}",
            net.transition_name(transition),
            absolute.dates[var]
        )?;
    }
    debug!("replay: {} timed steps", system.var_count() - 1);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{build, close, durations, earliest, to_relative};
    use crate::net::parse_net_str;
    use crate::sequence::parse_sequence_str;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn canonical_for(net_src: &str, scenario: &str) -> (Net, InequationSystem) {
        let net = parse_net_str(net_src).unwrap();
        let seq = parse_sequence_str(&net, scenario).unwrap();
        let canonical = close(build(&net, &seq).unwrap()).unwrap();
        (net, canonical)
    }

    #[test]
    fn explicit_absolute_single_transition() {
        let (_, canonical) = canonical_for("tr t0 [2,5] p0 -> p1\npl p0 (1)\n", "t0\n");
        let text = render(|out| write_system_explicit(&canonical, out));
        assert!(text.contains("2 <= t0 <= 5"), "got: {}", text);
    }

    #[test]
    fn explicit_relative_uses_delay_sums() {
        let (_, canonical) = canonical_for(
            "tr t0 [1,4] p0 -> p1\ntr t1 [2,3] p1 -> p2\npl p0 (1)\n",
            "t0\nt1\n",
        );
        let relative = to_relative(&canonical);
        let text = render(|out| write_system_explicit(&relative, out));
        assert!(text.contains("2 <= d(t1) <= 3"), "got: {}", text);
        assert!(text.contains("d(t0) + d(t1)"), "got: {}", text);
    }

    #[test]
    fn relative_summary_bounds_each_delay() {
        let (_, canonical) = canonical_for(
            "tr t0 [1,4] p0 -> p1\ntr t1 [2,3] p1 -> p2\npl p0 (1)\n",
            "t0\nt1\n",
        );
        let relative = to_relative(&canonical);
        let text = render(|out| write_system_summary(&relative, None, out));
        assert!(text.contains("1 <= d(t0) <= 4"), "got: {}", text);
        assert!(text.contains("2 <= d(t1) <= 3"), "got: {}", text);
    }

    #[test]
    fn summary_reports_durations() {
        let (_, canonical) = canonical_for("tr t0 [2,5] p0 -> p1\npl p0 (1)\n", "t0\n");
        let bounds = durations(&canonical).unwrap();
        let text = render(|out| write_system_summary(&canonical, Some(bounds), out));
        assert!(text.contains("2 <= t0 <= 5"), "got: {}", text);
        assert!(text.contains("shortest duration: 2"), "got: {}", text);
        assert!(text.contains("longest duration: 5"), "got: {}", text);
    }

    #[test]
    fn unbounded_duration_is_reported_as_such() {
        let (_, canonical) = canonical_for("tr t0 [2,w[ p0 -> p1\npl p0 (1)\n", "t0\n");
        let bounds = durations(&canonical).unwrap();
        let text = render(|out| write_durations(bounds, out));
        assert!(text.contains("longest duration: unbounded"), "got: {}", text);
    }

    #[test]
    fn replay_round_trips_through_the_scenario_reader() {
        let (net, canonical) = canonical_for(
            "tr t0 [1,4] p0 -> p1\ntr t1 [2,3] p1 -> p2\npl p0 (1)\n",
            "t0\nt1\n",
        );
        let solution = earliest(&canonical).unwrap();
        let text = render(|out| write_replay(&net, &canonical, &solution, out));
        let replayed = parse_sequence_str(&net, &text).unwrap();
        assert_eq!(replayed.len(), 2);
        assert_eq!(replayed.steps[0].date, Some(1));
        assert_eq!(replayed.steps[1].date, Some(3));
    }
}
