//! Date projection: absolute (from `start`) vs relative (inter-event delay)
//! re-expression of systems and solutions.
//!
//! The stored constraints stay in difference form either way: under the
//! change of variables `delta_i = date(i) - date(i-1)` a difference edge
//! `(i, j, w)` is the inequality `delta_{i+1} + ... + delta_j <= w`, so the
//! two forms carry the same linear constraints and are mutually recoverable
//! given the fixed `start = 0` reference. What changes materially is the
//! rendering basis of a system and the values of a solution.
use crate::constraint::solve::PathSolution;
use crate::constraint::system::{DateRepr, InequationSystem};

pub fn to_absolute(system: &InequationSystem) -> InequationSystem {
    let mut projected = system.clone();
    projected.set_repr(DateRepr::Absolute);
    projected
}

pub fn to_relative(system: &InequationSystem) -> InequationSystem {
    let mut projected = system.clone();
    projected.set_repr(DateRepr::Relative);
    projected
}

/// Rewrite a solution as inter-event delays: entry `i` becomes
/// `date(i) - date(i-1)` in variable order (`start` keeps 0).
pub fn solution_to_relative(solution: &PathSolution) -> PathSolution {
    match solution.repr {
        DateRepr::Relative => solution.clone(),
        DateRepr::Absolute => {
            let absolute = solution.dates.iter().copied().collect::<Vec<_>>();
            let mut delays = Vec::with_capacity(absolute.len());
            for (idx, date) in absolute.iter().enumerate() {
                if idx == 0 {
                    delays.push(*date);
                } else {
                    delays.push(date - absolute[idx - 1]);
                }
            }
            PathSolution {
                repr: DateRepr::Relative,
                dates: delays.into(),
            }
        }
    }
}

/// Rewrite a solution as absolute dates from `start = 0` (prefix sums of
/// the delays).
pub fn solution_to_absolute(solution: &PathSolution) -> PathSolution {
    match solution.repr {
        DateRepr::Absolute => solution.clone(),
        DateRepr::Relative => {
            let mut absolute = Vec::with_capacity(solution.dates.len());
            let mut acc = 0i64;
            for delay in solution.dates.iter() {
                acc += delay;
                absolute.push(acc);
            }
            PathSolution {
                repr: DateRepr::Absolute,
                dates: absolute.into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::system::DateRepr;
    use crate::constraint::{build, close, earliest};
    use crate::net::parse_net_str;
    use crate::sequence::parse_sequence_str;

    fn earliest_for(net_src: &str, scenario: &str) -> (InequationSystem, PathSolution) {
        let net = parse_net_str(net_src).unwrap();
        let seq = parse_sequence_str(&net, scenario).unwrap();
        let canonical = close(build(&net, &seq).unwrap()).unwrap();
        let solution = earliest(&canonical).unwrap();
        (canonical, solution)
    }

    #[test]
    fn solution_round_trip_is_exact() {
        let (_, solution) = earliest_for(
            "tr t0 [1,4] p0 -> p1\ntr t1 [2,3] p1 -> p2\npl p0 (1)\n",
            "t0\nt1\n",
        );
        let relative = solution_to_relative(&solution);
        assert_eq!(relative.repr, DateRepr::Relative);
        assert_eq!(
            relative.dates.iter().copied().collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        let back = solution_to_absolute(&relative);
        assert_eq!(back, solution);
    }

    #[test]
    fn system_round_trip_is_exact() {
        let (canonical, _) = earliest_for("tr t0 [2,5] p0 -> p1\npl p0 (1)\n", "t0\n");
        let relative = to_relative(&canonical);
        assert_eq!(relative.repr(), DateRepr::Relative);
        let back = to_absolute(&relative);
        assert_eq!(back, canonical);
    }

    #[test]
    fn projection_is_idempotent_on_solutions() {
        let (_, solution) = earliest_for("tr t0 [2,5] p0 -> p1\npl p0 (1)\n", "t0\n");
        assert_eq!(solution_to_absolute(&solution), solution);
        let relative = solution_to_relative(&solution);
        assert_eq!(solution_to_relative(&relative), relative);
    }
}
