//! Solution extraction: earliest firing schedule and duration bounds.
use serde::{Deserialize, Serialize};

use crate::constraint::AnalysisError;
use crate::constraint::system::{DateRepr, InequationSystem, START, SystemForm};
use crate::net::{IndexVec, TimeBound};

use super::system::VarId;

/// A concrete satisfying date assignment, in absolute or relative terms.
///
/// Absolute: `dates[v]` is the firing date measured from `start = 0`.
/// Relative: `dates[v]` is the delay since the previous event of the
/// sequence (`dates[start]` stays 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSolution {
    pub repr: DateRepr,
    pub dates: IndexVec<VarId, i64>,
}

/// Shortest and longest overall duration of the sequence.
///
/// `longest` is `Infinite` when some unbounded interval has no compensating
/// finite bound on the limiting path; this is an informational result, not
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationBounds {
    pub shortest: i64,
    pub longest: TimeBound,
}

/// Earliest firing schedule of a canonical system: `date(v) = -w(v, start)`,
/// the componentwise-minimal feasible assignment.
///
/// The builder ties every event to `start` through a chain of finite lower
/// bounds, so a missing bound here is an internal invariant violation.
pub fn earliest(canonical: &InequationSystem) -> Result<PathSolution, AnalysisError> {
    debug_assert_eq!(canonical.form(), SystemForm::Canonical);
    let mut dates = IndexVec::new();
    for v in canonical.var_ids() {
        match canonical.weight(v, START).finite() {
            Some(w) => {
                dates.push(-w);
            }
            None => {
                return Err(AnalysisError::Inconsistent {
                    detail: format!(
                        "variable '{}' has no finite lower bound from start",
                        canonical.var(v).name
                    ),
                });
            }
        }
    }
    debug_assert!(canonical.is_satisfied_by(&dates));
    Ok(PathSolution {
        repr: DateRepr::Absolute,
        dates,
    })
}

/// Shortest and longest overall duration, read from the closure entries
/// between `start` and the last event. An empty sequence has duration 0.
pub fn durations(canonical: &InequationSystem) -> Result<DurationBounds, AnalysisError> {
    debug_assert_eq!(canonical.form(), SystemForm::Canonical);
    let Some(last) = canonical.last_event_var() else {
        return Ok(DurationBounds {
            shortest: 0,
            longest: TimeBound::ZERO,
        });
    };
    let shortest = canonical.weight(last, START).finite().map(|w| -w).ok_or_else(|| {
        AnalysisError::Inconsistent {
            detail: format!(
                "variable '{}' has no finite lower bound from start",
                canonical.var(last).name
            ),
        }
    })?;
    Ok(DurationBounds {
        shortest,
        longest: canonical.weight(START, last),
    })
}
