//! Shortest-path closure of a constraint system (canonical form).
//!
//! Min-plus transitive closure over all pairs of date variables:
//! `w(i,j) <- min(w(i,j), w(i,k) + w(k,j))` until fixpoint, computed as a
//! Floyd-Warshall pass, `O(n^3)` in the number of variables. Idempotent, and
//! every surviving edge is tight: some admissible assignment meets it with
//! equality.
use log::warn;

use crate::constraint::AnalysisError;
use crate::constraint::system::{InequationSystem, SystemForm};
use crate::net::TimeBound;

/// Tighten `system` into canonical form, or report `Inconsistent` on a
/// negative cycle.
///
/// A negative cycle cannot arise from a system the builder accepted; when it
/// does, it is an internal invariant violation, not a `NotFirable`.
pub fn close(mut system: InequationSystem) -> Result<InequationSystem, AnalysisError> {
    let vars: Vec<_> = system.var_ids().collect();
    for &v in &vars {
        system.add_edge(v, v, TimeBound::ZERO);
    }
    for &k in &vars {
        for &i in &vars {
            let ik = system.weight(i, k);
            if !ik.is_finite() {
                continue;
            }
            for &j in &vars {
                let through = ik + system.weight(k, j);
                if through < system.weight(i, j) {
                    system.set_weight(i, j, through);
                }
            }
        }
    }
    for &v in &vars {
        if let Some(weight) = system.weight(v, v).finite()
            && weight < 0
        {
            warn!(
                "negative cycle of weight {} through {}",
                weight,
                system.var(v).name
            );
            return Err(AnalysisError::Inconsistent {
                detail: format!(
                    "negative cycle of weight {} through variable '{}'",
                    weight,
                    system.var(v).name
                ),
            });
        }
    }
    system.set_form(SystemForm::Canonical);
    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::build;
    use crate::constraint::system::{START, VarId, VarInfo, VarKind};
    use crate::net::{IndexVec, TransitionId, parse_net_str};
    use crate::sequence::parse_sequence_str;

    fn raw_for(net_src: &str, scenario: &str) -> InequationSystem {
        let net = parse_net_str(net_src).unwrap();
        let seq = parse_sequence_str(&net, scenario).unwrap();
        build(&net, &seq).unwrap()
    }

    #[test]
    fn closure_is_idempotent() {
        let raw = raw_for(
            "tr t0 [1,4] p0 -> p1\ntr t1 [2,3] p1 -> p2\npl p0 (1)\n",
            "t0\nt1\n",
        );
        let once = close(raw).unwrap();
        let twice = close(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn closure_tightens_transitive_bounds() {
        let raw = raw_for(
            "tr t0 [1,4] p0 -> p1\ntr t1 [2,3] p1 -> p2\npl p0 (1)\n",
            "t0\nt1\n",
        );
        let canonical = close(raw).unwrap();
        let v2 = VarId::new(2);
        // date(t1) <= date(t0) + 3 <= start + 7, composed through t0.
        assert_eq!(canonical.weight(START, v2), TimeBound::Finite(7));
        assert_eq!(canonical.weight(v2, START), TimeBound::Finite(-3));
    }

    #[test]
    fn every_closed_edge_is_tight() {
        // All intervals bounded, so the closed matrix is fully finite and
        // row i of the matrix is itself an admissible assignment: it
        // satisfies every edge by the triangle inequality and meets each
        // edge (i, j) with equality.
        let raw = raw_for(
            "tr t0 [1,4] p0 -> p1\ntr t1 [2,3] p1 -> p2\npl p0 (1)\n",
            "t0\nt1\n",
        );
        let canonical = close(raw).unwrap();
        for (from, to, w) in canonical.edges() {
            let row: Vec<i64> = canonical
                .var_ids()
                .map(|v| canonical.weight(from, v).finite().unwrap())
                .collect();
            let dates = IndexVec::from(row);
            assert!(canonical.is_satisfied_by(&dates));
            assert_eq!(dates[to] - dates[from], w);
        }
    }

    #[test]
    fn negative_cycle_reports_inconsistent() {
        // Hand-built system: d1 - d0 <= -1 and d0 - d1 <= 0.
        let mut vars = IndexVec::new();
        vars.push(VarInfo::start());
        vars.push(VarInfo {
            name: "t0".to_owned(),
            kind: VarKind::Event {
                step: 0,
                transition: TransitionId::new(0),
                enabled_at: START,
            },
        });
        let mut sys = InequationSystem::with_vars(vars);
        let v1 = VarId::new(1);
        sys.add_edge(START, v1, TimeBound::Finite(-1));
        sys.add_edge(v1, START, TimeBound::Finite(0));
        assert!(matches!(
            close(sys),
            Err(AnalysisError::Inconsistent { .. })
        ));
    }
}
