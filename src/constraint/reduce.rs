//! Redundancy elimination: a minimal generating subset of a canonical
//! system.
//!
//! An edge `(i, j, w)` is redundant when the pairwise bound for `(i, j)`
//! recomputed from the remaining edges alone still yields `w`. Edges are
//! processed in a fixed enumeration order (source index, then target index)
//! and each redundant edge leaves the working set before the next test, so
//! the result is reproducible. Difference-constraint systems admit several
//! minimal bases; the reducer returns one of them, and consumers must
//! compare closures, never edge sets.
use log::debug;

use crate::constraint::system::{InequationSystem, SystemForm, VarId};
use crate::net::{Idx, TimeBound};

/// Single-pair shortest path `from -> to` over the current edge set, by
/// Bellman-Ford relaxation (weights may be negative; the canonical input is
/// cycle-free in the negative sense).
fn recomputed_bound(system: &InequationSystem, from: VarId, to: VarId) -> TimeBound {
    let n = system.var_count();
    let mut dist = vec![TimeBound::Infinite; n];
    dist[from.index()] = TimeBound::ZERO;
    for _ in 1..n {
        let mut changed = false;
        for (u, v, w) in system.edges() {
            let du = dist[u.index()];
            if !du.is_finite() {
                continue;
            }
            let through = du + TimeBound::Finite(w);
            if through < dist[v.index()] {
                dist[v.index()] = through;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    dist[to.index()]
}

/// Reduce a canonical system to a minimal generating subset: removing any
/// remaining edge strictly loosens some pairwise bound. Never fails.
pub fn minimize(canonical: &InequationSystem) -> InequationSystem {
    debug_assert_eq!(canonical.form(), SystemForm::Canonical);
    let mut working = canonical.clone();
    let pairs: Vec<(VarId, VarId, i64)> = working.edges().collect();
    let mut removed = 0usize;
    for (from, to, weight) in pairs {
        working.set_weight(from, to, TimeBound::Infinite);
        if recomputed_bound(&working, from, to) == TimeBound::Finite(weight) {
            removed += 1;
        } else {
            working.set_weight(from, to, TimeBound::Finite(weight));
        }
    }
    debug!(
        "minimized {} edges down to {}",
        canonical.edge_count(),
        canonical.edge_count() - removed
    );
    working.set_form(SystemForm::Minimal);
    working
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{build, close};
    use crate::net::parse_net_str;
    use crate::sequence::parse_sequence_str;

    fn canonical_for(net_src: &str, scenario: &str) -> InequationSystem {
        let net = parse_net_str(net_src).unwrap();
        let seq = parse_sequence_str(&net, scenario).unwrap();
        close(build(&net, &seq).unwrap()).unwrap()
    }

    #[test]
    fn minimal_is_a_subset_with_the_same_closure() {
        let canonical = canonical_for(
            "tr t0 [1,4] p0 -> p1\ntr t1 [2,3] p1 -> p2\npl p0 (1)\n",
            "t0\nt1\n",
        );
        let minimal = minimize(&canonical);
        assert!(minimal.edge_count() < canonical.edge_count());
        for (from, to, w) in minimal.edges() {
            assert_eq!(canonical.weight(from, to), TimeBound::Finite(w));
        }
        let reclosed = close(minimal).unwrap();
        assert_eq!(reclosed, canonical);
    }

    #[test]
    fn implied_tight_edge_is_removed() {
        // Chain t0 then t1: the canonical bound start -> t1 is implied by
        // composing start -> t0 and t0 -> t1, so the minimal form drops it
        // while the canonical form keeps it.
        let canonical = canonical_for(
            "tr t0 [1,4] p0 -> p1\ntr t1 [2,3] p1 -> p2\npl p0 (1)\n",
            "t0\nt1\n",
        );
        let minimal = minimize(&canonical);
        let start = crate::constraint::START;
        let v2 = VarId::new(2);
        assert!(canonical.weight(start, v2).is_finite());
        assert_eq!(minimal.weight(start, v2), TimeBound::Infinite);
    }

    #[test]
    fn no_remaining_edge_is_redundant() {
        let canonical = canonical_for(
            "tr t0 [1,4] p0 -> p1\ntr t1 [2,3] p1 -> p2\npl p0 (1)\n",
            "t0\nt1\n",
        );
        let minimal = minimize(&canonical);
        let pairs: Vec<_> = minimal.edges().collect();
        for (from, to, w) in pairs {
            let mut probe = minimal.clone();
            probe.set_weight(from, to, TimeBound::Infinite);
            assert_ne!(
                recomputed_bound(&probe, from, to),
                TimeBound::Finite(w),
                "edge {:?} -> {:?} should not be implied by the rest",
                from,
                to
            );
        }
    }
}
