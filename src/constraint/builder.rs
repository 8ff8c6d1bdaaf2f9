//! Constraint graph construction: replays the firing sequence against the
//! net and emits the raw difference-constraint system.
//!
//! One date variable per firing event plus the reserved `start` variable;
//! consecutive events are tied by `date(i-1) <= date(i)` so every solution
//! realizes the events in sequence order.
//! Enabling instances are tracked by integer handle, one active instance per
//! transition; an instance persists across a firing iff its transition stays
//! enabled in the intermediate marking (current marking minus the fired
//! transition's inputs), otherwise it retires and any re-enabling creates a
//! fresh instance dated at the current event.
use log::{debug, trace};

use crate::constraint::AnalysisError;
use crate::constraint::system::{InequationSystem, START, VarId, VarInfo, VarKind};
use crate::net::{Idx, IndexVec, InstanceId, Net, TimeBound, TransitionId};
use crate::sequence::FiringSequence;

struct Instance {
    transition: TransitionId,
    /// Date variable of the event whose firing enabled this instance.
    enabled_at: VarId,
}

struct Simulation<'net> {
    net: &'net Net,
    marking: crate::net::Marking,
    instances: IndexVec<InstanceId, Instance>,
    /// Single-server: the active instance of each transition, if any.
    active: IndexVec<TransitionId, Option<InstanceId>>,
}

impl<'net> Simulation<'net> {
    fn new(net: &'net Net) -> Self {
        let mut sim = Self {
            net,
            marking: net.initial_marking(),
            instances: IndexVec::new(),
            active: IndexVec::from(vec![None; net.transitions_len()]),
        };
        for transition in net.enabled_transitions(&sim.marking) {
            sim.enable(transition, START);
        }
        sim
    }

    fn enable(&mut self, transition: TransitionId, enabled_at: VarId) {
        debug_assert!(self.active[transition].is_none());
        let handle = self.instances.push(Instance {
            transition,
            enabled_at,
        });
        self.active[transition] = Some(handle);
        trace!(
            "enable {} ({:?}) at var {:?}",
            self.net.transition_name(transition),
            handle,
            enabled_at
        );
    }

    fn active_instances(&self) -> impl Iterator<Item = &Instance> {
        self.active
            .iter()
            .filter_map(|handle| handle.map(|h| &self.instances[h]))
    }

    /// Fire the active instance of `transition` at the event owning `var`,
    /// updating the marking and the instance table.
    fn fire(&mut self, transition: TransitionId, var: VarId) {
        debug_assert!(self.active[transition].is_some());
        self.active[transition] = None;

        // Persistence is judged against the marking with the inputs of the
        // fired transition already consumed.
        let intermediate = self.net.consume(&self.marking, transition);
        for other in self.net.transitions.indices() {
            if self.active[other].is_some() && !self.net.is_enabled(other, &intermediate) {
                trace!("retire {}", self.net.transition_name(other));
                self.active[other] = None;
            }
        }

        self.marking = self.net.produce(&intermediate, transition);
        for newly in self.net.enabled_transitions(&self.marking) {
            if self.active[newly].is_none() {
                self.enable(newly, var);
            }
        }
    }
}

/// Occurrence-numbered display names for the event variables: a transition
/// firing once keeps its bare name, repeated firings get `name/k`.
fn event_names(net: &Net, sequence: &FiringSequence) -> Vec<String> {
    let mut totals = IndexVec::<TransitionId, usize>::from(vec![0; net.transitions_len()]);
    for step in sequence.iter() {
        if let Some(count) = totals.get_mut(step.transition) {
            *count += 1;
        }
    }
    let mut seen = IndexVec::<TransitionId, usize>::from(vec![0; net.transitions_len()]);
    sequence
        .iter()
        .map(|step| {
            let name = net.transition_name(step.transition);
            match totals.get(step.transition) {
                Some(&total) if total > 1 => {
                    seen[step.transition] += 1;
                    format!("{}/{}", name, seen[step.transition])
                }
                _ => name.to_owned(),
            }
        })
        .collect()
}

/// Negative-cycle check over the accumulated edges (Bellman-Ford from a
/// virtual source connected to every variable at distance 0).
fn feasible(edges: &[(VarId, VarId, TimeBound)], var_count: usize) -> bool {
    let mut dist = vec![0i64; var_count];
    for round in 0..var_count {
        let mut changed = false;
        for &(from, to, weight) in edges {
            let Some(w) = weight.finite() else { continue };
            if dist[from.index()] + w < dist[to.index()] {
                dist[to.index()] = dist[from.index()] + w;
                changed = true;
            }
        }
        if !changed {
            return true;
        }
        if round + 1 == var_count {
            return false;
        }
    }
    true
}

/// Build the raw constraint system for `sequence` on `net`.
///
/// Fails with [`AnalysisError::NotFirable`] at the first event whose
/// transition has no enabled instance, or whose accumulated urgency and
/// interval constraints admit no assignment; no partial system is returned
/// either way. Timestamps carried by the sequence are ignored.
pub fn build(net: &Net, sequence: &FiringSequence) -> Result<InequationSystem, AnalysisError> {
    let names = event_names(net, sequence);
    let mut sim = Simulation::new(net);
    let mut vars = IndexVec::<VarId, VarInfo>::new();
    vars.push(VarInfo::start());
    let mut edges: Vec<(VarId, VarId, TimeBound)> = Vec::new();

    for (step, entry) in sequence.iter().enumerate() {
        let transition = entry.transition;
        let var = VarId::from_usize(step + 1);
        let not_firable = || AnalysisError::NotFirable {
            step,
            transition: net
                .get_transition(transition)
                .map(|tr| tr.name.clone())
                .unwrap_or_else(|| format!("#{}", transition.index())),
        };
        let handle = sim
            .active
            .get(transition)
            .copied()
            .flatten()
            .ok_or_else(not_firable)?;
        let enabled_at = sim.instances[handle].enabled_at;
        let interval = net.transitions[transition].interval;
        debug!(
            "step {}: fire {} enabled at {:?}, interval {}",
            step,
            net.transition_name(transition),
            enabled_at,
            interval
        );

        // Events occur in sequence order: date(i-1) <= date(i).
        let predecessor = VarId::from_usize(step);
        edges.push((var, predecessor, TimeBound::ZERO));

        // date(i) - date(e) <= lft(t) and date(i) - date(e) >= eft(t).
        edges.push((enabled_at, var, interval.lft));
        edges.push((var, enabled_at, TimeBound::Finite(-interval.eft)));

        // Urgency: no instance enabled when this event fires may be starved
        // past its own latest firing bound, so date(i) <= date(e') + lft(t')
        // for every such instance, including those this firing disables.
        for instance in sim.active_instances() {
            if instance.transition == transition {
                continue;
            }
            let lft = net.transitions[instance.transition].interval.lft;
            if lft.is_finite() {
                edges.push((instance.enabled_at, var, lft));
            }
        }

        sim.fire(transition, var);
        vars.push(VarInfo {
            name: names[step].clone(),
            kind: VarKind::Event {
                step,
                transition,
                enabled_at,
            },
        });

        // Timing infeasibility surfaces as the builder's failure, at the
        // first event whose constraints close a negative cycle; closure on
        // an accepted system can then never find one.
        if !feasible(&edges, vars.len()) {
            return Err(not_firable());
        }
    }

    let mut system = InequationSystem::with_vars(vars);
    for (from, to, weight) in edges {
        system.add_edge(from, to, weight);
    }
    debug!(
        "raw system: {} variables, {} edges",
        system.var_count(),
        system.edge_count()
    );
    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::parse_net_str;
    use crate::sequence::parse_sequence_str;

    fn build_for(net_src: &str, scenario: &str) -> Result<InequationSystem, AnalysisError> {
        let net = parse_net_str(net_src).unwrap();
        let seq = parse_sequence_str(&net, scenario).unwrap();
        build(&net, &seq)
    }

    #[test]
    fn single_transition_interval_edges() {
        let sys = build_for("tr t0 [2,5] p0 -> p1\npl p0 (1)\n", "t0\n").unwrap();
        assert_eq!(sys.var_count(), 2);
        let v1 = VarId::new(1);
        assert_eq!(sys.weight(START, v1), TimeBound::Finite(5));
        assert_eq!(sys.weight(v1, START), TimeBound::Finite(-2));
        assert_eq!(sys.var(v1).name, "t0");
    }

    #[test]
    fn sequencing_edge_orders_consecutive_events() {
        let sys = build_for(
            "tr t0 [2,5] p0 -> p1\ntr t1 [0,9] q0 -> q1\npl p0 (1)\npl q0 (1)\n",
            "t0\nt1\n",
        )
        .unwrap();
        let v1 = VarId::new(1);
        let v2 = VarId::new(2);
        assert_eq!(sys.weight(v2, v1), TimeBound::ZERO);
        assert_eq!(sys.weight(v1, START), TimeBound::Finite(-2));
    }

    #[test]
    fn timing_infeasibility_is_not_firable() {
        // t0 cannot fire before 2, but the enabled competitor t1 must have
        // fired by 1; the urgency bound closes a negative cycle at step 0.
        let err = build_for(
            "tr t0 [2,5] p0 -> p1\ntr t1 [0,1] q0 -> q1\npl p0 (1)\npl q0 (1)\n",
            "t0\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::NotFirable { step: 0, .. }
        ));
    }

    #[test]
    fn not_firable_when_tokens_missing() {
        let err = build_for("tr t0 [2,5] p0 -> p1\npl p0 (1)\n", "t0\nt0\n").unwrap_err();
        match err {
            AnalysisError::NotFirable { step, transition } => {
                assert_eq!(step, 1);
                assert_eq!(transition, "t0");
            }
            other => panic!("expected NotFirable, got {:?}", other),
        }
    }

    #[test]
    fn urgency_bounds_a_competing_transition() {
        // t0 and t1 are both enabled from start; t1 must not be starved
        // past lft(t1) = 3 while t0 fires first.
        let sys = build_for(
            "tr t0 [0,10] p0 -> p2\ntr t1 [0,3] p1 -> p3\npl p0 (1)\npl p1 (1)\n",
            "t0\nt1\n",
        )
        .unwrap();
        let v1 = VarId::new(1);
        // Urgency edge start -> t0 with weight lft(t1) = 3 tightens the
        // builder edge start -> t0 of weight lft(t0) = 10.
        assert_eq!(sys.weight(START, v1), TimeBound::Finite(3));
    }

    #[test]
    fn re_enabled_transition_gets_a_fresh_instance() {
        // t0 consumes and reproduces its own input, so each firing enables a
        // fresh instance dated at the previous event.
        let sys = build_for("tr t0 [1,2] p0 -> p0\npl p0 (1)\n", "t0\nt0\n").unwrap();
        let v1 = VarId::new(1);
        let v2 = VarId::new(2);
        assert_eq!(sys.weight(v1, v2), TimeBound::Finite(2));
        assert_eq!(sys.weight(v2, v1), TimeBound::Finite(-1));
        assert_eq!(sys.var(v1).name, "t0/1");
        assert_eq!(sys.var(v2).name, "t0/2");
        match sys.var(v2).kind {
            VarKind::Event { enabled_at, .. } => assert_eq!(enabled_at, v1),
            _ => panic!("expected an event variable"),
        }
    }

    #[test]
    fn persistent_instance_keeps_its_enabling_date() {
        // t1 stays enabled across the firing of t0 (disjoint inputs), so its
        // instance keeps the start enabling date.
        let sys = build_for(
            "tr t0 [0,w[ p0 -> p2\ntr t1 [4,9] p1 -> p3\npl p0 (1)\npl p1 (1)\n",
            "t0\nt1\n",
        )
        .unwrap();
        let v2 = VarId::new(2);
        match sys.var(v2).kind {
            VarKind::Event { enabled_at, .. } => assert_eq!(enabled_at, START),
            _ => panic!("expected an event variable"),
        }
        assert_eq!(sys.weight(START, v2), TimeBound::Finite(9));
        assert_eq!(sys.weight(v2, START), TimeBound::Finite(-4));
    }
}
