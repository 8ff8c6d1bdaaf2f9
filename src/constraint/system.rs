//! Difference-constraint systems over firing-date variables.
//!
//! A constraint is a directed edge `(i -> j, w)` meaning
//! `date(j) - date(i) <= w`; a lower bound `date(j) - date(i) >= b` is the
//! reverse edge `(j -> i, -b)`. The edge set is a dense `|V| x |V|` matrix of
//! [`TimeBound`] with `Infinite` for absent edges; parallel raw edges
//! collapse to their minimum, which preserves the conjunction.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::net::ids::define_id;
use crate::net::{Idx, IndexVec, TimeBound, TransitionId};

define_id!(VarId);

/// The reserved variable for the establishment of the initial marking,
/// fixed at date 0.
pub const START: VarId = VarId::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    /// Sequence start, date fixed at 0.
    Start,
    /// Firing date of the `step`-th event of the sequence.
    Event {
        step: usize,
        transition: TransitionId,
        /// Date variable of the event that enabled the fired instance
        /// ([`START`] when the initial marking enabled it).
        enabled_at: VarId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarInfo {
    pub name: String,
    pub kind: VarKind,
}

impl VarInfo {
    pub fn start() -> Self {
        Self {
            name: "start".to_owned(),
            kind: VarKind::Start,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemForm {
    Raw,
    Canonical,
    Minimal,
}

impl fmt::Display for SystemForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemForm::Raw => write!(f, "raw"),
            SystemForm::Canonical => write!(f, "canonical"),
            SystemForm::Minimal => write!(f, "minimal"),
        }
    }
}

/// Presentation basis for dates: measured from `start`, or as the delay
/// since the previous event of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateRepr {
    Absolute,
    Relative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InequationSystem {
    vars: IndexVec<VarId, VarInfo>,
    /// Row `i`, column `j`: upper bound on `date(j) - date(i)`.
    bounds: IndexVec<VarId, Vec<TimeBound>>,
    form: SystemForm,
    repr: DateRepr,
}

impl InequationSystem {
    /// A raw system with the given variables and no edges.
    pub fn with_vars(vars: IndexVec<VarId, VarInfo>) -> Self {
        let n = vars.len();
        let bounds = IndexVec::from(vec![vec![TimeBound::Infinite; n]; n]);
        Self {
            vars,
            bounds,
            form: SystemForm::Raw,
            repr: DateRepr::Absolute,
        }
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    pub fn vars(&self) -> &IndexVec<VarId, VarInfo> {
        &self.vars
    }

    pub fn var(&self, var: VarId) -> &VarInfo {
        &self.vars[var]
    }

    pub fn var_ids(&self) -> impl Iterator<Item = VarId> + Clone + use<> {
        self.vars.indices()
    }

    /// Event variables in sequence order (everything but `start`).
    pub fn event_vars(&self) -> impl Iterator<Item = (VarId, &VarInfo)> {
        self.vars
            .iter_enumerated()
            .filter(|(_, info)| !matches!(info.kind, VarKind::Start))
    }

    /// Variable of the last event, when the sequence is non-empty.
    pub fn last_event_var(&self) -> Option<VarId> {
        self.vars
            .last_idx()
            .filter(|last| *last != START)
    }

    pub fn form(&self) -> SystemForm {
        self.form
    }

    pub fn set_form(&mut self, form: SystemForm) {
        self.form = form;
    }

    pub fn repr(&self) -> DateRepr {
        self.repr
    }

    pub fn set_repr(&mut self, repr: DateRepr) {
        self.repr = repr;
    }

    pub fn weight(&self, from: VarId, to: VarId) -> TimeBound {
        self.bounds[from][to.index()]
    }

    pub fn set_weight(&mut self, from: VarId, to: VarId, weight: TimeBound) {
        self.bounds[from][to.index()] = weight;
    }

    /// Add the constraint `date(to) - date(from) <= weight`, keeping the
    /// tightest of parallel edges.
    pub fn add_edge(&mut self, from: VarId, to: VarId, weight: TimeBound) {
        let entry = &mut self.bounds[from][to.index()];
        if weight < *entry {
            *entry = weight;
        }
    }

    /// Finite off-diagonal edges `(from, to, w)`, by source then target.
    pub fn edges(&self) -> impl Iterator<Item = (VarId, VarId, i64)> + '_ {
        self.bounds.iter_enumerated().flat_map(|(from, row)| {
            row.iter().enumerate().filter_map(move |(to, weight)| {
                let to = VarId::from_usize(to);
                match weight.finite() {
                    Some(w) if from != to => Some((from, to, w)),
                    _ => None,
                }
            })
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// A satisfying assignment check: every finite edge `(i, j, w)` must
    /// admit `dates[j] - dates[i] <= w`.
    pub fn is_satisfied_by(&self, dates: &IndexVec<VarId, i64>) -> bool {
        debug_assert_eq!(dates.len(), self.var_count());
        self.edges()
            .all(|(from, to, w)| dates[to] - dates[from] <= w)
    }
}
