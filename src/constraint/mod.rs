//! # Temporal constraint engine
//!
//! Replays a firing sequence against a time Petri net and derives the system
//! of difference constraints over firing-date variables that characterizes
//! every timing at which the sequence is realizable.
//!
//! Pipeline: [`builder::build`] (raw system) → [`closure::close`] (canonical
//! form, feasibility proof) → [`reduce::minimize`] (minimal generating
//! subset) or [`solve::earliest`]/[`solve::durations`] (concrete schedule,
//! duration bounds) → [`project`] (absolute/relative re-expression).
//!
//! The engine is a pure synchronous computation; each call owns its graph
//! for the duration of the run and no state survives across runs.

pub mod builder;
pub mod closure;
pub mod project;
pub mod reduce;
pub mod solve;
pub mod system;

use thiserror::Error;

pub use builder::build;
pub use closure::close;
pub use project::{
    solution_to_absolute, solution_to_relative, to_absolute, to_relative,
};
pub use reduce::minimize;
pub use solve::{DurationBounds, PathSolution, durations, earliest};
pub use system::{DateRepr, InequationSystem, START, SystemForm, VarId, VarInfo, VarKind};

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The sequence names a transition with no enabled instance at some
    /// position. No partial system is ever returned.
    #[error("step {step}: transition '{transition}' is not firable")]
    NotFirable { step: usize, transition: String },
    /// A negative cycle on a system the builder accepted, or a bound that
    /// the builder's invariants rule out. Should be unreachable.
    #[error("internal invariant violation: {detail}")]
    Inconsistent { detail: String },
}
