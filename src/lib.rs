//! # tpan — temporal constraint analysis of time Petri nets
//!
//! Given a time Petri net and a firing sequence (a scenario), the engine
//! either derives the system of linear inequalities over firing-date
//! variables that characterizes every timing at which the sequence is
//! realizable, or produces one concrete feasible schedule.
//!
//! Pipeline: net + sequence → [`constraint::build`] (raw difference
//! constraints) → [`constraint::close`] (canonical, shortest-path-closed
//! form) → [`constraint::minimize`] (minimal generating subset) or
//! [`constraint::earliest`]/[`constraint::durations`] (schedule, duration
//! bounds) → [`constraint::project`] (absolute/relative dates) →
//! [`report`].
//!
//! ## Example
//!
//! ```rust
//! use tpan::constraint::{self, START, VarId};
//! use tpan::net::{TimeBound, parse_net_str};
//! use tpan::sequence::parse_sequence_str;
//!
//! let net = parse_net_str("tr t0 [2,5] p0 -> p1\npl p0 (1)\n").unwrap();
//! let seq = parse_sequence_str(&net, "t0\n").unwrap();
//! let canonical = constraint::close(constraint::build(&net, &seq).unwrap()).unwrap();
//! assert_eq!(canonical.weight(START, VarId::new(1)), TimeBound::Finite(5));
//!
//! let schedule = constraint::earliest(&canonical).unwrap();
//! assert_eq!(schedule.dates[VarId::new(1)], 2);
//! ```

pub mod constraint;
pub mod io;
pub mod net;
pub mod options;
pub mod report;
pub mod run;
pub mod sequence;

pub use constraint::AnalysisError;
pub use options::Options;
pub use run::run;
