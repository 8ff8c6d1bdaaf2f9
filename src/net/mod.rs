//! # Time Petri net core model
//!
//! A time Petri net is a tuple `(P, T, Pre, Post, M0, I)` with places `P`,
//! transitions `T`, input/output maps `Pre, Post ∈ ℕ^{|P|×|T|}`, initial
//! marking `M0 ∈ ℕ^{|P|}` and a static interval map `I(t) = [eft(t), lft(t)]`
//! with `0 ≤ eft(t) ≤ lft(t) ≤ ∞`, counted from the moment `t` becomes newly
//! enabled. For any marking `M ∈ ℕ^{|P|}`:
//!
//! * transition `t` is **enabled** iff `∀p ∈ P: M[p] ≥ Pre[p, t]`;
//! * **firing** `t` yields `M' = M − Pre[:, t] + Post[:, t]`.
//!
//! Everything is index-addressed: places and transitions live in dense
//! tables keyed by [`PlaceId`]/[`TransitionId`], markings are integer
//! vectors keyed by [`PlaceId`]. No entity is referenced by pointer.
//!
//! ## Example
//!
//! ```rust
//! use tpan::net::*;
//!
//! let mut net = Net::empty();
//! let p0 = net.add_place(Place::new("p0", 1));
//! let p1 = net.add_place(Place::new("p1", 0));
//! let t0 = net.add_transition(Transition::with_interval("t0", TimeInterval::closed(2, 5)));
//!
//! net.set_input_weight(p0, t0, 1);
//! net.set_output_weight(p1, t0, 1);
//!
//! let marking = net.initial_marking();
//! assert_eq!(net.enabled_transitions(&marking), vec![t0]);
//! let next = net.fire_transition(&marking, t0).unwrap();
//! assert_eq!(next.tokens(p0), 0);
//! assert_eq!(next.tokens(p1), 1);
//! ```

pub mod core;
pub mod ids;
pub mod incidence;
pub mod index_vec;
pub mod parse;
pub mod structure;

pub use self::core::{FireError, Net};
pub use ids::{InstanceId, PlaceId, TransitionId};
pub use incidence::Incidence;
pub use index_vec::{Idx, IndexVec};
pub use parse::{NetParseError, parse_net_file, parse_net_str};
pub use structure::{Marking, Place, TimeBound, TimeInterval, Transition, Weight};
