//! Static structure elements of a time Petri net: places, transitions,
//! firing intervals and markings.
use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::net::ids::PlaceId;
use crate::net::index_vec::IndexVec;

pub type Weight = u64;

/// An upper time bound: either a finite number of time units or `w`
/// (unbounded, written `w` in the `.net` interval syntax).
///
/// Bounds are closed under addition with `Infinite` absorbing, and totally
/// ordered with `Infinite` greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeBound {
    Finite(i64),
    Infinite,
}

impl TimeBound {
    pub const ZERO: TimeBound = TimeBound::Finite(0);

    pub fn is_finite(self) -> bool {
        matches!(self, TimeBound::Finite(_))
    }

    pub fn finite(self) -> Option<i64> {
        match self {
            TimeBound::Finite(value) => Some(value),
            TimeBound::Infinite => None,
        }
    }
}

impl Add for TimeBound {
    type Output = TimeBound;

    fn add(self, rhs: TimeBound) -> TimeBound {
        match (self, rhs) {
            (TimeBound::Finite(a), TimeBound::Finite(b)) => TimeBound::Finite(a + b),
            _ => TimeBound::Infinite,
        }
    }
}

impl From<i64> for TimeBound {
    fn from(value: i64) -> Self {
        TimeBound::Finite(value)
    }
}

impl fmt::Display for TimeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBound::Finite(value) => write!(f, "{}", value),
            TimeBound::Infinite => write!(f, "w"),
        }
    }
}

/// Static firing interval `[eft, lft]` of a transition, measured from the
/// moment the transition becomes newly enabled.
///
/// Invariant: `0 <= eft` and `eft <= lft`, with `lft` possibly `w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub eft: i64,
    pub lft: TimeBound,
}

impl TimeInterval {
    /// Default static interval `[0, w[` for unannotated transitions.
    pub const UNCONSTRAINED: TimeInterval = TimeInterval {
        eft: 0,
        lft: TimeBound::Infinite,
    };

    pub fn new(eft: i64, lft: TimeBound) -> Self {
        debug_assert!(eft >= 0);
        debug_assert!(TimeBound::Finite(eft) <= lft);
        Self { eft, lft }
    }

    pub fn closed(eft: i64, lft: i64) -> Self {
        Self::new(eft, TimeBound::Finite(lft))
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lft {
            TimeBound::Finite(lft) => write!(f, "[{},{}]", self.eft, lft),
            TimeBound::Infinite => write!(f, "[{},w[", self.eft),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct Place {
    pub name: String,
    pub tokens: Weight,
}

impl Place {
    pub fn new(name: impl Into<String>, tokens: Weight) -> Self {
        Self {
            name: name.into(),
            tokens,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Transition {
    pub name: String,
    pub label: Option<String>,
    pub interval: TimeInterval,
}

impl Transition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            interval: TimeInterval::UNCONSTRAINED,
        }
    }

    pub fn with_interval(name: impl Into<String>, interval: TimeInterval) -> Self {
        Self {
            name: name.into(),
            label: None,
            interval,
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transition")
            .field(&self.name)
            .field(&self.interval)
            .finish()
    }
}

/// Token distribution over the places, indexed by [`PlaceId`].
///
/// Counts are non-negative at every simulated step; only the builder's
/// simulation pass mutates a marking.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Marking(pub IndexVec<PlaceId, Weight>);

impl Marking {
    pub fn new(initial: IndexVec<PlaceId, Weight>) -> Self {
        Self(initial)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlaceId, &Weight)> {
        self.0.iter_enumerated()
    }

    pub fn tokens(&self, place: PlaceId) -> Weight {
        self.0[place]
    }

    pub fn tokens_mut(&mut self, place: PlaceId) -> &mut Weight {
        &mut self.0[place]
    }
}

impl fmt::Debug for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (place, tokens) in self.iter() {
            map.entry(&place, tokens);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_ordering_places_infinite_last() {
        assert!(TimeBound::Finite(i64::MAX) < TimeBound::Infinite);
        assert!(TimeBound::Finite(-3) < TimeBound::Finite(0));
        assert_eq!(
            TimeBound::Finite(2) + TimeBound::Infinite,
            TimeBound::Infinite
        );
        assert_eq!(
            TimeBound::Finite(2) + TimeBound::Finite(3),
            TimeBound::Finite(5)
        );
    }

    #[test]
    fn interval_display_uses_net_syntax() {
        assert_eq!(TimeInterval::closed(2, 5).to_string(), "[2,5]");
        assert_eq!(TimeInterval::UNCONSTRAINED.to_string(), "[0,w[");
    }
}
