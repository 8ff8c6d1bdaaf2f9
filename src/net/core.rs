//! Net container and firing semantics: enabledness, token consumption and
//! production.
use std::fmt;

use thiserror::Error;

use crate::net::ids::{PlaceId, TransitionId};
use crate::net::incidence::Incidence;
use crate::net::index_vec::{Idx, IndexVec};
use crate::net::structure::{Marking, Place, Transition, Weight};

#[derive(Debug, Error)]
pub enum FireError {
    #[error("transition {0:?} is out of bounds")]
    OutOfBounds(TransitionId),
    #[error("transition {0:?} is not enabled under the supplied marking")]
    NotEnabled(TransitionId),
}

/// A time Petri net: places and transitions in dense id-addressed tables,
/// arc weights in pre/post incidence matrices.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct Net {
    pub name: Option<String>,
    pub places: IndexVec<PlaceId, Place>,
    pub transitions: IndexVec<TransitionId, Transition>,
    pub pre: Incidence<Weight>,
    pub post: Incidence<Weight>,
}

impl fmt::Debug for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Net")
            .field("name", &self.name)
            .field("places", &self.places)
            .field("transitions", &self.transitions)
            .field("pre", &self.pre)
            .field("post", &self.post)
            .finish()
    }
}

impl Net {
    pub fn empty() -> Self {
        Self {
            name: None,
            places: IndexVec::new(),
            transitions: IndexVec::new(),
            pre: Incidence::new(0, 0, 0u64),
            post: Incidence::new(0, 0, 0u64),
        }
    }

    pub fn add_place(&mut self, place: Place) -> PlaceId {
        let place_id = self.places.push(place);
        self.pre.push_place_with_default(0);
        self.post.push_place_with_default(0);
        place_id
    }

    pub fn add_transition(&mut self, transition: Transition) -> TransitionId {
        let transition_id = self.transitions.push(transition);
        self.pre.push_transition_with_default(0);
        self.post.push_transition_with_default(0);
        transition_id
    }

    pub fn set_input_weight(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        self.pre.set(place, transition, weight);
    }

    pub fn set_output_weight(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        self.post.set(place, transition, weight);
    }

    /// Input arc place -> transition; repeated arcs accumulate.
    pub fn add_input_arc(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        if weight == 0 {
            return;
        }
        *self.pre.get_mut(place, transition) += weight;
    }

    /// Output arc transition -> place; repeated arcs accumulate.
    pub fn add_output_arc(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        if weight == 0 {
            return;
        }
        *self.post.get_mut(place, transition) += weight;
    }

    pub fn places_len(&self) -> usize {
        self.places.len()
    }

    pub fn transitions_len(&self) -> usize {
        self.transitions.len()
    }

    pub fn get_place(&self, place: PlaceId) -> Option<&Place> {
        self.places.get(place)
    }

    pub fn get_transition(&self, transition: TransitionId) -> Option<&Transition> {
        self.transitions.get(transition)
    }

    pub fn transition_name(&self, transition: TransitionId) -> &str {
        &self.transitions[transition].name
    }

    pub fn transition_named(&self, name: &str) -> Option<TransitionId> {
        self.transitions
            .iter_enumerated()
            .find(|(_, tr)| tr.name == name)
            .map(|(id, _)| id)
    }

    pub fn initial_marking(&self) -> Marking {
        Marking::new(IndexVec::from(
            self.places.iter().map(|p| p.tokens).collect::<Vec<_>>(),
        ))
    }

    pub fn is_enabled(&self, transition: TransitionId, marking: &Marking) -> bool {
        if transition.index() >= self.transitions_len() {
            return false;
        }
        self.places
            .indices()
            .all(|place| marking.tokens(place) >= *self.pre.get(place, transition))
    }

    pub fn enabled_transitions(&self, marking: &Marking) -> Vec<TransitionId> {
        self.transitions
            .indices()
            .filter(|&transition| self.is_enabled(transition, marking))
            .collect()
    }

    /// Marking after consuming the input tokens of `transition`, before any
    /// output tokens are produced. This intermediate marking decides which
    /// enabling instances persist across the firing.
    pub fn consume(&self, marking: &Marking, transition: TransitionId) -> Marking {
        debug_assert!(self.is_enabled(transition, marking));
        let mut next = marking.clone();
        for (place, weight) in self.pre.column(transition, &0) {
            let tokens = next.tokens_mut(place);
            *tokens -= *weight;
        }
        next
    }

    /// Marking after producing the output tokens of `transition`.
    pub fn produce(&self, marking: &Marking, transition: TransitionId) -> Marking {
        let mut next = marking.clone();
        for (place, weight) in self.post.column(transition, &0) {
            *next.tokens_mut(place) += *weight;
        }
        next
    }

    pub fn fire_transition(
        &self,
        marking: &Marking,
        transition: TransitionId,
    ) -> Result<Marking, FireError> {
        if transition.index() >= self.transitions_len() {
            return Err(FireError::OutOfBounds(transition));
        }
        if !self.is_enabled(transition, marking) {
            return Err(FireError::NotEnabled(transition));
        }
        Ok(self.produce(&self.consume(marking, transition), transition))
    }
}
