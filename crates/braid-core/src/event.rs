//! Timeline event model.
//!
//! An [`Event`] is one entry in a chronologically ordered timeline: an opaque
//! identifier, a timestamp, and the identifiers of the events it descends
//! from. Events form a DAG via the `parents` field; an event without parents
//! is a root.
//!
//! # Identifiers
//!
//! Identifiers are a generic parameter so integer, string and UUID-like keys
//! share one layout algorithm. Any `Clone + Eq + Hash + Debug` type satisfies
//! [`EventId`].

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Bound for event identifiers.
///
/// Blanket-implemented for every `Clone + Eq + Hash + Debug` type.
pub trait EventId: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> EventId for T {}

/// A single timeline entry.
///
/// The layout engine expects a slice of events sorted ascending by
/// `timestamp`, with every parent appearing before its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event<Id> {
    /// Opaque, unique identifier.
    pub id: Id,

    /// Timestamp in caller-chosen units. Only its order matters here.
    pub timestamp: i64,

    /// Identifiers of the events this one descends from.
    ///
    /// Empty for roots. Order is significant: merge branch points are
    /// recorded in this order.
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<Id>,
}

impl<Id> Event<Id> {
    /// Create an event with the given parents.
    #[must_use]
    pub const fn new(id: Id, timestamp: i64, parents: Vec<Id>) -> Self {
        Self {
            id,
            timestamp,
            parents,
        }
    }

    /// Create a root event (no parents).
    #[must_use]
    pub const fn root(id: Id, timestamp: i64) -> Self {
        Self::new(id, timestamp, Vec::new())
    }

    /// Returns `true` if the event lists at least one parent.
    #[must_use]
    pub fn has_parents(&self) -> bool {
        !self.parents.is_empty()
    }

    /// Returns `true` if the event lists two or more parents.
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}
