//! Parent and child adjacency built once per analysis.
//!
//! [`ParentIndex`] is part of the public [`LayoutResult`](super::LayoutResult).
//! [`ChildIndex`] is the reverse direction, keyed by parent id and holding the
//! rows of its children in chronological order; the lane assignor and the
//! row-activity resolver both use it instead of rescanning the event list.

use std::collections::HashMap;

use serde::Serialize;

use crate::event::{Event, EventId};

// ---------------------------------------------------------------------------
// ParentIndex
// ---------------------------------------------------------------------------

/// Mapping from event id to its parent ids.
///
/// Events without parents have no entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParentIndex<Id: EventId> {
    map: HashMap<Id, Vec<Id>>,
}

impl<Id: EventId> ParentIndex<Id> {
    /// Build the index from an event list. O(n) over the total number of
    /// parent references.
    #[must_use]
    pub fn from_events(events: &[Event<Id>]) -> Self {
        let map = events
            .iter()
            .filter(|event| event.has_parents())
            .map(|event| (event.id.clone(), event.parents.clone()))
            .collect();
        Self { map }
    }

    /// An index with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Parent ids of `id`, or `None` if it has none.
    #[must_use]
    pub fn get(&self, id: &Id) -> Option<&[Id]> {
        self.map.get(id).map(Vec::as_slice)
    }

    /// Returns `true` if `id` has at least one parent.
    #[must_use]
    pub fn contains(&self, id: &Id) -> bool {
        self.map.contains_key(id)
    }

    /// Number of events with at least one parent.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no event has a parent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over `(id, parents)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Id, &[Id])> {
        self.map.iter().map(|(id, parents)| (id, parents.as_slice()))
    }
}

impl<Id: EventId> Default for ParentIndex<Id> {
    fn default() -> Self {
        Self::empty()
    }
}

// ---------------------------------------------------------------------------
// ChildIndex
// ---------------------------------------------------------------------------

/// Mapping from event id to the rows of the events that list it as a parent.
///
/// Rows are ascending. A child listing the same parent twice is recorded once.
/// Dangling parent ids still get an entry.
#[derive(Debug, Clone)]
pub struct ChildIndex<'a, Id: EventId> {
    children: HashMap<&'a Id, Vec<usize>>,
}

impl<'a, Id: EventId> ChildIndex<'a, Id> {
    /// Build the index in one pass over `events`.
    #[must_use]
    pub fn from_events(events: &'a [Event<Id>]) -> Self {
        let mut children: HashMap<&'a Id, Vec<usize>> = HashMap::new();
        for (row, event) in events.iter().enumerate() {
            for parent in &event.parents {
                let rows = children.entry(parent).or_default();
                if rows.last() != Some(&row) {
                    rows.push(row);
                }
            }
        }
        Self { children }
    }

    /// Rows of the children of `id`, ascending. Empty if it has none.
    #[must_use]
    pub fn children(&self, id: &Id) -> &[usize] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of distinct events that list `id` as a parent.
    #[must_use]
    pub fn child_count(&self, id: &Id) -> usize {
        self.children(id).len()
    }

    /// Rows of the children of `id` strictly after `row`.
    #[must_use]
    pub fn children_after(&self, id: &Id, row: usize) -> &[usize] {
        let rows = self.children(id);
        let start = rows.partition_point(|&child| child <= row);
        &rows[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Vec<Event<&'static str>> {
        vec![
            Event::root("a", 1),
            Event::new("b", 2, vec!["a"]),
            Event::new("c", 3, vec!["a"]),
            Event::new("d", 4, vec!["b", "c"]),
        ]
    }

    #[test]
    fn parent_index_omits_roots() {
        let events = diamond();
        let index = ParentIndex::from_events(&events);

        assert_eq!(index.len(), 3);
        assert!(!index.contains(&"a"));
        assert_eq!(index.get(&"d"), Some(["b", "c"].as_slice()));
        assert_eq!(index.get(&"a"), None);
    }

    #[test]
    fn parent_index_of_flat_timeline_is_empty() {
        let events = vec![Event::root(1_u8, 1), Event::root(2, 2)];
        assert!(ParentIndex::from_events(&events).is_empty());
    }

    #[test]
    fn child_index_lists_rows_in_order() {
        let events = diamond();
        let index = ChildIndex::from_events(&events);

        assert_eq!(index.children(&"a"), &[1, 2]);
        assert_eq!(index.children(&"b"), &[3]);
        assert_eq!(index.children(&"c"), &[3]);
        assert!(index.children(&"d").is_empty());
        assert_eq!(index.child_count(&"a"), 2);
    }

    #[test]
    fn child_index_counts_repeated_parent_once() {
        let events = vec![
            Event::root("a", 1),
            Event::new("b", 2, vec!["a", "x", "a"]),
        ];
        let index = ChildIndex::from_events(&events);
        assert_eq!(index.children(&"a"), &[1]);
    }

    #[test]
    fn children_after_skips_earlier_rows() {
        let events = diamond();
        let index = ChildIndex::from_events(&events);

        assert_eq!(index.children_after(&"a", 0), &[1, 2]);
        assert_eq!(index.children_after(&"a", 1), &[2]);
        assert!(index.children_after(&"a", 2).is_empty());
    }
}
