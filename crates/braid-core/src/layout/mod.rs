//! Chronological branch-lane layout.
//!
//! Turns a chronologically sorted event list into a [`LayoutResult`]: how many
//! lanes the graph needs, which lane every event sits on, where branches are
//! created and merged, and the parent index the renderer walks.
//!
//! # Pipeline
//!
//! 1. [`index`]: [`ParentIndex`] and [`ChildIndex`], built once.
//! 2. [`lanes`]: single pass assigning lanes and recording
//!    [`BranchPoint`]s.
//! 3. [`activity`]: [`RowActivity`](activity::RowActivity), the per-row,
//!    per-lane connector queries over a finished layout.
//! 4. [`connector`]: cell classification into [`Connector`](connector::Connector)
//!    geometry.
//!
//! # Fast path
//!
//! A timeline where no event has parents is laid out on a single lane without
//! building either index.
//!
//! # Preconditions
//!
//! Input must be sorted ascending by timestamp with parents before children.
//! [`analyze`] never fails: unresolved parents fall back to lane 0, duplicate
//! ids keep their first lane, and self references or cycles terminate with an
//! unspecified (but total) layout. [`analyze_checked`] rejects all of these
//! up front.

pub mod activity;
pub mod connector;
pub mod index;
pub mod lanes;

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::error::LayoutError;
use crate::event::{Event, EventId};
use crate::validate::validate;

pub use index::{ChildIndex, ParentIndex};
pub use lanes::{BranchKind, BranchPoint, Lane};

use lanes::{Assignment, assign_flat, assign_lanes};

// ---------------------------------------------------------------------------
// LayoutResult
// ---------------------------------------------------------------------------

/// Immutable output of a layout pass.
///
/// Recomputed wholesale whenever the input changes; there is no incremental
/// update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutResult<Id: EventId> {
    /// Number of lanes: `1 + max(lane)` for non-empty input, `0` otherwise.
    pub lane_count: usize,
    /// Lane of every event id.
    pub lanes: HashMap<Id, Lane>,
    /// Branch creations and merges in processing order.
    pub branch_points: Vec<BranchPoint<Id>>,
    /// Parent ids of every event that has any.
    pub parents: ParentIndex<Id>,
}

impl<Id: EventId> LayoutResult<Id> {
    /// Layout of an empty timeline.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lane_count: 0,
            lanes: HashMap::new(),
            branch_points: Vec::new(),
            parents: ParentIndex::empty(),
        }
    }

    fn from_assignment(assignment: Assignment<'_, Id>, parents: ParentIndex<Id>) -> Self {
        let lanes: HashMap<Id, Lane> = assignment
            .lanes
            .into_iter()
            .map(|(id, lane)| (id.clone(), lane))
            .collect();
        let lane_count = if lanes.is_empty() {
            0
        } else {
            assignment.max_lane + 1
        };
        Self {
            lane_count,
            lanes,
            branch_points: assignment.branch_points,
            parents,
        }
    }

    /// Lane of `id`, or `None` if it was not part of the input.
    #[must_use]
    pub fn lane_of(&self, id: &Id) -> Option<Lane> {
        self.lanes.get(id).copied()
    }

    /// Returns `true` if the layout has no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Branch points recorded at `id`, in recording order.
    pub fn branch_points_at<'s>(&'s self, id: &'s Id) -> impl Iterator<Item = &'s BranchPoint<Id>> {
        self.branch_points
            .iter()
            .filter(move |point| &point.item_id == id)
    }

    /// Number of branch points of the given kind.
    #[must_use]
    pub fn count_of(&self, kind: BranchKind) -> usize {
        self.branch_points
            .iter()
            .filter(|point| point.kind == kind)
            .count()
    }
}

impl<Id: EventId> Default for LayoutResult<Id> {
    fn default() -> Self {
        Self::empty()
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Lay out a chronologically sorted event list.
///
/// Never fails; degraded input degrades the layout (see the module docs).
#[must_use]
pub fn analyze<Id: EventId>(events: &[Event<Id>]) -> LayoutResult<Id> {
    if events.is_empty() {
        return LayoutResult::empty();
    }

    if !events.iter().any(Event::has_parents) {
        debug!(events = events.len(), "no parent links; single-lane layout");
        return LayoutResult::from_assignment(assign_flat(events), ParentIndex::empty());
    }

    let parents = ParentIndex::from_events(events);
    let children = ChildIndex::from_events(events);
    let result = LayoutResult::from_assignment(assign_lanes(events, &children), parents);

    debug!(
        events = events.len(),
        lanes = result.lane_count,
        branches = result.count_of(BranchKind::Create),
        merges = result.count_of(BranchKind::Merge),
        "lane layout complete"
    );
    result
}

/// Validate the layout preconditions, then lay out the events.
///
/// # Errors
///
/// Returns the first [`LayoutError`] found: a duplicate id, a timestamp
/// earlier than its predecessor's, or a parent that does not appear on an
/// earlier row.
pub fn analyze_checked<Id: EventId>(events: &[Event<Id>]) -> Result<LayoutResult<Id>, LayoutError> {
    validate(events)?;
    Ok(analyze(events))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn empty_input_has_no_lanes() {
        let layout = analyze::<&str>(&[]);
        assert_eq!(layout.lane_count, 0);
        assert!(layout.is_empty());
        assert!(layout.branch_points.is_empty());
        assert!(layout.parents.is_empty());
    }

    #[test]
    fn flat_timeline_uses_fast_path() {
        let events = vec![Event::root("a", 1), Event::root("b", 2), Event::root("c", 3)];
        let layout = analyze(&events);

        assert_eq!(layout.lane_count, 1);
        assert_eq!(layout.lanes.len(), 3);
        assert!(layout.lanes.values().all(|&lane| lane == 0));
        assert!(layout.branch_points.is_empty());
        assert!(layout.parents.is_empty());
    }

    #[test]
    fn fork_and_merge() {
        let events = vec![
            Event::root("a", 1),
            Event::new("b", 2, vec!["a"]),
            Event::new("c", 3, vec!["a"]),
            Event::new("d", 4, vec!["b", "c"]),
        ];
        let layout = analyze(&events);

        assert_eq!(layout.lane_count, 2);
        assert_eq!(layout.lane_of(&"c"), Some(1));
        assert_eq!(layout.lane_of(&"d"), Some(0));
        assert_eq!(layout.lane_of(&"zz"), None);
        assert_eq!(layout.count_of(BranchKind::Create), 1);
        assert_eq!(layout.count_of(BranchKind::Merge), 1);
        assert_eq!(layout.branch_points_at(&"d").count(), 1);
        assert_eq!(layout.parents.get(&"d"), Some(["b", "c"].as_slice()));
    }

    #[test]
    fn analyze_is_idempotent() {
        let events = vec![
            Event::root(1_u32, 1),
            Event::new(2, 2, vec![1]),
            Event::new(3, 3, vec![1]),
            Event::new(4, 4, vec![3, 2]),
        ];
        assert_eq!(analyze(&events), analyze(&events));
    }

    #[test]
    fn checked_accepts_well_formed_input() {
        let events = vec![Event::root("a", 1), Event::new("b", 2, vec!["a"])];
        let layout = analyze_checked(&events).expect("well-formed input");
        assert_eq!(layout, analyze(&events));
    }

    #[test]
    fn checked_rejects_forward_reference() {
        let events = vec![Event::new("b", 1, vec!["a"]), Event::root("a", 2)];
        let err = analyze_checked(&events).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnresolvedParent);
        assert_eq!(err.row(), 0);
    }

    #[test]
    fn layout_serializes_to_json() {
        let events = vec![Event::root("a", 1), Event::new("b", 2, vec!["a"])];
        let json = serde_json::to_value(analyze(&events)).expect("serialize");

        assert_eq!(json["lane_count"], 1);
        assert_eq!(json["lanes"]["b"], 0);
        assert_eq!(json["parents"]["b"][0], "a");
        assert!(json["branch_points"].as_array().is_some_and(Vec::is_empty));
    }
}
