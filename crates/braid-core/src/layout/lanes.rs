//! Lane assignment and branch-point recording.
//!
//! Events are visited once, in input order. Each event lands on a lane
//! derived from its already-assigned parents:
//!
//! - **Root** (no parents) → lane 0.
//! - **No parent assigned yet** (dangling or forward reference) → lane 0, no
//!   branch point.
//! - **One assigned parent** → the parent's lane if the parent has a single
//!   child or no child has claimed that lane yet; otherwise a freshly
//!   allocated lane and a [`BranchKind::Create`] record. First child wins.
//! - **Several assigned parents** → the lowest parent lane, with one
//!   [`BranchKind::Merge`] record per parent on a different lane, in parent
//!   list order.
//!
//! Lanes are allocated monotonically (`max_lane + 1`) and never reused.
//!
//! # Claims
//!
//! Whether a parent's lane is "already taken" is tracked incrementally: when
//! an event is assigned lane `l`, every parent sitting on `l` is marked
//! claimed. Together with [`ChildIndex`] for the sibling count this keeps the
//! pass linear in the number of parent references.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::index::ChildIndex;
use crate::event::{Event, EventId};

/// Horizontal track index. Lane 0 is the trunk.
pub type Lane = usize;

/// Whether a branch point opens a lane or folds one back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchKind {
    /// A child diverged from its parent's lane onto a new lane.
    Create,
    /// A non-primary parent's lane converges into the merge event's lane.
    Merge,
}

/// One branch creation or merge occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchPoint<Id> {
    /// The child (for `Create`) or merge event (for `Merge`).
    pub item_id: Id,
    pub kind: BranchKind,
    /// `Create`: the parent's lane. `Merge`: the non-primary parent's lane.
    pub from_lane: Lane,
    /// `Create`: the newly allocated lane. `Merge`: the primary lane.
    pub to_lane: Lane,
}

/// Raw output of the assignment pass.
#[derive(Debug)]
pub(crate) struct Assignment<'a, Id> {
    pub lanes: HashMap<&'a Id, Lane>,
    pub branch_points: Vec<BranchPoint<Id>>,
    pub max_lane: Lane,
}

/// Single-pass lane assignor.
struct LaneAssignor<'a, 'c, Id: EventId> {
    events: &'a [Event<Id>],
    children: &'c ChildIndex<'a, Id>,
    lanes: HashMap<&'a Id, Lane>,
    claimed: HashSet<&'a Id>,
    branch_points: Vec<BranchPoint<Id>>,
    max_lane: Lane,
}

/// Assign every event a lane. `events` must be in chronological order.
pub(crate) fn assign_lanes<'a, Id: EventId>(
    events: &'a [Event<Id>],
    children: &ChildIndex<'a, Id>,
) -> Assignment<'a, Id> {
    let mut assignor = LaneAssignor {
        events,
        children,
        lanes: HashMap::with_capacity(events.len()),
        claimed: HashSet::new(),
        branch_points: Vec::new(),
        max_lane: 0,
    };

    for (row, event) in events.iter().enumerate() {
        assignor.assign(row, event);
    }

    Assignment {
        lanes: assignor.lanes,
        branch_points: assignor.branch_points,
        max_lane: assignor.max_lane,
    }
}

/// Trunk-only assignment for timelines where no event has parents.
pub(crate) fn assign_flat<Id: EventId>(events: &[Event<Id>]) -> Assignment<'_, Id> {
    let mut lanes = HashMap::with_capacity(events.len());
    for event in events {
        lanes.entry(&event.id).or_insert(0);
    }
    Assignment {
        lanes,
        branch_points: Vec::new(),
        max_lane: 0,
    }
}

impl<'a, Id: EventId> LaneAssignor<'a, '_, Id> {
    fn assign(&mut self, row: usize, event: &'a Event<Id>) {
        if self.lanes.contains_key(&event.id) {
            warn!(row, id = ?event.id, "duplicate event id; keeping first assignment");
            return;
        }

        let lane = if event.has_parents() {
            let assigned: Vec<Lane> = event
                .parents
                .iter()
                .filter_map(|parent| self.lanes.get(parent).copied())
                .collect();

            match assigned.as_slice() {
                [] => {
                    warn!(
                        row,
                        id = ?event.id,
                        parents = ?event.parents,
                        "no parent assigned yet; placing event on trunk"
                    );
                    0
                }
                [parent_lane] => self.continue_or_branch(event, *parent_lane),
                parent_lanes => self.merge(event, parent_lanes),
            }
        } else {
            0
        };

        self.lanes.insert(&event.id, lane);
        self.max_lane = self.max_lane.max(lane);
        self.record_claims(row, event, lane);
    }

    /// Single-parent case: keep the parent's lane unless a sibling already
    /// holds it.
    fn continue_or_branch(&mut self, event: &'a Event<Id>, parent_lane: Lane) -> Lane {
        let Some(parent) = event
            .parents
            .iter()
            .find(|parent| self.lanes.contains_key(parent))
        else {
            return parent_lane;
        };

        if self.children.child_count(parent) <= 1 || !self.claimed.contains(parent) {
            return parent_lane;
        }

        let new_lane = self.max_lane + 1;
        self.branch_points.push(BranchPoint {
            item_id: event.id.clone(),
            kind: BranchKind::Create,
            from_lane: parent_lane,
            to_lane: new_lane,
        });
        new_lane
    }

    /// Multi-parent case: converge onto the lowest parent lane.
    fn merge(&mut self, event: &'a Event<Id>, parent_lanes: &[Lane]) -> Lane {
        let target = parent_lanes.iter().copied().min().unwrap_or(0);
        for &lane in parent_lanes {
            if lane != target {
                self.branch_points.push(BranchPoint {
                    item_id: event.id.clone(),
                    kind: BranchKind::Merge,
                    from_lane: lane,
                    to_lane: target,
                });
            }
        }
        target
    }

    /// Mark parents whose lane this event now occupies. Children processed
    /// before their parent (forward references) are checked as well so the
    /// claim reflects every child assigned so far.
    fn record_claims(&mut self, row: usize, event: &'a Event<Id>, lane: Lane) {
        for parent in &event.parents {
            if self.lanes.get(parent) == Some(&lane) {
                self.claimed.insert(parent);
            }
        }

        let events = self.events;
        let claimed_by_earlier_child = self
            .children
            .children(&event.id)
            .iter()
            .take_while(|&&child| child < row)
            .any(|&child| self.lanes.get(&events[child].id) == Some(&lane));
        if claimed_by_earlier_child {
            self.claimed.insert(&event.id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
