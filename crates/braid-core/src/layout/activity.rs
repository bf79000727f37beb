//! Row-activity queries over a finished layout.
//!
//! A renderer draws one row per event and one column per lane. For every
//! (row, lane) cell it needs to know whether a vertical connector runs
//! through it. [`RowActivity`] answers that from two precomputed tables:
//!
//! - **termini**: for every row, where that event's own line stops
//!   ([`Terminus`]). The stop row is its *reach*.
//! - **per-lane reach maxima**: for every lane, the rows of its events and the
//!   running maximum of their reach, so "is any earlier event on this lane
//!   still reaching this row" is a binary search.
//!
//! Building the resolver is O(n + parent references); [`RowActivity::is_active`]
//! is O(log n).
//!
//! # Reach
//!
//! The reach of an event is the minimum of
//!
//! 1. the row of its first later child on the same lane (the line continues
//!    under that child), and
//! 2. the row of its first later child on another lane (the line feeds that
//!    lane, usually a merge),
//!
//! or the event's own row when it has no later child. The minimum of both is
//! simply the earliest later child, which is how it is computed.

use std::collections::HashMap;

use super::LayoutResult;
use super::index::ChildIndex;
use super::lanes::{BranchKind, Lane};
use crate::event::{Event, EventId};

/// Where an event's outgoing line stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminus {
    /// No later child: the line stops at the event itself.
    Open,
    /// The line continues into a child on the same lane at `row`.
    Continuation { row: usize },
    /// The line feeds a child on another lane at `row`.
    CrossLane { row: usize, lane: Lane },
}

impl Terminus {
    /// Row the line reaches, if it leaves the event's own row.
    #[must_use]
    pub const fn row(self) -> Option<usize> {
        match self {
            Self::Open => None,
            Self::Continuation { row } | Self::CrossLane { row, .. } => Some(row),
        }
    }
}

/// Per-row, per-lane connector resolver.
///
/// Borrows the event list the layout was computed from; rows are positions in
/// that list.
#[derive(Debug)]
pub struct RowActivity<'a, Id: EventId> {
    events: &'a [Event<Id>],
    children: ChildIndex<'a, Id>,
    lane_count: usize,
    row_lanes: Vec<Lane>,
    termini: Vec<Terminus>,
    lane_rows: Vec<Vec<usize>>,
    lane_reach_max: Vec<Vec<usize>>,
    incoming: Vec<Vec<(BranchKind, Lane)>>,
}

impl<'a, Id: EventId> RowActivity<'a, Id> {
    /// Precompute reach and lane tables for `events` laid out as `layout`.
    ///
    /// Events missing from `layout` are treated as trunk events.
    #[must_use]
    pub fn new(events: &'a [Event<Id>], layout: &LayoutResult<Id>) -> Self {
        let children = ChildIndex::from_events(events);
        let row_lanes: Vec<Lane> = events
            .iter()
            .map(|event| layout.lane_of(&event.id).unwrap_or(0))
            .collect();

        let lane_count = row_lanes
            .iter()
            .map(|&lane| lane + 1)
            .max()
            .unwrap_or(0)
            .max(layout.lane_count);

        let termini: Vec<Terminus> = events
            .iter()
            .enumerate()
            .map(|(row, event)| terminus_of(&children, &row_lanes, row, &event.id, row_lanes[row]))
            .collect();

        let mut lane_rows: Vec<Vec<usize>> = vec![Vec::new(); lane_count];
        let mut lane_reach_max: Vec<Vec<usize>> = vec![Vec::new(); lane_count];
        for (row, &lane) in row_lanes.iter().enumerate() {
            let reach = termini[row].row().unwrap_or(row);
            let running = lane_reach_max[lane].last().map_or(reach, |&max| max.max(reach));
            lane_rows[lane].push(row);
            lane_reach_max[lane].push(running);
        }

        let mut first_row: HashMap<&Id, usize> = HashMap::with_capacity(events.len());
        for (row, event) in events.iter().enumerate() {
            first_row.entry(&event.id).or_insert(row);
        }
        let mut incoming: Vec<Vec<(BranchKind, Lane)>> = vec![Vec::new(); events.len()];
        for point in &layout.branch_points {
            if let Some(&row) = first_row.get(&point.item_id) {
                incoming[row].push((point.kind, point.from_lane));
            }
        }

        Self {
            events,
            children,
            lane_count,
            row_lanes,
            termini,
            lane_rows,
            lane_reach_max,
            incoming,
        }
    }

    /// Number of rows (events).
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.events.len()
    }

    /// Number of lane columns.
    #[must_use]
    pub const fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Lane of the event at `row`.
    #[must_use]
    pub fn lane_at(&self, row: usize) -> Option<Lane> {
        self.row_lanes.get(row).copied()
    }

    /// Event at `row`.
    #[must_use]
    pub fn event_at(&self, row: usize) -> Option<&'a Event<Id>> {
        self.events.get(row)
    }

    /// Where the line of the event at `row` stops, measured on its own lane.
    #[must_use]
    pub fn terminus(&self, row: usize) -> Option<Terminus> {
        self.termini.get(row).copied()
    }

    /// Row where the line of event `id` at `row`, drawn on `lane`, stops.
    ///
    /// Served from the precomputed table when `(row, id, lane)` matches the
    /// layout; computed from the child index otherwise.
    #[must_use]
    pub fn reach(&self, row: usize, id: &Id, lane: Lane) -> usize {
        let matches_layout = self.row_lanes.get(row) == Some(&lane)
            && self.events.get(row).is_some_and(|event| &event.id == id);
        let terminus = if matches_layout {
            self.termini[row]
        } else {
            terminus_of(&self.children, &self.row_lanes, row, id, lane)
        };
        terminus.row().unwrap_or(row)
    }

    /// Returns `true` if some event on `lane` at or before `row` reaches
    /// `row`.
    #[must_use]
    pub fn is_active(&self, row: usize, lane: Lane) -> bool {
        self.max_reach_through(lane, row.saturating_add(1))
            .is_some_and(|reach| reach >= row)
    }

    /// Returns `true` if some event on `lane` at or before `row` reaches a
    /// later row, i.e. the lane's line leaves the cell at the bottom.
    #[must_use]
    pub fn continues_below(&self, row: usize, lane: Lane) -> bool {
        self.max_reach_through(lane, row.saturating_add(1))
            .is_some_and(|reach| reach > row)
    }

    /// Returns `true` if an event on `lane` strictly above `row` reaches it,
    /// i.e. a line enters the cell from the top.
    #[must_use]
    pub fn is_entered_from_above(&self, row: usize, lane: Lane) -> bool {
        self.max_reach_through(lane, row)
            .is_some_and(|reach| reach >= row)
    }

    /// Row of the most recent event on `lane` at or before `row`.
    #[must_use]
    pub fn latest_on_lane(&self, row: usize, lane: Lane) -> Option<usize> {
        let rows = self.lane_rows.get(lane)?;
        let count = rows.partition_point(|&r| r <= row);
        count.checked_sub(1).map(|index| rows[index])
    }

    /// Branch points recorded at the event on `row`, as `(kind, from_lane)`.
    #[must_use]
    pub fn incoming(&self, row: usize) -> &[(BranchKind, Lane)] {
        self.incoming.get(row).map(Vec::as_slice).unwrap_or_default()
    }

    /// Largest reach among events on `lane` at rows `< end`.
    fn max_reach_through(&self, lane: Lane, end: usize) -> Option<usize> {
        let rows = self.lane_rows.get(lane)?;
        let count = rows.partition_point(|&r| r < end);
        count
            .checked_sub(1)
            .map(|index| self.lane_reach_max[lane][index])
    }
}

/// Terminus of `id` at `row` when drawn on `lane`.
fn terminus_of<Id: EventId>(
    children: &ChildIndex<'_, Id>,
    row_lanes: &[Lane],
    row: usize,
    id: &Id,
    lane: Lane,
) -> Terminus {
    match children.children_after(id, row).first() {
        None => Terminus::Open,
        Some(&child) if row_lanes[child] == lane => Terminus::Continuation { row: child },
        Some(&child) => Terminus::CrossLane {
            row: child,
            lane: row_lanes[child],
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
