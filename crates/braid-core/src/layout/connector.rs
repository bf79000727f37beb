//! Per-cell connector classification.
//!
//! [`RowActivity::cell`] folds the activity predicates and the branch points
//! of the row's event into one [`Cell`], which is everything a renderer needs
//! to pick a glyph or a path segment for a (row, lane) pair.
//!
//! # Geometry
//!
//! Curves are named after the side the other end of the connector is on:
//!
//! | Cell | Source | Connector |
//! |---|---|---|
//! | event on this lane | one branch point from a lower lane | [`Connector::CurveLeft`] |
//! | event on this lane | one branch point from a higher lane | [`Connector::CurveRight`] |
//! | event on this lane | branch points from two or more lanes | [`Connector::MultiMerge`] |
//! | event on this lane | line entering from above only | [`Connector::Straight`] |
//! | this lane merges into the row's event | target lane below | [`Connector::CurveLeft`] |
//! | pass-through | lane active, no merge ending here | [`Connector::Straight`] |
//!
//! A merge endpoint suppresses the pass-through line when the merging lane
//! stops at the row, so the segment is not drawn twice. When the lane keeps
//! running below the merge, the cell carries both the curve and
//! [`Cell::pass_through`].

use serde::Serialize;

use super::activity::RowActivity;
use super::lanes::{BranchKind, Lane};
use crate::event::EventId;

/// Connector geometry for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connector {
    /// Vertical segment.
    Straight,
    /// Curve towards a lower lane index.
    CurveLeft,
    /// Curve towards a higher lane index.
    CurveRight,
    /// Two or more lanes converge into this cell.
    MultiMerge,
}

impl Connector {
    /// Curve pointing from `lane` towards `other`, or `None` for the same lane.
    #[must_use]
    pub const fn towards(lane: Lane, other: Lane) -> Option<Self> {
        if other < lane {
            Some(Self::CurveLeft)
        } else if other > lane {
            Some(Self::CurveRight)
        } else {
            None
        }
    }
}

/// Everything known about one (row, lane) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub row: usize,
    pub lane: Lane,
    /// The row's event sits on this lane.
    pub is_node: bool,
    /// Some event on this lane at or before the row still reaches it.
    pub active: bool,
    /// The row's event sits on this lane and arrives from another lane.
    pub branch_origin: bool,
    /// This lane's line merges into the row's event (on another lane) here.
    pub merge_endpoint: bool,
    /// A vertical line crosses a non-node cell. Also set next to a merge
    /// curve when the merging lane continues below the row.
    pub pass_through: bool,
    pub connector: Option<Connector>,
}

impl<Id: EventId> RowActivity<'_, Id> {
    /// Classify the cell at (`row`, `lane`).
    ///
    /// Rows past the end of the timeline yield an empty, inactive cell.
    #[must_use]
    pub fn cell(&self, row: usize, lane: Lane) -> Cell {
        let active = self.is_active(row, lane);
        let mut cell = Cell {
            row,
            lane,
            is_node: false,
            active,
            branch_origin: false,
            merge_endpoint: false,
            pass_through: false,
            connector: None,
        };

        let Some(event_lane) = self.lane_at(row) else {
            return cell;
        };
        let incoming = self.incoming(row);

        if event_lane == lane {
            cell.is_node = true;
            cell.branch_origin = !incoming.is_empty();
            cell.connector = node_connector(incoming, lane)
                .or_else(|| self.is_entered_from_above(row, lane).then_some(Connector::Straight));
            return cell;
        }

        cell.merge_endpoint = incoming
            .iter()
            .any(|&(kind, from)| kind == BranchKind::Merge && from == lane);
        cell.pass_through =
            active && (!cell.merge_endpoint || self.continues_below(row, lane));
        cell.connector = if cell.merge_endpoint {
            Connector::towards(lane, event_lane)
        } else if active {
            Some(Connector::Straight)
        } else {
            None
        };
        cell
    }

    /// Every cell of `row`, lane 0 first.
    #[must_use]
    pub fn row_cells(&self, row: usize) -> Vec<Cell> {
        (0..self.lane_count()).map(|lane| self.cell(row, lane)).collect()
    }
}

/// Connector for a node cell from the branch points arriving at it.
fn node_connector(incoming: &[(BranchKind, Lane)], lane: Lane) -> Option<Connector> {
    let mut sources = incoming
        .iter()
        .map(|&(_, from)| from)
        .filter(|&from| from != lane);
    let first = sources.next()?;
    if sources.any(|from| from != first) {
        return Some(Connector::MultiMerge);
    }
    Connector::towards(lane, first)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::layout::analyze;

    #[test]
    fn towards_picks_side() {
        assert_eq!(Connector::towards(2, 0), Some(Connector::CurveLeft));
        assert_eq!(Connector::towards(0, 2), Some(Connector::CurveRight));
        assert_eq!(Connector::towards(1, 1), None);
    }

    #[test]
    fn chain_cells_are_straight_below_the_root() {
        let events = vec![
            Event::root("a", 1),
            Event::new("b", 2, vec!["a"]),
            Event::new("c", 3, vec!["b"]),
        ];
        let layout = analyze(&events);
        let activity = RowActivity::new(&events, &layout);

        let root = activity.cell(0, 0);
        assert!(root.is_node);
        assert!(root.active);
        assert_eq!(root.connector, None);

        let mid = activity.cell(1, 0);
        assert!(mid.is_node);
        assert!(!mid.branch_origin);
        assert_eq!(mid.connector, Some(Connector::Straight));
    }

    #[test]
    fn branch_child_curves_from_parent_lane() {
        let events = vec![
            Event::root("a", 1),
            Event::new("b", 2, vec!["a"]),
            Event::new("c", 3, vec!["a"]),
        ];
        let layout = analyze(&events);
        let activity = RowActivity::new(&events, &layout);

        let cell = activity.cell(2, 1);
        assert!(cell.is_node);
        assert!(cell.branch_origin);
        assert_eq!(cell.connector, Some(Connector::CurveLeft));
    }

    #[test]
    fn merge_endpoint_suppresses_pass_through() {
        let events = vec![
            Event::root("a", 1),
            Event::new("b", 2, vec!["a"]),
            Event::new("c", 3, vec!["a"]),
            Event::new("d", 4, vec!["b", "c"]),
        ];
        let layout = analyze(&events);
        let activity = RowActivity::new(&events, &layout);

        let source = activity.cell(3, 1);
        assert!(!source.is_node);
        assert!(source.active);
        assert!(source.merge_endpoint);
        assert!(!source.pass_through);
        assert_eq!(source.connector, Some(Connector::CurveLeft));

        let target = activity.cell(3, 0);
        assert!(target.is_node);
        assert!(target.branch_origin);
        assert_eq!(target.connector, Some(Connector::CurveRight));
    }

    #[test]
    fn pass_through_lane_is_straight() {
        // Lane 1 runs from c (row 2) to its child e (row 4), passing row 3.
        let events = vec![
            Event::root("a", 1),
            Event::new("b", 2, vec!["a"]),
            Event::new("c", 3, vec!["a"]),
            Event::new("d", 4, vec!["b"]),
            Event::new("e", 5, vec!["c"]),
        ];
        let layout = analyze(&events);
        let activity = RowActivity::new(&events, &layout);

        let cell = activity.cell(3, 1);
        assert!(!cell.is_node);
        assert!(!cell.merge_endpoint);
        assert!(cell.pass_through);
        assert_eq!(cell.connector, Some(Connector::Straight));
    }

    #[test]
    fn merging_lane_that_continues_keeps_its_line() {
        // c on lane 1 merges into d, while its sibling e carries lane 1 on
        // to f below the merge row.
        let events = vec![
            Event::root("a", 1),
            Event::new("b", 2, vec!["a"]),
            Event::new("c", 3, vec!["a"]),
            Event::new("e", 4, vec!["c"]),
            Event::new("d", 5, vec!["b", "c"]),
            Event::new("f", 6, vec!["e"]),
        ];
        let layout = analyze(&events);
        let activity = RowActivity::new(&events, &layout);
        assert_eq!(layout.lane_of(&"f"), Some(1));

        let cell = activity.cell(4, 1);
        assert!(!cell.is_node);
        assert!(cell.active);
        assert!(cell.merge_endpoint);
        assert!(cell.pass_through);
        assert_eq!(cell.connector, Some(Connector::CurveLeft));
        assert!(activity.is_entered_from_above(5, 1));
    }

    #[test]
    fn octopus_merge_is_multi_merge() {
        let events = vec![
            Event::root("a", 1),
            Event::new("b", 2, vec!["a"]),
            Event::new("c", 3, vec!["a"]),
            Event::new("e", 4, vec!["a"]),
            Event::new("m", 5, vec!["b", "c", "e"]),
        ];
        let layout = analyze(&events);
        let activity = RowActivity::new(&events, &layout);

        let cells = activity.row_cells(4);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].connector, Some(Connector::MultiMerge));
        assert!(cells[1].merge_endpoint);
        assert!(cells[2].merge_endpoint);
        assert!(cells.iter().all(|cell| cell.row == 4));
    }

    #[test]
    fn idle_lane_is_empty() {
        let events = vec![
            Event::root("a", 1),
            Event::new("b", 2, vec!["a"]),
            Event::new("c", 3, vec!["a"]),
            Event::new("d", 4, vec!["b"]),
        ];
        let layout = analyze(&events);
        let activity = RowActivity::new(&events, &layout);

        let cell = activity.cell(3, 1);
        assert!(!cell.active);
        assert_eq!(cell.connector, None);
    }

    #[test]
    fn out_of_range_row_is_inactive() {
        let events = vec![Event::root("a", 1)];
        let layout = analyze(&events);
        let activity = RowActivity::new(&events, &layout);

        let cell = activity.cell(5, 0);
        assert!(!cell.is_node);
        assert!(!cell.active);
        assert_eq!(cell.connector, None);

        let last = activity.cell(usize::MAX, 0);
        assert!(!last.active);
        assert!(!last.pass_through);
    }
}
