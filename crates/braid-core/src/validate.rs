//! Precondition checks for the checked layout path.
//!
//! The lenient [`analyze`](crate::analyze) trusts its caller. [`validate`]
//! verifies what it trusts, in one pass:
//!
//! - ids are unique;
//! - timestamps never decrease;
//! - every parent names an event on an earlier row.
//!
//! The last rule also rules out self references and cycles, since a cycle
//! needs at least one edge pointing forward in the list.

use std::collections::HashMap;

use crate::error::LayoutError;
use crate::event::{Event, EventId};

/// Check the layout preconditions, returning the first violation.
///
/// # Errors
///
/// See [`LayoutError`] for the three violation kinds. Rows are reported
/// zero-based.
pub fn validate<Id: EventId>(events: &[Event<Id>]) -> Result<(), LayoutError> {
    let mut seen: HashMap<&Id, usize> = HashMap::with_capacity(events.len());
    let mut previous: Option<i64> = None;

    for (row, event) in events.iter().enumerate() {
        if let Some(&first_row) = seen.get(&event.id) {
            return Err(LayoutError::DuplicateId {
                id: format!("{:?}", event.id),
                row,
                first_row,
            });
        }

        if let Some(previous) = previous.filter(|&previous| event.timestamp < previous) {
            return Err(LayoutError::OutOfOrder {
                id: format!("{:?}", event.id),
                row,
                timestamp: event.timestamp,
                previous,
            });
        }

        if let Some(parent) = event.parents.iter().find(|parent| !seen.contains_key(parent)) {
            return Err(LayoutError::UnresolvedParent {
                id: format!("{:?}", event.id),
                row,
                parent: format!("{parent:?}"),
            });
        }

        seen.insert(&event.id, row);
        previous = Some(event.timestamp);
    }

    Ok(())
}
