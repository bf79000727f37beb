use braid_core::Event;
use proptest::prelude::*;
use proptest::sample::Index;

/// Keep the first occurrence of every parent, preserving order.
fn dedup_in_order(parents: Vec<u32>) -> Vec<u32> {
    let mut out = Vec::with_capacity(parents.len());
    for parent in parents {
        if !out.contains(&parent) {
            out.push(parent);
        }
    }
    out
}

/// Well-formed timelines: unique ids `0..n`, ascending timestamps, and every
/// parent on an earlier row. Up to three parents per event.
pub fn arb_timeline() -> impl Strategy<Value = Vec<Event<u32>>> {
    prop::collection::vec(prop::collection::vec(any::<Index>(), 0..=3), 0..40).prop_map(
        |picks_per_row| {
            picks_per_row
                .into_iter()
                .enumerate()
                .map(|(row, picks)| {
                    let id = u32::try_from(row).unwrap_or(u32::MAX);
                    let parents = if row == 0 {
                        Vec::new()
                    } else {
                        dedup_in_order(
                            picks
                                .iter()
                                .map(|pick| u32::try_from(pick.index(row)).unwrap_or(0))
                                .collect(),
                        )
                    };
                    Event::new(id, i64::from(id) * 10, parents)
                })
                .collect()
        },
    )
}

/// Timelines that break the preconditions: parents may point forward, at
/// themselves, or at ids that never appear.
pub fn arb_malformed_timeline() -> impl Strategy<Value = Vec<Event<u32>>> {
    prop::collection::vec(prop::collection::vec(0_u32..50, 0..=3), 0..40).prop_map(
        |parents_per_row| {
            parents_per_row
                .into_iter()
                .enumerate()
                .map(|(row, parents)| {
                    let id = u32::try_from(row).unwrap_or(u32::MAX);
                    Event::new(id, i64::from(id), parents)
                })
                .collect()
        },
    )
}
