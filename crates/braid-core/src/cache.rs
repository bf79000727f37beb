//! Caller-side memoization of layouts.
//!
//! [`analyze`](crate::analyze) is pure and never caches. Renderers that lay
//! out on every pass (initial display, data change, viewport resize) keep a
//! [`LayoutCache`] instead: it fingerprints the event list and hands back the
//! stored [`LayoutResult`] until the fingerprint changes.
//!
//! # Fingerprint
//!
//! A BLAKE3 hash over every event's id, timestamp and parent list, fed
//! through the identifier's `Hash` impl. `Hash` output is only stable within
//! one build, so fingerprints are in-memory keys, never persisted.

use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::event::{Event, EventId};
use crate::layout::{LayoutResult, analyze};

/// Content fingerprint of an event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(blake3::Hash);

impl Fingerprint {
    /// Fingerprint `events`.
    #[must_use]
    pub fn of<Id: EventId>(events: &[Event<Id>]) -> Self {
        let mut hasher = Blake3Hasher(blake3::Hasher::new());
        events.hash(&mut hasher);
        Self(hasher.0.finalize())
    }

    /// Hex rendering, for logs.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

/// Adapter feeding `std::hash::Hash` output into BLAKE3.
struct Blake3Hasher(blake3::Hasher);

impl Hasher for Blake3Hasher {
    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finish(&self) -> u64 {
        let mut prefix = [0_u8; 8];
        prefix.copy_from_slice(&self.0.finalize().as_bytes()[..8]);
        u64::from_le_bytes(prefix)
    }
}

/// Hit/miss counters for a [`LayoutCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Single-entry layout memo keyed by [`Fingerprint`].
///
/// `layout` is only meaningful while `fingerprint` is set.
#[derive(Debug, Clone)]
pub struct LayoutCache<Id: EventId> {
    fingerprint: Option<Fingerprint>,
    layout: LayoutResult<Id>,
    stats: CacheStats,
}

impl<Id: EventId> LayoutCache<Id> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fingerprint: None,
            layout: LayoutResult::empty(),
            stats: CacheStats::default(),
        }
    }

    /// Return the cached layout for `events`, running [`analyze`] on a miss.
    pub fn get_or_analyze(&mut self, events: &[Event<Id>]) -> &LayoutResult<Id> {
        match self.get_or_try_insert_with(events, |events| {
            Ok::<_, std::convert::Infallible>(analyze(events))
        }) {
            Ok(layout) => layout,
            Err(never) => match never {},
        }
    }

    /// Return the cached layout for `events`, computing it with `compute` on
    /// a miss. A failed computation leaves the previous entry in place.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `compute`.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        events: &[Event<Id>],
        compute: impl FnOnce(&[Event<Id>]) -> Result<LayoutResult<Id>, E>,
    ) -> Result<&LayoutResult<Id>, E> {
        let fingerprint = Fingerprint::of(events);
        if self.fingerprint == Some(fingerprint) {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
            debug!(fingerprint = %fingerprint.to_hex(), events = events.len(), "layout cache miss");
            self.layout = compute(events)?;
            self.fingerprint = Some(fingerprint);
        }
        Ok(&self.layout)
    }

    /// Drop the cached layout.
    pub fn invalidate(&mut self) {
        self.fingerprint = None;
        self.layout = LayoutResult::empty();
    }

    /// Returns `true` if the cache holds a layout for exactly `events`.
    #[must_use]
    pub fn is_fresh(&self, events: &[Event<Id>]) -> bool {
        self.fingerprint == Some(Fingerprint::of(events))
    }

    /// Hit/miss counters since construction.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<Id: EventId> Default for LayoutCache<Id> {
    fn default() -> Self {
        Self::new()
    }
}
