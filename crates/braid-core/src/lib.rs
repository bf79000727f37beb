//! braid-core library.
//!
//! Lays out a chronologically sorted event DAG (a commit-graph-like timeline)
//! into horizontal lanes, records where branches are created and merged, and
//! answers per-row, per-lane connector queries for a renderer.
//!
//! ```
//! use braid_core::{Event, RowActivity, analyze};
//!
//! let events = vec![
//!     Event::root("a", 1_000),
//!     Event::new("b", 2_000, vec!["a"]),
//!     Event::new("c", 3_000, vec!["a"]),
//! ];
//!
//! let layout = analyze(&events);
//! assert_eq!(layout.lane_count, 2);
//! assert_eq!(layout.lane_of(&"c"), Some(1));
//!
//! let activity = RowActivity::new(&events, &layout);
//! assert!(activity.is_active(0, 0));
//! ```
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums ([`LayoutError`]); the lenient
//!   [`analyze`] path never fails.
//! - **Logging**: `tracing` macros (`debug!` for pass summaries, `warn!` for
//!   degraded input).

pub mod cache;
pub mod error;
pub mod event;
pub mod layout;
pub mod validate;

pub use cache::LayoutCache;
pub use error::{ErrorCode, LayoutError};
pub use event::{Event, EventId};
pub use layout::activity::{RowActivity, Terminus};
pub use layout::connector::{Cell, Connector};
pub use layout::index::{ChildIndex, ParentIndex};
pub use layout::lanes::{BranchKind, BranchPoint, Lane};
pub use layout::{LayoutResult, analyze, analyze_checked};
