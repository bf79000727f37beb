use std::fmt;

/// Errors reported by [`crate::analyze_checked`] when the input violates the
/// layout preconditions.
///
/// Rows are zero-based positions in the input slice. Identifiers are stored in
/// their `Debug` rendering so the error type stays independent of the caller's
/// identifier type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// An identifier appears more than once.
    #[error("duplicate event id {id} at row {row} (first seen at row {first_row})")]
    DuplicateId {
        id: String,
        row: usize,
        first_row: usize,
    },

    /// A timestamp is smaller than the one on the preceding row.
    #[error("event {id} at row {row} has timestamp {timestamp} earlier than {previous}")]
    OutOfOrder {
        id: String,
        row: usize,
        timestamp: i64,
        previous: i64,
    },

    /// A parent identifier does not name an event on an earlier row.
    #[error("event {id} at row {row} references parent {parent} not seen on an earlier row")]
    UnresolvedParent {
        id: String,
        row: usize,
        parent: String,
    },
}

impl LayoutError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateId { .. } => ErrorCode::DuplicateEventId,
            Self::OutOfOrder { .. } => ErrorCode::OutOfOrderTimestamp,
            Self::UnresolvedParent { .. } => ErrorCode::UnresolvedParent,
        }
    }

    /// Row of the offending event.
    #[must_use]
    pub const fn row(&self) -> usize {
        match self {
            Self::DuplicateId { row, .. }
            | Self::OutOfOrder { row, .. }
            | Self::UnresolvedParent { row, .. } => *row,
        }
    }
}

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InputNotFound,
    InputParseError,
    DuplicateEventId,
    OutOfOrderTimestamp,
    UnresolvedParent,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::InputNotFound => "E2001",
            Self::InputParseError => "E2002",
            Self::DuplicateEventId => "E3001",
            Self::OutOfOrderTimestamp => "E3002",
            Self::UnresolvedParent => "E3003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InputNotFound => "Event file not found",
            Self::InputParseError => "Event file parse error",
            Self::DuplicateEventId => "Duplicate event id",
            Self::OutOfOrderTimestamp => "Events not in chronological order",
            Self::UnresolvedParent => "Unresolved parent reference",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .braid/config.toml and retry."),
            Self::InputNotFound => Some("Check the event file path."),
            Self::InputParseError => {
                Some("Use JSON lines or tab-separated `timestamp<TAB>id<TAB>parents` lines.")
            }
            Self::DuplicateEventId => Some("Give every event a unique id."),
            Self::OutOfOrderTimestamp => Some("Pass --sort to order events by timestamp."),
            Self::UnresolvedParent => {
                Some("Every parent must appear earlier in the file; drop --strict to fall back to lane 0.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
