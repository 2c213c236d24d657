use std::fmt;

/// Machine-readable error codes for scripts consuming `ct --json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InputParseError,
    PersonNotFound,
    InvalidWeight,
    InvalidRiskLevel,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::InputParseError => "E1003",
            Self::PersonNotFound => "E2001",
            Self::InvalidWeight => "E2002",
            Self::InvalidRiskLevel => "E2003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InputParseError => "Contact list parse error",
            Self::PersonNotFound => "Unknown person identifier",
            Self::InvalidWeight => "Contact frequency out of range",
            Self::InvalidRiskLevel => "Risk level out of range",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .contrace/config.toml and retry."),
            Self::InputParseError => {
                Some("Each line must read `name1,email1 name2,email2 frequency`.")
            }
            Self::PersonNotFound => Some("Check the email against `ct show` output."),
            Self::InvalidWeight => Some("Use a weekly contact frequency between 1 and 7."),
            Self::InvalidRiskLevel => Some("Use a risk level between 0 (low) and 5 (infected)."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by contact graph operations and the analyses built on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An operation referenced a person key that is not in the graph.
    #[error("unknown person identifier: {key}")]
    NotFound { key: String },

    /// A contact frequency fell outside the weekly range `[1, 7]`.
    #[error("contact frequency {value} is outside 1..=7")]
    InvalidWeight { value: i64 },

    /// A risk level fell outside `0..=5`.
    #[error("risk level {value} is outside 0..=5")]
    InvalidRiskLevel { value: u8 },

    /// Propagation dequeued a node it had already settled. Indicates a bug.
    #[error("propagation revisited already settled person {key}")]
    AlreadyVisited { key: String },
}

impl GraphError {
    pub(crate) fn not_found(key: &str) -> Self {
        Self::NotFound {
            key: key.to_string(),
        }
    }

    /// The stable [`ErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::PersonNotFound,
            Self::InvalidWeight { .. } => ErrorCode::InvalidWeight,
            Self::InvalidRiskLevel { .. } => ErrorCode::InvalidRiskLevel,
            Self::AlreadyVisited { .. } => ErrorCode::InternalUnexpected,
        }
    }
}
