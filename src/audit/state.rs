//! Page state definitions for tracking analysis progress
//!
//! A page moves `Fetching → Parsing → Evaluating → Done`; any active state may
//! drop to `Failed`.
use crate::AuditError;
use std::fmt;

/// Represents the current state of a page in the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Page is being downloaded
    Fetching,

    /// Body is being parsed and the excluded region pruned
    Parsing,

    /// Rules and probes are running
    Evaluating,

    // ===== Terminal States =====
    /// Analysis produced a result
    Done,

    /// The page could not be fetched or parsed
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if the machine may move from `self` to `next`
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Fetching, Self::Parsing)
                | (Self::Parsing, Self::Evaluating)
                | (Self::Evaluating, Self::Done)
                | (Self::Fetching | Self::Parsing | Self::Evaluating, Self::Failed)
        )
    }

    /// Moves to `next`, rejecting transitions the machine does not allow
    pub fn transition(self, next: PageState) -> Result<PageState, AuditError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AuditError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Evaluating => "evaluating",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Fetching,
            Self::Parsing,
            Self::Evaluating,
            Self::Done,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
