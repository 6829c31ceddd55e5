use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TransitionError;

/// Lifecycle stage of a race.
///
/// ```text
/// scheduled ──► ready ──► in_progress
///     │           │            │
///     └───────────┴────────────┴──► completed
/// ```
///
/// `scheduled` may also jump straight to `in_progress`. `completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Scheduled,
    Ready,
    InProgress,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Scheduled => "scheduled",
            Status::Ready => "ready",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
        }
    }

    /// Human-readable badge text, e.g. `in progress`.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Completed)
    }

    /// Whether finishing places may be entered for a race in this stage.
    pub fn accepts_results(&self) -> bool {
        !self.is_terminal()
    }

    pub fn can_transition_to(&self, next: Status) -> bool {
        use Status::*;

        matches!(
            (self, next),
            (Scheduled, Ready)
                | (Scheduled, InProgress)
                | (Ready, InProgress)
                | (Scheduled, Completed)
                | (Ready, Completed)
                | (InProgress, Completed)
        )
    }

    pub fn transition_to(&self, next: Status) -> Result<Status, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            tracing::debug!("Rejected status transition {} -> {}", self, next);
            Err(TransitionError::NotAllowed {
                from: *self,
                to: next,
            })
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(Status::Scheduled),
            "ready" => Ok(Status::Ready),
            "in_progress" | "in progress" => Ok(Status::InProgress),
            "completed" => Ok(Status::Completed),
            other => Err(format!("Unknown race status: '{}'", other)),
        }
    }
}
