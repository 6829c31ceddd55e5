use domain::{Race, RosterError, TransitionError, ValidationError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection refused, DNS failure, timeout, dropped connection.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response with a structured error body, already flattened.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Non-2xx response without a usable body.
    #[error("Request failed with status {status}")]
    Http { status: u16 },

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Roster(#[from] RosterError),

    #[error("{0}")]
    Transition(#[from] TransitionError),

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    /// First step of results submission failed; nothing was persisted.
    #[error("Failed to save race results: {source}")]
    ResultsUpdate { source: Box<ClientError> },

    /// Places were persisted but the race could not be marked completed.
    /// `race` is the snapshot returned by the update call.
    #[error("Results were saved but the race could not be completed: {source}")]
    Completion {
        race: Box<Race>,
        source: Box<ClientError>,
    },

    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(_) => {
                "Could not reach the race server. Please try again.".to_string()
            }
            ClientError::ResultsUpdate { source } => {
                format!("Failed to save race results: {}", source.user_message())
            }
            ClientError::Completion { source, .. } => format!(
                "Results were saved but the race could not be marked completed: {}",
                source.user_message()
            ),
            other => other.to_string(),
        }
    }

    /// Transport failures and 5xx responses are worth retrying as-is.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Api { status, .. } | ClientError::Http { status } => *status >= 500,
            ClientError::ResultsUpdate { source } | ClientError::Completion { source, .. } => {
                source.is_retryable()
            }
            _ => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    /// True for failures that never reached the network.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_)
                | ClientError::Roster(_)
                | ClientError::Transition(_)
        )
    }
}
