use thiserror::Error;

use crate::models::{SlotId, Status, StudentId};

pub type Result<T> = std::result::Result<T, ValidationError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Lane slot {0} does not exist")]
    UnknownSlot(SlotId),

    #[error("Student {student} is already assigned to lane {lane}")]
    DuplicateStudent { student: StudentId, lane: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot move a race from {from} to {to}")]
    NotAllowed { from: Status, to: Status },
}

/// Local validation failures. None of these ever reach the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Race name is required")]
    BlankName,

    #[error("At least {required} participants are required, {bound} assigned")]
    TooFewParticipants { bound: usize, required: usize },

    #[error("Student {student} is assigned to more than one lane")]
    DuplicateStudent { student: StudentId },

    #[error("Results need at least {required} lanes, the race has {lanes}")]
    TooFewLanes { lanes: usize, required: usize },

    #[error("Lane {lane} has no place")]
    MissingPlace { lane: u32 },

    #[error("Lane {lane}: '{input}' is not a whole number")]
    InvalidPlace { lane: u32, input: String },

    #[error("Lane {lane}: place {place} must be between 1 and {max}")]
    PlaceOutOfRange { lane: u32, place: i64, max: usize },

    #[error("Place {place} is given to both lane {first_lane} and lane {second_lane}")]
    DuplicatePlace {
        place: u32,
        first_lane: u32,
        second_lane: u32,
    },

    #[error("Results cannot be entered for a {status} race")]
    ResultsNotAccepted { status: Status },

    #[error("Results are already being submitted")]
    SubmissionInProgress,

    #[error("Slot {0} does not belong to this race")]
    UnknownSlot(SlotId),

    #[error("Expected lane {expected} at position {position}, found lane {found}")]
    LaneSequence {
        position: usize,
        expected: u32,
        found: u32,
    },

    #[error("Lane {lane} has a place while the race is {status}")]
    UnexpectedPlace { lane: u32, status: Status },

    #[error("Lane {lane} has no place although the race is completed")]
    PlaceMissingOnCompletion { lane: u32 },

    #[error("{0}")]
    Fields(String),
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{}: {}", field, e.code))
                })
            })
            .collect();
        messages.sort();

        ValidationError::Fields(messages.join("; "))
    }
}
