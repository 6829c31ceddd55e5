use serde::{Deserialize, Serialize};

use super::{SlotId, StudentId};

/// One lane of a persisted race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSlot {
    pub id: SlotId,
    pub student_id: Option<StudentId>,
    /// Denormalized from the nested student for display.
    pub student_name: Option<String>,
    pub lane: u32,
    pub place: Option<u32>,
}

impl ParticipantSlot {
    pub fn display_name(&self) -> &str {
        self.student_name.as_deref().unwrap_or("-")
    }
}
