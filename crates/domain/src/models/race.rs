use serde::{Deserialize, Serialize};

use super::{ParticipantSlot, RaceId, SlotId, Status};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    pub id: RaceId,
    pub name: String,
    pub status: Status,
    /// Ordered by lane.
    pub participants: Vec<ParticipantSlot>,
}

impl Race {
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn slot(&self, slot_id: SlotId) -> Option<&ParticipantSlot> {
        self.participants.iter().find(|p| p.id == slot_id)
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Checks the structural invariants of a persisted race: lanes run 1..N in
    /// order, no lane carries a place before results are entered, and every
    /// lane carries a unique place in 1..N once the race is completed.
    ///
    /// A race left in `ready` with places attached (update succeeded, completion
    /// failed) fails this check on purpose so callers can spot it.
    pub fn check_invariants(&self) -> Result<(), ValidationError> {
        for (position, slot) in self.participants.iter().enumerate() {
            let expected = position as u32 + 1;
            if slot.lane != expected {
                return Err(ValidationError::LaneSequence {
                    position,
                    expected,
                    found: slot.lane,
                });
            }
        }

        match self.status {
            Status::Scheduled | Status::Ready => {
                if let Some(slot) = self.participants.iter().find(|p| p.place.is_some()) {
                    return Err(ValidationError::UnexpectedPlace {
                        lane: slot.lane,
                        status: self.status,
                    });
                }
            }
            Status::Completed => {
                let max = self.participants.len();
                let mut seen: Vec<Option<u32>> = vec![None; max];
                for slot in &self.participants {
                    let place = slot
                        .place
                        .ok_or(ValidationError::PlaceMissingOnCompletion { lane: slot.lane })?;
                    if place == 0 || place as usize > max {
                        return Err(ValidationError::PlaceOutOfRange {
                            lane: slot.lane,
                            place: place as i64,
                            max,
                        });
                    }
                    let entry = &mut seen[place as usize - 1];
                    if let Some(first_lane) = *entry {
                        return Err(ValidationError::DuplicatePlace {
                            place,
                            first_lane,
                            second_lane: slot.lane,
                        });
                    }
                    *entry = Some(slot.lane);
                }
            }
            Status::InProgress => {}
        }

        Ok(())
    }

    /// Participants sorted by finishing place; unplaced lanes come last.
    pub fn standings(&self) -> Vec<&ParticipantSlot> {
        let mut standings: Vec<&ParticipantSlot> = self.participants.iter().collect();
        standings.sort_by_key(|p| (p.place.is_none(), p.place, p.lane));
        standings
    }
}
