//! Lane roster for a race that has not been created yet.
//!
//! A draft always holds at least [`MIN_SLOTS`] lanes, numbered `1..=N` in the
//! order they are shown. Students are bound to lanes one at a time and a
//! student can occupy at most one lane.

use tracing::debug;

use crate::dto::race::{CreateRaceRequest, RaceStudentAttributes};
use crate::error::{RosterError, ValidationError};
use crate::models::{SlotId, Status, Student, StudentId};
use crate::validation;

pub const MIN_SLOTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundStudent {
    pub id: StudentId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftSlot {
    pub id: SlotId,
    pub lane: u32,
    pub student: Option<BoundStudent>,
}

impl DraftSlot {
    pub fn is_bound(&self) -> bool {
        self.student.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct RosterBuilder {
    name: String,
    slots: Vec<DraftSlot>,
    next_slot_id: i64,
}

impl RosterBuilder {
    /// Creates an unnamed draft with two empty lanes.
    pub fn new() -> Self {
        let mut roster = Self {
            name: String::new(),
            slots: Vec::with_capacity(MIN_SLOTS),
            next_slot_id: 1,
        };
        for _ in 0..MIN_SLOTS {
            roster.add_slot();
        }
        roster
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        let mut roster = Self::new();
        roster.set_name(name);
        roster
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn slots(&self) -> &[DraftSlot] {
        &self.slots
    }

    pub fn slot(&self, slot_id: SlotId) -> Option<&DraftSlot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }

    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_bound()).count()
    }

    /// Appends an empty lane numbered after the current last one.
    pub fn add_slot(&mut self) -> SlotId {
        let id = SlotId(self.next_slot_id);
        self.next_slot_id += 1;
        self.slots.push(DraftSlot {
            id,
            lane: self.slots.len() as u32 + 1,
            student: None,
        });
        id
    }

    /// Removes a lane and renumbers the remaining ones.
    ///
    /// Returns `false` without touching the roster when the slot is unknown or
    /// when removing it would leave fewer than [`MIN_SLOTS`] lanes.
    pub fn remove_slot(&mut self, slot_id: SlotId) -> bool {
        if self.slots.len() <= MIN_SLOTS {
            debug!("Keeping slot {}: roster is at its minimum size", slot_id);
            return false;
        }

        let before = self.slots.len();
        self.slots.retain(|s| s.id != slot_id);
        if self.slots.len() == before {
            return false;
        }

        self.renumber();
        true
    }

    /// Binds `student` to the lane, replacing whoever held it before.
    ///
    /// Rebinding a student to the lane it already occupies is a no-op. Binding
    /// a student that holds another lane is rejected.
    pub fn bind_student(&mut self, slot_id: SlotId, student: &Student) -> Result<(), RosterError> {
        if let Some(other) = self
            .slots
            .iter()
            .find(|s| s.id != slot_id && s.student.as_ref().is_some_and(|b| b.id == student.id))
        {
            debug!(
                "Rejected binding student {} to slot {}: already in lane {}",
                student.id, slot_id, other.lane
            );
            return Err(RosterError::DuplicateStudent {
                student: student.id,
                lane: other.lane,
            });
        }

        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.id == slot_id)
            .ok_or(RosterError::UnknownSlot(slot_id))?;
        slot.student = Some(BoundStudent {
            id: student.id,
            name: student.name.clone(),
        });

        Ok(())
    }

    pub fn unbind(&mut self, slot_id: SlotId) -> Result<(), RosterError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.id == slot_id)
            .ok_or(RosterError::UnknownSlot(slot_id))?;
        slot.student = None;
        Ok(())
    }

    /// Students that can still be picked for `slot_id`: everyone not bound to
    /// some other lane. The lane's own student stays selectable.
    pub fn available_students<'a>(
        &self,
        students: &'a [Student],
        slot_id: SlotId,
    ) -> Vec<&'a Student> {
        students
            .iter()
            .filter(|student| {
                !self.slots.iter().any(|s| {
                    s.id != slot_id && s.student.as_ref().is_some_and(|b| b.id == student.id)
                })
            })
            .collect()
    }

    /// Builds the creation payload.
    ///
    /// Empty lanes are dropped and the bound ones are renumbered `1..=N` in
    /// their current order. Fails locally, before any request is made, when
    /// the draft is not submittable.
    pub fn to_request(&self) -> Result<CreateRaceRequest, ValidationError> {
        validation::validate_creation(self)?;

        let race_students_attributes = self
            .slots
            .iter()
            .filter_map(|s| s.student.as_ref())
            .enumerate()
            .map(|(index, student)| RaceStudentAttributes {
                student_id: student.id.0,
                lane: index as u32 + 1,
            })
            .collect();

        Ok(CreateRaceRequest {
            name: self.name.trim().to_string(),
            status: Status::Ready,
            race_students_attributes,
        })
    }

    fn renumber(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            slot.lane = index as u32 + 1;
        }
    }
}

impl Default for RosterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
