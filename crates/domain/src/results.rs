//! Results entry for a single race.
//!
//! [`ResultsEditor`] is the form-side half of the results transaction:
//!
//! ```text
//! Editing ──begin_submit──► Submitting(Update) ──record_update──► Submitting(Completion)
//!    ▲                            │                                      │
//!    │                      record_failure                       record_success
//!    │                            ▼                                      ▼
//!    └────────set_place────── Failed { stage }                        Success
//! ```
//!
//! The remote calls themselves are made by the client crate; the editor only
//! tracks which step comes next so that a failed completion can be retried
//! without re-sending places that are already persisted.

use tracing::debug;

use crate::error::{Result, ValidationError};
use crate::models::{Race, RaceId, SlotId};
use crate::roster::MIN_SLOTS;
use crate::validation::{self, PlaceRule};

/// The remote step a submission has to run next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStage {
    /// Send places with `PUT /races/{id}`.
    Update,
    /// Places are persisted; mark the race completed with `PATCH /races/{id}/complete`.
    Completion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Editing,
    Submitting(SubmitStage),
    Success,
    /// Entered values are kept; `stage` is where a retry resumes.
    Failed { stage: SubmitStage, message: String },
}

/// Raw text typed into one lane's place field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceInput {
    pub slot_id: SlotId,
    pub lane: u32,
    pub student_name: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceAssignment {
    pub slot_id: SlotId,
    pub place: u32,
}

/// What the caller has to send for the current submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPlan {
    pub race_id: RaceId,
    pub stage: SubmitStage,
    pub places: Vec<PlaceAssignment>,
}

#[derive(Debug, Clone)]
pub struct ResultsEditor {
    race: Race,
    inputs: Vec<PlaceInput>,
    rule: PlaceRule,
    state: EditorState,
    next_stage: SubmitStage,
}

impl ResultsEditor {
    /// Opens the results form, pre-filled with any places the race already has.
    ///
    /// The race must carry its roster; a summary without participants from
    /// the race list is rejected.
    pub fn open(race: Race, rule: PlaceRule) -> Result<Self> {
        if !race.status.accepts_results() {
            return Err(ValidationError::ResultsNotAccepted {
                status: race.status,
            });
        }
        if race.participants.len() < MIN_SLOTS {
            return Err(ValidationError::TooFewLanes {
                lanes: race.participants.len(),
                required: MIN_SLOTS,
            });
        }

        let inputs = race
            .participants
            .iter()
            .map(|p| PlaceInput {
                slot_id: p.id,
                lane: p.lane,
                student_name: p.student_name.clone(),
                value: p.place.map(|place| place.to_string()).unwrap_or_default(),
            })
            .collect();

        Ok(Self {
            race,
            inputs,
            rule,
            state: EditorState::Editing,
            next_stage: SubmitStage::Update,
        })
    }

    pub fn race(&self) -> &Race {
        &self.race
    }

    pub fn inputs(&self) -> &[PlaceInput] {
        &self.inputs
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn rule(&self) -> PlaceRule {
        self.rule
    }

    pub fn pending_stage(&self) -> SubmitStage {
        self.next_stage
    }

    /// Records what was typed for one lane and returns the form to `Editing`.
    ///
    /// Edits are ignored while a submission is in flight or after success.
    /// Changing a value after the places were persisted means they have to be
    /// sent again.
    pub fn set_place(&mut self, slot_id: SlotId, value: impl Into<String>) -> Result<()> {
        if matches!(self.state, EditorState::Submitting(_) | EditorState::Success) {
            debug!("Ignoring place edit for slot {} in state {:?}", slot_id, self.state);
            return Ok(());
        }

        let input = self
            .inputs
            .iter_mut()
            .find(|i| i.slot_id == slot_id)
            .ok_or(ValidationError::UnknownSlot(slot_id))?;

        let value = value.into();
        if input.value != value {
            input.value = value;
            self.next_stage = SubmitStage::Update;
        }
        self.state = EditorState::Editing;

        Ok(())
    }

    pub fn validate(&self) -> Result<Vec<PlaceAssignment>> {
        validation::validate_places(&self.inputs, self.rule)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        matches!(self.state, EditorState::Editing | EditorState::Failed { .. }) && self.is_valid()
    }

    /// Moves to `Submitting` and returns what has to be sent.
    ///
    /// Validation failures leave the editor untouched.
    pub fn begin_submit(&mut self) -> Result<SubmitPlan> {
        match self.state {
            EditorState::Submitting(_) => return Err(ValidationError::SubmissionInProgress),
            EditorState::Success => {
                return Err(ValidationError::ResultsNotAccepted {
                    status: self.race.status,
                });
            }
            EditorState::Editing | EditorState::Failed { .. } => {}
        }

        let places = self.validate()?;
        self.state = EditorState::Submitting(self.next_stage);

        Ok(SubmitPlan {
            race_id: self.race.id,
            stage: self.next_stage,
            places,
        })
    }

    /// The update call succeeded; the completion call comes next.
    pub fn record_update(&mut self, race: Race) {
        self.race = race;
        self.next_stage = SubmitStage::Completion;
        self.state = EditorState::Submitting(SubmitStage::Completion);
    }

    pub fn record_success(&mut self, race: Race) {
        self.race = race;
        self.state = EditorState::Success;
    }

    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.state = EditorState::Failed {
            stage: self.next_stage,
            message: message.into(),
        };
    }
}
