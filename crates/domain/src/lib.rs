pub mod dto;
pub mod error;
pub mod models;
pub mod results;
pub mod roster;
pub mod validation;
pub mod view;

pub use error::{Result, RosterError, TransitionError, ValidationError};
pub use models::{ParticipantSlot, Race, RaceId, SlotId, Status, Student, StudentId};
pub use results::{EditorState, PlaceAssignment, PlaceInput, ResultsEditor, SubmitPlan, SubmitStage};
pub use roster::{BoundStudent, DraftSlot, MIN_SLOTS, RosterBuilder};
pub use validation::PlaceRule;
pub use view::CardState;
