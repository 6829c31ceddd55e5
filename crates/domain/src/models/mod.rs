pub mod ids;
pub mod participant;
pub mod race;
pub mod status;
pub mod student;

pub use ids::{RaceId, SlotId, StudentId};
pub use participant::ParticipantSlot;
pub use race::Race;
pub use status::Status;
pub use student::Student;
