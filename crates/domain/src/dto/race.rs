use serde::{Deserialize, Serialize};
use validator::Validate;

use super::student::StudentResponse;
use crate::models::{ParticipantSlot, Race, RaceId, SlotId, Status, StudentId};
use crate::results::PlaceAssignment;

/// Race as returned by the API. The list endpoint omits `race_students`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceResponse {
    pub id: i64,
    pub name: String,
    pub status: Status,
    #[serde(default)]
    pub race_students: Vec<RaceStudentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceStudentResponse {
    pub id: i64,
    #[serde(default)]
    pub student_id: Option<i64>,
    pub lane: u32,
    #[serde(default)]
    pub place: Option<u32>,
    #[serde(default)]
    pub student: Option<StudentResponse>,
}

/// Request payload for `POST /api/v1/races`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateRaceRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    pub status: Status,

    #[validate(length(min = 2, message = "At least two participants are required"))]
    pub race_students_attributes: Vec<RaceStudentAttributes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceStudentAttributes {
    pub student_id: i64,
    pub lane: u32,
}

/// Request payload for `PUT /api/v1/races/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResultsRequest {
    pub race_students: Vec<PlaceUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceUpdate {
    pub id: i64,
    pub place: u32,
}

impl UpdateResultsRequest {
    pub fn from_assignments(assignments: &[PlaceAssignment]) -> Self {
        Self {
            race_students: assignments
                .iter()
                .map(|a| PlaceUpdate {
                    id: a.slot_id.0,
                    place: a.place,
                })
                .collect(),
        }
    }
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut error = validator::ValidationError::new("blank");
        error.message = Some("Name is required".into());
        Err(error)
    } else {
        Ok(())
    }
}

impl From<RaceStudentResponse> for ParticipantSlot {
    fn from(row: RaceStudentResponse) -> Self {
        let student_id = row
            .student_id
            .or_else(|| row.student.as_ref().map(|s| s.id))
            .map(StudentId);

        Self {
            id: SlotId(row.id),
            student_id,
            student_name: row.student.map(|s| s.name),
            lane: row.lane,
            place: row.place,
        }
    }
}

impl From<RaceResponse> for Race {
    fn from(race: RaceResponse) -> Self {
        let mut participants: Vec<ParticipantSlot> = race
            .race_students
            .into_iter()
            .map(ParticipantSlot::from)
            .collect();
        participants.sort_by_key(|p| p.lane);

        Self {
            id: RaceId(race.id),
            name: race.name,
            status: race.status,
            participants,
        }
    }
}
