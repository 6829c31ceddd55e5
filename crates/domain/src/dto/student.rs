use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ValidationError;
use crate::models::{Student, StudentId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentResponse {
    pub id: i64,
    pub name: String,
    pub age: i32,
}

/// Request payload for `POST /api/v1/students`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(range(min = 1, message = "Age must be a positive number"))]
    pub age: i32,
}

fn validate_name(name: &str) -> Result<(), validator::ValidationError> {
    super::race::validate_not_blank(name)
}

impl CreateStudentRequest {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into().trim().to_string(),
            age,
        }
    }

    /// Builds and validates the request in one step.
    pub fn checked(name: impl Into<String>, age: i32) -> Result<Self, ValidationError> {
        let request = Self::new(name, age);
        request.validate()?;
        Ok(request)
    }
}

impl From<StudentResponse> for Student {
    fn from(student: StudentResponse) -> Self {
        Self {
            id: StudentId(student.id),
            name: student.name,
            age: student.age,
        }
    }
}
