//! Wire types for the race-management REST API (`/api/v1`).

pub mod common;
pub mod race;
pub mod student;
