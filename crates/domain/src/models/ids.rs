//! Newtype wrappers for the identifiers handed out by the race API.
//!
//! Keeping them distinct stops a slot id from being passed where a student id
//! is expected, which is easy to do when every id is an integer on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned race identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RaceId(pub i64);

/// Server-assigned student identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub i64);

/// Identifier of a lane slot.
///
/// For a persisted race this is the `race_students` row id. Inside a
/// [`RosterBuilder`](crate::roster::RosterBuilder) draft it is a local counter
/// that never leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub i64);

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RaceId {
    fn from(id: i64) -> Self {
        RaceId(id)
    }
}

impl From<i64> for StudentId {
    fn from(id: i64) -> Self {
        StudentId(id)
    }
}

impl From<i64> for SlotId {
    fn from(id: i64) -> Self {
        SlotId(id)
    }
}
