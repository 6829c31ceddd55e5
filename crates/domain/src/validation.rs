//! Submit gates for the race-creation and results-entry forms.
//!
//! Everything here is pure. The `is_*` predicates are what a view polls on
//! every keystroke; the `validate_*` functions return the first problem found
//! so it can be shown next to the disabled submit control.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::models::StudentId;
use crate::results::{PlaceAssignment, PlaceInput};
use crate::roster::{MIN_SLOTS, RosterBuilder};

/// How strictly entered places are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceRule {
    /// Places must form a permutation of `1..=N`.
    #[default]
    Permutation,
    /// Each place only has to be a whole number in `1..=N`; ties pass.
    PerField,
}

impl fmt::Display for PlaceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceRule::Permutation => f.write_str("permutation"),
            PlaceRule::PerField => f.write_str("per_field"),
        }
    }
}

impl FromStr for PlaceRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "permutation" | "strict" => Ok(PlaceRule::Permutation),
            "per_field" | "lenient" => Ok(PlaceRule::PerField),
            other => Err(format!(
                "Unknown place rule '{}'. Expected 'permutation' or 'per_field'",
                other
            )),
        }
    }
}

pub fn validate_creation(roster: &RosterBuilder) -> Result<(), ValidationError> {
    if roster.name().trim().is_empty() {
        return Err(ValidationError::BlankName);
    }

    let mut seen: HashSet<StudentId> = HashSet::new();
    for student in roster.slots().iter().filter_map(|s| s.student.as_ref()) {
        if !seen.insert(student.id) {
            return Err(ValidationError::DuplicateStudent {
                student: student.id,
            });
        }
    }

    if seen.len() < MIN_SLOTS {
        return Err(ValidationError::TooFewParticipants {
            bound: seen.len(),
            required: MIN_SLOTS,
        });
    }

    Ok(())
}

/// True iff the name is non-blank and at least two lanes hold distinct students.
pub fn is_creation_valid(roster: &RosterBuilder) -> bool {
    validate_creation(roster).is_ok()
}

/// Parses every entered place against `N = inputs.len()`.
pub fn validate_places(
    inputs: &[PlaceInput],
    rule: PlaceRule,
) -> Result<Vec<PlaceAssignment>, ValidationError> {
    let max = inputs.len();
    if max < MIN_SLOTS {
        return Err(ValidationError::TooFewLanes {
            lanes: max,
            required: MIN_SLOTS,
        });
    }

    let mut lane_by_place: Vec<Option<u32>> = vec![None; max];
    let mut assignments = Vec::with_capacity(max);

    for input in inputs {
        let place = parse_place(input, max)?;

        if rule == PlaceRule::Permutation {
            let holder = &mut lane_by_place[place as usize - 1];
            if let Some(first_lane) = *holder {
                return Err(ValidationError::DuplicatePlace {
                    place,
                    first_lane,
                    second_lane: input.lane,
                });
            }
            *holder = Some(input.lane);
        }

        assignments.push(PlaceAssignment {
            slot_id: input.slot_id,
            place,
        });
    }

    Ok(assignments)
}

pub fn is_results_valid(inputs: &[PlaceInput], rule: PlaceRule) -> bool {
    validate_places(inputs, rule).is_ok()
}

fn parse_place(input: &PlaceInput, max: usize) -> Result<u32, ValidationError> {
    let raw = input.value.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingPlace { lane: input.lane });
    }

    let place: i64 = raw.parse().map_err(|_| ValidationError::InvalidPlace {
        lane: input.lane,
        input: raw.to_string(),
    })?;

    if place < 1 || place > max as i64 {
        return Err(ValidationError::PlaceOutOfRange {
            lane: input.lane,
            place,
            max,
        });
    }

    Ok(place as u32)
}
