use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error payload returned with non-2xx responses.
///
/// The API answers validation failures with either
/// `{"errors": {"field": ["message", ...]}}`, `{"errors": {"base": [...]}}`,
/// a plain `{"errors": ["message"]}` list, or `{"error": "message"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Errors { errors: ErrorDetails },
    Message { error: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    List(Vec<String>),
    Fields(BTreeMap<String, FieldMessages>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldMessages {
    Many(Vec<String>),
    One(String),
}

impl FieldMessages {
    fn iter(&self) -> impl Iterator<Item = &String> {
        match self {
            FieldMessages::Many(messages) => messages.iter(),
            FieldMessages::One(message) => std::slice::from_ref(message).iter(),
        }
    }
}

impl ErrorBody {
    /// Collapses the payload into one line for display.
    ///
    /// `base` messages come first and are kept verbatim; field messages follow
    /// in field-name order, prefixed with the humanized field name
    /// (`student_id` + `can't be blank` → `Student id can't be blank`).
    pub fn flatten(&self) -> String {
        match self {
            ErrorBody::Message { error } => error.trim().to_string(),
            ErrorBody::Errors {
                errors: ErrorDetails::List(messages),
            } => join_messages(messages.iter().map(|m| m.trim().to_string())),
            ErrorBody::Errors {
                errors: ErrorDetails::Fields(fields),
            } => {
                let base = fields
                    .get("base")
                    .into_iter()
                    .flat_map(|m| m.iter())
                    .map(|m| m.trim().to_string());
                let named = fields
                    .iter()
                    .filter(|(field, _)| field.as_str() != "base")
                    .flat_map(|(field, messages)| {
                        let label = humanize_field(field);
                        messages
                            .iter()
                            .map(move |m| format!("{} {}", label, m.trim()))
                    });

                join_messages(base.chain(named))
            }
        }
    }
}

fn join_messages(messages: impl Iterator<Item = String>) -> String {
    messages
        .filter(|m| !m.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// `race_students.place` → `Race students place`
pub fn humanize_field(field: &str) -> String {
    let spaced = field.replace(['_', '.'], " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Wraps a payload under the resource key the API expects: `{"race": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceEnvelope<T> {
    pub race: T,
}

/// `{"student": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentEnvelope<T> {
    pub student: T,
}
