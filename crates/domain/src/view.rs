//! Display state of one race card in the race list.

use crate::error::ValidationError;
use crate::models::Race;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardState {
    /// Collapsed: name and status badge only.
    #[default]
    Viewing,
    /// Roster table visible. Entering this state is what triggers a detail refresh.
    Expanded,
    /// Results form open.
    Editing,
    /// Results are being sent.
    Submitting,
}

impl CardState {
    /// Header click. Has no effect while the results form is open.
    pub fn toggle_expanded(self) -> CardState {
        match self {
            CardState::Viewing => CardState::Expanded,
            CardState::Expanded => CardState::Viewing,
            other => other,
        }
    }

    pub fn begin_editing(self, race: &Race) -> Result<CardState, ValidationError> {
        if !race.status.accepts_results() {
            return Err(ValidationError::ResultsNotAccepted {
                status: race.status,
            });
        }

        match self {
            CardState::Expanded => Ok(CardState::Editing),
            other => Ok(other),
        }
    }

    pub fn cancel_editing(self) -> CardState {
        match self {
            CardState::Editing => CardState::Expanded,
            other => other,
        }
    }

    pub fn begin_submit(self) -> CardState {
        match self {
            CardState::Editing => CardState::Submitting,
            other => other,
        }
    }

    /// Success closes the form; failure reopens it with the values intact.
    pub fn finish_submit(self, succeeded: bool) -> CardState {
        match (self, succeeded) {
            (CardState::Submitting, true) => CardState::Expanded,
            (CardState::Submitting, false) => CardState::Editing,
            (other, _) => other,
        }
    }

    pub fn shows_roster(&self) -> bool {
        matches!(self, CardState::Expanded)
    }

    pub fn shows_results_form(&self) -> bool {
        matches!(self, CardState::Editing | CardState::Submitting)
    }

    /// Entering `Expanded` from `Viewing` should re-fetch the race detail.
    pub fn needs_refresh(previous: CardState, next: CardState) -> bool {
        previous == CardState::Viewing && next == CardState::Expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RaceId, Status};

    fn race(status: Status) -> Race {
        Race {
            id: RaceId(3),
            name: "Relay".to_string(),
            status,
            participants: Vec::new(),
        }
    }

    #[test]
    fn test_expand_and_collapse() {
        let state = CardState::default().toggle_expanded();
        assert_eq!(state, CardState::Expanded);
        assert!(state.shows_roster());
        assert!(CardState::needs_refresh(CardState::Viewing, state));
        assert_eq!(state.toggle_expanded(), CardState::Viewing);
    }

    #[test]
    fn test_full_editing_cycle() {
        let ready = race(Status::Ready);
        let state = CardState::Expanded.begin_editing(&ready).unwrap();
        assert_eq!(state, CardState::Editing);
        assert_eq!(state.toggle_expanded(), CardState::Editing);

        let submitting = state.begin_submit();
        assert!(submitting.shows_results_form());
        assert_eq!(submitting.finish_submit(false), CardState::Editing);
        assert_eq!(submitting.finish_submit(true), CardState::Expanded);
        assert_eq!(state.cancel_editing(), CardState::Expanded);
    }

    #[test]
    fn test_editing_completed_race_rejected() {
        let done = race(Status::Completed);
        assert!(CardState::Expanded.begin_editing(&done).is_err());
    }

    #[test]
    fn test_editing_requires_expanded_card() {
        let ready = race(Status::Ready);
        assert_eq!(CardState::Viewing.begin_editing(&ready).unwrap(), CardState::Viewing);
    }
}
