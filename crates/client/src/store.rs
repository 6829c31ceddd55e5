//! In-memory race collection owned by the application root.
//!
//! Readers get an `Arc` snapshot that never changes under them; writers clone
//! the underlying vector only while a snapshot is still held elsewhere.

use domain::{Race, RaceId};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct RaceStore {
    races: Arc<Vec<Race>>,
}

impl RaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot. Later writes to the store do not affect it.
    pub fn list(&self) -> Arc<Vec<Race>> {
        Arc::clone(&self.races)
    }

    pub fn get(&self, id: RaceId) -> Option<&Race> {
        self.races.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.races.len()
    }

    pub fn is_empty(&self) -> bool {
        self.races.is_empty()
    }

    pub fn replace_all(&mut self, races: Vec<Race>) {
        self.races = Arc::new(races);
    }

    pub fn clear(&mut self) {
        self.replace_all(Vec::new());
    }

    /// Appends a newly created race.
    pub fn insert(&mut self, race: Race) {
        Arc::make_mut(&mut self.races).push(race);
    }

    /// Replaces the race with the same id, or appends it if it is not loaded.
    pub fn upsert(&mut self, race: Race) {
        let races = Arc::make_mut(&mut self.races);
        match races.iter_mut().find(|r| r.id == race.id) {
            Some(existing) => *existing = race,
            None => races.push(race),
        }
    }
}
