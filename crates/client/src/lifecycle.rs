//! Race lifecycle controller.
//!
//! Owns the race collection and student list, runs every remote call through
//! the cancellation token, and applies a response to local state only after
//! the call succeeded. Failed calls leave the collection as it was (except for
//! the initial load, which falls back to an empty list) and record a message
//! for the view in [`RaceLifecycle::last_error`].

use std::future::Future;
use std::sync::Arc;

use domain::dto::student::CreateStudentRequest;
use domain::{PlaceRule, Race, RaceId, ResultsEditor, RosterBuilder, Status, Student, SubmitStage};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::{ClientError, Result};
use crate::store::RaceStore;
use crate::traits::RaceApi;

pub struct RaceLifecycle<A> {
    api: A,
    store: RaceStore,
    students: Vec<Student>,
    place_rule: PlaceRule,
    cancel: CancellationToken,
    last_error: Option<String>,
}

impl<A: RaceApi> RaceLifecycle<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            store: RaceStore::new(),
            students: Vec::new(),
            place_rule: PlaceRule::default(),
            cancel: CancellationToken::new(),
            last_error: None,
        }
    }

    pub fn with_place_rule(mut self, rule: PlaceRule) -> Self {
        self.place_rule = rule;
        self
    }

    /// Ties every remote call to `token`. Cancel it when the owning view goes
    /// away so late responses are dropped instead of applied.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &RaceStore {
        &self.store
    }

    pub fn races(&self) -> Arc<Vec<Race>> {
        self.store.list()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn place_rule(&self) -> PlaceRule {
        self.place_rule
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Loads the full race collection.
    ///
    /// On failure the collection is emptied, the error is recorded for
    /// display, and the call can simply be repeated.
    pub async fn list_races(&mut self) -> Result<Arc<Vec<Race>>> {
        info!("Loading races");
        let result = guarded(&self.cancel, self.api.list_races()).await;

        match result {
            Ok(races) => {
                info!("Loaded {} races", races.len());
                self.store.replace_all(races);
                self.last_error = None;
                Ok(self.store.list())
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                self.store.clear();
                Err(self.record("Failed to load races", e))
            }
        }
    }

    /// Creates a race from a roster draft and appends it to the collection.
    ///
    /// An invalid draft is rejected before any request is made.
    #[instrument(skip(self, roster), fields(name = roster.name()))]
    pub async fn create_race(&mut self, roster: &RosterBuilder) -> Result<Race> {
        let request = roster.to_request()?;

        info!(
            "Creating race '{}' with {} participants",
            request.name,
            request.race_students_attributes.len()
        );
        let result = guarded(&self.cancel, self.api.create_race(&request)).await;

        match result {
            Ok(race) => {
                info!("Created race {} ({})", race.id, race.status);
                self.store.insert(race.clone());
                self.last_error = None;
                Ok(race)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => Err(self.record("Failed to create race", e)),
        }
    }

    /// Re-fetches one race and reconciles the local copy with it.
    #[instrument(skip(self))]
    pub async fn refresh_race(&mut self, id: RaceId) -> Result<Race> {
        debug!("Refreshing race {}", id);
        let result = guarded(&self.cancel, self.api.get_race(id)).await;

        match result {
            Ok(race) => {
                self.store.upsert(race.clone());
                Ok(race)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => Err(self.record("Failed to load race details", e)),
        }
    }

    /// Opens the results form for a race.
    ///
    /// The race list only carries summaries, so the roster is fetched first
    /// unless the stored copy already has its participants.
    pub async fn open_results(&mut self, id: RaceId) -> Result<ResultsEditor> {
        let race = match self.store.get(id) {
            Some(race) if !race.participants.is_empty() => race.clone(),
            _ => {
                debug!("Roster of race {} not loaded, fetching details", id);
                self.refresh_race(id).await?
            }
        };
        Ok(ResultsEditor::open(race, self.place_rule)?)
    }

    /// Sends the entered places, then marks the race completed.
    ///
    /// The two calls are not atomic. When the first succeeds and the second
    /// fails, the collection holds the race with its places but without the
    /// `completed` status, the editor remembers that only completion is left,
    /// and a [`ClientError::Completion`] is returned. Calling this again with
    /// the same editor retries just the completion.
    #[instrument(skip(self, editor), fields(race_id = %editor.race().id))]
    pub async fn submit_results(&mut self, editor: &mut ResultsEditor) -> Result<Race> {
        let plan = editor.begin_submit()?;

        if plan.stage == SubmitStage::Update {
            info!("Saving {} places for race {}", plan.places.len(), plan.race_id);
            let result = guarded(
                &self.cancel,
                self.api.update_results(plan.race_id, &plan.places),
            )
            .await;

            match result {
                Ok(updated) => {
                    self.store.upsert(updated.clone());
                    editor.record_update(updated);
                }
                Err(ClientError::Cancelled) => {
                    editor.record_failure(ClientError::Cancelled.user_message());
                    return Err(ClientError::Cancelled);
                }
                Err(e) => {
                    let error = ClientError::ResultsUpdate {
                        source: Box::new(e),
                    };
                    editor.record_failure(error.user_message());
                    return Err(self.record("Saving results failed", error));
                }
            }
        } else {
            info!("Places for race {} already saved, retrying completion", plan.race_id);
        }

        let result = guarded(&self.cancel, self.api.complete_race(plan.race_id)).await;

        match result {
            Ok(completed) => {
                if let Err(e) = completed.check_invariants() {
                    warn!("Completed race {} is inconsistent: {}", completed.id, e);
                }
                info!("Race {} completed", completed.id);
                self.store.upsert(completed.clone());
                editor.record_success(completed.clone());
                self.last_error = None;
                Ok(completed)
            }
            Err(ClientError::Cancelled) => {
                editor.record_failure(ClientError::Cancelled.user_message());
                Err(ClientError::Cancelled)
            }
            Err(e) => {
                let error = ClientError::Completion {
                    race: Box::new(editor.race().clone()),
                    source: Box::new(e),
                };
                editor.record_failure(error.user_message());
                Err(self.record("Completing race failed", error))
            }
        }
    }

    /// Issues only the completion call, e.g. to finish a race whose places were
    /// saved by an earlier, partially failed submission.
    #[instrument(skip(self))]
    pub async fn complete_race(&mut self, id: RaceId) -> Result<Race> {
        if let Some(race) = self.store.get(id) {
            race.status.transition_to(Status::Completed)?;
        }

        let result = guarded(&self.cancel, self.api.complete_race(id)).await;

        match result {
            Ok(completed) => {
                info!("Race {} completed", completed.id);
                self.store.upsert(completed.clone());
                self.last_error = None;
                Ok(completed)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => Err(self.record("Completing race failed", e)),
        }
    }

    pub async fn list_students(&mut self) -> Result<&[Student]> {
        let result = guarded(&self.cancel, self.api.list_students()).await;

        match result {
            Ok(students) => {
                debug!("Loaded {} students", students.len());
                self.students = students;
                Ok(&self.students)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => Err(self.record("Failed to load students", e)),
        }
    }

    pub async fn create_student(&mut self, name: &str, age: i32) -> Result<Student> {
        let request = CreateStudentRequest::checked(name, age)?;

        info!("Creating student '{}'", request.name);
        let result = guarded(&self.cancel, self.api.create_student(&request)).await;

        match result {
            Ok(student) => {
                self.students.push(student.clone());
                self.last_error = None;
                Ok(student)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => Err(self.record("Failed to create student", e)),
        }
    }

    fn record(&mut self, context: &str, error: ClientError) -> ClientError {
        warn!("{}: {}", context, error);
        self.last_error = Some(format!("{}. {}", context, error.user_message()));
        error
    }
}

/// Runs `call` unless `cancel` fires first. A response that arrives after
/// cancellation is dropped.
async fn guarded<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    if cancel.is_cancelled() {
        debug!("Skipping request: already cancelled");
        return Err(ClientError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("Request cancelled before response");
            Err(ClientError::Cancelled)
        }
        result = call => result,
    }
}
