//! In-memory `RaceApi` for controller tests.
//!
//! Every call is recorded so tests can assert that local validation failures
//! never reach the API.

use std::collections::HashMap;
use std::sync::Mutex;

use domain::dto::race::CreateRaceRequest;
use domain::dto::student::CreateStudentRequest;
use domain::{ParticipantSlot, PlaceAssignment, Race, RaceId, SlotId, Status, Student, StudentId};

use crate::error::{ClientError, Result};
use crate::traits::RaceApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListRaces,
    GetRace(RaceId),
    CreateRace(CreateRaceRequest),
    UpdateResults(RaceId, Vec<PlaceAssignment>),
    CompleteRace(RaceId),
    ListStudents,
    CreateStudent(CreateStudentRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListRaces,
    GetRace,
    CreateRace,
    UpdateResults,
    CompleteRace,
    ListStudents,
    CreateStudent,
}

impl ApiCall {
    fn endpoint(&self) -> Endpoint {
        match self {
            ApiCall::ListRaces => Endpoint::ListRaces,
            ApiCall::GetRace(_) => Endpoint::GetRace,
            ApiCall::CreateRace(_) => Endpoint::CreateRace,
            ApiCall::UpdateResults(..) => Endpoint::UpdateResults,
            ApiCall::CompleteRace(_) => Endpoint::CompleteRace,
            ApiCall::ListStudents => Endpoint::ListStudents,
            ApiCall::CreateStudent(_) => Endpoint::CreateStudent,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Failure {
    /// 503 without a body.
    Unavailable,
    /// 422 with a flattened validation message.
    Rejected(String),
    /// Never answers.
    Hang,
}

#[derive(Default)]
struct FakeState {
    races: Vec<Race>,
    students: Vec<Student>,
    next_id: i64,
    calls: Vec<ApiCall>,
    failures: HashMap<Endpoint, Failure>,
}

pub struct FakeRaceApi {
    state: Mutex<FakeState>,
}

impl FakeRaceApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_id: 100,
                ..FakeState::default()
            }),
        }
    }

    pub fn with_students(self, names: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for (index, name) in names.iter().enumerate() {
                state.students.push(Student {
                    id: StudentId(index as i64 + 1),
                    name: name.to_string(),
                    age: 10,
                });
            }
        }
        self
    }

    pub fn with_race(self, race: Race) -> Self {
        self.state.lock().unwrap().races.push(race);
        self
    }

    pub fn fail(&self, endpoint: Endpoint, failure: Failure) {
        self.state.lock().unwrap().failures.insert(endpoint, failure);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.state.lock().unwrap().failures.remove(&endpoint);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn server_race(&self, id: RaceId) -> Option<Race> {
        self.state
            .lock()
            .unwrap()
            .races
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    async fn gate(&self, call: ApiCall) -> Result<()> {
        let failure = {
            let mut state = self.state.lock().unwrap();
            let failure = state.failures.get(&call.endpoint()).cloned();
            state.calls.push(call);
            failure
        };

        match failure {
            None => Ok(()),
            Some(Failure::Unavailable) => Err(ClientError::Http { status: 503 }),
            Some(Failure::Rejected(message)) => Err(ClientError::Api {
                status: 422,
                message,
            }),
            Some(Failure::Hang) => std::future::pending().await,
        }
    }

    fn with_race_mut<T>(&self, id: RaceId, f: impl FnOnce(&mut Race) -> T) -> Result<T> {
        let mut state = self.state.lock().unwrap();
        let race = state
            .races
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ClientError::Api {
                status: 404,
                message: "Race not found".to_string(),
            })?;
        Ok(f(race))
    }
}

/// A persisted race with one lane per name, slot ids starting at `id * 10`.
pub fn ready_race(id: i64, name: &str, runners: &[&str]) -> Race {
    Race {
        id: RaceId(id),
        name: name.to_string(),
        status: Status::Ready,
        participants: runners
            .iter()
            .enumerate()
            .map(|(index, runner)| ParticipantSlot {
                id: SlotId(id * 10 + index as i64),
                student_id: Some(StudentId(index as i64 + 1)),
                student_name: Some(runner.to_string()),
                lane: index as u32 + 1,
                place: None,
            })
            .collect(),
    }
}

#[async_trait::async_trait]
impl RaceApi for FakeRaceApi {
    async fn list_races(&self) -> Result<Vec<Race>> {
        self.gate(ApiCall::ListRaces).await?;
        // The index endpoint returns summaries without `race_students`.
        let summaries = self
            .state
            .lock()
            .unwrap()
            .races
            .iter()
            .map(|race| Race {
                participants: Vec::new(),
                ..race.clone()
            })
            .collect();
        Ok(summaries)
    }

    async fn get_race(&self, id: RaceId) -> Result<Race> {
        self.gate(ApiCall::GetRace(id)).await?;
        self.with_race_mut(id, |race| race.clone())
    }

    async fn create_race(&self, request: &CreateRaceRequest) -> Result<Race> {
        self.gate(ApiCall::CreateRace(request.clone())).await?;

        let mut state = self.state.lock().unwrap();
        let race_id = state.next_id;
        state.next_id += 1;

        let participants = request
            .race_students_attributes
            .iter()
            .enumerate()
            .map(|(index, attrs)| ParticipantSlot {
                id: SlotId(race_id * 10 + index as i64),
                student_id: Some(StudentId(attrs.student_id)),
                student_name: state
                    .students
                    .iter()
                    .find(|s| s.id.0 == attrs.student_id)
                    .map(|s| s.name.clone()),
                lane: attrs.lane,
                place: None,
            })
            .collect();

        let race = Race {
            id: RaceId(race_id),
            name: request.name.clone(),
            status: request.status,
            participants,
        };
        state.races.push(race.clone());
        Ok(race)
    }

    async fn update_results(&self, id: RaceId, places: &[PlaceAssignment]) -> Result<Race> {
        self.gate(ApiCall::UpdateResults(id, places.to_vec())).await?;
        self.with_race_mut(id, |race| {
            for assignment in places {
                if let Some(slot) = race
                    .participants
                    .iter_mut()
                    .find(|p| p.id == assignment.slot_id)
                {
                    slot.place = Some(assignment.place);
                }
            }
            race.clone()
        })
    }

    async fn complete_race(&self, id: RaceId) -> Result<Race> {
        self.gate(ApiCall::CompleteRace(id)).await?;
        self.with_race_mut(id, |race| {
            race.status = Status::Completed;
            race.clone()
        })
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        self.gate(ApiCall::ListStudents).await?;
        Ok(self.state.lock().unwrap().students.clone())
    }

    async fn create_student(&self, request: &CreateStudentRequest) -> Result<Student> {
        self.gate(ApiCall::CreateStudent(request.clone())).await?;

        let mut state = self.state.lock().unwrap();
        let student = Student {
            id: StudentId(state.next_id),
            name: request.name.clone(),
            age: request.age,
        };
        state.next_id += 1;
        state.students.push(student.clone());
        Ok(student)
    }
}
