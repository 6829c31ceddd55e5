use domain::dto::race::CreateRaceRequest;
use domain::dto::student::CreateStudentRequest;
use domain::{PlaceAssignment, Race, RaceId, Student};

use crate::Result;

/// The race-management REST API.
///
/// [`HttpRaceApi`](crate::HttpRaceApi) talks to the real server; tests
/// substitute an in-memory fake.
#[async_trait::async_trait]
pub trait RaceApi: Send + Sync {
    async fn list_races(&self) -> Result<Vec<Race>>;

    async fn get_race(&self, id: RaceId) -> Result<Race>;

    async fn create_race(&self, request: &CreateRaceRequest) -> Result<Race>;

    async fn update_results(&self, id: RaceId, places: &[PlaceAssignment]) -> Result<Race>;

    async fn complete_race(&self, id: RaceId) -> Result<Race>;

    async fn list_students(&self) -> Result<Vec<Student>>;

    async fn create_student(&self, request: &CreateStudentRequest) -> Result<Student>;
}
