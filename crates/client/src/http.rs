use domain::dto::common::{ErrorBody, RaceEnvelope, StudentEnvelope};
use domain::dto::race::{CreateRaceRequest, RaceResponse, UpdateResultsRequest};
use domain::dto::student::{CreateStudentRequest, StudentResponse};
use domain::{PlaceAssignment, Race, RaceId, Student};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::traits::RaceApi;

/// `reqwest` client for the `/api/v1` race and student endpoints.
pub struct HttpRaceApi {
    base_url: String,
    client: Client,
}

impl HttpRaceApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!("races/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Turns a non-2xx response into [`ClientError::Api`] when the body carries
/// recognizable error messages, [`ClientError::Http`] otherwise.
async fn error_from_response(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => {
            let message = parsed.flatten();
            if message.is_empty() {
                ClientError::Http { status }
            } else {
                tracing::debug!("API error {}: {}", status, message);
                ClientError::Api { status, message }
            }
        }
        Err(_) => {
            tracing::debug!("API error {} with unstructured body ({} bytes)", status, body.len());
            ClientError::Http { status }
        }
    }
}

#[async_trait::async_trait]
impl RaceApi for HttpRaceApi {
    async fn list_races(&self) -> Result<Vec<Race>> {
        let races: Vec<RaceResponse> = self.send(self.client.get(self.url("/races"))).await?;
        Ok(races.into_iter().map(Race::from).collect())
    }

    async fn get_race(&self, id: RaceId) -> Result<Race> {
        let race: RaceResponse = self
            .send(self.client.get(self.url(&format!("/races/{}", id))))
            .await?;
        Ok(race.into())
    }

    async fn create_race(&self, request: &CreateRaceRequest) -> Result<Race> {
        let race: RaceResponse = self
            .send(
                self.client
                    .post(self.url("/races"))
                    .json(&RaceEnvelope { race: request }),
            )
            .await?;
        Ok(race.into())
    }

    async fn update_results(&self, id: RaceId, places: &[PlaceAssignment]) -> Result<Race> {
        let body = RaceEnvelope {
            race: UpdateResultsRequest::from_assignments(places),
        };
        let race: RaceResponse = self
            .send(
                self.client
                    .put(self.url(&format!("/races/{}", id)))
                    .json(&body),
            )
            .await?;
        Ok(race.into())
    }

    async fn complete_race(&self, id: RaceId) -> Result<Race> {
        let race: RaceResponse = self
            .send(
                self.client
                    .patch(self.url(&format!("/races/{}/complete", id)))
                    .json(&serde_json::json!({})),
            )
            .await?;
        Ok(race.into())
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let students: Vec<StudentResponse> =
            self.send(self.client.get(self.url("/students"))).await?;
        Ok(students.into_iter().map(Student::from).collect())
    }

    async fn create_student(&self, request: &CreateStudentRequest) -> Result<Student> {
        let student: StudentResponse = self
            .send(
                self.client
                    .post(self.url("/students"))
                    .json(&StudentEnvelope { student: request }),
            )
            .await?;
        Ok(student.into())
    }
}
