//! Access to the task REST API.
//!
//! [`TaskApi`] is the seam the board talks through; [`HttpTaskApi`] is the
//! real implementation on top of `reqwest`.

use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use taskboard_core::{CreateTaskInput, Task, TaskFilter, UpdateTaskInput};
use uuid::Uuid;

/// Errors returned by API calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server answered with an error status.
    #[error("{}", .messages.join("; "))]
    Server { status: u16, messages: Vec<String> },
    /// The request never got a response.
    #[error("Request failed: {0}")]
    Transport(String),
    /// The response body was not what was expected.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Messages to show to the user, as the server sent them when it did.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ApiError::Server { messages, .. } => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Vec<String>,
}

/// Builds a [`ApiError::Server`] from an error response body.
fn server_error(status: u16, body: &str) -> ApiError {
    let messages = serde_json::from_str::<ErrorResponse>(body)
        .map(|response| response.message)
        .ok()
        .filter(|messages| !messages.is_empty())
        .unwrap_or_else(|| vec![format!("Request failed with status {status}")]);
    ApiError::Server { status, messages }
}

/// Operations offered by the task API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Lists tasks matching `filter`, newest first.
    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, ApiError>;

    async fn get_task(&self, id: Uuid) -> Result<Task, ApiError>;

    async fn create_task(&self, input: CreateTaskInput) -> Result<Task, ApiError>;

    /// Sends a partial update; only the fields set on `patch` are transmitted.
    async fn update_task(&self, id: Uuid, patch: UpdateTaskInput) -> Result<Task, ApiError>;

    async fn delete_task(&self, id: Uuid) -> Result<(), ApiError>;
}

/// [`TaskApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: Uuid) -> String {
        format!("{}/tasks/{}", self.base_url, id)
    }
}

/// Turns an error status into [`ApiError::Server`].
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = server_error(status.as_u16(), &body);
    tracing::warn!("API call failed with status {}: {}", status, err);
    Err(err)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    Ok(response.json::<T>().await?)
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    #[tracing::instrument(skip(self))]
    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, ApiError> {
        let response = self
            .client
            .get(self.tasks_url())
            .query(&filter.to_query_pairs())
            .send()
            .await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_task(&self, id: Uuid) -> Result<Task, ApiError> {
        let response = self.client.get(self.task_url(id)).send().await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn create_task(&self, input: CreateTaskInput) -> Result<Task, ApiError> {
        let response = self
            .client
            .post(self.tasks_url())
            .json(&input)
            .send()
            .await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_task(&self, id: Uuid, patch: UpdateTaskInput) -> Result<Task, ApiError> {
        let response = self
            .client
            .patch(self.task_url(id))
            .json(&patch)
            .send()
            .await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_task(&self, id: Uuid) -> Result<(), ApiError> {
        let response = self.client.delete(self.task_url(id)).send().await?;
        check_status(response).await?;
        Ok(())
    }
}
