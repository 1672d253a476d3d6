//! Typed HTTP client for the task store.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use taskboard_core::{NewTask, Task, TaskId, TaskPatch};

pub const API_URL_VAR: &str = "TASKBOARD_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
const TASKS_PATH: &str = "/api/tasks";

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug)]
pub enum ClientError {
    /// Connection, TLS or protocol failure before a status was received.
    Transport(reqwest::Error),
    /// Non-2xx response; `message` is the server's `{message}` when present.
    Status { status: u16, message: String },
    /// 2xx response whose body did not match the expected shape.
    Decode(String),
    /// Action targets a task that is not in the local view.
    NotInView(TaskId),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "request failed: {err}"),
            Self::Status { status, message } => write!(f, "server returned {status}: {message}"),
            Self::Decode(message) => write!(f, "unexpected response body: {message}"),
            Self::NotInView(id) => write!(f, "task {id} is not on the board"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Operations the board needs from the store.
#[async_trait]
pub trait TaskBackend {
    async fn list_tasks(&self) -> ClientResult<Vec<Task>>;
    async fn get_task(&self, id: TaskId) -> ClientResult<Task>;
    async fn create_task(&self, input: &NewTask) -> ClientResult<Task>;
    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> ClientResult<Task>;
    async fn delete_task(&self, id: TaskId) -> ClientResult<()>;
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// reqwest-backed client for one task store.
#[derive(Debug, Clone)]
pub struct TaskApi {
    http: Client,
    base_url: String,
}

impl TaskApi {
    /// Creates a client for `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Uses `TASKBOARD_API_URL`, falling back to `http://localhost:3000`.
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /` liveness message.
    pub async fn health(&self) -> ClientResult<String> {
        let response = self.http.get(format!("{}/", self.base_url)).send().await?;
        let body: MessageBody = decode(response).await?;
        Ok(body.message)
    }

    fn tasks_url(&self) -> String {
        format!("{}{TASKS_PATH}", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}{TASKS_PATH}/{id}", self.base_url)
    }
}

#[async_trait]
impl TaskBackend for TaskApi {
    async fn list_tasks(&self) -> ClientResult<Vec<Task>> {
        let response = self.http.get(self.tasks_url()).send().await?;
        decode(response).await
    }

    async fn get_task(&self, id: TaskId) -> ClientResult<Task> {
        let response = self.http.get(self.task_url(id)).send().await?;
        decode(response).await
    }

    async fn create_task(&self, input: &NewTask) -> ClientResult<Task> {
        let response = self.http.post(self.tasks_url()).json(input).send().await?;
        decode(response).await
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> ClientResult<Task> {
        let response = self.http.put(self.task_url(id)).json(patch).send().await?;
        decode(response).await
    }

    async fn delete_task(&self, id: TaskId) -> ClientResult<()> {
        let response = self.http.delete(self.task_url(id)).send().await?;
        let body: MessageBody = decode(response).await?;
        debug!(
            "event=task_delete module=client status=ok task_id={} message={}",
            id, body.message
        );
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let fallback = status.canonical_reason().unwrap_or("unknown status").to_string();
        let message = response
            .json::<MessageBody>()
            .await
            .map(|body| body.message)
            .unwrap_or(fallback);
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::TaskApi;
    use uuid::Uuid;

    #[test]
    fn base_url_is_normalized_and_paths_are_joined() {
        let api = TaskApi::new(" http://localhost:3000/ ");
        assert_eq!(api.base_url(), "http://localhost:3000");
        assert_eq!(api.tasks_url(), "http://localhost:3000/api/tasks");

        let id = Uuid::new_v4();
        assert_eq!(
            api.task_url(id),
            format!("http://localhost:3000/api/tasks/{id}")
        );
    }
}
