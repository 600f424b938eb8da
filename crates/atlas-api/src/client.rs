//! HTTP client for the Atlas REST API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use atlas_core::date::format_day;
use atlas_core::{Habit, HabitLog, LearningSession, NewTodo, Todo};
use chrono::NaiveDate;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::{ApiError, Backend};

/// Atlas REST API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// A blank `access_token` is treated as absent. When present it is sent
    /// as a bearer token on every request.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL, or if
    /// the HTTP client fails to build.
    pub fn new(
        base_url: &str,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let invalid = |reason: String| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut base = Url::parse(base_url.trim()).map_err(|err| invalid(err.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", base.scheme())));
        }
        // Relative joins replace the last segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let access_token = access_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: base,
            access_token,
        })
    }

    /// The normalized base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: err.to_string(),
            })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET");
        let response = self
            .authorize(self.http.get(url))
            .query(query)
            .send()
            .await?;
        decode(response).await
    }

    async fn post_json<B: serde::Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let response = self
            .authorize(self.http.post(url))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

fn range_query(start: NaiveDate, end: NaiveDate) -> [(&'static str, String); 2] {
    [("start_date", format_day(start)), ("end_date", format_day(end))]
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(&body).unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("no body").to_string()
                } else {
                    body
                }
            }),
        });
    }

    serde_json::from_str(&body).map_err(|err| ApiError::InvalidResponse(err.to_string()))
}

/// Extracts FastAPI's `detail`, which is a string or a list of validation errors.
fn error_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorPayload {
        detail: serde_json::Value,
    }

    let payload: ErrorPayload = serde_json::from_str(body).ok()?;
    match payload.detail {
        serde_json::Value::String(message) => Some(message),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl Backend for Client {
    async fn list_habits(&self) -> Result<Vec<Habit>, ApiError> {
        self.get_json("habits/", &[]).await
    }

    async fn list_habit_logs(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HabitLog>, ApiError> {
        self.get_json("habits/logs/stats/range", &range_query(start, end))
            .await
    }

    async fn list_habit_logs_on(&self, day: NaiveDate) -> Result<Vec<HabitLog>, ApiError> {
        self.get_json(&format!("habits/logs/{}", format_day(day)), &[])
            .await
    }

    async fn list_todos(&self, day: NaiveDate) -> Result<Vec<Todo>, ApiError> {
        self.get_json(&format!("todos/{}", format_day(day)), &[])
            .await
    }

    async fn create_todo(&self, draft: &NewTodo) -> Result<Todo, ApiError> {
        self.post_json("todos/", draft).await
    }

    async fn list_learning_sessions(
        &self,
        day: NaiveDate,
    ) -> Result<Vec<LearningSession>, ApiError> {
        self.get_json(&format!("learning/{}", format_day(day)), &[])
            .await
    }

    async fn list_learning_sessions_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LearningSession>, ApiError> {
        self.get_json("learning/range", &range_query(start, end))
            .await
    }
}
