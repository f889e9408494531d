//! Remote data gateway: authenticated REST calls plus record normalization.
//!
//! Every request asks the injected [`SessionProvider`] for a bearer token at
//! send time, so a sign-in picked up by the session store applies to the next
//! call without rebuilding the client.

use crate::config::TuiConfig;
use async_trait::async_trait;
use casedesk_core::{
    Date, Hearing, OptionSource, OptionSourceError, Record, RecordError, RecordId, RecordKind,
    RecordStatus, SelectOption, Session, SessionProvider, Submission, LOCATION_LEVELS,
};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Invalid record payload: {0}")]
    Record(#[from] RecordError),
    #[error("Invalid user session, please sign in again")]
    MissingSession,
    #[error("Cannot read attachment {path}: {source}")]
    Attachment {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Error body shape used by the API (`{"message": "..."}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl RestClient {
    pub fn new(config: &TuiConfig, session: Arc<dyn SessionProvider>) -> Result<Self, GatewayError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Records of `kind` owned by the signed-in user.
    pub async fn list_records(&self, kind: RecordKind) -> Result<Vec<Record>, GatewayError> {
        let session = self.session()?;
        let url = self.url("/records");
        let response = self
            .client
            .get(url)
            .bearer_auth(&session.token)
            .query(&[("ownerId", session.user_id.as_str()), ("kind", kind.as_str())])
            .send()
            .await?;
        let body: Value = parse_response(response).await?;
        let records = Record::list_from_json(kind, &body)?;
        tracing::debug!(kind = %kind, count = records.len(), "records loaded");
        Ok(records)
    }

    pub async fn update_status(
        &self,
        id: &RecordId,
        status: &RecordStatus,
    ) -> Result<(), GatewayError> {
        let session = self.session()?;
        let url = self.url(&format!("/records/{}/status", id));
        let response = self
            .client
            .put(url)
            .bearer_auth(&session.token)
            .json(&json!({ "status": status.to_string() }))
            .send()
            .await?;
        expect_success(response).await
    }

    /// Create a record from a validated submission as multipart form data.
    pub async fn create_record(&self, submission: &Submission) -> Result<(), GatewayError> {
        let session = self.session()?;
        let mut form = Form::new().text("kind", submission.kind.as_str());
        for (name, value) in &submission.fields {
            form = form.text(name.clone(), value.clone());
        }
        for path in &submission.files {
            form = form.part(submission.file_part, file_part(path).await?);
        }

        let response = self
            .client
            .post(self.url("/records"))
            .bearer_auth(&session.token)
            .multipart(form)
            .send()
            .await?;
        expect_success(response).await?;
        tracing::info!(
            kind = %submission.kind,
            files = submission.files.len(),
            "record created"
        );
        Ok(())
    }

    pub async fn list_hearings(&self, case_id: &RecordId) -> Result<Vec<Hearing>, GatewayError> {
        let session = self.session()?;
        let url = self.url(&format!("/cases/{}/hearings", case_id));
        let response = self
            .client
            .get(url)
            .bearer_auth(&session.token)
            .send()
            .await?;
        parse_response(response).await
    }

    pub async fn add_hearing(&self, case_id: &RecordId, date: Date) -> Result<(), GatewayError> {
        let session = self.session()?;
        let url = self.url(&format!("/cases/{}/hearings", case_id));
        let response = self
            .client
            .post(url)
            .bearer_auth(&session.token)
            .json(&json!({ "hearingDate": date.format("%Y-%m-%d").to_string() }))
            .send()
            .await?;
        expect_success(response).await
    }

    /// Location options: roots when `parent` is `None`, else the children of `parent`.
    pub async fn list_locations(
        &self,
        parent: Option<&str>,
    ) -> Result<Vec<SelectOption>, GatewayError> {
        let session = self.session()?;
        let path = match parent {
            Some(parent) => format!("/locations/{}", parent),
            None => "/locations".to_string(),
        };
        let response = self
            .client
            .get(self.url(&path))
            .bearer_auth(&session.token)
            .send()
            .await?;
        parse_response(response).await
    }

    fn session(&self) -> Result<Session, GatewayError> {
        self.session
            .current_session()
            .ok_or(GatewayError::MissingSession)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl OptionSource for RestClient {
    async fn fetch_options(
        &self,
        level: &str,
        parent: Option<&str>,
    ) -> Result<Vec<SelectOption>, OptionSourceError> {
        if !LOCATION_LEVELS.contains(&level) {
            return Err(OptionSourceError::UnknownLevel {
                level: level.to_string(),
            });
        }
        self.list_locations(parent)
            .await
            .map_err(|err| OptionSourceError::Unavailable {
                level: level.to_string(),
                reason: err.to_string(),
            })
    }
}

async fn file_part(path: &Path) -> Result<Part, GatewayError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| GatewayError::Attachment {
            path: path.to_path_buf(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    Ok(Part::bytes(bytes).file_name(file_name))
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let status = response.status();
    if status.is_success() {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    } else {
        Err(error_from_body(status, &response.text().await?))
    }
}

async fn expect_success(response: reqwest::Response) -> Result<(), GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let text = response.text().await?;
    Err(error_from_body(status, &text))
}

fn error_from_body(status: reqwest::StatusCode, text: &str) -> GatewayError {
    if let Ok(body) = serde_json::from_str::<ErrorBody>(text) {
        return GatewayError::InvalidResponse(format!("HTTP {}: {}", status.as_u16(), body.message));
    }
    GatewayError::InvalidResponse(format!("HTTP {}: {}", status.as_u16(), text))
}
