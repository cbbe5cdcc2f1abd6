use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSummary {
    pub id: String,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagPage {
    pub flags: Vec<FlagSummary>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub total: i64,
}

/// Result of a submission the service answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 201: the flag was stored.
    Created,
    /// 400: no element looked like a hex color, or the body was malformed.
    Rejected,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),
}

pub struct FlagClient {
    client: Client,
    base_url: String,
}

impl FlagClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Total number of stored flags (`GET /`).
    pub async fn count(&self) -> Result<i64, ClientError> {
        let resp = self.client.get(format!("{}/", self.base_url)).send().await?;
        let text = Self::expect_success(resp).await?;
        parse_count(&text).ok_or(ClientError::UnexpectedBody(text))
    }

    /// One page of flags, newest first (`GET /flags`).
    pub async fn list(&self, offset: i64, limit: i64) -> Result<FlagPage, ClientError> {
        let resp = self
            .client
            .get(format!("{}/flags", self.base_url))
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await?;
        let text = Self::expect_success(resp).await?;
        serde_json::from_str(&text).map_err(|_| ClientError::UnexpectedBody(text))
    }

    /// Submit an ordered list of colors (`POST /flags`).
    pub async fn submit<S: AsRef<str>>(&self, colors: &[S]) -> Result<SubmitOutcome, ClientError> {
        let colors: Vec<&str> = colors.iter().map(AsRef::as_ref).collect();
        let resp = self
            .client
            .post(format!("{}/flags", self.base_url))
            .json(&colors)
            .send()
            .await?;

        match resp.status() {
            StatusCode::CREATED => Ok(SubmitOutcome::Created),
            StatusCode::BAD_REQUEST => Ok(SubmitOutcome::Rejected),
            status => Err(ClientError::Status {
                status,
                body: resp.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn expect_success(resp: reqwest::Response) -> Result<String, ClientError> {
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status { status, body: text });
        }
        Ok(text)
    }
}

/// Extract N from "There are N flags in the D1 database!".
fn parse_count(text: &str) -> Option<i64> {
    text.strip_prefix("There are ")?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}
