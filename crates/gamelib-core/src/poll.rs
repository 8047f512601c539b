//! Poll creation for "what should we play".

use crate::config::PollConfig;
use crate::error::{GameLibError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CREATE_POLL_PATH: &str = "/api/v2/polls";

/// Remote error code for "too many options".
const ERROR_TOO_MANY_OPTIONS: i64 = 40;

pub type PollId = u64;

pub trait PollService {
    fn create_poll(&self, title: &str, options: &[String]) -> Result<PollId>;

    /// Public link for a created poll.
    fn poll_url(&self, id: PollId) -> String;
}

// ---------------------------------------------------------------------------
// Strawpoll
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CreatePollRequest<'a> {
    title: &'a str,
    options: &'a [String],
    multi: bool,
    dupcheck: &'a str,
    captcha: bool,
}

#[derive(Debug, Deserialize)]
struct CreatePollResponse {
    #[serde(default)]
    id: Option<PollId>,
    #[serde(default, rename = "errorCode")]
    error_code: Option<i64>,
    #[serde(default, rename = "errorMessage")]
    error_message: Option<String>,
}

pub struct StrawpollClient {
    http: Client,
    config: PollConfig,
}

impl StrawpollClient {
    pub fn new(config: &PollConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GameLibError::AdapterError(e.to_string()))?;
        let mut config = config.clone();
        config.api_base = config.api_base.trim_end_matches('/').to_string();
        Ok(Self { http, config })
    }
}

impl PollService for StrawpollClient {
    fn create_poll(&self, title: &str, options: &[String]) -> Result<PollId> {
        let max = self.config.max_options;
        if options.len() > max {
            return Err(GameLibError::TooManyOptions {
                count: options.len(),
                max,
            });
        }
        if options.len() < 2 {
            return Err(GameLibError::AdapterError(format!(
                "a poll needs at least two options, got {}",
                options.len()
            )));
        }

        let body = CreatePollRequest {
            title,
            options,
            multi: self.config.multi,
            dupcheck: &self.config.dupcheck,
            captcha: self.config.captcha,
        };
        let url = format!("{}{}", self.config.api_base, CREATE_POLL_PATH);
        tracing::info!(options = options.len(), "creating poll");

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| GameLibError::AdapterError(format!("poll request failed: {e}")))?;
        let status = resp.status();
        let parsed: CreatePollResponse = resp.json().map_err(|e| {
            GameLibError::AdapterError(format!("unexpected poll response ({status}): {e}"))
        })?;

        match (parsed.id, parsed.error_code) {
            (_, Some(ERROR_TOO_MANY_OPTIONS)) => Err(GameLibError::TooManyOptions {
                count: options.len(),
                max,
            }),
            (_, Some(code)) => {
                let message = parsed.error_message.unwrap_or_default();
                tracing::warn!(code, %message, "poll service returned an error");
                Err(GameLibError::AdapterError(format!("error code {code}: {message}")))
            }
            (Some(id), None) => Ok(id),
            (None, None) => Err(GameLibError::AdapterError(format!(
                "poll service returned no id ({status})"
            ))),
        }
    }

    fn poll_url(&self, id: PollId) -> String {
        format!("{}/{}", self.config.api_base, id)
    }
}
