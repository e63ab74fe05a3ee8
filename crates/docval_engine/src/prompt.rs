//! Client for the service's prompt configuration endpoint.
//!
//! The endpoint is an optional admin capability. The server checks the
//! credentials; nothing here decides who is an admin.

use std::fmt;

use docval_core::failure_message;
use serde_json::Value;
use thiserror::Error;

use crate::settings::{ServiceSettings, PROMPT_ENDPOINT};
use crate::upload::{map_reqwest_error, read_limited, ProgressSink};
use crate::{decode::decode_body, EngineEvent, TransportError};

#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Network error: {0}")]
    Transport(#[from] TransportError),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("prompt response is not valid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),
    #[error("prompt must be a JSON object")]
    NotAnObject,
}

pub struct PromptClient {
    settings: ServiceSettings,
    credentials: AdminCredentials,
}

struct DiscardProgress;

impl ProgressSink for DiscardProgress {
    fn emit(&self, _event: EngineEvent) {}
}

impl PromptClient {
    pub fn new(settings: ServiceSettings, credentials: AdminCredentials) -> Self {
        Self {
            settings,
            credentials,
        }
    }

    /// Fetch the current prompt configuration.
    pub async fn fetch(&self) -> Result<Value, PromptError> {
        let url = self.settings.endpoint(PROMPT_ENDPOINT)?;
        let request = self.settings.build_client()?.get(url);
        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Replace the prompt configuration and return the server's confirmation.
    pub async fn replace(&self, prompt: &Value) -> Result<String, PromptError> {
        if !prompt.is_object() {
            return Err(PromptError::NotAnObject);
        }
        let url = self.settings.endpoint(PROMPT_ENDPOINT)?;
        let request = self.settings.build_client()?.put(url).json(prompt);
        let body = self.send(request).await?;

        let reply: Value = serde_json::from_str(&body)?;
        Ok(reply
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or("Prompt updated")
            .to_string())
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, PromptError> {
        let response = request
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let bytes = read_limited(response, self.settings.max_response_bytes, 0, &DiscardProgress)
            .await?;
        let body = decode_body(&bytes, content_type.as_deref());

        if !(200..300).contains(&status) {
            return Err(PromptError::Status {
                status,
                message: failure_message(
                    status,
                    &serde_json::from_str(&body).unwrap_or(Value::Null),
                ),
            });
        }
        Ok(body)
    }
}
