use std::time::Duration;

use url::Url;

use crate::{EngineError, TransportError, TransportFailureKind};

pub const VALIDATE_ENDPOINT: &str = "validate";
pub const PROMPT_ENDPOINT: &str = "prompt";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl ServiceSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            // The service runs a model over the whole document; give it time.
            request_timeout: Duration::from_secs(120),
            max_response_bytes: 5 * 1024 * 1024,
        }
    }

    pub fn endpoint(&self, endpoint: &str) -> Result<Url, TransportError> {
        endpoint_url(&self.base_url, endpoint)
            .map_err(|err| TransportError::new(TransportFailureKind::InvalidUrl, err.to_string()))
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, TransportError> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
            .map_err(|err| TransportError::new(TransportFailureKind::Network, err.to_string()))
    }
}

/// Parse a service base URL. Only absolute http(s) URLs are accepted.
pub fn parse_base_url(raw: &str) -> Result<Url, EngineError> {
    let invalid = |reason: String| EngineError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme {other}"))),
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a base url".to_string()));
    }
    Ok(url)
}

/// Join `endpoint` under `base`, keeping any path prefix the base carries.
pub fn endpoint_url(base: &Url, endpoint: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);
    base.join(endpoint)
}
