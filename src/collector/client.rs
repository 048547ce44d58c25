//! HTTP client for the Chef Data Collector endpoint

use serde::Serialize;
use std::time::Duration;
use ureq::Agent;
use ureq::http::Uri;
use ureq::tls::TlsConfig;

use super::error::{DataCollectorError, Result};

pub const AUTH_HEADER: &str = "x-data-collector-auth";
pub const AUTH_VERSION: &str = "version=1.0";
pub const TOKEN_HEADER: &str = "x-data-collector-token";

/// Connection settings for one Data Collector endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataCollectorConfig {
    pub token: String,
    pub url: String,
    pub skip_tls_verify: bool,
    /// Overall request timeout; zero disables it
    pub timeout: Duration,
}

/// A single-purpose client bound to one URL and token
pub struct DataCollectorClient {
    agent: Agent,
    token: String,
    url: Uri,
}

impl DataCollectorClient {
    /// Build a client, refusing URLs that are not absolute http(s) URLs
    pub fn new(config: &DataCollectorConfig) -> Result<Self> {
        let url = parse_url(&config.url)?;

        let timeout = (!config.timeout.is_zero()).then_some(config.timeout);
        let agent: Agent = Agent::config_builder()
            .tls_config(TlsConfig::builder().disable_verification(config.skip_tls_verify).build())
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build()
            .into();

        if config.skip_tls_verify {
            log::debug!("TLS verification disabled for {}", url);
        }

        Ok(Self {
            agent,
            token: config.token.clone(),
            url,
        })
    }

    pub fn url(&self) -> &Uri {
        &self.url
    }

    /// POST a message to the data collector.
    ///
    /// Exactly one request is made. Any non-2xx response is an error.
    pub fn update<T: Serialize + ?Sized>(&self, body: &T) -> Result<()> {
        let encoded = serde_json::to_vec(body)?;

        log::debug!("POST {} ({} bytes)", self.url, encoded.len());

        let mut response = self
            .agent
            .post(self.url.to_string())
            .header("Content-Type", "application/json")
            .header(AUTH_HEADER, AUTH_VERSION)
            .header(TOKEN_HEADER, &self.token)
            .send(&encoded[..])?;

        let status = response.status();
        if status.is_success() {
            log::debug!("Data collector accepted message: {}", status);
            return Ok(());
        }

        let body = response
            .body_mut()
            .read_to_vec()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();

        Err(DataCollectorError::rejected(status.as_u16(), &body))
    }
}

fn parse_url(raw: &str) -> Result<Uri> {
    let invalid = |reason: &str| DataCollectorError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url: Uri = raw.trim().parse().map_err(|e: ureq::http::uri::InvalidUri| invalid(&e.to_string()))?;

    match url.scheme_str() {
        Some("http") | Some("https") => {}
        Some(other) => return Err(invalid(&format!("unsupported scheme '{}'", other))),
        None => return Err(invalid("missing scheme")),
    }

    if url.host().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> DataCollectorConfig {
        DataCollectorConfig {
            token: "secret".to_string(),
            url: url.to_string(),
            skip_tls_verify: true,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_new_accepts_https_url() {
        let client = DataCollectorClient::new(&config("https://automate.example.com/data-collector/v0/")).unwrap();
        assert_eq!(client.url().host(), Some("automate.example.com"));
        assert_eq!(client.url().path(), "/data-collector/v0/");
    }

    // No TLS endpoint runs in tests; the handshake itself is not exercised
    #[test]
    fn test_skip_tls_verify_reaches_agent() {
        let mut cfg = config("https://automate.example.com/data-collector/v0/");

        let client = DataCollectorClient::new(&cfg).unwrap();
        assert!(client.agent.config().tls_config().disable_verification());

        cfg.skip_tls_verify = false;
        let client = DataCollectorClient::new(&cfg).unwrap();
        assert!(!client.agent.config().tls_config().disable_verification());
    }

    #[test]
    fn test_status_codes_are_not_agent_errors() {
        let client = DataCollectorClient::new(&config("http://localhost/")).unwrap();
        assert!(!client.agent.config().http_status_as_error());
    }

    #[test]
    fn test_new_accepts_zero_timeout() {
        let mut cfg = config("http://localhost:8080/data-collector/v0/");
        cfg.timeout = Duration::ZERO;
        assert!(DataCollectorClient::new(&cfg).is_ok());
    }

    #[test]
    fn test_new_rejects_missing_scheme() {
        let err = DataCollectorClient::new(&config("automate.example.com/data-collector")).err().unwrap();
        assert!(matches!(err, DataCollectorError::InvalidUrl { .. }));
    }

    #[test]
    fn test_new_rejects_unsupported_scheme() {
        let err = DataCollectorClient::new(&config("ftp://automate.example.com/")).err().unwrap();
        match err {
            DataCollectorError::InvalidUrl { reason, .. } => assert!(reason.contains("ftp")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_garbage() {
        assert!(DataCollectorClient::new(&config("http://exa mple.com")).is_err());
        assert!(DataCollectorClient::new(&config("")).is_err());
    }
}
