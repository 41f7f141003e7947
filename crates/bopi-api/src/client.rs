// BoPi local API HTTP client
//
// Wraps `reqwest::Client` with argument validation, URL construction and
// classification of transport failures into the crate's error taxonomy.

use std::time::Duration;

use tracing::{debug, trace};
use url::Url;

use crate::error::{ConfigField, Error};
use crate::models::SensorsState;
use crate::transport::TransportConfig;

const SENSORS_PATH: &str = "api/sensors";
const BODY_PREVIEW_CHARS: usize = 200;

/// HTTP client for a single BoPi controller.
///
/// Arguments are validated at construction, so a client that exists always
/// has a well-formed base URL. Fetch methods never retry; callers decide
/// when to poll again.
#[derive(Debug, Clone)]
pub struct BopiClient {
    http: reqwest::Client,
    host: String,
    port: u16,
    timeout: Duration,
    base_url: Url,
}

impl BopiClient {
    /// Build a client for `http://{host}:{port}/`.
    ///
    /// Fails with [`Error::Config`] naming the offending field when the host
    /// is empty or not a bare hostname/IP, the port is outside `1..=65535`,
    /// or the timeout is zero.
    pub fn new(host: &str, port: u32, timeout_secs: u64) -> Result<Self, Error> {
        let host = validate_host(host)?;
        let port = validate_port(port)?;
        if timeout_secs == 0 {
            return Err(Error::Config {
                field: ConfigField::Timeout,
                reason: "timeout must be at least 1 second".into(),
            });
        }

        let base_url = base_url(&host, port)?;
        let timeout = Duration::from_secs(timeout_secs);
        let http = TransportConfig::new(timeout).build_client()?;

        debug!(%base_url, timeout_secs, "created BoPi client");
        Ok(Self {
            http,
            host,
            port,
            timeout,
            base_url,
        })
    }

    /// The controller host as configured (without scheme or port).
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the current sensor and relay state.
    pub async fn get_sensors_state(&self) -> Result<SensorsState, Error> {
        let url = self.endpoint(SENSORS_PATH)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(&url, &e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Connection {
                url: url.to_string(),
                reason: format!("HTTP {status}: {}", preview(&body)),
            });
        }

        let body = resp.text().await.map_err(|e| self.classify(&url, &e))?;
        trace!(bytes = body.len(), "sensors state received");

        serde_json::from_str(&body).map_err(|e| Error::Validation {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(|e| Error::Config {
            field: ConfigField::Host,
            reason: format!("cannot build request URL: {e}"),
        })
    }

    fn classify(&self, url: &Url, err: &reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Connection {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

fn validate_host(host: &str) -> Result<String, Error> {
    let host = host.trim();
    let reject = |reason: &str| Error::Config {
        field: ConfigField::Host,
        reason: reason.into(),
    };

    if host.is_empty() {
        return Err(reject("host must not be empty"));
    }
    if host.contains("://") || host.contains('/') {
        return Err(reject("expected a bare hostname or IP address, not a URL"));
    }
    if host.chars().any(char::is_whitespace) {
        return Err(reject("host must not contain whitespace"));
    }
    Ok(host.to_owned())
}

fn validate_port(port: u32) -> Result<u16, Error> {
    match u16::try_from(port) {
        Ok(p) if p != 0 => Ok(p),
        _ => Err(Error::Config {
            field: ConfigField::Port,
            reason: format!("port must be between 1 and 65535, got {port}"),
        }),
    }
}

fn base_url(host: &str, port: u16) -> Result<Url, Error> {
    // Bare IPv6 literals need brackets inside a URL authority.
    let authority = if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    };

    let url = Url::parse(&format!("http://{authority}/")).map_err(|e| Error::Config {
        field: ConfigField::Host,
        reason: format!("invalid host '{host}': {e}"),
    })?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::Config {
            field: ConfigField::Host,
            reason: format!("invalid host '{host}'"),
        });
    }
    Ok(url)
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builds_base_url_from_host_and_port() {
        let client = BopiClient::new("10.10.10.1", 80, 30).unwrap();
        assert_eq!(client.base_url().as_str(), "http://10.10.10.1/");
        assert_eq!(client.host(), "10.10.10.1");

        let client = BopiClient::new("bopi.local", 8080, 5).unwrap();
        assert_eq!(client.base_url().as_str(), "http://bopi.local:8080/");
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn wraps_ipv6_literals_in_brackets() {
        let client = BopiClient::new("fe80::1", 80, 30).unwrap();
        assert_eq!(client.base_url().host_str(), Some("[fe80::1]"));
    }

    #[test]
    fn rejects_empty_host() {
        let err = BopiClient::new("  ", 80, 30).unwrap_err();
        assert_eq!(err.config_field(), Some(ConfigField::Host));
    }

    #[test]
    fn rejects_url_as_host() {
        let err = BopiClient::new("http://10.0.0.2", 80, 30).unwrap_err();
        assert_eq!(err.config_field(), Some(ConfigField::Host));
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert_eq!(
            BopiClient::new("10.0.0.2", 0, 30).unwrap_err().config_field(),
            Some(ConfigField::Port)
        );
        assert_eq!(
            BopiClient::new("10.0.0.2", 70_000, 30)
                .unwrap_err()
                .config_field(),
            Some(ConfigField::Port)
        );
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = BopiClient::new("10.0.0.2", 80, 0).unwrap_err();
        assert_eq!(err.config_field(), Some(ConfigField::Timeout));
    }
}
