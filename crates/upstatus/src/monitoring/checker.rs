use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;

use super::transport::TransportError;
use crate::config::EndpointConfig;

/// Outcome of one physical request that produced an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status_code: u16,
    /// `Location` header, kept for redirect reporting
    pub location: Option<String>,
}

impl ProbeResponse {
    pub fn new(status_code: u16) -> Self {
        Self { status_code, location: None }
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }
}

/// Performs a single attempt against an endpoint.
///
/// Timing, timeouts and retries are applied by the monitor around this call;
/// implementations only issue the request.
#[async_trait]
pub trait Checker: Send + Sync {
    async fn probe(&self, config: &EndpointConfig) -> Result<ProbeResponse, TransportError>;
}

/// HTTP/HTTPS checker
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    /// Build a client carrying the endpoint's timeout and redirect policy
    pub fn new(config: &EndpointConfig) -> Result<Self, reqwest::Error> {
        let redirect = if config.follow_redirects {
            Policy::limited(config.max_redirects)
        } else {
            Policy::none()
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .redirect(redirect)
            .user_agent(concat!("upstatus/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Checker for HttpChecker {
    async fn probe(&self, config: &EndpointConfig) -> Result<ProbeResponse, TransportError> {
        let mut request = self.client.request(config.method.into(), &config.url);

        for (key, value) in &config.headers {
            request = request.header(key, value);
        }

        if let Some(body) = config.request_body() {
            request = request.header(CONTENT_TYPE, &config.content_type).body(body.to_string());
        }

        let response = request.send().await?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(ProbeResponse { status_code: response.status().as_u16(), location })
    }
}
