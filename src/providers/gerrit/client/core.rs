use log::debug;
use reqwest::header::WWW_AUTHENTICATE;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

use crate::auth::Credentials;
use crate::error::{GerritLabelError, Result};
use crate::providers::gerrit::decode::decode_body;

pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 32;

/// Thin REST client for one Gerrit `changes` endpoint.
pub struct GerritClient {
    client: Client,
    endpoint: String,
    credentials: Option<Credentials>,
    semaphore: Arc<Semaphore>,
}

impl GerritClient {
    pub fn new(endpoint: &str, credentials: Option<Credentials>) -> Result<Self> {
        Self::with_concurrency(endpoint, credentials, DEFAULT_MAX_CONCURRENT_REQUESTS)
    }

    pub fn with_concurrency(
        endpoint: &str,
        credentials: Option<Credentials>,
        max_concurrent_requests: usize,
    ) -> Result<Self> {
        if max_concurrent_requests == 0 {
            return Err(GerritLabelError::Config(
                "max concurrent requests must be at least 1".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent(concat!("gerrit-label/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GerritLabelError::Config(format!("Failed to create HTTP client: {e}")))?;

        Url::parse(endpoint)
            .map_err(|e| GerritLabelError::Config(format!("Invalid endpoint URL: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            credentials,
            semaphore: Arc::new(Semaphore::new(max_concurrent_requests)),
        })
    }

    /// Endpoint exactly as configured
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Endpoint without its trailing slash, followed by `suffix`.
    pub(super) fn url(&self, suffix: &str) -> Result<Url> {
        parse_url(&format!("{}{suffix}", self.endpoint.trim_end_matches('/')))
    }

    /// Issue a GET and decode the anti-XSSI wrapped JSON body.
    ///
    /// Credentials are never sent up front. They are only attached when the
    /// server answers 401 with a `Basic` challenge, and then exactly once.
    pub(super) async fn get_decoded<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| GerritLabelError::Config(format!("Request limiter closed: {e}")))?;

        debug!("GET {url}");
        let mut response = self.client.get(url.clone()).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(credentials) = &self.credentials {
                if has_basic_challenge(&response) {
                    debug!("Basic auth challenge for {url}, retrying with credentials");
                    response = self
                        .client
                        .get(url.clone())
                        .basic_auth(credentials.user(), Some(credentials.password()))
                        .send()
                        .await?;
                }
            }
        }

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(GerritLabelError::Api {
                status: status.as_u16(),
                message: error_text.trim().to_string(),
            });
        }

        let body = response.bytes().await?;
        decode_body(url.as_str(), &body)
    }
}

pub(super) fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| GerritLabelError::Config(format!("Invalid request URL: {e}")))
}

fn has_basic_challenge(response: &Response) -> bool {
    response
        .headers()
        .get_all(WWW_AUTHENTICATE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split_whitespace().next())
        .any(|scheme| scheme.eq_ignore_ascii_case("basic"))
}
