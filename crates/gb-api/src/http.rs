//! reqwest-backed [`GraphqlExecutor`].

use std::future::Future;

use gb_core::{ApiConfig, ConfigError};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderValue, RETRY_AFTER};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::executor::GraphqlExecutor;
use crate::request::{GraphqlRequest, GraphqlResponse};

/// Longest error body kept in [`ApiError::Http`].
const MAX_ERROR_BODY: usize = 512;

/// POSTs GraphQL documents to GitHub with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpExecutor {
    /// Builds an executor from the API configuration.
    ///
    /// Fails with [`ConfigError::MissingToken`] when no token is configured.
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let token = config.require_token()?.to_owned();
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|err| ConfigError::invalid_option("api", err.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            token,
        })
    }

    /// Returns the endpoint requests are sent to.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, request: GraphqlRequest) -> Result<GraphqlResponse, ApiError> {
        let operation = request.operation_name();
        debug!(operation, endpoint = %self.endpoint, "sending GraphQL request");

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            // GitHub reports secondary rate limits as 403 with a Retry-After header.
            if let Some(retry_after_secs) = retry_after(&resp) {
                warn!(operation, retry_after_secs, "secondary rate limit hit");
                return Err(ApiError::RateLimited {
                    retry_after_secs: Some(retry_after_secs),
                });
            }
            warn!(operation, status = status.as_u16(), "token rejected");
            return Err(ApiError::Unauthorized);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = retry_after(&resp);
            warn!(operation, ?retry_after_secs, "rate limited");
            return Err(ApiError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            truncate_at_char_boundary(&mut body, MAX_ERROR_BODY);
            warn!(operation, status = status.as_u16(), "GraphQL endpoint returned an error status");
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let response: GraphqlResponse = serde_json::from_slice(&bytes)?;
        if !response.errors.is_empty() {
            debug!(operation, errors = response.errors.len(), "GraphQL response carried errors");
        }
        Ok(response)
    }
}

impl GraphqlExecutor for HttpExecutor {
    fn execute(
        &self,
        request: GraphqlRequest,
    ) -> impl Future<Output = Result<GraphqlResponse, ApiError>> + Send {
        self.send(request)
    }
}

fn retry_after(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

fn truncate_at_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_token() {
        let config = ApiConfig::default();
        assert!(matches!(
            HttpExecutor::new(&config),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn test_new_keeps_endpoint() {
        let config = ApiConfig {
            endpoint: "http://localhost:9999/graphql".to_owned(),
            token: Some("ghp_test".to_owned()),
            ..ApiConfig::default()
        };
        let executor = HttpExecutor::new(&config).unwrap();
        assert_eq!(executor.endpoint(), "http://localhost:9999/graphql");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let mut s = "héllo".to_owned();
        truncate_at_char_boundary(&mut s, 2);
        assert_eq!(s, "h");
        let mut short = "ok".to_owned();
        truncate_at_char_boundary(&mut short, 10);
        assert_eq!(short, "ok");
    }
}
