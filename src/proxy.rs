//! Upstream status reverse proxy.
//!
//! Forwards one GET to the deployment-status API with a bearer token and
//! passes the JSON body through unchanged. Runs as its own listener so the
//! browser client never sees the API key.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, instrument};

use crate::config::ProxyConfig;
use crate::error::AppError;
use crate::metrics;

/// JSON error body returned on upstream failure.
#[derive(Debug, Serialize)]
struct ProxyErrorBody {
    message: &'static str,
}

/// Shared state for the proxy routes.
#[derive(Debug, Clone)]
pub struct ProxyState {
    /// HTTP client for the upstream call.
    http: reqwest::Client,
    /// Upstream status endpoint.
    upstream_url: String,
    /// Bearer token for the upstream API.
    api_key: String,
}

impl ProxyState {
    /// Build proxy state from config.
    ///
    /// Fails when no upstream API key is configured; the proxy never serves
    /// without credentials.
    pub fn new(config: &ProxyConfig) -> Result<Self, AppError> {
        let api_key = config
            .upstream_api_key
            .clone()
            .ok_or_else(|| AppError::InvalidConfig("UPSTREAM_API_KEY is required".to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(AppError::Http)?;

        Ok(Self {
            http,
            upstream_url: config.upstream_status_url.clone(),
            api_key,
        })
    }

    /// Fetch the upstream status payload.
    #[instrument(skip(self))]
    pub async fn fetch_status(&self) -> Result<serde_json::Value, AppError> {
        let response = self
            .http
            .get(&self.upstream_url)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?;

        let body = response.json::<serde_json::Value>().await?;
        Ok(body)
    }
}

/// Forward the upstream status response, 500 on any failure.
pub async fn upstream_status(State(state): State<ProxyState>) -> Response {
    match state.fetch_status().await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            error!(error = %e, "Error fetching data from upstream status API");
            metrics::inc_proxy_upstream_failures();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ProxyErrorBody {
                    message: "Error fetching data",
                }),
            )
                .into_response()
        }
    }
}

/// Create the proxy router.
pub fn create_proxy_router(state: ProxyState) -> Router {
    Router::new().route("/", get(upstream_status)).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy_config(api_key: Option<&str>) -> ProxyConfig {
        ProxyConfig {
            upstream_status_url: "https://api.render.com/v1/services".to_string(),
            upstream_api_key: api_key.map(str::to_string),
            proxy_port: 3001,
        }
    }

    #[test]
    fn proxy_state_requires_api_key() {
        let result = ProxyState::new(&proxy_config(None));
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn proxy_state_builds_with_api_key() {
        let state = ProxyState::new(&proxy_config(Some("rnd_test_key"))).unwrap();
        assert_eq!(state.upstream_url, "https://api.render.com/v1/services");
    }
}
