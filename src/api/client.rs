//! HTTP client for the comprehensive-pricing endpoints.
//!
//! # Responsibilities
//! - Build selector-scoped URLs (`/comprehensive-pricing/{category}/{service}/{sub}`)
//! - Attach the bearer credential and a request ID to every call
//! - Retry reads with backoff; send each write exactly once
//! - Map non-2xx responses to `ApiError` with the server's message

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;
use uuid::Uuid;

use crate::api::auth::CredentialProvider;
use crate::api::types::{extract_message, ApiError, ApiResult};
use crate::config::{ApiConfig, RetryConfig, TimeoutConfig};
use crate::observability::metrics;
use crate::pricing::cascade::Selector;
use crate::pricing::flow::{FlowEnvelope, FlowTree};
use crate::pricing::ConfigTree;
use crate::resilience::retries::retry_read;

const PRICING_ROOT: &str = "comprehensive-pricing";
const UPDATE_ALL: &str = "update-all";
const FLOW_PATH: &str = "vehicle-select-flow";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// The backend operations the editing session depends on.
#[async_trait]
pub trait PricingApi: Send + Sync {
    /// Fetch the static navigation tree.
    async fn fetch_flow(&self) -> ApiResult<FlowTree>;

    /// Fetch the configuration subtree addressed by `selector`.
    async fn fetch_config(&self, selector: &Selector) -> ApiResult<ConfigTree>;

    /// Send a partial update scoped by `selector`. Never retried.
    async fn update_all(&self, selector: &Selector, body: &Value) -> ApiResult<Value>;
}

/// `PricingApi` over HTTP with reqwest.
#[derive(Clone)]
pub struct HttpPricingApi {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
    retries: RetryConfig,
}

impl HttpPricingApi {
    pub fn new(
        api: &ApiConfig,
        timeouts: &TimeoutConfig,
        retries: RetryConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> ApiResult<Self> {
        let base_url = parse_base_url(&api.base_url)?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            credentials,
            retries,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.credentials.bearer_token() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("Bearer token contains invalid header characters"),
            }
        }
        if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
            headers.insert(REQUEST_ID_HEADER, value);
        }
        headers
    }

    async fn send(&self, endpoint: &'static str, request: RequestBuilder) -> ApiResult<Response> {
        let started = Instant::now();
        let response = request.headers(self.headers()).send().await;
        metrics::record_request_duration(endpoint, started.elapsed());
        self.check(response?).await
    }

    async fn check(&self, response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.credentials.on_unauthorized();
            return Err(ApiError::Unauthorized);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message: extract_message(&body),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str, url: Url) -> ApiResult<T> {
        retry_read(&self.retries, endpoint, || {
            let request = self.client.get(url.clone());
            async move {
                let response = self.send(endpoint, request).await?;
                let text = response.text().await?;
                serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
            }
        })
        .await
    }
}

#[async_trait]
impl PricingApi for HttpPricingApi {
    async fn fetch_flow(&self) -> ApiResult<FlowTree> {
        let url = endpoint_url(&self.base_url, &[FLOW_PATH])?;
        let envelope: FlowEnvelope = self.get_json("flow", url).await?;
        Ok(envelope.into())
    }

    async fn fetch_config(&self, selector: &Selector) -> ApiResult<ConfigTree> {
        let url = config_url(&self.base_url, selector)?;
        tracing::debug!(%url, "Fetching pricing configuration");
        let tree: ConfigTree = self.get_json("config", url).await?;
        Ok(unwrap_data(tree))
    }

    async fn update_all(&self, selector: &Selector, body: &Value) -> ApiResult<Value> {
        let url = update_url(&self.base_url, selector)?;
        tracing::debug!(%url, "Sending partial pricing update");
        let response = self.send("update_all", self.client.put(url).json(body)).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// The base URL must end in `/` so relative joins keep its path.
fn parse_base_url(raw: &str) -> ApiResult<Url> {
    let mut url = Url::parse(raw).map_err(|e| ApiError::Url(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::Url(format!("{raw}: cannot be a base")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Append percent-encoded path segments to `base`.
fn endpoint_url(base: &Url, segments: &[&str]) -> ApiResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::Url(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `/comprehensive-pricing/{category}/{service?}/{subService?}`.
///
/// Trailing unused segments are dropped rather than sent empty.
pub fn config_url(base: &Url, selector: &Selector) -> ApiResult<Url> {
    let mut segments = vec![
        PRICING_ROOT,
        selector.category.as_str(),
        selector.service.as_str(),
        selector.sub_service.as_str(),
    ];
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    endpoint_url(base, &segments)
}

/// `/comprehensive-pricing/update-all?category=..&service=..&subService=..`.
pub fn update_url(base: &Url, selector: &Selector) -> ApiResult<Url> {
    let mut url = endpoint_url(base, &[PRICING_ROOT, UPDATE_ALL])?;
    url.query_pairs_mut()
        .append_pair("category", &selector.category)
        .append_pair("service", &selector.service)
        .append_pair("subService", &selector.sub_service);
    Ok(url)
}

/// Some deployments wrap the subtree as `{ "data": {...} }`.
fn unwrap_data(tree: ConfigTree) -> ConfigTree {
    match tree {
        Value::Object(mut map) if map.len() == 1 && map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    }
}
