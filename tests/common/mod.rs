//! Shared utilities for integration testing: an in-process pricing backend.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use pricing_console::api::{CredentialProvider, HttpPricingApi, StaticToken};
use pricing_console::config::{ApiConfig, RetryConfig, TimeoutConfig};

pub const TOKEN: &str = "test-token";

/// One PUT as the backend received it.
#[derive(Debug, Clone)]
pub struct RecordedUpdate {
    pub query: HashMap<String, String>,
    pub body: Value,
    pub authorization: Option<String>,
}

/// Programmable backend behaviour and everything it has seen.
#[derive(Debug, Default)]
pub struct BackendState {
    pub flow: Value,
    /// Keyed like the read path: `carRecovery/winching/engine`, `carCab`.
    /// Vehicle-typed services are stored once under the service key.
    pub configs: HashMap<String, Value>,
    /// Services stored as `{ vehicleTypes: { <vehicle>: {..} }, .. }` and
    /// read per vehicle as a flat view.
    pub vehicle_services: HashSet<String>,
    pub updates: Vec<RecordedUpdate>,
    pub config_gets: Vec<String>,
    /// Answer this many config reads with 503 before behaving.
    pub transient_failures: u32,
    /// Fail every config read with this status.
    pub config_failure: Option<u16>,
    /// Fail every update with this status and message.
    pub update_failure: Option<(u16, String)>,
    pub required_token: Option<String>,
}

pub type Shared = Arc<Mutex<BackendState>>;

pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: Shared,
}

impl MockBackend {
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn config_gets(&self) -> Vec<String> {
        self.state.lock().unwrap().config_gets.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut BackendState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    /// A client with fast retries and the test token.
    pub fn client(&self) -> HttpPricingApi {
        self.client_with(Arc::new(StaticToken::new(TOKEN)))
    }

    pub fn client_with(&self, credentials: Arc<dyn CredentialProvider>) -> HttpPricingApi {
        let api = ApiConfig {
            base_url: self.base_url(),
            ..Default::default()
        };
        let retries = RetryConfig {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 5,
            max_delay_ms: 20,
        };
        HttpPricingApi::new(&api, &TimeoutConfig::default(), retries, credentials).unwrap()
    }
}

pub fn default_flow() -> Value {
    json!([
        { "key": "carCab", "label": "Car/Cab" },
        {
            "key": "bike",
            "label": "Bike",
            "subServices": [
                { "key": "economy", "label": "Economy" },
                { "key": "premium", "label": "Premium" }
            ]
        },
        {
            "key": "carRecovery",
            "label": "Car Recovery",
            "categories": [
                { "key": "winching", "label": "Winching", "subServices": ["engine", "battery"] },
                { "key": "roadsideAssistance", "label": "Roadside Assistance" }
            ]
        }
    ])
}

/// Start the backend on an ephemeral port with `default_flow()` and the
/// test token required.
pub async fn start_backend() -> MockBackend {
    let state = BackendState {
        flow: default_flow(),
        required_token: Some(TOKEN.to_string()),
        vehicle_services: HashSet::from(["bike".to_string()]),
        ..Default::default()
    };
    start_backend_with(state).await
}

pub async fn start_backend_with(state: BackendState) -> MockBackend {
    let state: Shared = Arc::new(Mutex::new(state));
    let app = Router::new()
        .route("/api/vehicle-select-flow", get(flow))
        .route("/api/comprehensive-pricing/{*rest}", get(read_config).put(update_all))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, state }
}

fn error(status: u16, message: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn reject(state: &BackendState, headers: &HeaderMap) -> Option<Response> {
    let required = state.required_token.as_ref()?;
    if authorization(headers) == Some(format!("Bearer {required}")) {
        None
    } else {
        Some(error(401, "Unauthorized"))
    }
}

async fn flow(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    if let Some(rejection) = reject(&state, &headers) {
        return rejection;
    }
    Json(json!({ "success": true, "data": state.flow })).into_response()
}

async fn read_config(State(state): State<Shared>, Path(rest): Path<String>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = reject(&state, &headers) {
        return rejection;
    }
    state.config_gets.push(rest.clone());
    if state.transient_failures > 0 {
        state.transient_failures -= 1;
        return error(503, "warming up");
    }
    if let Some(status) = state.config_failure {
        return error(status, "pricing store unavailable");
    }
    match state.view(&rest) {
        Some(config) => Json(json!({ "data": config })).into_response(),
        None => error(404, "No pricing configured"),
    }
}

impl BackendState {
    /// What a read of `rest` returns.
    ///
    /// `bike/economy` flattens `vehicleTypes.economy` over the shared
    /// top-level fields of the stored `bike` document.
    fn view(&self, rest: &str) -> Option<Value> {
        let (service, vehicle) = match rest.split_once('/') {
            Some((service, vehicle)) if self.vehicle_services.contains(service) => (service, vehicle),
            _ => return self.configs.get(rest).cloned(),
        };
        let document = self.configs.get(service)?.as_object()?;
        let mut view: serde_json::Map<String, Value> = document
            .iter()
            .filter(|(key, _)| key.as_str() != "vehicleTypes")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if let Some(Value::Object(fields)) = document.get("vehicleTypes").and_then(|v| v.get(vehicle)) {
            view.extend(fields.clone());
        }
        Some(Value::Object(view))
    }

    /// Where an update for these routing parameters is stored.
    fn storage_key(&self, query: &HashMap<String, String>) -> String {
        let category = query.get("category").cloned().unwrap_or_default();
        if self.vehicle_services.contains(&category) {
            return category;
        }
        let key = ["category", "service", "subService"]
            .iter()
            .map(|name| query.get(*name).cloned().unwrap_or_default())
            .collect::<Vec<_>>();
        trim_key(&key)
    }
}

async fn update_all(
    State(state): State<Shared>,
    Path(rest): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(rejection) = reject(&state, &headers) {
        return rejection;
    }
    if rest != "update-all" {
        return error(405, "Method not allowed");
    }
    state.updates.push(RecordedUpdate {
        query: query.clone(),
        body: body.clone(),
        authorization: authorization(&headers),
    });
    if let Some((status, message)) = state.update_failure.clone() {
        return error(status, &message);
    }

    let key = state.storage_key(&query);
    let stored = state.configs.entry(key).or_insert_with(|| json!({}));
    merge(stored, &body);
    Json(json!({ "success": true, "message": "Pricing updated" })).into_response()
}

fn trim_key(segments: &[String]) -> String {
    let mut segments: Vec<&str> = segments.iter().map(String::as_str).collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    segments.join("/")
}

/// Deep-merge objects; anything else replaces.
fn merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                merge(target.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

/// Counts how often the backend rejected the token.
#[derive(Debug, Default)]
pub struct CountingToken {
    pub token: String,
    pub rejections: AtomicU32,
}

impl CountingToken {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            rejections: AtomicU32::new(0),
        }
    }

    pub fn rejections(&self) -> u32 {
        self.rejections.load(Ordering::SeqCst)
    }
}

impl CredentialProvider for CountingToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.token.clone())
    }

    fn on_unauthorized(&self) {
        self.rejections.fetch_add(1, Ordering::SeqCst);
    }
}
