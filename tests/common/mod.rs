//! In-process mock ledger shared by the integration tests.
//!
//! One axum server answers both node and indexer routes. Submitted bodies
//! are kept so tests can inspect what was sent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use algorand_workflows::config::NetworkConfig;
use algorand_workflows::encoding::base64_encode;
use algorand_workflows::workflows::WorkflowRunner;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const GENESIS_ID: &str = "testnet-v1.0";
pub const START_ROUND: u64 = 1000;

/// Programmable behaviour of the mock ledger.
#[derive(Debug, Clone)]
pub struct MockBehavior {
    /// Pending polls answered "not yet" before reporting confirmation.
    pub pending_polls_before_confirm: u64,
    pub never_confirm: bool,
    /// Rejection reported in the pending record.
    pub pool_error: Option<String>,
    /// Rejection returned directly by the submit endpoint.
    pub submit_error: Option<String>,
    pub asset_index: Option<u64>,
    pub application_index: Option<u64>,
    /// Raw log entries attached to the confirmation.
    pub logs: Vec<Vec<u8>>,
    pub accounts: HashMap<String, Value>,
    pub applications: HashMap<u64, Value>,
    pub assets: HashMap<u64, Value>,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            pending_polls_before_confirm: 0,
            never_confirm: false,
            pool_error: None,
            submit_error: None,
            asset_index: None,
            application_index: None,
            logs: Vec::new(),
            accounts: HashMap::new(),
            applications: HashMap::new(),
            assets: HashMap::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MockRecord {
    pub round: u64,
    pub submissions: Vec<Vec<u8>>,
    pub pending_polls: u64,
    pub block_waits: u64,
    pub compiled: Vec<String>,
}

#[derive(Clone)]
struct MockState {
    behavior: Arc<MockBehavior>,
    record: Arc<Mutex<MockRecord>>,
}

/// A running mock ledger.
pub struct MockLedger {
    pub addr: SocketAddr,
    record: Arc<Mutex<MockRecord>>,
}

impl MockLedger {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn network_config(&self) -> NetworkConfig {
        NetworkConfig {
            algod_url: self.url(),
            indexer_url: self.url(),
            request_timeout_secs: 5,
            ..NetworkConfig::default()
        }
    }

    pub fn runner(&self) -> WorkflowRunner {
        WorkflowRunner::new(&self.network_config()).unwrap()
    }

    pub fn submissions(&self) -> Vec<Vec<u8>> {
        self.record.lock().unwrap().submissions.clone()
    }

    pub fn pending_polls(&self) -> u64 {
        self.record.lock().unwrap().pending_polls
    }

    pub fn block_waits(&self) -> u64 {
        self.record.lock().unwrap().block_waits
    }

    pub fn compiled(&self) -> Vec<String> {
        self.record.lock().unwrap().compiled.clone()
    }
}

/// Start a mock ledger on an ephemeral port.
pub async fn start_mock_ledger(behavior: MockBehavior) -> MockLedger {
    let record = Arc::new(Mutex::new(MockRecord {
        round: START_ROUND,
        ..MockRecord::default()
    }));
    let state = MockState {
        behavior: Arc::new(behavior),
        record: record.clone(),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/v2/status", get(status))
        .route("/v2/status/wait-for-block-after/{round}", get(wait_for_block))
        .route("/v2/transactions/params", get(params))
        .route("/v2/transactions", post(submit).get(search_transactions))
        .route("/v2/transactions/pending/{tx_id}", get(pending))
        .route("/v2/teal/compile", post(compile))
        .route("/v2/accounts/{address}", get(account))
        .route("/v2/accounts/{address}/transactions", get(account_transactions))
        .route("/v2/applications/{app_id}", get(application))
        .route("/v2/assets/{asset_id}", get(asset))
        .route("/v2/assets/{asset_id}/balances", get(asset_balances))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockLedger { addr, record }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn health(State(state): State<MockState>) -> Json<Value> {
    let round = state.record.lock().unwrap().round;
    Json(json!({ "round": round, "db-available": true, "is-migrating": false }))
}

async fn status(State(state): State<MockState>) -> Json<Value> {
    let round = state.record.lock().unwrap().round;
    Json(json!({ "last-round": round, "time-since-last-round": 1_000_000 }))
}

/// Every wait produces exactly one new block.
async fn wait_for_block(State(state): State<MockState>, Path(_round): Path<u64>) -> Json<Value> {
    let mut record = state.record.lock().unwrap();
    record.block_waits += 1;
    record.round += 1;
    Json(json!({ "last-round": record.round }))
}

async fn params(State(state): State<MockState>) -> Json<Value> {
    let round = state.record.lock().unwrap().round;
    Json(json!({
        "consensus-version": "future",
        "fee": 0,
        "genesis-hash": base64_encode(&[0x48; 32]),
        "genesis-id": GENESIS_ID,
        "last-round": round,
        "min-fee": 1000
    }))
}

async fn submit(State(state): State<MockState>, body: Bytes) -> Response {
    if let Some(message) = &state.behavior.submit_error {
        return error(StatusCode::BAD_REQUEST, message);
    }
    let mut record = state.record.lock().unwrap();
    record.submissions.push(body.to_vec());
    let tx_id = format!("MOCKTX{}", record.submissions.len());
    Json(json!({ "txId": tx_id })).into_response()
}

async fn pending(State(state): State<MockState>, Path(_tx_id): Path<String>) -> Response {
    let behavior = &state.behavior;
    let mut record = state.record.lock().unwrap();
    record.pending_polls += 1;

    if let Some(pool_error) = &behavior.pool_error {
        return Json(json!({ "pool-error": pool_error, "txn": {} })).into_response();
    }
    if behavior.never_confirm || record.pending_polls <= behavior.pending_polls_before_confirm {
        return Json(json!({ "pool-error": "", "txn": {} })).into_response();
    }

    let mut body = json!({
        "confirmed-round": record.round,
        "pool-error": "",
        "txn": {},
        "logs": behavior.logs.iter().map(|l| base64_encode(l)).collect::<Vec<_>>(),
    });
    if let Some(asset_index) = behavior.asset_index {
        body["asset-index"] = json!(asset_index);
    }
    if let Some(app_index) = behavior.application_index {
        body["application-index"] = json!(app_index);
    }
    Json(body).into_response()
}

async fn compile(State(state): State<MockState>, body: String) -> Response {
    if body.trim().is_empty() {
        return error(StatusCode::BAD_REQUEST, "empty program");
    }
    state.record.lock().unwrap().compiled.push(body.clone());
    let program = format!("compiled:{}", body.len()).into_bytes();
    let hash = algorand_workflows::wallet::Address::for_program(&program).to_string();
    Json(json!({ "hash": hash, "result": base64_encode(&program) })).into_response()
}

async fn account(State(state): State<MockState>, Path(address): Path<String>) -> Json<Value> {
    let info = state
        .behavior
        .accounts
        .get(&address)
        .cloned()
        .unwrap_or_else(|| json!({ "address": address, "amount": 0 }));
    Json(info)
}

async fn account_transactions(
    State(state): State<MockState>,
    Path(address): Path<String>,
) -> Json<Value> {
    let round = state.record.lock().unwrap().round;
    Json(json!({
        "current-round": round,
        "transactions": [
            { "id": "HISTTX1", "sender": address, "tx-type": "pay", "confirmed-round": round - 1, "fee": 1000 }
        ]
    }))
}

async fn search_transactions(State(state): State<MockState>) -> Json<Value> {
    let round = state.record.lock().unwrap().round;
    Json(json!({ "current-round": round, "transactions": [] }))
}

async fn application(State(state): State<MockState>, Path(app_id): Path<u64>) -> Response {
    match state.behavior.applications.get(&app_id) {
        Some(app) => Json(app.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "application does not exist"),
    }
}

async fn asset(State(state): State<MockState>, Path(asset_id): Path<u64>) -> Response {
    match state.behavior.assets.get(&asset_id) {
        Some(asset) => Json(asset.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "asset does not exist"),
    }
}

async fn asset_balances(State(state): State<MockState>, Path(_asset_id): Path<u64>) -> Json<Value> {
    let round = state.record.lock().unwrap().round;
    Json(json!({ "current-round": round, "balances": [] }))
}

/// Whether `needle` occurs anywhere in `haystack`.
pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Number of non-overlapping occurrences of `needle`.
pub fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}
