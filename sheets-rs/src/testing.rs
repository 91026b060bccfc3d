//! Local stand-in for the Google token, Drive and Sheets endpoints.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    Json, Router,
};
use serde_json::{json, Value};

use crate::types::Config;

/// Throwaway RSA key, only ever used against the stub.
pub const TEST_PRIVATE_KEY: &str = include_str!("../tests/fixtures/service_account.pem");

pub const STUB_TOKEN: &str = "stub-access-token";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: String,
}

/// Canned answers; each field is (status, body).
#[derive(Debug, Clone)]
pub struct StubResponses {
    pub token: (StatusCode, Value),
    pub files: (StatusCode, Value),
    pub spreadsheet: (StatusCode, Value),
    pub append: (StatusCode, Value),
}

impl Default for StubResponses {
    fn default() -> Self {
        Self {
            token: (
                StatusCode::OK,
                json!({"access_token": STUB_TOKEN, "expires_in": 3599, "token_type": "Bearer"}),
            ),
            files: (
                StatusCode::OK,
                json!({"files": [{"id": "sheet-123", "name": "IP Check Log"}]}),
            ),
            spreadsheet: (
                StatusCode::OK,
                json!({"sheets": [{"properties": {"title": "Sheet1", "index": 0}}]}),
            ),
            append: (
                StatusCode::OK,
                json!({"updates": {"updatedRange": "'Sheet1'!A2:I2", "updatedRows": 1}}),
            ),
        }
    }
}

struct StubState {
    responses: StubResponses,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct StubGoogle {
    pub addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubGoogle {
    pub async fn start(responses: StubResponses) -> std::io::Result<Self> {
        let state = Arc::new(StubState {
            responses,
            requests: Mutex::new(Vec::new()),
        });
        let router = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move { axum::serve(listener, router).await });

        Ok(Self { addr, state })
    }

    /// Client config routing both API hosts to the stub.
    pub fn config(&self) -> Config {
        Config {
            protocol: "http".to_string(),
            sheets_host: self.addr.to_string(),
            drive_host: self.addr.to_string(),
            timeout: Some(std::time::Duration::from_secs(5)),
        }
    }

    pub fn token_uri(&self) -> String {
        format!("http://{}/token", self.addr)
    }

    /// Service-account JSON whose token endpoint is the stub.
    pub fn service_account_json(&self) -> String {
        json!({
            "type": "service_account",
            "project_id": "stub-project",
            "private_key_id": "stub-key-id",
            "private_key": TEST_PRIVATE_KEY,
            "client_email": "ip-checker@stub-project.iam.gserviceaccount.com",
            "token_uri": self.token_uri(),
        })
        .to_string()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn requests_to(&self, path_prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(path_prefix))
            .collect()
    }

    pub fn append_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.ends_with(":append"))
            .collect()
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> (StatusCode, Json<Value>) {
    let path = uri.path().to_string();
    let recorded = RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query,
        authorization: headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .map(str::to_owned),
        body,
    };
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(recorded);
    }

    let responses = &state.responses;
    let (status, body) = if method == Method::POST && path == "/token" {
        responses.token.clone()
    } else if method == Method::GET && path == "/drive/v3/files" {
        responses.files.clone()
    } else if method == Method::POST && path.ends_with(":append") {
        responses.append.clone()
    } else if method == Method::GET && path.starts_with("/v4/spreadsheets/") {
        responses.spreadsheet.clone()
    } else {
        (StatusCode::NOT_FOUND, json!({"error": {"message": "unknown route"}}))
    };
    (status, Json(body))
}
