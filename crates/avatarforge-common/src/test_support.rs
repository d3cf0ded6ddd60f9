//! Local mock of the avatar APIs for tests

use crate::config::AvatarConfig;
use crate::encoder::{EncodedImage, ImageEncoder, ImageSource};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use std::collections::HashMap;
use parking_lot::Mutex;
use std::sync::Arc;

pub const TEST_TOKEN: &str = "test-token";

/// One request seen by the mock server
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

struct MockState {
    routes: HashMap<(Method, String), (u16, String)>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// Canned responses keyed by method + path
#[derive(Default)]
pub struct MockRoutes {
    routes: HashMap<(Method, String), (u16, String)>,
}

impl MockRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(self, status: u16, body: &str) -> Self {
        self.route(Method::GET, "/bodies", status, body)
    }

    pub fn validation(self, status: u16, body: &str) -> Self {
        self.route(Method::POST, "/validate", status, body)
    }

    pub fn generation(self, status: u16, body: &str) -> Self {
        self.route(Method::POST, "/avatars", status, body)
    }

    fn route(mut self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.routes.insert((method, path.to_string()), (status, body.to_string()));
        self
    }

    /// Bind to an ephemeral port and serve until the runtime shuts down
    pub async fn serve(self) -> MockApi {
        let state = Arc::new(MockState {
            routes: self.routes,
            calls: Mutex::new(Vec::new()),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockApi {
            base: format!("http://{}", addr),
            state,
        }
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let path = uri.path().to_string();

    state.calls.lock().push(RecordedCall {
        method: method.clone(),
        path: path.clone(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });

    let (status, body) = state
        .routes
        .get(&(method, path))
        .cloned()
        .unwrap_or((404, r#"{"detail":"not found"}"#.to_string()));

    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

/// Handle to a running mock server
pub struct MockApi {
    pub base: String,
    state: Arc<MockState>,
}

impl MockApi {
    pub fn config(&self) -> AvatarConfig {
        AvatarConfig::new(
            format!("{}/avatars", self.base),
            format!("{}/bodies", self.base),
            format!("{}/validate", self.base),
            TEST_TOKEN,
        )
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.path == path).collect()
    }
}

/// Encode in-memory bytes the same way a pipeline run would
pub async fn encoded(bytes: &[u8]) -> EncodedImage {
    ImageEncoder::new()
        .encode(&ImageSource::Memory(bytes.to_vec()))
        .await
        .unwrap()
}
