//! Scripted in-memory transport for store tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::Value;
use tokio::sync::Semaphore;

use crate::api::{ApiClient, ApiRequest, ApiResponse, Transport};
use crate::auth::MemoryTokenStore;
use crate::config::AuthScheme;
use crate::error::Result;

type RouteKey = (Method, String);

/// Answers requests from per-route response queues and records every request.
///
/// The last queued response of a route is repeated once the queue drains.
/// Unknown routes answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<RouteKey, VecDeque<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(ApiResponse {
                status,
                body: body.to_string(),
            });
    }

    /// Hold requests to `path` until the returned semaphore gets permits.
    pub fn gate(&self, path: &str) -> Arc<Semaphore> {
        let semaphore = Arc::new(Semaphore::new(0));
        self.gates
            .lock()
            .insert(path.to_string(), semaphore.clone());
        semaphore
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn count(&self, method: &Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|request| &request.method == method && request.path == path)
            .count()
    }

    fn next_response(&self, method: &Method, path: &str) -> ApiResponse {
        let mut routes = self.routes.lock();
        let Some(queue) = routes.get_mut(&(method.clone(), path.to_string())) else {
            return ApiResponse {
                status: 404,
                body: format!(r#"{{"message":"no scripted route for {method} {path}"}}"#),
            };
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(not_found)
        } else {
            queue.front().cloned().unwrap_or_else(not_found)
        }
    }
}

fn not_found() -> ApiResponse {
    ApiResponse {
        status: 404,
        body: String::new(),
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = request.method.clone();
        let path = request.path.clone();
        self.requests.lock().push(request);

        let gate = self.gates.lock().get(&path).cloned();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        Ok(self.next_response(&method, &path))
    }
}

/// `ApiClient` over `transport`, optionally signed in with `token`.
pub fn api_client(transport: &Arc<ScriptedTransport>, token: Option<&str>) -> ApiClient {
    let store = token.map_or_else(MemoryTokenStore::new, |token| {
        MemoryTokenStore::with_token(token).expect("valid test token")
    });
    ApiClient::new(transport.clone(), Arc::new(store), AuthScheme::Raw)
}
