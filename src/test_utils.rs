// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

pub const CLUSTER_INGRESS_PATH: &str = "/apis/config.openshift.io/v1/ingresses/cluster";
pub const INGRESS_CONTROLLER_PATH: &str =
    "/apis/operator.openshift.io/v1/namespaces/openshift-ingress-operator/ingresscontrollers/default";

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    /// Requests that never get an answer
    hanging: Arc<Mutex<HashSet<(String, String)>>>,
    requests: Arc<AtomicUsize>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            hanging: Arc::new(Mutex::new(HashSet::new())),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for PATCH requests (server-side apply) matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    /// Leave GET requests for the exact path unanswered until a response is registered
    pub fn hang_on_get(self, path: &str) -> Self {
        self.hanging
            .lock()
            .unwrap()
            .insert(("GET".to_string(), path.to_string()));
        self
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.hanging
            .lock()
            .unwrap()
            .remove(&(method.to_string(), path.to_string()));
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Number of requests served so far, across all clones
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        if self.hanging.lock().unwrap().contains(&(method.clone(), path.clone())) {
            return Box::pin(futures::future::pending());
        }

        let response = self.find_response(&method, &path);

        Box::pin(async move {
            let (status, body) = response.unwrap_or_else(|| (404, not_found_json("resource", &path)));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// The cluster-scoped OpenShift ingress config carrying `domain`
pub fn cluster_ingress_json(domain: &str) -> String {
    serde_json::json!({
        "apiVersion": "config.openshift.io/v1",
        "kind": "Ingress",
        "metadata": { "name": "cluster", "uid": "test-uid" },
        "spec": { "domain": domain }
    })
    .to_string()
}

/// The default ingress controller reporting `domain` in its status
pub fn ingress_controller_json(domain: &str) -> String {
    serde_json::json!({
        "apiVersion": "operator.openshift.io/v1",
        "kind": "IngressController",
        "metadata": {
            "name": "default",
            "namespace": "openshift-ingress-operator",
            "uid": "test-uid"
        },
        "spec": {},
        "status": { "domain": domain }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}
