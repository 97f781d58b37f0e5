// Shared test helpers: sample windows, an in-memory stats source, a fake Couchbase REST server
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use couchbase_metrics::aggregation::{StatsSource, WRITE_STATS};
use couchbase_metrics::collector::TopologySource;
use couchbase_metrics::config::{AppConfig, PER_BUCKET_PER_NODE_STATS, PER_BUCKET_STATS};
use couchbase_metrics::error::CollectError;
use couchbase_metrics::models::{SampleWindow, Topology};

pub const USER: &str = "admin";
pub const PASSWORD: &str = "secret";
/// base64("admin:secret")
const BASIC_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

pub fn window(entries: &[(&str, &[f64])]) -> SampleWindow {
    entries
        .iter()
        .map(|(name, samples)| (*name, samples.to_vec()))
        .collect()
}

/// Every metric the collector may ask for, all with the same samples.
pub fn all_metric_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = PER_BUCKET_STATS
        .iter()
        .chain(PER_BUCKET_PER_NODE_STATS)
        .chain(WRITE_STATS)
        .copied()
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

pub fn full_window(samples: &[f64]) -> SampleWindow {
    all_metric_names()
        .into_iter()
        .map(|name| (name, samples.to_vec()))
        .collect()
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.couchbase.host = "127.0.0.1".into();
    config.couchbase.user = USER.into();
    config.couchbase.password = PASSWORD.into();
    config.collection.concurrency = 1;
    config
}

/// In-memory topology + stats. Endpoints without an explicit window get `default_window`.
#[derive(Default)]
pub struct MockSource {
    pub topology: Topology,
    pub windows: HashMap<String, SampleWindow>,
    pub default_window: Option<SampleWindow>,
    /// 1-based call number that fails with a retrieval error.
    pub fail_on_call: Option<usize>,
    /// Endpoints that answer only after the given delay.
    pub delays: HashMap<String, Duration>,
    /// Endpoints that fail immediately.
    pub failing: Vec<String>,
    pub calls: AtomicUsize,
    pub endpoints: Mutex<Vec<String>>,
    pub cutoffs: Mutex<Vec<i64>>,
}

impl MockSource {
    pub fn with_default(window: SampleWindow) -> Self {
        Self {
            default_window: Some(window),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TopologySource for MockSource {
    async fn discover_topology(&self) -> Result<Topology, CollectError> {
        Ok(self.topology.clone())
    }
}

impl StatsSource for MockSource {
    async fn fetch_window(&self, endpoint: &str, cutoff: i64) -> Result<SampleWindow, CollectError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.endpoints.lock().unwrap().push(endpoint.to_string());
        self.cutoffs.lock().unwrap().push(cutoff);
        if self.fail_on_call == Some(n) || self.failing.iter().any(|e| e == endpoint) {
            return Err(CollectError::retrieval(endpoint, "connection refused"));
        }
        if let Some(delay) = self.delays.get(endpoint) {
            tokio::time::sleep(*delay).await;
        }
        self.windows
            .get(endpoint)
            .or(self.default_window.as_ref())
            .cloned()
            .ok_or_else(|| CollectError::retrieval(endpoint, "404 Not Found"))
    }
}

/// Fake Couchbase admin API.
#[derive(Default)]
pub struct FakeCluster {
    pub buckets: Vec<String>,
    /// (hostname, clusterMembership)
    pub nodes: Vec<(String, String)>,
    pub samples: Vec<f64>,
    /// Stats paths that answer 500.
    pub failing_paths: Vec<String>,
    /// "<path> haveTStamp=<..> zoom=<..>" for every stats request.
    pub seen: Mutex<Vec<String>>,
}

impl FakeCluster {
    pub fn new(buckets: &[&str], nodes: &[(&str, &str)], samples: &[f64]) -> Self {
        Self {
            buckets: buckets.iter().map(|b| b.to_string()).collect(),
            nodes: nodes
                .iter()
                .map(|(h, m)| (h.to_string(), m.to_string()))
                .collect(),
            samples: samples.to_vec(),
            ..Default::default()
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

/// Serves `cluster` on an ephemeral localhost port; returns its base URL.
pub async fn spawn_fake_cluster(cluster: Arc<FakeCluster>) -> String {
    let app = Router::new()
        .route("/pools/default", get(pool_handler))
        .route("/pools/default/buckets", get(buckets_handler))
        .route("/pools/default/buckets/{bucket}/stats", get(bucket_stats_handler))
        .route(
            "/pools/default/buckets/{bucket}/nodes/{node}/stats",
            get(node_stats_handler),
        )
        .with_state(cluster);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == BASIC_AUTH)
}

async fn buckets_handler(State(c): State<Arc<FakeCluster>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let body: Vec<_> = c
        .buckets
        .iter()
        .map(|b| json!({ "name": b, "bucketType": "membase" }))
        .collect();
    Json(body).into_response()
}

async fn pool_handler(State(c): State<Arc<FakeCluster>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let nodes: Vec<_> = c
        .nodes
        .iter()
        .map(|(host, membership)| {
            json!({ "hostname": host, "clusterMembership": membership, "status": "healthy" })
        })
        .collect();
    Json(json!({ "name": "default", "nodes": nodes })).into_response()
}

async fn bucket_stats_handler(
    State(c): State<Arc<FakeCluster>>,
    headers: HeaderMap,
    Path(bucket): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let path = format!("/pools/default/buckets/{bucket}/stats");
    stats_response(&c, &headers, &path, &query)
}

async fn node_stats_handler(
    State(c): State<Arc<FakeCluster>>,
    headers: HeaderMap,
    Path((bucket, node)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let path = format!("/pools/default/buckets/{bucket}/nodes/{node}/stats");
    stats_response(&c, &headers, &path, &query)
}

fn stats_response(
    c: &FakeCluster,
    headers: &HeaderMap,
    path: &str,
    query: &HashMap<String, String>,
) -> Response {
    if !authorized(headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    c.seen.lock().unwrap().push(format!(
        "{path} haveTStamp={} zoom={}",
        query.get("haveTStamp").map_or("", String::as_str),
        query.get("zoom").map_or("", String::as_str),
    ));
    if c.failing_paths.iter().any(|p| p == path) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let mut samples = serde_json::Map::new();
    for name in all_metric_names() {
        samples.insert(name.to_string(), json!(c.samples));
    }
    let timestamps: Vec<u64> = (0..c.samples.len() as u64).map(|i| i * 1000).collect();
    samples.insert("timestamp".into(), json!(timestamps));
    samples.insert("hot_keys".into(), json!([{ "name": "k1", "ops": 1.5 }]));

    Json(json!({
        "op": {
            "samples": samples,
            "samplesCount": c.samples.len(),
            "isPersistent": true,
            "lastTStamp": 0
        },
        "hot_keys": []
    }))
    .into_response()
}
