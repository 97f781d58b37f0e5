// Couchbase REST API payloads (only the fields the collector reads)

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::SampleWindow;

/// One entry of GET /pools/default/buckets.
#[derive(Debug, Clone, Deserialize)]
pub struct BucketInfo {
    pub name: String,
}

/// GET /pools/default.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolDetails {
    #[serde(default)]
    pub nodes: Vec<NodeInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub hostname: String,
    #[serde(default)]
    pub cluster_membership: String,
}

impl NodeInfo {
    pub fn is_active(&self) -> bool {
        self.cluster_membership == "active"
    }
}

/// GET .../stats. Sample values are kept loose here; see [`StatsResponse::into_window`].
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub op: OpStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpStats {
    #[serde(default)]
    pub samples: BTreeMap<String, Value>,
}

impl StatsResponse {
    /// Keeps only entries that are arrays of numbers. Anything else is dropped and
    /// shows up later as a missing metric if it was asked for.
    pub fn into_window(self) -> SampleWindow {
        self.op
            .samples
            .into_iter()
            .filter_map(|(name, value)| {
                let Value::Array(items) = value else {
                    return None;
                };
                let samples = items
                    .iter()
                    .map(Value::as_f64)
                    .collect::<Option<Vec<f64>>>()?;
                Some((name, samples))
            })
            .collect()
    }
}

/// Buckets and active member nodes of a cluster, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    pub buckets: Vec<String>,
    pub nodes: Vec<String>,
}
