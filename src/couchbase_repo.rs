// Couchbase admin REST API via reqwest: topology discovery and stats windows

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::aggregation::StatsSource;
use crate::collector::TopologySource;
use crate::config::CouchbaseConfig;
use crate::error::CollectError;
use crate::models::{BucketInfo, PoolDetails, SampleWindow, StatsResponse, Topology};
use crate::version;

const BUCKETS_PATH: &str = "/pools/default/buckets";
const POOL_PATH: &str = "/pools/default";
/// Stats granularity requested from the cluster: one-minute rolling window.
const STATS_ZOOM: &str = "minute";

pub struct CouchbaseRepo {
    client: Client,
    base_url: String,
    user: String,
    password: String,
}

impl CouchbaseRepo {
    pub fn connect(config: &CouchbaseConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            config.base_url(),
            &config.user,
            &config.password,
            Duration::from_secs(config.timeout_secs),
        )?)
    }

    /// `base_url` is scheme + authority, e.g. `http://10.0.0.1:8091`.
    pub fn new(
        base_url: impl Into<String>,
        user: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(version::user_agent())
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user: user.to_string(),
            password: password.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Bucket names, in the order the cluster lists them.
    pub async fn get_buckets(&self) -> Result<Vec<String>, CollectError> {
        let buckets: Vec<BucketInfo> = self
            .get_json(BUCKETS_PATH, &[])
            .await
            .map_err(|e| CollectError::topology(&self.url(BUCKETS_PATH), e))?;
        Ok(buckets.into_iter().map(|b| b.name).collect())
    }

    /// `host:port` of every node whose cluster membership is active.
    pub async fn get_active_nodes(&self) -> Result<Vec<String>, CollectError> {
        let pool: PoolDetails = self
            .get_json(POOL_PATH, &[])
            .await
            .map_err(|e| CollectError::topology(&self.url(POOL_PATH), e))?;
        let total = pool.nodes.len();
        let active: Vec<String> = pool
            .nodes
            .into_iter()
            .filter(|n| n.is_active())
            .map(|n| n.hostname)
            .collect();
        if active.len() < total {
            debug!(
                total,
                active = active.len(),
                "skipping nodes that are not active members"
            );
        }
        Ok(active)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, reqwest::Error> {
        self.client
            .get(self.url(path))
            .basic_auth(&self.user, Some(&self.password))
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }
}

impl TopologySource for CouchbaseRepo {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn discover_topology(&self) -> Result<Topology, CollectError> {
        let buckets = self.get_buckets().await?;
        let nodes = self.get_active_nodes().await?;
        debug!(
            buckets = buckets.len(),
            nodes = nodes.len(),
            "topology discovered"
        );
        Ok(Topology { buckets, nodes })
    }
}

impl StatsSource for CouchbaseRepo {
    async fn fetch_window(&self, endpoint: &str, cutoff: i64) -> Result<SampleWindow, CollectError> {
        let query = [
            ("haveTStamp", cutoff.to_string()),
            ("zoom", STATS_ZOOM.to_string()),
        ];
        let response: StatsResponse = self
            .get_json(endpoint, &query)
            .await
            .map_err(|e| CollectError::retrieval(endpoint, e))?;
        Ok(response.into_window())
    }
}
