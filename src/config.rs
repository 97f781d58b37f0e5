use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use serde::Deserialize;

use crate::models::WRITES_METRIC;

/// Longest stats window a run may ask for (one week).
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

/// Stats reduced per bucket, cluster wide.
pub const PER_BUCKET_STATS: &[&str] = &[
    "cas_hits",
    "cmd_get",
    "cmd_set",
    "curr_items",
    "decr_hits",
    "decr_misses",
    "incr_hits",
    "incr_misses",
    "ops",
    "vb_active_resident_items_ratio",
];

/// Stats reduced per bucket on every node.
pub const PER_BUCKET_PER_NODE_STATS: &[&str] = &[
    "cas_hits",
    "cmd_get",
    "cmd_set",
    "curr_connections",
    "cpu_utilization_rate",
    "curr_items",
    "decr_hits",
    "decr_misses",
    "delete_misses",
    "delete_hits",
    "ep_bg_fetched",
    "ep_flusher_todo",
    "ep_max_size",
    "ep_mem_high_wat",
    "ep_mem_low_wat",
    "ep_cache_miss_rate",
    "ep_tmp_oom_errors",
    "ep_queue_size",
    "incr_hits",
    "incr_misses",
    "mem_used",
    "ops",
    "vb_active_eject",
    "vb_active_itm_memory",
    "vb_active_meta_data_memory",
    "vb_active_num",
    "vb_active_queue_drain",
    "vb_active_queue_fill",
    "vb_active_queue_size",
    "vb_active_resident_items_ratio",
    "vb_replica_num",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub couchbase: CouchbaseConfig,
    pub collection: CollectionConfig,
    pub output: OutputConfig,
    pub dns: DnsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CouchbaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Per-request timeout; a timeout fails the run like any other retrieval error.
    pub timeout_secs: u64,
}

impl Default for CouchbaseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 8091,
            user: String::new(),
            password: String::new(),
            timeout_secs: 10,
        }
    }
}

impl CouchbaseConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// How far back each stats window reaches, in seconds.
    pub interval_secs: u64,
    /// Max stats requests in flight.
    pub concurrency: usize,
    pub per_bucket_stats: Vec<String>,
    pub per_bucket_per_node_stats: Vec<String>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            concurrency: 4,
            per_bucket_stats: PER_BUCKET_STATS.iter().map(|s| s.to_string()).collect(),
            per_bucket_per_node_stats: PER_BUCKET_PER_NODE_STATS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Graphite path prefix.
    pub scheme: String,
    /// Replace `.` with `_` in bucket names.
    pub bucket_format: bool,
    /// Replace `.` and `:` with `_` in node labels.
    pub host_format: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            scheme: "couchbase".into(),
            bucket_format: false,
            host_format: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DnsConfig {
    /// Reverse-resolve node IPs to short hostnames.
    pub enabled: bool,
    pub name_server: IpAddr,
    pub timeout_secs: u64,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            name_server: IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
            timeout_secs: 5,
        }
    }
}

impl AppConfig {
    /// Reads `path`, else `CONFIG_FILE`, else starts from defaults. Not validated:
    /// command-line overrides still have to be applied.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => std::env::var_os("CONFIG_FILE").map(Into::into),
        };
        match path {
            Some(p) => {
                let s = std::fs::read_to_string(&p)
                    .map_err(|e| anyhow::anyhow!("reading {}: {}", p.display(), e))?;
                Self::parse(&s)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config = Self::parse(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.couchbase.host.is_empty(),
            "couchbase.host is required (a couchbase metrics source host)"
        );
        anyhow::ensure!(
            self.couchbase.port > 0,
            "couchbase.port must be between 1 and 65535, got {}",
            self.couchbase.port
        );
        anyhow::ensure!(
            !self.couchbase.user.is_empty() && !self.couchbase.password.is_empty(),
            "couchbase.user and couchbase.password are required"
        );
        anyhow::ensure!(
            self.couchbase.timeout_secs > 0,
            "couchbase.timeout_secs must be > 0, got {}",
            self.couchbase.timeout_secs
        );
        anyhow::ensure!(
            self.collection.interval_secs > 0,
            "collection.interval_secs must be > 0, got {}",
            self.collection.interval_secs
        );
        anyhow::ensure!(
            self.collection.interval_secs <= MAX_INTERVAL_SECS,
            "collection.interval_secs must be <= {}, got {}",
            MAX_INTERVAL_SECS,
            self.collection.interval_secs
        );
        anyhow::ensure!(
            self.collection.concurrency > 0,
            "collection.concurrency must be > 0, got {}",
            self.collection.concurrency
        );
        for (key, list) in [
            ("collection.per_bucket_stats", &self.collection.per_bucket_stats),
            (
                "collection.per_bucket_per_node_stats",
                &self.collection.per_bucket_per_node_stats,
            ),
        ] {
            anyhow::ensure!(
                !list.iter().any(|m| m == WRITES_METRIC),
                "{} must not contain {:?}, it is computed",
                key,
                WRITES_METRIC
            );
            anyhow::ensure!(
                !list.iter().any(|m| m.is_empty() || m.contains(['.', ' '])),
                "{} entries must be non-empty and contain no dots or spaces",
                key
            );
        }
        anyhow::ensure!(
            !self.output.scheme.is_empty(),
            "output.scheme must be non-empty"
        );
        anyhow::ensure!(
            self.dns.timeout_secs > 0,
            "dns.timeout_secs must be > 0, got {}",
            self.dns.timeout_secs
        );
        Ok(())
    }
}
