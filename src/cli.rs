// Command-line flags. Anything given here overrides the config file.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;
use crate::version::VERSION;

#[derive(Debug, Parser)]
#[command(name = "metrics-couchbase")]
#[command(about = "Collects Couchbase per bucket and per bucket per node stats as Graphite plaintext")]
#[command(version = VERSION)]
pub struct Cli {
    /// TOML config file (defaults to $CONFIG_FILE when set)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Couchbase metrics source host
    #[arg(short = 'c', long = "couchbase-host")]
    pub couchbase_host: Option<String>,

    /// Couchbase REST port [default: 8091]
    #[arg(short = 'w', long = "couchbase-rest-port")]
    pub couchbase_rest_port: Option<u16>,

    /// Couchbase user with access to REST
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Couchbase user password
    #[arg(short = 'p', long, env = "COUCHBASE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Metric Graphite naming scheme, text to prepend to metric [default: couchbase]
    #[arg(short = 's', long)]
    pub scheme: Option<String>,

    /// Replace dots (.) in bucket names with underscores (_)
    #[arg(short = 'b', long = "bucket-format")]
    pub bucket_format: bool,

    /// Replace dots (.) and colons (:) in node hostnames with underscores (_)
    #[arg(short = 'r', long = "host-format")]
    pub host_format: bool,

    /// Try a reverse DNS lookup for Couchbase node hosts
    #[arg(short = 'd', long = "dns-lookup")]
    pub dns_lookup: bool,

    /// DNS server for reverse lookups [default: 8.8.8.8]
    #[arg(short = 'n', long = "dns-name-server")]
    pub dns_name_server: Option<IpAddr>,

    /// Interval for stat collection in seconds [default: 60]
    #[arg(short = 'i', long)]
    pub interval: Option<u64>,

    /// Max stats requests in flight [default: 4]
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request HTTP timeout in seconds [default: 10]
    #[arg(long = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    /// Overlays the flags that were given onto `config`.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.couchbase_host {
            config.couchbase.host = host.clone();
        }
        if let Some(port) = self.couchbase_rest_port {
            config.couchbase.port = port;
        }
        if let Some(user) = &self.user {
            config.couchbase.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.couchbase.password = password.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.couchbase.timeout_secs = timeout;
        }
        if let Some(scheme) = &self.scheme {
            config.output.scheme = scheme.clone();
        }
        config.output.bucket_format |= self.bucket_format;
        config.output.host_format |= self.host_format;
        config.dns.enabled |= self.dns_lookup;
        if let Some(ns) = self.dns_name_server {
            config.dns.name_server = ns;
        }
        if let Some(interval) = self.interval {
            config.collection.interval_secs = interval;
        }
        if let Some(concurrency) = self.concurrency {
            config.collection.concurrency = concurrency;
        }
    }
}
