// One polling run: discover -> enumerate -> aggregate (cluster, nodes) -> relabel -> merge -> emit.
// Output is rendered only after every step succeeded, so a failed run writes nothing.

use std::future::Future;
use std::io::Write;

use tracing::{info, instrument};

use crate::aggregation::{
    AggregateOptions, RestPaths, StatsSource, WRITE_STATS, aggregate, enumerate_targets,
    merge_results,
};
use crate::config::AppConfig;
use crate::dns_repo::DnsRepo;
use crate::emit::{self, EmitOptions};
use crate::error::CollectError;
use crate::models::{MergedResult, Scope, Topology};

/// Lists the buckets and active member nodes of a cluster.
pub trait TopologySource {
    fn discover_topology(&self) -> impl Future<Output = Result<Topology, CollectError>> + Send;
}

/// Current wall clock in epoch seconds.
pub fn now_epoch_secs() -> anyhow::Result<i64> {
    Ok(std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs() as i64)
}

/// Earliest sample time a run asks for. Saturates instead of wrapping on huge intervals.
pub fn cutoff_for(now_secs: i64, interval_secs: u64) -> i64 {
    now_secs.saturating_sub(i64::try_from(interval_secs).unwrap_or(i64::MAX))
}

/// Collects and reduces all stats of the cluster. `resolver` relabels node scopes.
#[instrument(skip_all, fields(cutoff = cutoff))]
pub async fn collect<C>(
    source: &C,
    resolver: Option<&DnsRepo>,
    config: &AppConfig,
    cutoff: i64,
) -> Result<MergedResult, CollectError>
where
    C: TopologySource + StatsSource + Sync,
{
    let topology = source.discover_topology().await?;
    let targets = enumerate_targets(
        &topology.buckets,
        &topology.nodes,
        &RestPaths,
        config.output.bucket_format,
    );
    info!(
        buckets = topology.buckets.len(),
        nodes = topology.nodes.len(),
        cluster_targets = targets.cluster.len(),
        node_targets = targets.nodes.len(),
        "targets enumerated"
    );

    let cluster = aggregate(
        source,
        &targets.cluster,
        &AggregateOptions {
            metrics: &config.collection.per_bucket_stats,
            write_metrics: WRITE_STATS,
            cutoff,
            concurrency: config.collection.concurrency,
        },
    )
    .await?;

    let nodes = aggregate(
        source,
        &targets.nodes,
        &AggregateOptions {
            metrics: &config.collection.per_bucket_per_node_stats,
            write_metrics: WRITE_STATS,
            cutoff,
            concurrency: config.collection.concurrency,
        },
    )
    .await?;

    let merged = match resolver {
        Some(dns) => {
            let ids: Vec<&str> = nodes
                .scopes()
                .filter_map(|(scope, _)| match scope {
                    Scope::Node(id) => Some(id.as_str()),
                    Scope::Cluster => None,
                })
                .collect();
            let labels = dns.display_labels(ids).await;
            let relabel: &dyn Fn(&str) -> String =
                &|id| labels.get(id).cloned().unwrap_or_else(|| id.to_string());
            merge_results(cluster, nodes, Some(relabel))
        }
        None => merge_results(cluster, nodes, None),
    };

    Ok(merged)
}

/// Runs one full collection and writes the Graphite lines to `out`.
/// Returns the number of lines written.
pub async fn run_once<C, W>(
    source: &C,
    resolver: Option<&DnsRepo>,
    config: &AppConfig,
    out: &mut W,
) -> anyhow::Result<usize>
where
    C: TopologySource + StatsSource + Sync,
    W: Write,
{
    let cutoff = cutoff_for(now_epoch_secs()?, config.collection.interval_secs);
    let merged = collect(source, resolver, config, cutoff).await?;

    let timestamp = now_epoch_secs()?;
    let written = emit::write_graphite(
        &merged,
        timestamp,
        &EmitOptions {
            scheme: &config.output.scheme,
            host_format: config.output.host_format,
        },
        out,
    )?;
    info!(lines = written, scopes = merged.len(), "metrics emitted");
    Ok(written)
}
