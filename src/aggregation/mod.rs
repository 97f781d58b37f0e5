// Stats Aggregator: fetch each target's sample window and reduce it.
// Pure reduction lives in the submodules; this file only drives retrieval.

pub mod merge;
pub mod reduce;
pub mod targets;
pub mod writes;

use std::collections::BTreeMap;
use std::future::Future;

use futures_util::{StreamExt, TryFutureExt, TryStreamExt, stream};
use tracing::{debug, instrument, warn};

use crate::error::CollectError;
use crate::models::{AggregationResult, BucketStats, FetchTarget, SampleWindow, Scope};

pub use merge::merge_results;
pub use reduce::reduce;
pub use targets::{
    EndpointTemplate, RestPaths, Targets, encode_segment, enumerate_targets, sanitize_bucket,
};
pub use writes::{WRITE_STATS, sum_writes, write_composite};

/// Retrieves the sample window behind one stats endpoint.
pub trait StatsSource {
    /// `cutoff` is passed through unchanged; the window must cover at least the
    /// interval since that epoch second.
    fn fetch_window(
        &self,
        endpoint: &str,
        cutoff: i64,
    ) -> impl Future<Output = Result<SampleWindow, CollectError>> + Send;
}

/// What to compute for every target of one pass.
#[derive(Debug, Clone, Copy)]
pub struct AggregateOptions<'a> {
    pub metrics: &'a [String],
    pub write_metrics: &'a [&'a str],
    pub cutoff: i64,
    /// Max requests in flight. 1 means strictly sequential.
    pub concurrency: usize,
}

/// Fetches and reduces every target. The first error to occur aborts the pass; requests
/// still in flight are dropped and no partial result is returned. Results are assembled
/// in target order regardless of completion order.
#[instrument(skip_all, fields(targets = targets.len(), metrics = opts.metrics.len()))]
pub async fn aggregate<S: StatsSource + ?Sized>(
    source: &S,
    targets: &[FetchTarget],
    opts: &AggregateOptions<'_>,
) -> Result<AggregationResult, CollectError> {
    // Completion order, so the first failure ends the pass whichever target it hit.
    let mut computed: Vec<(usize, (Scope, String, BucketStats))> =
        stream::iter(targets.iter().enumerate())
            .map(|(index, target)| {
                compute_target(source, target, opts).map_ok(move |done| (index, done))
            })
            .buffer_unordered(opts.concurrency.max(1))
            .try_collect()
            .await?;
    computed.sort_unstable_by_key(|(index, _)| *index);

    let mut result = AggregationResult::new();
    for (_, (scope, bucket, stats)) in computed {
        if result.get(&scope, &bucket).is_some() {
            warn!(scope = %scope, bucket = %bucket, "duplicate bucket label, merging metrics");
        }
        result.insert(scope, bucket, stats);
    }
    Ok(result)
}

async fn compute_target<S: StatsSource + ?Sized>(
    source: &S,
    target: &FetchTarget,
    opts: &AggregateOptions<'_>,
) -> Result<(Scope, String, BucketStats), CollectError> {
    let window = source.fetch_window(&target.endpoint, opts.cutoff).await?;
    let stats = summarize_window(&window, &target.endpoint, opts.metrics, opts.write_metrics)?;
    debug!(
        scope = %target.scope,
        bucket = %target.bucket,
        metrics = stats.metrics.len(),
        "target reduced"
    );
    Ok((target.scope.clone(), target.bucket.clone(), stats))
}

/// Reduces every requested metric of one window and adds the write composite.
/// A requested metric that is absent or empty is an error, never a zero.
pub fn summarize_window<S: AsRef<str>>(
    window: &SampleWindow,
    endpoint: &str,
    metrics: &[String],
    write_metrics: &[S],
) -> Result<BucketStats, CollectError> {
    let mut summaries = BTreeMap::new();
    for metric in metrics {
        let summary = window
            .get(metric)
            .and_then(reduce)
            .ok_or_else(|| CollectError::missing(endpoint, metric))?;
        summaries.insert(metric.clone(), summary);
    }

    let writes = write_composite(window, write_metrics, endpoint)?;

    Ok(BucketStats {
        metrics: summaries,
        writes,
    })
}
