// Write-Composite Synthesizer: element-wise sum of the write counters of one target

use crate::error::CollectError;
use crate::models::{SampleWindow, Summary, WRITES_METRIC};

use super::reduce::reduce;

/// Counters that together make up the write composite, in summation order.
pub const WRITE_STATS: &[&str] = &[
    "cmd_set",
    "incr_misses",
    "incr_hits",
    "decr_misses",
    "decr_hits",
    "cas_hits",
];

/// Sums the write counters of one window sample by sample.
///
/// The first write metric fixes the window length for this target only; other
/// targets may legitimately report a different length.
pub fn sum_writes<S: AsRef<str>>(
    window: &SampleWindow,
    write_metrics: &[S],
    endpoint: &str,
) -> Result<Vec<f64>, CollectError> {
    let Some(first) = write_metrics.first() else {
        return Err(CollectError::missing(endpoint, WRITES_METRIC));
    };
    let len = window
        .get(first.as_ref())
        .ok_or_else(|| CollectError::missing(endpoint, first.as_ref()))?
        .len();

    let mut acc = vec![0.0; len];
    for metric in write_metrics {
        let metric = metric.as_ref();
        let samples = window
            .get(metric)
            .ok_or_else(|| CollectError::missing(endpoint, metric))?;
        if samples.len() != len {
            return Err(CollectError::InconsistentSampleLength {
                endpoint: endpoint.to_string(),
                metric: metric.to_string(),
                expected: len,
                actual: samples.len(),
            });
        }
        for (total, sample) in acc.iter_mut().zip(samples) {
            *total += sample;
        }
    }
    Ok(acc)
}

/// Sums the write counters and reduces the result.
pub fn write_composite<S: AsRef<str>>(
    window: &SampleWindow,
    write_metrics: &[S],
    endpoint: &str,
) -> Result<Summary, CollectError> {
    let summed = sum_writes(window, write_metrics, endpoint)?;
    reduce(&summed).ok_or_else(|| CollectError::missing(endpoint, WRITES_METRIC))
}
