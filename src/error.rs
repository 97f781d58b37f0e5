// Fatal collection errors. Every variant aborts the run; nothing is emitted after one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("topology unavailable from {url}: {reason}")]
    TopologyUnavailable { url: String, reason: String },

    #[error("stats retrieval failed for {endpoint}: {reason}")]
    RetrievalFailure { endpoint: String, reason: String },

    #[error("metric {metric} missing or empty in stats from {endpoint}")]
    MissingMetricData { endpoint: String, metric: String },

    #[error(
        "write metric {metric} from {endpoint} has {actual} samples, expected {expected}"
    )]
    InconsistentSampleLength {
        endpoint: String,
        metric: String,
        expected: usize,
        actual: usize,
    },
}

impl CollectError {
    pub fn missing(endpoint: &str, metric: &str) -> Self {
        CollectError::MissingMetricData {
            endpoint: endpoint.to_string(),
            metric: metric.to_string(),
        }
    }

    pub fn retrieval(endpoint: &str, reason: impl ToString) -> Self {
        CollectError::RetrievalFailure {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn topology(url: &str, reason: impl ToString) -> Self {
        CollectError::TopologyUnavailable {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
