// Domain models: targets, sample windows, summaries and the nested results built from them

mod couchbase;
mod result;
mod summary;
mod target;
mod window;

pub use couchbase::{BucketInfo, NodeInfo, OpStats, PoolDetails, StatsResponse, Topology};
pub use result::{AggregationResult, BucketStats, MergedResult, ScopeStats, WRITES_METRIC};
pub use summary::Summary;
pub use target::{FetchTarget, Scope};
pub use window::SampleWindow;
