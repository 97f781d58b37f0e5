// Result Merger: union of cluster-scope and node-scope results

use tracing::warn;

use crate::models::{AggregationResult, MergedResult, Scope};

/// Merges the two aggregation passes. Node labels go through `relabel` when given;
/// two nodes that map to the same label overwrite one another (last in label order wins).
pub fn merge_results(
    cluster: AggregationResult,
    nodes: AggregationResult,
    relabel: Option<&dyn Fn(&str) -> String>,
) -> MergedResult {
    let mut merged = MergedResult::new();

    for (scope, buckets) in cluster.into_scopes() {
        merged.insert_scope(scope, buckets);
    }

    for (scope, buckets) in nodes.into_scopes() {
        let scope = match (scope, relabel) {
            (Scope::Node(id), Some(f)) => Scope::Node(f(&id)),
            (scope, _) => scope,
        };
        let label = scope.to_string();
        if merged.insert_scope(scope, buckets).is_some() {
            warn!(scope = %label, "scope label collision, earlier stats replaced");
        }
    }

    merged
}
