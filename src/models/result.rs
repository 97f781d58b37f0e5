// Nested results: scope -> bucket -> metric -> Summary

use std::collections::BTreeMap;

use super::{Scope, Summary};

/// Name under which the write composite is emitted.
pub const WRITES_METRIC: &str = "writes";

/// Everything computed for one (scope, bucket).
#[derive(Debug, Clone, PartialEq)]
pub struct BucketStats {
    pub metrics: BTreeMap<String, Summary>,
    pub writes: Summary,
}

impl BucketStats {
    /// Named metrics in name order, then the write composite.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Summary)> {
        self.metrics
            .iter()
            .map(|(name, s)| (name.as_str(), s))
            .chain(std::iter::once((WRITES_METRIC, &self.writes)))
    }

    /// Folds in stats from another target that landed on the same key.
    /// Metric names already present and not recomputed are kept.
    fn absorb(&mut self, other: BucketStats) {
        self.metrics.extend(other.metrics);
        self.writes = other.writes;
    }
}

/// Bucket label -> stats, for one scope.
pub type ScopeStats = BTreeMap<String, BucketStats>;

/// Output of one aggregation pass over a target set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    scopes: BTreeMap<Scope, ScopeStats>,
}

impl AggregationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts under scope/bucket. Other buckets of the same scope are untouched;
    /// a repeated (scope, bucket) key folds into the existing entry.
    pub fn insert(&mut self, scope: Scope, bucket: String, stats: BucketStats) {
        let buckets = self.scopes.entry(scope).or_default();
        match buckets.get_mut(&bucket) {
            Some(existing) => existing.absorb(stats),
            None => {
                buckets.insert(bucket, stats);
            }
        }
    }

    pub fn get(&self, scope: &Scope, bucket: &str) -> Option<&BucketStats> {
        self.scopes.get(scope)?.get(bucket)
    }

    pub fn scope(&self, scope: &Scope) -> Option<&ScopeStats> {
        self.scopes.get(scope)
    }

    pub fn scopes(&self) -> impl Iterator<Item = (&Scope, &ScopeStats)> {
        self.scopes.iter()
    }

    /// Number of distinct scopes.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn into_scopes(self) -> impl Iterator<Item = (Scope, ScopeStats)> {
        self.scopes.into_iter()
    }
}

/// Union of the cluster-scope and node-scope results, ready for emission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedResult {
    scopes: BTreeMap<Scope, ScopeStats>,
}

impl MergedResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain key-space insert; returns the entry it replaced, if any.
    pub fn insert_scope(&mut self, scope: Scope, buckets: ScopeStats) -> Option<ScopeStats> {
        self.scopes.insert(scope, buckets)
    }

    pub fn scope(&self, scope: &Scope) -> Option<&ScopeStats> {
        self.scopes.get(scope)
    }

    pub fn get(&self, scope: &Scope, bucket: &str) -> Option<&BucketStats> {
        self.scopes.get(scope)?.get(bucket)
    }

    /// Cluster scope first, then nodes by label.
    pub fn scopes(&self) -> impl Iterator<Item = (&Scope, &ScopeStats)> {
        self.scopes.iter()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
