// Fetch targets: who a stats request is labelled as, and where it goes

use std::fmt;

/// Top-level key of a result. Cluster-wide stats and per-node stats live in
/// separate variants so a node can never shadow the cluster entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    Cluster,
    Node(String),
}

impl Scope {
    pub fn node(id: impl Into<String>) -> Self {
        Scope::Node(id.into())
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, Scope::Cluster)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Cluster => f.write_str("cluster"),
            Scope::Node(id) => f.write_str(id),
        }
    }
}

/// One stats request: scope label, (possibly sanitized) bucket label, endpoint path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    pub scope: Scope,
    pub bucket: String,
    pub endpoint: String,
}
