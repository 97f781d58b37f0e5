// Target Enumerator: one cluster target per bucket, one node target per (node, bucket)

use crate::models::{FetchTarget, Scope};

/// Builds stats endpoint paths for a bucket, cluster-wide or scoped to one node.
pub trait EndpointTemplate {
    fn bucket_stats(&self, bucket: &str) -> String;
    fn node_bucket_stats(&self, node: &str, bucket: &str) -> String;
}

/// Couchbase REST paths, relative to the admin base URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestPaths;

impl EndpointTemplate for RestPaths {
    fn bucket_stats(&self, bucket: &str) -> String {
        format!("/pools/default/buckets/{}/stats", encode_segment(bucket))
    }

    fn node_bucket_stats(&self, node: &str, bucket: &str) -> String {
        format!(
            "/pools/default/buckets/{}/nodes/{}/stats",
            encode_segment(bucket),
            encode_segment(node)
        )
    }
}

/// Percent-encodes one path segment. `:` stays literal so `host:port` node ids read as-is.
pub fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for &byte in segment.as_bytes() {
        if matches!(byte,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b':'
        ) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

/// The two disjoint target sets of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    pub cluster: Vec<FetchTarget>,
    pub nodes: Vec<FetchTarget>,
}

/// Dots separate path segments in Graphite, so bucket labels may swap them out.
pub fn sanitize_bucket(name: &str) -> String {
    name.replace('.', "_")
}

/// Enumerates bucket-major: for each bucket its cluster target, and its node
/// targets in node order. Endpoints always carry the unsanitized bucket name.
pub fn enumerate_targets<E: EndpointTemplate + ?Sized>(
    buckets: &[String],
    nodes: &[String],
    endpoints: &E,
    sanitize_buckets: bool,
) -> Targets {
    let mut targets = Targets {
        cluster: Vec::with_capacity(buckets.len()),
        nodes: Vec::with_capacity(buckets.len() * nodes.len()),
    };

    for bucket in buckets {
        let label = if sanitize_buckets {
            sanitize_bucket(bucket)
        } else {
            bucket.clone()
        };

        targets.cluster.push(FetchTarget {
            scope: Scope::Cluster,
            bucket: label.clone(),
            endpoint: endpoints.bucket_stats(bucket),
        });

        for node in nodes {
            targets.nodes.push(FetchTarget {
                scope: Scope::node(node.as_str()),
                bucket: label.clone(),
                endpoint: endpoints.node_bucket_stats(node, bucket),
            });
        }
    }

    targets
}
