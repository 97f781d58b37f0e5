// Graphite plaintext emitter: one line per (scope, bucket, metric, summary field)

use std::io::{self, Write};

use crate::models::{MergedResult, Scope};

const CLUSTER_PATH: &str = "per_bucket";
const NODE_PATH: &str = "per_bucket_per_node";

#[derive(Debug, Clone, Copy)]
pub struct EmitOptions<'a> {
    /// Prefix of every metric path.
    pub scheme: &'a str,
    /// Replace `.` and `:` in node labels so an address stays one path segment.
    pub host_format: bool,
}

/// `10.0.0.1:8091` -> `10_0_0_1_8091`.
pub fn format_host(label: &str) -> String {
    label.replace(['.', ':'], "_")
}

/// Path segment(s) between the scheme and the bucket.
pub fn scope_path(scope: &Scope, host_format: bool) -> String {
    match scope {
        Scope::Cluster => CLUSTER_PATH.to_string(),
        Scope::Node(label) if host_format => format!("{NODE_PATH}.{}", format_host(label)),
        Scope::Node(label) => format!("{NODE_PATH}.{label}"),
    }
}

/// Renders every line, in scope / bucket / metric order.
pub fn lines(merged: &MergedResult, timestamp: i64, opts: &EmitOptions<'_>) -> Vec<String> {
    let mut out = Vec::new();
    for (scope, buckets) in merged.scopes() {
        let scope_path = scope_path(scope, opts.host_format);
        for (bucket, stats) in buckets {
            for (metric, summary) in stats.iter() {
                for (field, value) in summary.fields() {
                    out.push(format!(
                        "{}.{scope_path}.{bucket}.{metric}.{field} {value} {timestamp}",
                        opts.scheme
                    ));
                }
            }
        }
    }
    out
}

/// Writes all lines with a single write so a failed render never leaves partial output.
/// Returns the number of lines written.
pub fn write_graphite<W: Write>(
    merged: &MergedResult,
    timestamp: i64,
    opts: &EmitOptions<'_>,
    out: &mut W,
) -> io::Result<usize> {
    let lines = lines(merged, timestamp, opts);
    let mut buf = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in &lines {
        buf.push_str(line);
        buf.push('\n');
    }
    out.write_all(buf.as_bytes())?;
    out.flush()?;
    Ok(lines.len())
}
