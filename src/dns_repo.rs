// Reverse DNS for node display labels. Best effort: any failure keeps the raw identifier.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::time::Duration;

use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use tracing::{debug, info, instrument};

const DNS_PORT: u16 = 53;

pub struct DnsRepo {
    resolver: TokioAsyncResolver,
}

impl DnsRepo {
    /// Resolver that only asks `name_server`, one attempt per query.
    pub fn new(name_server: IpAddr, timeout: Duration) -> Self {
        let group = NameServerConfigGroup::from_ips_clear(&[name_server], DNS_PORT, true);
        let config = ResolverConfig::from_parts(None, vec![], group);
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 1;
        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }

    /// Short hostname of the node's IP, or `node` unchanged if that can't be had.
    #[instrument(skip(self))]
    pub async fn display_label(&self, node: &str) -> String {
        let host = strip_port(node);
        let Ok(ip) = host.parse::<IpAddr>() else {
            debug!("node identifier is not an IP address, keeping it");
            return node.to_string();
        };
        match self.resolver.reverse_lookup(ip).await {
            Ok(lookup) => {
                let name = lookup.iter().next().map(|ptr| ptr.to_string());
                match name.as_deref().and_then(first_label) {
                    Some(label) => label.to_string(),
                    None => {
                        info!("reverse lookup returned no usable name");
                        node.to_string()
                    }
                }
            }
            Err(e) => {
                info!(error = %e, "reverse lookup failed");
                node.to_string()
            }
        }
    }

    /// Resolves each distinct node once.
    pub async fn display_labels<'a, I>(&self, nodes: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut labels = BTreeMap::new();
        for node in nodes {
            if labels.contains_key(node) {
                continue;
            }
            let label = self.display_label(node).await;
            labels.insert(node.to_string(), label);
        }
        labels
    }
}

/// `10.0.0.1:8091` -> `10.0.0.1`, `[fe80::1]:8091` -> `fe80::1`. Bare hosts pass through.
pub fn strip_port(node: &str) -> &str {
    if let Some(rest) = node.strip_prefix('[') {
        return rest.split_once(']').map_or(node, |(host, _)| host);
    }
    match node.rsplit_once(':') {
        Some((host, port))
            if !host.contains(':') && !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) =>
        {
            host
        }
        _ => node,
    }
}

/// `db1.example.com.` -> `db1`.
pub fn first_label(name: &str) -> Option<&str> {
    name.trim_end_matches('.')
        .split('.')
        .next()
        .filter(|label| !label.is_empty())
}
