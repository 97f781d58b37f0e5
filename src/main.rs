use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use clap::error::ErrorKind;
use couchbase_metrics::cli::Cli;
use couchbase_metrics::collector;
use couchbase_metrics::config::AppConfig;
use couchbase_metrics::couchbase_repo::CouchbaseRepo;
use couchbase_metrics::dns_repo::DnsRepo;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

/// Exit code for every fatal error (config, discovery, retrieval, bad data).
const FAILURE_EXIT_CODE: u8 = 1;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries only metric lines
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(FAILURE_EXIT_CODE),
            };
        }
    };

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let error = format!("{e:#}");
            tracing::error!(%error, "collection failed, nothing emitted");
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<usize> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    let repo = CouchbaseRepo::connect(&config.couchbase)?;
    let dns = config.dns.enabled.then(|| {
        DnsRepo::new(
            config.dns.name_server,
            Duration::from_secs(config.dns.timeout_secs),
        )
    });
    tracing::debug!(base_url = repo.base_url(), dns = dns.is_some(), "collector ready");

    let mut stdout = std::io::stdout();
    collector::run_once(&repo, dns.as_ref(), &config, &mut stdout).await
}
