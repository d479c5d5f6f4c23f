use anyhow::Result;
use clap::Parser;
use proxy_finder::{
    proxy::sources::{default_sources, load_sources_file},
    CheckerConfig, Config, CrawlerConfig, ProxyFinder, TlsPolicy,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Harvest public proxies, check which ones work, and classify their anonymity
#[derive(Parser)]
#[command(name = "proxy-finder")]
#[command(about = "Harvest public proxies, check which ones work, and classify their anonymity")]
struct Cli {
    /// URL to test proxies against. Anonymity tiers need a target that echoes
    /// request headers as JSON (e.g. http://httpbin.org/get); the default only
    /// echoes the origin, so every live proxy is reported as Elite
    #[arg(long, default_value = proxy_finder::proxy::checker::DEFAULT_TEST_URL)]
    test_url: String,

    /// Listing page to harvest (can specify multiple; replaces the built-in list)
    #[arg(short, long)]
    source: Vec<String>,

    /// File containing listing pages to harvest (one URL per line)
    #[arg(short = 'f', long)]
    sources_file: Option<PathBuf>,

    /// Number of concurrent probes
    #[arg(short = 'n', long, default_value = "256")]
    concurrency: usize,

    /// Probe deadline in seconds
    #[arg(long, default_value = "20")]
    timeout: u64,

    /// Timeout in seconds for fetching listing pages
    #[arg(long, default_value = "30")]
    fetch_timeout: u64,

    /// Verify TLS certificates of listing pages
    #[arg(long)]
    strict_tls: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error logging
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut sources = cli.source.clone();
    if let Some(path) = &cli.sources_file {
        let loaded = load_sources_file(path)?;
        tracing::info!("Loaded {} sources from {:?}", loaded.len(), path);
        sources.extend(loaded);
    }
    if sources.is_empty() {
        sources = default_sources();
    }

    let tls_policy = if cli.strict_tls {
        TlsPolicy::Verify
    } else {
        TlsPolicy::AcceptInvalid
    };

    let config = Config::new()
        .with_sources(sources)
        .with_crawler(
            CrawlerConfig::new()
                .with_timeout(Duration::from_secs(cli.fetch_timeout))
                .with_tls_policy(tls_policy),
        )
        .with_checker(
            CheckerConfig::new()
                .with_concurrency(cli.concurrency)
                .with_timeout(Duration::from_secs(cli.timeout))
                .with_test_url(cli.test_url),
        );

    let finder = ProxyFinder::with_config(config)?;
    let report = finder.run().await;

    print!("{}", report);

    Ok(())
}

fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("proxy_finder=info,warn"),
                1 => EnvFilter::new("proxy_finder=debug,info"),
                2 => EnvFilter::new("proxy_finder=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
