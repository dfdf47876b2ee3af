use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tiki_product_archiver::{CrawlConfig, Crawler, HttpTransport};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = CrawlConfig::default();
    let transport = HttpTransport::new(&config).context("failed to build HTTP client")?;
    let crawler = Crawler::new(&config, transport);

    let summary = crawler.crawl_all();
    let elapsed = summary.finished_at - summary.started_at;
    info!(
        categories = summary.categories.len(),
        failures = summary.total_failures(),
        elapsed_secs = elapsed.num_seconds(),
        "crawl finished"
    );
    Ok(())
}
