//! Proxy Finder - Proxy Harvester and Checker
//!
//! Harvests proxy candidates from public listing pages, keeps the ones that
//! relay requests to a test URL, and classifies their anonymity.

pub mod proxy;

pub use proxy::*;

/// Application result type
pub type Result<T> = anyhow::Result<T>;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Listing pages to harvest
    pub sources: Vec<String>,
    /// Settings for source fetches
    pub crawler: CrawlerConfig,
    /// Settings for liveness and anonymity probes
    pub checker: CheckerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: proxy::sources::default_sources(),
            crawler: CrawlerConfig::default(),
            checker: CheckerConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_crawler(mut self, crawler: CrawlerConfig) -> Self {
        self.crawler = crawler;
        self
    }

    pub fn with_checker(mut self, checker: CheckerConfig) -> Self {
        self.checker = checker;
        self
    }
}
