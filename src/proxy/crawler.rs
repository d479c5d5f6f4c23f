//! Proxy crawler module for harvesting candidates from listing pages
//!
//! This module provides functionality for:
//! - Fetching every configured source concurrently with bounded retries
//! - Decoding bodies leniently and extracting `host:port` candidates
//! - Merging all discovered candidates into one deduplicated set

use crate::proxy::error::ProbeError;
use crate::proxy::extractor::ProxyExtractor;
use crate::proxy::fanout::run_bounded;
use crate::proxy::models::CandidateSet;
use crate::proxy::sources::dedup_sources;
use crate::Result;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per source
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default number of sources fetched at once
const DEFAULT_CONCURRENCY: usize = 64;

/// Default user agent for HTTP requests
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Certificate policy for source fetches.
///
/// Listing pages are low-trust and several of them serve broken
/// certificates, so invalid certificates are accepted unless asked otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsPolicy {
    #[default]
    AcceptInvalid,
    Verify,
}

/// Result of crawling a single source
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// The source that was crawled
    pub source: String,
    /// Candidates extracted from the source
    pub candidates: CandidateSet,
    /// Number of fetch attempts made
    pub attempts: u32,
    /// Last error if every attempt failed
    pub error: Option<ProbeError>,
}

impl CrawlResult {
    /// Create a successful crawl result
    pub fn success(source: String, candidates: CandidateSet, attempts: u32) -> Self {
        Self {
            source,
            candidates,
            attempts,
            error: None,
        }
    }

    /// Create a failed crawl result
    pub fn failure(source: String, error: ProbeError, attempts: u32) -> Self {
        Self {
            source,
            candidates: CandidateSet::new(),
            attempts,
            error: Some(error),
        }
    }

    /// Check if the crawl was successful
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Configuration for proxy crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Timeout for HTTP requests
    pub timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: String,
    /// Attempts per source before giving up on it
    pub max_attempts: u32,
    /// Sources fetched at once
    pub concurrency: usize,
    /// Certificate policy for source fetches
    pub tls_policy: TlsPolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            concurrency: DEFAULT_CONCURRENCY,
            tls_policy: TlsPolicy::default(),
        }
    }
}

impl CrawlerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_tls_policy(mut self, tls_policy: TlsPolicy) -> Self {
        self.tls_policy = tls_policy;
        self
    }
}

/// Proxy crawler for harvesting candidates from listing pages
pub struct ProxyCrawler {
    config: CrawlerConfig,
    client: Client,
}

impl ProxyCrawler {
    /// Create a new proxy crawler with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(CrawlerConfig::default())
    }

    /// Create a new proxy crawler with custom configuration
    pub fn with_config(config: CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(config.tls_policy == TlsPolicy::AcceptInvalid)
            .no_proxy()
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Fetch a single URL once, returning its leniently decoded body
    pub async fn fetch_once(&self, url: &str) -> std::result::Result<String, ProbeError> {
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(ProbeError::Status(response.status().as_u16()));
        }
        let body = response.bytes().await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Fetch a source with retries and extract its candidates.
    ///
    /// Transport failures and non-200 responses are retried immediately up
    /// to `max_attempts` times in total.
    pub async fn crawl_source(&self, source: &str) -> CrawlResult {
        let max_attempts = self.config.max_attempts.max(1);
        let mut last_error = ProbeError::Transport("no attempt made".to_string());

        for attempt in 1..=max_attempts {
            match self.fetch_once(source).await {
                Ok(body) => {
                    let candidates = ProxyExtractor::extract(&body);
                    debug!(
                        source,
                        attempt,
                        found = candidates.len(),
                        "fetched source"
                    );
                    return CrawlResult::success(source.to_string(), candidates, attempt);
                }
                Err(e) => {
                    debug!(source, attempt, error = %e, "fetch attempt failed");
                    last_error = e;
                }
            }
        }

        CrawlResult::failure(source.to_string(), last_error, max_attempts)
    }

    /// Crawl every source concurrently, returning one result per distinct source
    pub async fn crawl_sources_with_results(&self, sources: &[String]) -> Vec<CrawlResult> {
        let sources = dedup_sources(sources);
        run_bounded(sources.iter(), self.config.concurrency, |source| {
            self.crawl_source(source)
        })
        .await
    }

    /// Crawl every source and merge the results into one candidate set.
    ///
    /// Returns only after every source has succeeded or exhausted its attempts.
    pub async fn harvest(&self, sources: &[String]) -> CandidateSet {
        let results = self.crawl_sources_with_results(sources).await;

        let mut candidates = CandidateSet::new();
        let mut succeeded = 0;
        for result in &results {
            if result.is_success() {
                succeeded += 1;
                candidates.merge(result.candidates.clone());
            }
        }

        info!(
            sources = results.len(),
            succeeded,
            candidates = candidates.len(),
            "harvest complete"
        );
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawler_config_default() {
        let config = CrawlerConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.tls_policy, TlsPolicy::AcceptInvalid);
    }

    #[test]
    fn test_crawler_config_builder() {
        let config = CrawlerConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("Custom Agent".to_string())
            .with_max_attempts(5)
            .with_concurrency(8)
            .with_tls_policy(TlsPolicy::Verify);

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "Custom Agent");
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.tls_policy, TlsPolicy::Verify);
    }

    #[test]
    fn test_crawl_result_success() {
        let candidates = ProxyExtractor::extract("192.168.1.1:8080 192.168.1.2:3128");
        let result = CrawlResult::success("test-source".to_string(), candidates, 1);
        assert!(result.is_success());
        assert_eq!(result.source, "test-source");
        assert_eq!(result.candidates.len(), 2);
        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn test_crawl_result_failure() {
        let result = CrawlResult::failure("test-source".to_string(), ProbeError::Status(503), 3);
        assert!(!result.is_success());
        assert!(result.candidates.is_empty());
        assert_eq!(result.error, Some(ProbeError::Status(503)));
    }

    #[tokio::test]
    async fn test_unreachable_source_gives_up() {
        let config = CrawlerConfig::new()
            .with_timeout(Duration::from_secs(2))
            .with_max_attempts(2);
        let crawler = ProxyCrawler::with_config(config).unwrap();

        let result = crawler.crawl_source("http://127.0.0.1:1/list").await;
        assert!(!result.is_success());
        assert_eq!(result.attempts, 2);
        assert!(result.candidates.is_empty());
    }
}
