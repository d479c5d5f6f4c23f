//! Proxy module for harvesting, validating and classifying proxies
//!
//! This module provides functionality for:
//! - Extracting `host:port` candidates from raw listing pages
//! - Fetching many listing pages concurrently with bounded retries
//! - Checking which candidates relay requests to a test URL
//! - Classifying working proxies by how much they reveal about the client

pub mod anonymity;
pub mod checker;
pub mod crawler;
pub mod error;
pub mod extractor;
pub mod fanout;
pub mod finder;
pub mod models;
pub mod report;
pub mod sources;

pub use anonymity::{AnonymityChecker, AnonymityProbe, HeaderEcho};
pub use checker::{CheckerConfig, LivenessProbe, ProxyChecker};
pub use crawler::{CrawlResult, CrawlerConfig, ProxyCrawler, TlsPolicy};
pub use error::ProbeError;
pub use extractor::ProxyExtractor;
pub use finder::ProxyFinder;
pub use models::{
    AnonymityTier, Candidate, CandidateSet, Protocol, ProxyCheckResult, ProxyCheckStatus,
    ProxyType, WorkingProxy,
};
pub use report::Report;
