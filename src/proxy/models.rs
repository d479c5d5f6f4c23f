//! Proxy data models

use crate::proxy::error::ProbeError;
use serde::{Deserialize, Serialize};
use std::collections::{hash_set, HashSet};
use std::fmt;

/// Scheme used when a candidate carries none
const DEFAULT_SCHEME: &str = "http";

/// Proxy type inferred from an explicit scheme prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProxyType {
    Http,
    Https,
    Socks4,
    Socks5,
    #[default]
    Unknown,
}

impl ProxyType {
    /// Infer the proxy type from a `scheme://` prefix
    pub fn infer(address: &str) -> Self {
        if address.starts_with("http://") {
            ProxyType::Http
        } else if address.starts_with("https://") {
            ProxyType::Https
        } else if address.starts_with("socks4://") {
            ProxyType::Socks4
        } else if address.starts_with("socks5://") {
            ProxyType::Socks5
        } else {
            ProxyType::Unknown
        }
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyType::Http => write!(f, "HTTP Proxy"),
            ProxyType::Https => write!(f, "HTTPS Proxy"),
            ProxyType::Socks4 => write!(f, "SOCKS4 Proxy"),
            ProxyType::Socks5 => write!(f, "SOCKS5 Proxy"),
            ProxyType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Protocol family spoken by the proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Protocol {
    Http,
    Https,
    Socks,
    #[default]
    Unknown,
}

impl Protocol {
    /// Infer the protocol family from a `scheme://` prefix
    pub fn infer(address: &str) -> Self {
        match ProxyType::infer(address) {
            ProxyType::Http => Protocol::Http,
            ProxyType::Https => Protocol::Https,
            ProxyType::Socks4 | ProxyType::Socks5 => Protocol::Socks,
            ProxyType::Unknown => Protocol::Unknown,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => write!(f, "HTTP"),
            Protocol::Https => write!(f, "HTTPS"),
            Protocol::Socks => write!(f, "SOCKS"),
            Protocol::Unknown => write!(f, "Unknown"),
        }
    }
}

/// How much of the original client a proxy reveals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AnonymityTier {
    /// Forwards both the client address and the proxy marker
    Transparent,
    /// Hides the proxy marker but leaks the client address
    Anonymous,
    /// Strips both identifying headers
    Elite,
    #[default]
    Unknown,
}

impl fmt::Display for AnonymityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnonymityTier::Transparent => write!(f, "Transparent"),
            AnonymityTier::Anonymous => write!(f, "Anonymous"),
            AnonymityTier::Elite => write!(f, "Elite"),
            AnonymityTier::Unknown => write!(f, "Unknown"),
        }
    }
}

/// An unvalidated `host:port` endpoint scraped from a source page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Candidate(String);

impl Candidate {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the URL used to route a request through this candidate.
    ///
    /// Bare `host:port` candidates are treated as plain HTTP proxies.
    pub fn proxy_url(&self) -> String {
        if self.0.contains("://") {
            self.0.clone()
        } else {
            format!("{}://{}", DEFAULT_SCHEME, self.0)
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Candidate {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

/// Deduplicated set of candidates.
///
/// Only the stage that owns it writes to it; concurrent tasks hand their
/// results back to that owner instead of inserting directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    inner: HashSet<Candidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a candidate, returning `false` if it was already present
    pub fn insert(&mut self, candidate: Candidate) -> bool {
        self.inner.insert(candidate)
    }

    /// Union another set into this one
    pub fn merge(&mut self, other: CandidateSet) {
        self.inner.extend(other.inner);
    }

    pub fn contains(&self, candidate: &Candidate) -> bool {
        self.inner.contains(candidate)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, Candidate> {
        self.inner.iter()
    }

    /// Candidates in ascending order
    pub fn to_sorted_vec(&self) -> Vec<Candidate> {
        let mut candidates: Vec<_> = self.inner.iter().cloned().collect();
        candidates.sort();
        candidates
    }
}

impl FromIterator<Candidate> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CandidateSet {
    type Item = Candidate;
    type IntoIter = hash_set::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = hash_set::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

/// A candidate confirmed to relay requests to the test target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingProxy {
    pub candidate: Candidate,
    pub proxy_type: ProxyType,
    pub protocol: Protocol,
    pub anonymity: AnonymityTier,
    pub response_time_ms: Option<u64>,
}

impl WorkingProxy {
    /// Create a working proxy, inferring its type and protocol
    pub fn new(candidate: Candidate) -> Self {
        let proxy_type = ProxyType::infer(candidate.as_str());
        let protocol = Protocol::infer(candidate.as_str());
        Self {
            candidate,
            proxy_type,
            protocol,
            anonymity: AnonymityTier::Unknown,
            response_time_ms: None,
        }
    }

    pub fn with_response_time(mut self, response_time_ms: u64) -> Self {
        self.response_time_ms = Some(response_time_ms);
        self
    }

    pub fn with_anonymity(mut self, anonymity: AnonymityTier) -> Self {
        self.anonymity = anonymity;
        self
    }
}

impl fmt::Display for WorkingProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Type: {}, Protocol: {}, Anonymity: {}",
            self.candidate, self.proxy_type, self.protocol, self.anonymity
        )
    }
}

/// Result of a liveness probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyCheckStatus {
    Working,
    Failed(ProbeError),
}

/// Detailed result of a liveness probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyCheckResult {
    pub candidate: Candidate,
    pub status: ProxyCheckStatus,
    pub response_time_ms: Option<u64>,
}

impl ProxyCheckResult {
    pub fn working(candidate: Candidate, response_time_ms: u64) -> Self {
        Self {
            candidate,
            status: ProxyCheckStatus::Working,
            response_time_ms: Some(response_time_ms),
        }
    }

    pub fn failed(candidate: Candidate, error: ProbeError) -> Self {
        Self {
            candidate,
            status: ProxyCheckStatus::Failed(error),
            response_time_ms: None,
        }
    }

    pub fn is_working(&self) -> bool {
        matches!(self.status, ProxyCheckStatus::Working)
    }

    /// Convert a successful probe into a working proxy
    pub fn into_working(self) -> Option<WorkingProxy> {
        match self.status {
            ProxyCheckStatus::Working => {
                let proxy = WorkingProxy::new(self.candidate);
                Some(match self.response_time_ms {
                    Some(ms) => proxy.with_response_time(ms),
                    None => proxy,
                })
            }
            ProxyCheckStatus::Failed(_) => None,
        }
    }
}
