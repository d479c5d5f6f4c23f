//! Endpoint extractor for pulling `host:port` candidates out of raw page text

use crate::proxy::models::{Candidate, CandidateSet};
use once_cell::sync::Lazy;
use regex::Regex;

/// Four dot-separated ASCII decimal groups, a colon, and a decimal port.
///
/// Octet ranges and port width are not checked here.
static CANDIDATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{1,3}(?:\.[0-9]{1,3}){3}:[0-9]+").expect("Invalid candidate regex")
});

/// Extractor for proxy candidates embedded in free text
pub struct ProxyExtractor;

impl ProxyExtractor {
    /// Extract every non-overlapping `host:port` match from the text
    pub fn extract(text: &str) -> CandidateSet {
        CANDIDATE_REGEX
            .find_iter(text)
            .map(|m| Candidate::new(m.as_str()))
            .collect()
    }

    /// Extract candidates from raw bytes, replacing invalid UTF-8
    pub fn extract_bytes(bytes: &[u8]) -> CandidateSet {
        Self::extract(&String::from_utf8_lossy(bytes))
    }
}
