//! Anonymity classification from the test target's header echo

use crate::proxy::checker::{proxied_client, CheckerConfig};
use crate::proxy::error::ProbeError;
use crate::proxy::fanout::run_bounded;
use crate::proxy::models::{AnonymityTier, Candidate, WorkingProxy};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Marker revealing the client address
pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";
pub const FORWARDED_FOR_MARKER: &str = "1.1.1.1";

/// Marker revealing that a proxy is in use
pub const VIA_HEADER: &str = "Via";
pub const VIA_MARKER: &str = "1.1 proxy";

/// Request metadata echoed back by the test target.
///
/// Only `headers` drives classification; `origin` is kept as whatever JSON
/// the target sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeaderEcho {
    #[serde(default)]
    pub origin: Option<Value>,
    #[serde(default)]
    pub headers: Map<String, Value>,
}

impl HeaderEcho {
    /// Parse an echo body
    pub fn from_slice(body: &[u8]) -> Result<Self, ProbeError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Whether the echo carries a truthy value for the header
    pub fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .is_some_and(|(_, value)| is_truthy(value))
    }

    pub fn tier(&self) -> AnonymityTier {
        tier_from_markers(self.has_header(FORWARDED_FOR_HEADER), self.has_header(VIA_HEADER))
    }
}

/// Null, `false`, zero and empty strings, arrays or objects count as absent
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Map echoed markers to a tier.
///
/// A `Via` echo without `X-Forwarded-For` is left unclassified.
pub fn tier_from_markers(forwarded_for: bool, via: bool) -> AnonymityTier {
    match (forwarded_for, via) {
        (true, true) => AnonymityTier::Transparent,
        (true, false) => AnonymityTier::Anonymous,
        (false, false) => AnonymityTier::Elite,
        (false, true) => AnonymityTier::Unknown,
    }
}

/// Single-attempt anonymity probe for one working proxy
#[async_trait]
pub trait AnonymityProbe: Send + Sync {
    async fn classify(&self, candidate: &Candidate) -> AnonymityTier;
}

/// Classifies proxies by sending marker headers through them
#[derive(Debug, Clone, Default)]
pub struct AnonymityChecker {
    config: CheckerConfig,
}

impl AnonymityChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CheckerConfig) -> Self {
        Self { config }
    }

    /// Send the marker request and parse the echo
    pub async fn probe(&self, candidate: &Candidate) -> Result<HeaderEcho, ProbeError> {
        let client = proxied_client(candidate, self.config.timeout)?;

        let request = client
            .get(&self.config.test_url)
            .header(FORWARDED_FOR_HEADER, FORWARDED_FOR_MARKER)
            .header(VIA_HEADER, VIA_MARKER);

        let body = tokio::time::timeout(self.config.timeout, async {
            let response = request.send().await?;
            if response.status() != StatusCode::OK {
                return Err(ProbeError::Status(response.status().as_u16()));
            }
            Ok::<_, ProbeError>(response.bytes().await?)
        })
        .await
        .map_err(|_| ProbeError::Timeout)??;

        HeaderEcho::from_slice(&body)
    }
}

#[async_trait]
impl AnonymityProbe for AnonymityChecker {
    async fn classify(&self, candidate: &Candidate) -> AnonymityTier {
        match self.probe(candidate).await {
            Ok(echo) => echo.tier(),
            Err(e) => {
                debug!(candidate = %candidate, error = %e, "anonymity probe failed");
                AnonymityTier::Unknown
            }
        }
    }
}

/// Classify every working proxy with at most `concurrency` probes in flight
pub async fn classify_all<C: AnonymityProbe + ?Sized>(
    probe: &C,
    proxies: Vec<WorkingProxy>,
    concurrency: usize,
) -> Vec<WorkingProxy> {
    let classified = run_bounded(proxies, concurrency, |proxy| async move {
        let tier = probe.classify(&proxy.candidate).await;
        proxy.with_anonymity(tier)
    })
    .await;

    info!(classified = classified.len(), "classification complete");
    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_table() {
        assert_eq!(tier_from_markers(true, true), AnonymityTier::Transparent);
        assert_eq!(tier_from_markers(true, false), AnonymityTier::Anonymous);
        assert_eq!(tier_from_markers(false, false), AnonymityTier::Elite);
        assert_eq!(tier_from_markers(false, true), AnonymityTier::Unknown);
    }

    #[test]
    fn test_echo_with_both_markers() {
        let body = br#"{"origin": "9.9.9.9", "headers": {"X-Forwarded-For": "1.1.1.1", "Via": "1.1 proxy", "Host": "httpbin.org"}}"#;
        let echo = HeaderEcho::from_slice(body).unwrap();
        assert_eq!(echo.origin, Some(Value::from("9.9.9.9")));
        assert_eq!(echo.tier(), AnonymityTier::Transparent);
    }

    #[test]
    fn test_echo_with_forwarded_for_only() {
        let body = br#"{"headers": {"X-Forwarded-For": "1.1.1.1"}}"#;
        assert_eq!(HeaderEcho::from_slice(body).unwrap().tier(), AnonymityTier::Anonymous);
    }

    #[test]
    fn test_echo_without_markers() {
        let body = br#"{"origin": "9.9.9.9", "headers": {"Host": "httpbin.org"}}"#;
        assert_eq!(HeaderEcho::from_slice(body).unwrap().tier(), AnonymityTier::Elite);

        let body = br#"{"origin": "9.9.9.9"}"#;
        assert_eq!(HeaderEcho::from_slice(body).unwrap().tier(), AnonymityTier::Elite);
    }

    #[test]
    fn test_echo_header_names_are_case_insensitive() {
        let body = br#"{"headers": {"x-forwarded-for": "1.1.1.1", "via": "1.1 proxy"}}"#;
        assert_eq!(HeaderEcho::from_slice(body).unwrap().tier(), AnonymityTier::Transparent);
    }

    #[test]
    fn test_empty_marker_counts_as_absent() {
        let body = br#"{"headers": {"X-Forwarded-For": "", "Via": ""}}"#;
        assert_eq!(HeaderEcho::from_slice(body).unwrap().tier(), AnonymityTier::Elite);
    }

    #[test]
    fn test_origin_of_any_shape_is_accepted() {
        let body = br#"{"origin": null, "headers": {"X-Forwarded-For": "1.1.1.1", "Via": "1.1 proxy"}}"#;
        assert_eq!(HeaderEcho::from_slice(body).unwrap().tier(), AnonymityTier::Transparent);

        let body = br#"{"origin": ["9.9.9.9"], "headers": {"X-Forwarded-For": "1.1.1.1"}}"#;
        assert_eq!(HeaderEcho::from_slice(body).unwrap().tier(), AnonymityTier::Anonymous);

        let body = br#"{"origin": 42, "headers": {}}"#;
        assert_eq!(HeaderEcho::from_slice(body).unwrap().tier(), AnonymityTier::Elite);
    }

    #[test]
    fn test_non_string_markers_count_as_echoed() {
        let body = br#"{"headers": {"X-Forwarded-For": ["1.1.1.1"], "Via": ["1.1 proxy"]}}"#;
        assert_eq!(HeaderEcho::from_slice(body).unwrap().tier(), AnonymityTier::Transparent);

        let body = br#"{"headers": {"X-Forwarded-For": [], "Via": null}}"#;
        assert_eq!(HeaderEcho::from_slice(body).unwrap().tier(), AnonymityTier::Elite);
    }

    #[test]
    fn test_malformed_echo_is_decode_error() {
        assert!(matches!(
            HeaderEcho::from_slice(b"<html>blocked</html>"),
            Err(ProbeError::Decode(_))
        ));
        assert!(matches!(HeaderEcho::from_slice(b"[1, 2]"), Err(ProbeError::Decode(_))));
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_unknown() {
        let checker = AnonymityChecker::with_config(
            CheckerConfig::new().with_timeout(std::time::Duration::from_secs(2)),
        );
        let tier = checker.classify(&Candidate::new("127.0.0.1:1")).await;
        assert_eq!(tier, AnonymityTier::Unknown);
    }
}
