//! Proxy checker module for confirming that candidates relay requests

use crate::proxy::error::ProbeError;
use crate::proxy::fanout::run_bounded;
use crate::proxy::models::{Candidate, CandidateSet, ProxyCheckResult, WorkingProxy};
use async_trait::async_trait;
use reqwest::{Client, Proxy as ReqwestProxy, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default deadline for proxy probes in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default number of concurrent probes
const DEFAULT_CONCURRENCY: usize = 256;

/// Default URL to test proxies against.
///
/// It only echoes `origin`, so anonymity probes against it see no marker
/// headers and report every live proxy as Elite. Use a header-echoing
/// target such as `http://httpbin.org/get` for meaningful tiers.
pub const DEFAULT_TEST_URL: &str = "http://httpbin.org/ip";

/// Configuration for proxy probes
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Deadline for each probe
    pub timeout: Duration,
    /// Number of concurrent probes
    pub concurrency: usize,
    /// URL to test proxies against
    pub test_url: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            test_url: DEFAULT_TEST_URL.to_string(),
        }
    }
}

impl CheckerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_test_url(mut self, url: String) -> Self {
        self.test_url = url;
        self
    }
}

/// Build a client that routes every request through the candidate.
///
/// reqwest binds proxies per client, so each probe gets its own client.
pub(crate) fn proxied_client(
    candidate: &Candidate,
    timeout: Duration,
) -> Result<Client, ProbeError> {
    let proxy = ReqwestProxy::all(candidate.proxy_url())
        .map_err(|e| ProbeError::Transport(e.to_string()))?;

    Client::builder()
        .proxy(proxy)
        .timeout(timeout)
        .pool_max_idle_per_host(0)
        .build()
        .map_err(|e| ProbeError::Transport(e.to_string()))
}

/// Single-attempt liveness probe for one candidate
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn check(&self, candidate: &Candidate) -> ProxyCheckResult;
}

/// Proxy checker for validating candidates against the test URL
#[derive(Debug, Clone, Default)]
pub struct ProxyChecker {
    config: CheckerConfig,
}

impl ProxyChecker {
    /// Create a new proxy checker with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new proxy checker with custom configuration
    pub fn with_config(config: CheckerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check a single candidate
    pub async fn check_proxy(&self, candidate: &Candidate) -> ProxyCheckResult {
        let start = Instant::now();

        match self.probe(candidate).await {
            Ok(()) => {
                let elapsed = start.elapsed().as_millis() as u64;
                ProxyCheckResult::working(candidate.clone(), elapsed)
            }
            Err(e) => {
                debug!(candidate = %candidate, error = %e, "liveness probe failed");
                ProxyCheckResult::failed(candidate.clone(), e)
            }
        }
    }

    async fn probe(&self, candidate: &Candidate) -> Result<(), ProbeError> {
        let client = proxied_client(candidate, self.config.timeout)?;

        let response = tokio::time::timeout(
            self.config.timeout,
            client.get(&self.config.test_url).send(),
        )
        .await
        .map_err(|_| ProbeError::Timeout)??;

        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(ProbeError::Status(response.status().as_u16()))
        }
    }

    /// Check multiple candidates concurrently
    pub async fn check_proxies(&self, candidates: Vec<Candidate>) -> Vec<ProxyCheckResult> {
        check_all(self, candidates, self.config.concurrency).await
    }

    /// Check candidates and separate into good and bad results
    pub async fn check_and_separate(
        &self,
        candidates: Vec<Candidate>,
    ) -> (Vec<ProxyCheckResult>, Vec<ProxyCheckResult>) {
        let results = self.check_proxies(candidates).await;

        let (good, bad): (Vec<_>, Vec<_>) = results.into_iter().partition(|r| r.is_working());

        (good, bad)
    }
}

#[async_trait]
impl LivenessProbe for ProxyChecker {
    async fn check(&self, candidate: &Candidate) -> ProxyCheckResult {
        self.check_proxy(candidate).await
    }
}

/// Probe every candidate with at most `concurrency` probes in flight
pub async fn check_all<P: LivenessProbe + ?Sized>(
    probe: &P,
    candidates: Vec<Candidate>,
    concurrency: usize,
) -> Vec<ProxyCheckResult> {
    run_bounded(candidates, concurrency, |candidate| async move {
        probe.check(&candidate).await
    })
    .await
}

/// Keep the candidates whose probe succeeded.
///
/// Failures only remove the failing candidate; the stage returns once every
/// probe has settled.
pub async fn validate<P: LivenessProbe + ?Sized>(
    probe: &P,
    candidates: &CandidateSet,
    concurrency: usize,
) -> Vec<WorkingProxy> {
    let results = check_all(probe, candidates.to_sorted_vec(), concurrency).await;
    let checked = results.len();

    let working: Vec<WorkingProxy> = results
        .into_iter()
        .filter_map(ProxyCheckResult::into_working)
        .collect();

    info!(checked, working = working.len(), "validation complete");
    working
}
