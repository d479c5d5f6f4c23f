//! Pipeline that harvests, validates and classifies proxies
//!
//! Stages run strictly one after another: every fetch settles before the
//! first probe is sent, and every liveness probe settles before the first
//! anonymity probe.

use crate::proxy::anonymity::{classify_all, AnonymityChecker, AnonymityProbe};
use crate::proxy::checker::{validate, LivenessProbe, ProxyChecker};
use crate::proxy::crawler::ProxyCrawler;
use crate::proxy::models::{CandidateSet, WorkingProxy};
use crate::proxy::report::Report;
use crate::{Config, Result};
use std::collections::HashSet;
use tracing::info;

/// Proxy finder running the full pipeline
pub struct ProxyFinder<V = ProxyChecker, C = AnonymityChecker> {
    config: Config,
    crawler: ProxyCrawler,
    validator: V,
    classifier: C,
}

impl ProxyFinder {
    /// Create a finder with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create a finder using the HTTP probes built from the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let crawler = ProxyCrawler::with_config(config.crawler.clone())?;
        let validator = ProxyChecker::with_config(config.checker.clone());
        let classifier = AnonymityChecker::with_config(config.checker.clone());
        Ok(Self::with_probes(config, crawler, validator, classifier))
    }
}

impl<V, C> ProxyFinder<V, C>
where
    V: LivenessProbe,
    C: AnonymityProbe,
{
    /// Create a finder with explicit liveness and anonymity probes
    pub fn with_probes(config: Config, crawler: ProxyCrawler, validator: V, classifier: C) -> Self {
        Self {
            config,
            crawler,
            validator,
            classifier,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch every source and collect the candidates they list
    pub async fn harvest(&self) -> CandidateSet {
        self.crawler.harvest(&self.config.sources).await
    }

    /// Keep the candidates that relay a request to the test URL
    pub async fn validate(&self, candidates: &CandidateSet) -> Vec<WorkingProxy> {
        validate(&self.validator, candidates, self.config.checker.concurrency).await
    }

    /// Annotate each working proxy with its anonymity tier
    pub async fn classify(&self, proxies: Vec<WorkingProxy>) -> Vec<WorkingProxy> {
        classify_all(&self.classifier, proxies, self.config.checker.concurrency).await
    }

    /// Run every stage and build the report
    pub async fn run(&self) -> Report {
        let candidates = self.harvest().await;
        let working = dedup_working(self.validate(&candidates).await);
        let classified = dedup_working(self.classify(working).await);

        info!(working = classified.len(), "pipeline complete");
        Report::new(classified)
    }
}

/// Drop repeated candidates and order the rest by address
pub fn dedup_working(proxies: Vec<WorkingProxy>) -> Vec<WorkingProxy> {
    let mut seen = HashSet::new();
    let mut unique: Vec<WorkingProxy> = proxies
        .into_iter()
        .filter(|proxy| seen.insert(proxy.candidate.clone()))
        .collect();
    unique.sort_by(|a, b| a.candidate.cmp(&b.candidate));
    unique
}
