//! Plain-text report of the working proxies

use crate::proxy::models::WorkingProxy;
use std::fmt;

/// Final set of working proxies, ready for printing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub proxies: Vec<WorkingProxy>,
}

impl Report {
    pub fn new(proxies: Vec<WorkingProxy>) -> Self {
        Self { proxies }
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Found {} working proxies:", self.proxies.len())?;
        for proxy in &self.proxies {
            writeln!(f, "{}", proxy)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::models::{AnonymityTier, Candidate};

    #[test]
    fn test_empty_report() {
        let report = Report::default();
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "Found 0 working proxies:\n");
    }

    #[test]
    fn test_report_lines() {
        let report = Report::new(vec![
            WorkingProxy::new(Candidate::new("1.2.3.4:8080"))
                .with_anonymity(AnonymityTier::Elite),
            WorkingProxy::new(Candidate::new("socks5://5.6.7.8:1080"))
                .with_anonymity(AnonymityTier::Transparent),
        ]);

        assert_eq!(
            report.to_string(),
            "Found 2 working proxies:\n\
             1.2.3.4:8080 - Type: Unknown, Protocol: Unknown, Anonymity: Elite\n\
             socks5://5.6.7.8:1080 - Type: SOCKS5 Proxy, Protocol: SOCKS, Anonymity: Transparent\n"
        );
    }
}
