//! Public proxy listing pages used as harvest sources

use crate::Result;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Built-in listing pages. Repeats are intentional; they are removed by
/// [`dedup_sources`] before fetching.
pub const DEFAULT_SOURCES: &[&str] = &[
    "https://www.sslproxies.org/",
    "https://free-proxy-list.net/",
    "https://www.proxynova.com/proxy-server-list/",
    "https://www.proxy-list.download/api/v1/get?type=https",
    "https://www.proxy-list.download/api/v1/get?type=http",
    "https://www.proxy-list.download/api/v1/get?type=socks4",
    "https://www.proxy-list.download/api/v1/get?type=socks5",
    "https://www.socks-proxy.net/",
    "https://www.proxysource.org/",
    "https://hidemy.name/en/proxy-list/",
    "https://www.socks-proxy.net/",
    "https://www.proxydocker.com/en/proxylist/country/US",
    "https://spys.one/en/",
    "https://www.freeproxylists.net/",
    "https://www.proxy-list.org/english/index.php",
    "https://www.us-proxy.org/",
    "https://proxyscrape.com/free-proxy-list",
    "https://www.proxyscan.io/",
    "https://www.proxydocker.com/en/proxylist/",
    "https://www.proxy-list.download/SOCKS5",
    "https://free-proxy-list.net/anonymous-proxy.html",
    "https://www.my-proxy.com/",
    "https://proxy-rack.com/",
    "https://www.proxyrack.com/proxy-lists/",
    "https://proxyscrape.com/",
    "https://premproxy.com/",
    "https://free-proxy.cz/",
    "https://free-proxy-list.net/uk-proxy.html",
    "https://free-proxy-list.net/anonymous-proxy.html",
    "https://www.proxy-list.net/anonymous-proxy-lists.shtml",
    "https://www.proxy-listen.de/Proxy/Proxyliste.html",
    "https://www.proxyserverlist24.top/",
    "https://www.proxy-daily.com/",
    "https://www.proxylists.net/",
    "https://www.proxyservers.pro/",
    "https://www.proxy-list.download/HTTP",
    "https://www.proxy-list.download/HTTPS",
    "https://www.proxy-list.download/SOCKS4",
    "https://www.proxy-list.download/SOCKS5",
    "https://www.proxyscrape.com/",
    "https://www.proxy-list.download/anonymous-proxy-list",
    "https://www.proxyscan.io/",
    "https://www.proxy-daily.com/",
    "https://www.proxy-listen.de/Proxy/Proxyliste.html",
    "https://www.proxyserverlist24.top/",
    "https://www.my-proxy.com/",
    "https://free-proxy-list.net/",
    "https://www.proxy-list.org/",
    "https://www.sslproxies.org/",
    "https://hidemy.name/en/proxy-list/",
    "https://www.socks-proxy.net/",
    "https://proxyscrape.com/free-proxy-list",
    "https://www.freeproxylists.net/",
    "https://spys.one/en/",
    "https://www.us-proxy.org/",
    "https://www.proxydocker.com/en/proxylist/",
    "https://checkerproxy.net/",
    "https://proxy-rack.com/",
    "https://www.proxyrack.com/proxy-lists/",
    "https://premproxy.com/",
];

/// Get the built-in source list as owned strings
pub fn default_sources() -> Vec<String> {
    DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect()
}

/// Parse a source list, one URL per line.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_sources(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Load a source list from a file
pub fn load_sources_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_sources(&content))
}

/// Remove repeated sources, keeping the first occurrence of each
pub fn dedup_sources(sources: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    sources
        .iter()
        .filter(|source| seen.insert(source.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources() {
        let sources = default_sources();
        assert!(!sources.is_empty());
        for source in &sources {
            assert!(source.starts_with("https://"));
        }
    }

    #[test]
    fn test_dedup_sources_keeps_order() {
        let sources = vec![
            "https://b.example/".to_string(),
            "https://a.example/".to_string(),
            "https://b.example/".to_string(),
        ];
        assert_eq!(
            dedup_sources(&sources),
            vec!["https://b.example/".to_string(), "https://a.example/".to_string()]
        );
    }

    #[test]
    fn test_default_sources_contain_repeats() {
        let sources = default_sources();
        assert!(dedup_sources(&sources).len() < sources.len());
    }

    #[test]
    fn test_parse_sources_skips_comments() {
        let content = r#"
# listing pages
https://a.example/list

   https://b.example/list
# trailing comment
"#;
        assert_eq!(
            parse_sources(content),
            vec!["https://a.example/list".to_string(), "https://b.example/list".to_string()]
        );
    }
}
