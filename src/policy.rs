//! Navigation policy: decides whether a requested URL stays inside the
//! webview or is handed to the system's default URL handler.
//!
//! The decision is a pure function of the URL and the configured host, so
//! it can be tested without a running engine. Dispatching the diverted URL
//! is the job of [`crate::external::Navigator`].

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// The webview loads the URL itself.
    KeepInternal,
    /// The webview must not load the URL; it is opened elsewhere.
    DivertExternal,
}

/// How a URL's host is compared against the configured internal host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostMatch {
    /// Exact host or a dot-bounded subdomain of it.
    #[default]
    Domain,
    /// Plain string suffix. `notexample.com` matches `example.com`.
    Suffix,
}

impl HostMatch {
    fn matches(self, host: &str, internal: &str) -> bool {
        if internal.is_empty() {
            return false;
        }
        match self {
            Self::Suffix => host.ends_with(internal),
            Self::Domain => {
                host == internal
                    || host
                        .strip_suffix(internal)
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
        }
    }
}

/// Per-request navigation policy.
#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    internal_host: String,
    host_match: HostMatch,
}

impl NavigationPolicy {
    pub fn new(internal_host: &str, host_match: HostMatch) -> Self {
        let internal_host = normalize_host(internal_host);
        if internal_host.is_empty() {
            warn!("No internal host configured, every web navigation will be diverted");
        }
        Self {
            internal_host,
            host_match,
        }
    }

    pub fn internal_host(&self) -> &str {
        &self.internal_host
    }

    pub fn host_match(&self) -> HostMatch {
        self.host_match
    }

    /// Evaluates the rules in order: local files, then the host match,
    /// then divert everything else. Never fails: a URL that does not parse
    /// simply has no host.
    pub fn decide(&self, url: &str) -> NavigationDecision {
        let parsed = Url::parse(url).ok();

        let is_file = match &parsed {
            Some(u) => u.scheme() == "file",
            None => has_file_prefix(url),
        };
        if is_file {
            return NavigationDecision::KeepInternal;
        }

        let host_matches = parsed
            .as_ref()
            .and_then(|u| u.host_str())
            .map(normalize_host)
            .is_some_and(|host| self.host_match.matches(&host, &self.internal_host));

        if host_matches {
            NavigationDecision::KeepInternal
        } else {
            NavigationDecision::DivertExternal
        }
    }
}

fn has_file_prefix(url: &str) -> bool {
    url.trim_start()
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("file:"))
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_start_matches('.');
    host.strip_suffix('.').unwrap_or(host).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> NavigationPolicy {
        NavigationPolicy::new("example.com", HostMatch::Domain)
    }

    fn suffix() -> NavigationPolicy {
        NavigationPolicy::new("example.com", HostMatch::Suffix)
    }

    #[test]
    fn test_subdomain_stays_internal() {
        for policy in [domain(), suffix()] {
            assert_eq!(
                policy.decide("https://sub.example.com/page"),
                NavigationDecision::KeepInternal
            );
        }
    }

    #[test]
    fn test_exact_host_stays_internal() {
        assert_eq!(
            domain().decide("http://example.com"),
            NavigationDecision::KeepInternal
        );
    }

    #[test]
    fn test_foreign_host_is_diverted() {
        for policy in [domain(), suffix()] {
            assert_eq!(
                policy.decide("https://evil.com/"),
                NavigationDecision::DivertExternal
            );
        }
    }

    #[test]
    fn test_suffix_mode_keeps_lookalike_domain() {
        assert_eq!(
            suffix().decide("https://notexample.com/"),
            NavigationDecision::KeepInternal
        );
    }

    #[test]
    fn test_domain_mode_rejects_lookalike_domain() {
        assert_eq!(
            domain().decide("https://notexample.com/"),
            NavigationDecision::DivertExternal
        );
    }

    #[test]
    fn test_file_urls_stay_internal_whatever_the_host() {
        for policy in [domain(), suffix()] {
            assert_eq!(
                policy.decide("file:///home/user/index.html"),
                NavigationDecision::KeepInternal
            );
            assert_eq!(
                policy.decide("file://evil.com/share/page.html"),
                NavigationDecision::KeepInternal
            );
            assert_eq!(
                policy.decide("FILE:///tmp/x.html"),
                NavigationDecision::KeepInternal
            );
        }
    }

    #[test]
    fn test_malformed_url_is_diverted() {
        assert_eq!(
            domain().decide("not a url at all"),
            NavigationDecision::DivertExternal
        );
        assert_eq!(
            domain().decide("https://"),
            NavigationDecision::DivertExternal
        );
    }

    #[test]
    fn test_hostless_schemes_are_diverted() {
        assert_eq!(
            domain().decide("mailto:someone@example.com"),
            NavigationDecision::DivertExternal
        );
        assert_eq!(
            domain().decide("tel:+15555550100"),
            NavigationDecision::DivertExternal
        );
    }

    #[test]
    fn test_host_comparison_ignores_case_and_root_dot() {
        let policy = NavigationPolicy::new("Example.COM.", HostMatch::Domain);
        assert_eq!(policy.internal_host(), "example.com");
        assert_eq!(
            policy.decide("https://WWW.EXAMPLE.COM./"),
            NavigationDecision::KeepInternal
        );
    }

    #[test]
    fn test_empty_internal_host_matches_nothing() {
        let policy = NavigationPolicy::new("", HostMatch::Suffix);
        assert_eq!(
            policy.decide("https://example.com/"),
            NavigationDecision::DivertExternal
        );
        assert_eq!(
            policy.decide("file:///tmp/a.html"),
            NavigationDecision::KeepInternal
        );
    }

    #[test]
    fn test_host_match_deserializes_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            host_match: HostMatch,
        }
        let w: Wrapper = toml::from_str("host_match = \"suffix\"").unwrap();
        assert_eq!(w.host_match, HostMatch::Suffix);
    }
}
