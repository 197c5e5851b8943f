//! Host allow-list using browser match patterns (`<scheme>://<host>/<path>`).
//!
//! Only requests to allowed origins are observed by the host; replayed logs
//! and HAR files are filtered through the same list so they behave alike.

use regex::Regex;
use thiserror::Error;

/// Allow-list used when the config does not provide one.
pub const DEFAULT_ALLOWED_HOSTS: [&str; 4] = [
    "*://*.kaltura.com/*",
    "*://*.podcast.ucsd.edu/*",
    "*://canvas.ucsd.edu/*",
    "*://canvaskaf.ucsd.edu/*",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("match pattern {0:?} is missing \"://\"")]
    MissingScheme(String),
    #[error("match pattern {0:?} is missing a path")]
    MissingPath(String),
    #[error("match pattern {0:?} has an invalid host wildcard")]
    InvalidHost(String),
    #[error("match pattern {0:?} has an empty host")]
    EmptyHost(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostRule {
    Any,
    /// `*.example.com`: the domain itself or any subdomain.
    Domain(String),
    Exact(String),
}

/// One parsed match pattern.
#[derive(Debug, Clone)]
pub struct MatchPattern {
    source: String,
    scheme: Option<String>,
    host: HostRule,
    path: Regex,
}

impl MatchPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let (scheme, rest) = pattern
            .split_once("://")
            .ok_or_else(|| PatternError::MissingScheme(pattern.to_string()))?;
        let slash = rest
            .find('/')
            .ok_or_else(|| PatternError::MissingPath(pattern.to_string()))?;
        let (host, path) = rest.split_at(slash);

        let host = match host {
            "*" => HostRule::Any,
            "" => return Err(PatternError::EmptyHost(pattern.to_string())),
            h => match h.strip_prefix("*.") {
                Some(domain) if !domain.is_empty() && !domain.contains('*') => {
                    HostRule::Domain(domain.to_ascii_lowercase())
                }
                Some(_) => return Err(PatternError::InvalidHost(pattern.to_string())),
                None if h.contains('*') => {
                    return Err(PatternError::InvalidHost(pattern.to_string()))
                }
                None => HostRule::Exact(h.to_ascii_lowercase()),
            },
        };

        let glob = path
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        // Escaped literals joined by `.*` always form a valid regex.
        let path = Regex::new(&format!("^{glob}$")).expect("escaped glob");

        Ok(Self {
            source: pattern.to_string(),
            scheme: (scheme != "*").then(|| scheme.to_ascii_lowercase()),
            host,
            path,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, url: &url::Url) -> bool {
        let scheme_ok = match &self.scheme {
            Some(s) => url.scheme() == s,
            None => matches!(url.scheme(), "http" | "https"),
        };
        if !scheme_ok {
            return false;
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        let host_ok = match &self.host {
            HostRule::Any => true,
            HostRule::Exact(h) => host == h,
            HostRule::Domain(d) => {
                host == d
                    || host
                        .strip_suffix(d.as_str())
                        .is_some_and(|sub| sub.ends_with('.'))
            }
        };
        if !host_ok {
            return false;
        }

        let path = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };
        self.path.is_match(&path)
    }
}

/// Set of match patterns; a URL is allowed if any pattern matches.
#[derive(Debug, Clone)]
pub struct AllowList {
    patterns: Vec<MatchPattern>,
}

impl AllowList {
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| MatchPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// True if the URL parses and one of the patterns matches it.
    pub fn allows(&self, url: &str) -> bool {
        match url::Url::parse(url) {
            Ok(parsed) => self.patterns.iter().any(|p| p.matches(&parsed)),
            Err(_) => false,
        }
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_HOSTS).expect("default patterns are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_covers_lecture_hosts() {
        let list = AllowList::default();
        assert!(list.allows("https://cfvod.kaltura.com/scf/hls/p/1/seg-1.ts"));
        assert!(list.allows("https://kaltura.com/p/1"));
        assert!(list.allows("http://canvas.ucsd.edu/courses/1"));
        assert!(list.allows("https://media.podcast.ucsd.edu/hls/x/master.m3u8"));
        assert!(!list.allows("https://evilkaltura.com/hls/x/seg-1.ts"));
        assert!(!list.allows("https://www.canvas.ucsd.edu/x"));
        assert!(!list.allows("https://example.com/hls/x/seg-1.ts"));
        assert!(!list.allows("ftp://cfvod.kaltura.com/x"));
        assert!(!list.allows("not a url"));
    }

    #[test]
    fn explicit_scheme_and_path() {
        let p = MatchPattern::parse("https://cdn.example.com/vod/*").unwrap();
        assert_eq!(p.as_str(), "https://cdn.example.com/vod/*");
        let ok = url::Url::parse("https://cdn.example.com/vod/a/seg-1.ts?x=1").unwrap();
        let wrong_scheme = url::Url::parse("http://cdn.example.com/vod/a").unwrap();
        let wrong_path = url::Url::parse("https://cdn.example.com/live/a").unwrap();
        assert!(p.matches(&ok));
        assert!(!p.matches(&wrong_scheme));
        assert!(!p.matches(&wrong_path));
    }

    #[test]
    fn any_host() {
        let list = AllowList::new(["*://*/*"]).unwrap();
        assert!(list.allows("https://anything.example.org/a"));
    }

    #[test]
    fn invalid_patterns() {
        assert_eq!(
            MatchPattern::parse("kaltura.com/*").unwrap_err(),
            PatternError::MissingScheme("kaltura.com/*".to_string())
        );
        assert!(matches!(
            MatchPattern::parse("*://kaltura.com"),
            Err(PatternError::MissingPath(_))
        ));
        assert!(matches!(
            MatchPattern::parse("*://ka*tura.com/*"),
            Err(PatternError::InvalidHost(_))
        ));
        assert!(matches!(
            MatchPattern::parse("*://*./*"),
            Err(PatternError::InvalidHost(_))
        ));
        assert!(matches!(
            MatchPattern::parse("*:///*"),
            Err(PatternError::EmptyHost(_))
        ));
    }
}
