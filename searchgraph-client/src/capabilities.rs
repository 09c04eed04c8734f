//! Runtime capability records and per-family feature thresholds.

use std::fmt;

use serde::Serialize;

/// Which search-engine ecosystem a client belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendFamily {
    Elasticsearch,
    OpenSearch,
}

impl BackendFamily {
    /// Substring expected in the originating module path of a client of
    /// this family.
    pub fn module_token(&self) -> &'static str {
        match self {
            BackendFamily::Elasticsearch => "elasticsearch",
            BackendFamily::OpenSearch => "opensearch",
        }
    }
}

impl fmt::Display for BackendFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendFamily::Elasticsearch => write!(f, "elasticsearch"),
            BackendFamily::OpenSearch => write!(f, "opensearch"),
        }
    }
}

/// Detected capabilities of a wrapped client.
///
/// Populated at most once per adapter; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Backend-reported release identifier, unset until detection succeeds.
    pub version: Option<String>,
    /// Whether the wrapped client's methods are natively awaitable.
    pub is_async: bool,
    /// Point in Time API support.
    pub supports_pit: bool,
    /// search_after pagination support.
    pub supports_search_after: bool,
    /// Async search API support.
    pub supports_async_search: bool,
}

impl Capabilities {
    /// Defaults used before detection and when the info probe fails.
    ///
    /// search_after needs no special server feature and is assumed
    /// supported; everything optional is assumed unsupported. The calling
    /// convention is known without network access and is always recorded.
    pub fn conservative(is_async: bool) -> Self {
        Self {
            version: None,
            is_async,
            supports_pit: false,
            supports_search_after: true,
            supports_async_search: false,
        }
    }

    /// Derive capabilities from a backend-reported version string.
    ///
    /// The thresholds are product facts about the wrapped systems, not
    /// design choices; verify against backend release notes when bumping
    /// supported versions:
    /// - Elasticsearch: PIT from 7.10, async search from 7.7
    /// - OpenSearch: PIT from 2.0, async search from 1.0
    pub fn from_version(family: BackendFamily, version: &str, is_async: bool) -> Self {
        let mut caps = Self::conservative(is_async);
        if !version.is_empty() {
            caps.version = Some(version.to_string());
        }

        let (major, minor) = parse_major_minor(version);
        match family {
            BackendFamily::Elasticsearch => {
                caps.supports_pit = major >= 8 || (major == 7 && minor >= 10);
                caps.supports_async_search = major >= 8 || (major == 7 && minor >= 7);
            }
            BackendFamily::OpenSearch => {
                caps.supports_pit = major >= 2;
                caps.supports_async_search = major >= 1;
            }
        }

        caps
    }
}

/// Parse the leading `major.minor` of a version string, tolerating
/// suffixes like `7.10.2-SNAPSHOT`. Unparseable components read as 0.
fn parse_major_minor(version: &str) -> (u32, u32) {
    let mut parts = version.split('.');
    let major = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(0);
    let minor = parts
        .next()
        .and_then(|p| {
            let digits: String = p.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u32>().ok()
        })
        .unwrap_or(0);
    (major, minor)
}
