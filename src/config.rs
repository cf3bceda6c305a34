//! configuration
//!
//! build a [`FetchConfig`] for endpoint fetching and a [`GenConfig`]
//! for one generation run. both use fluent `with_*` builders.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::time::Duration;

/// transport configuration for introspection fetches
#[derive(Clone)]
pub struct FetchConfig {
    /// request timeout duration
    pub(crate) timeout: Duration,

    /// user agent string
    pub(crate) user_agent: String,

    /// whether to verify ssl certificates
    pub(crate) verify_ssl: bool,

    /// additional headers to send with every request
    pub(crate) extra_headers: HeaderMap,

    /// prebuilt http client (takes precedence over the other knobs)
    pub(crate) http_client: Option<reqwest::Client>,
}

impl FetchConfig {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("graphweld/{} (Rust)", env!("CARGO_PKG_VERSION")),
            verify_ssl: true,
            extra_headers: HeaderMap::new(),
            http_client: None,
        }
    }

    /// set the request timeout
    ///
    /// default: 30 seconds
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// set a custom user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// disable ssl certificate verification (not recommended for production)
    ///
    /// default: enabled
    pub fn with_ssl_verification(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// add a header to every request
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    /// add a set of headers to every request
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers.extend(headers);
        self
    }

    /// inject a prebuilt http client. when set, all transport knobs on
    /// this config are ignored and the client is used as-is.
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchConfig")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("verify_ssl", &self.verify_ssl)
            .field("extra_headers", &self.extra_headers.len())
            .field("http_client", &self.http_client.is_some())
            .finish()
    }
}

/// configuration for one generation run
#[derive(Debug, Clone, Default)]
pub struct GenConfig {
    /// caller scalar overrides, merged over the default table
    pub(crate) scalars: BTreeMap<String, String>,

    /// fallback for unmapped scalar names; default "unknown"
    pub(crate) default_scalar: Option<String>,
}

impl GenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// override one scalar mapping for this run
    pub fn with_scalar(mut self, name: impl Into<String>, mapped: impl Into<String>) -> Self {
        self.scalars.insert(name.into(), mapped.into());
        self
    }

    /// override several scalar mappings for this run
    pub fn with_scalars(mut self, scalars: BTreeMap<String, String>) -> Self {
        self.scalars.extend(scalars);
        self
    }

    /// set the fallback name for unmapped scalars
    pub fn with_default_scalar(mut self, name: impl Into<String>) -> Self {
        self.default_scalar = Some(name.into());
        self
    }
}
