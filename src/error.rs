//! error types
//!
//! structured errors for config, http, merge, and generation failures.

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for the merger, generators, and collaborators
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    /// one endpoint's introspection fetch failed. recovered by the
    /// merger (the endpoint is skipped), surfaced only by `fetch_one`.
    #[error("introspection failed for {url}: {reason}")]
    Introspection { url: String, reason: String },

    /// the merged type list did not reassemble into a composed schema
    #[error("schema merge failed: {0}")]
    Merge(String),

    #[error("no root operation declares a field named {field}")]
    UnknownRootField { field: String },

    #[error("type {parent} has no field named {field}")]
    UnknownField { field: String, parent: String },

    #[error("schema has no type named {name}")]
    UnknownFragmentType { name: String },

    #[error("{name} is not an object type and cannot satisfy a fragment condition")]
    NotAnObjectType { name: String },

    #[error("field {field} selects an object type but has no sub-selection")]
    MissingSelection { field: String },

    #[error("operation has no name; a name is required to derive exported type names")]
    UnnamedOperation,
}
