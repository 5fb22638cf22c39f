use thiserror::Error;

/// Errors that abort a whole screen while turning JSON into a `Screen`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Failed to parse screen JSON: {0}")]
    Json(String),

    #[error("Missing required field: {field}")]
    Schema { field: String },
}

/// Errors raised while compiling a single node.
///
/// These never leave the node boundary: the factory turns them into a
/// fallback placeholder so sibling subtrees keep rendering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreparationError {
    #[error("Component type cannot be blank")]
    MissingType,

    #[error("Invalid component '{node_type}': {}", errors.join("; "))]
    Validation {
        node_type: String,
        errors: Vec<String>,
    },

    #[error("Failed to prepare component '{node_type}': {message}")]
    Failed { node_type: String, message: String },
}

/// Errors reported by a data fetcher.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Request to '{url}' for page {page} failed: {message}")]
    Request {
        url: String,
        page: u32,
        message: String,
    },

    #[error("Unsupported data source: {0}")]
    UnsupportedSource(String),

    #[error("Data source has no url")]
    MissingUrl,
}

/// A placeholder that could not be resolved against a record. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unresolved placeholder '{{{{{expr}}}}}'")]
pub struct DataBindingWarning {
    pub expr: String,
}

/// Top-level failures that move a renderer into its error state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Worker task failed: {0}")]
    Worker(String),

    #[error("Nothing to retry: no screen document has been loaded")]
    NoDocument,
}

/// Errors raised while loading an `EngineConfig`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to parse config TOML: {0}")]
    Toml(String),

    #[error("Cannot read config file '{path}': {message}")]
    Io { path: String, message: String },
}
