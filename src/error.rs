use thiserror::Error;

#[derive(Error, Debug)]
pub enum GerritLabelError {
    #[error("Gerrit API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response from {url} does not start with the anti-XSSI prefix")]
    MissingXssiPrefix { url: String },

    #[error("Invalid pattern for label '{label}' in project '{project}': {source}")]
    InvalidPattern {
        project: String,
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GerritLabelError>;
