use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing configuration: {0}")]
    ConfigurationMissing(&'static str),

    #[error("Error fetching profile page: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The first `ItemModule` entry could not be read as a post.
    #[error("Malformed item '{key}' in page state: {source}")]
    MalformedItem {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error building webhook request: {0}")]
    Request(#[from] isahc::http::Error),

    #[error("Error calling webhook: {0}")]
    Http(#[from] isahc::Error),

    #[error("Error: status code: {status}. Body: {body}")]
    Delivery { status: u16, body: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
