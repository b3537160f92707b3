use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Failures talking to the projects resource
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure, non-2xx status or undecodable body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The base URL cannot take an extra path segment (e.g. `mailto:`)
    #[error("cannot address record `{0}` under the projects URL")]
    InvalidBaseUrl(String),
}
