use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("depth must be a positive integer between 1 and 5, got {0}")]
    InvalidDepth(usize),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("redirect from {address} resolved to non-absolute location: {location}")]
    RedirectResolution { address: String, location: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
