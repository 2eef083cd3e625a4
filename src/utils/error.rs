// src/utils/error.rs
use thiserror::Error;

// Errors raised while talking to EDGAR (or any filing collaborator)
#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 500 Internal Server Error

    #[error("SEC Rate limit likely exceeded")]
    RateLimited,

    #[error("Could not find CIK for identifier {0}")]
    CikNotFound(String),

    #[error("Could not find filing document: {0}")]
    DocNotFound(String),

    #[error("Filing {0} not found")]
    FilingNotFound(String),

    #[error("Failed to parse EDGAR response: {0}")]
    Parse(String),

    /// Failure reported by a collaborator; the message is passed through untouched.
    #[error("{0}")]
    Upstream(String),
}

/// Reasons a proxy filing could not be chosen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No proxy filings found for {0}.")]
    NoProxyFilings(String),

    #[error("Unable to resolve accession number for {0}'s proxy filing.")]
    MissingAccession(String),
}

/// Reasons the chosen filing's body could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{0}")]
    Collaborator(String),

    #[error("No filing text available.")]
    NoText,
}

impl From<EdgarError> for FetchError {
    fn from(err: EdgarError) -> Self {
        let message = err.to_string();
        if message.is_empty() {
            FetchError::Collaborator("Filing fetch failed.".to_string())
        } else {
            FetchError::Collaborator(message)
        }
    }
}

/// Anything that ends an extraction before sections are produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("EDGAR interaction failed: {0}")]
    Edgar(#[from] EdgarError), // Automatically convert Edgar errors

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
