// src/edgar/source.rs
//! Collaborator interfaces the analyzer depends on.
//!
//! Listing and fetching live behind traits so the engine can run against
//! EDGAR, a cache, or an in-memory fixture alike. Timeouts and retries are
//! the implementor's concern.

use async_trait::async_trait;

use crate::edgar::models::{ContentRequest, FilingCandidate, FilingContent, FilingListRequest};
use crate::utils::error::EdgarError;

/// Lists filings for a company.
#[async_trait]
pub trait FilingLister: Send + Sync {
    /// Filings for `request.identifier`, newest first, at most `request.limit`.
    async fn list_filings(&self, request: &FilingListRequest) -> Result<Vec<FilingCandidate>, EdgarError>;
}

/// Fetches the body of a single filing.
#[async_trait]
pub trait FilingFetcher: Send + Sync {
    async fn fetch_content(&self, request: &ContentRequest) -> Result<FilingContent, EdgarError>;
}
