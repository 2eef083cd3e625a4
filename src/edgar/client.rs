// src/edgar/client.rs
use async_trait::async_trait;
use reqwest::header;
use std::time::Duration;

use crate::edgar::models::{
    same_accession, CompanySubmission, ContentRequest, FilingCandidate, FilingContent, FilingListRequest,
};
use crate::edgar::source::{FilingFetcher, FilingLister};
use crate::utils::error::EdgarError;

// SEC requires a descriptive User-Agent with contact details. Override via config.
pub const DEFAULT_USER_AGENT: &str = "proxy_extractor admin@example.com";
// SEC asks for 10 requests/second max. Be conservative. >100ms delay.
const EDGAR_REQUEST_DELAY_MS: u64 = 150;
const EDGAR_TIMEOUT_SECS: u64 = 30;

const TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Connection settings for EDGAR.
#[derive(Debug, Clone)]
pub struct EdgarConfig {
    pub user_agent: String,
    pub request_delay: Duration,
    pub timeout: Duration,
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            user_agent: std::env::var("EDGAR_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            request_delay: Duration::from_millis(EDGAR_REQUEST_DELAY_MS),
            timeout: Duration::from_secs(EDGAR_TIMEOUT_SECS),
        }
    }
}

/// Filing lister and fetcher backed by the public EDGAR endpoints.
pub struct EdgarClient {
    http: reqwest::Client,
    config: EdgarConfig,
}

impl EdgarClient {
    /// Creates a reqwest client configured for EDGAR interaction.
    pub fn new(config: EdgarConfig) -> Result<Self, EdgarError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str()) // Set the required User-Agent
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// GETs a URL after the politeness delay, mapping SEC's error statuses.
    async fn get(&self, url: &str) -> Result<reqwest::Response, EdgarError> {
        // --- Basic Rate Limiting ---
        tokio::time::sleep(self.config.request_delay).await;

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json,application/xml,text/html,text/plain,*/*")
            .send()
            .await?; // Propagates reqwest::Error as EdgarError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::FORBIDDEN {
                tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
                return Err(EdgarError::RateLimited);
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                tracing::warn!("Received 404 Not Found for URL: {}", url);
                return Err(EdgarError::DocNotFound(url.to_string()));
            }
            return Err(EdgarError::Http(status));
        }

        Ok(response)
    }

    /// Downloads a specific filing document from its URL.
    pub async fn download_filing_doc(&self, url: &str) -> Result<String, EdgarError> {
        tracing::info!("Downloading document from: {}", url);
        let body = self.get(url).await?.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// Gets the 10-digit CIK for a ticker symbol or a numeric CIK.
    pub async fn resolve_cik(&self, identifier: &str) -> Result<String, EdgarError> {
        if let Some(cik) = pad_cik(identifier) {
            return Ok(cik);
        }

        let ticker = identifier.trim().to_uppercase();
        let json: serde_json::Value = self.get(TICKERS_URL).await?.json().await?;
        let companies = json
            .as_object()
            .ok_or_else(|| EdgarError::Parse("Invalid JSON structure".to_string()))?;

        for company in companies.values() {
            let matches = company
                .get("ticker")
                .and_then(|t| t.as_str())
                .is_some_and(|t| t.to_uppercase() == ticker);
            if matches {
                let cik_num = company
                    .get("cik_str")
                    .and_then(|c| c.as_u64())
                    .ok_or_else(|| EdgarError::Parse("Invalid CIK format".to_string()))?;
                return Ok(format!("{:010}", cik_num));
            }
        }

        Err(EdgarError::CikNotFound(identifier.to_string()))
    }

    /// Fetches the company submission data for a given CIK
    pub async fn get_company_submissions(&self, cik: &str) -> Result<CompanySubmission, EdgarError> {
        let url = format!("https://data.sec.gov/submissions/CIK{}.json", cik);
        let submission: CompanySubmission = self.get(&url).await?.json().await?;
        tracing::debug!("Loaded {} recent filings for {}", submission.filings.recent.form.len(), submission.name);
        Ok(submission)
    }

    async fn all_candidates(&self, identifier: &str) -> Result<Vec<FilingCandidate>, EdgarError> {
        let cik = self.resolve_cik(identifier).await?;
        Ok(self.get_company_submissions(&cik).await?.candidates())
    }
}

#[async_trait]
impl FilingLister for EdgarClient {
    /// `days` is advisory: recency is judged by the resolver, so older
    /// filings are still listed (newest first, capped at `limit`).
    async fn list_filings(&self, request: &FilingListRequest) -> Result<Vec<FilingCandidate>, EdgarError> {
        tracing::debug!(
            "list_filings identifier={} form_type={:?} days={} limit={}",
            request.identifier,
            request.form_type,
            request.days,
            request.limit
        );
        let candidates = self.all_candidates(&request.identifier).await?;
        Ok(filter_candidates(candidates, request.form_type.as_deref(), request.limit))
    }
}

#[async_trait]
impl FilingFetcher for EdgarClient {
    async fn fetch_content(&self, request: &ContentRequest) -> Result<FilingContent, EdgarError> {
        tracing::debug!(
            "fetch_content identifier={} accession={} max_chars={:?}",
            request.identifier,
            request.accession_number,
            request.max_chars
        );
        let filing = self
            .all_candidates(&request.identifier)
            .await?
            .into_iter()
            .find(|c| same_accession(&c.accession_number, &request.accession_number))
            .ok_or_else(|| EdgarError::FilingNotFound(request.accession_number.clone()))?;

        let url = filing
            .url
            .clone()
            .ok_or_else(|| EdgarError::DocNotFound(format!("primary document of {}", filing.accession_number)))?;
        let body = self.download_filing_doc(&url).await?;
        let (content, content_truncated) = truncate_chars(body, request.max_chars);

        Ok(FilingContent {
            accession_number: Some(filing.accession_number),
            url: Some(url),
            form_type: Some(filing.form_type),
            filing_date: filing.filing_date,
            html: None,
            text: None,
            content: Some(content),
            content_truncated,
        })
    }
}

/// Zero-pads an all-digit identifier to a 10-digit CIK.
fn pad_cik(identifier: &str) -> Option<String> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() || trimmed.len() > 10 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("{:0>10}", trimmed))
}

fn filter_candidates(candidates: Vec<FilingCandidate>, form_type: Option<&str>, limit: usize) -> Vec<FilingCandidate> {
    candidates
        .into_iter()
        .filter(|c| form_type.map_or(true, |form| c.form_type.eq_ignore_ascii_case(form)))
        .take(limit)
        .collect()
}

/// Truncates to at most `max_chars` characters; reports whether anything was cut.
fn truncate_chars(body: String, max_chars: Option<usize>) -> (String, bool) {
    match max_chars {
        Some(max) if max > 0 => match body.char_indices().nth(max) {
            Some((cut, _)) => (body[..cut].to_string(), true),
            None => (body, false),
        },
        _ => (body, false),
    }
}
