// src/analyzer/mod.rs
//! One request/response cycle: resolve the filing, fetch it, normalize,
//! find headings, slice every configured section.
//!
//! Failures never escape `analyze_proxy`; they come back as
//! `ExtractionResult::Failure` carrying the error's message. No sections are
//! produced unless the filing was both resolved and fetched.

pub mod report;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;

use crate::edgar::models::{ContentRequest, ResolvedFiling};
use crate::edgar::resolver::resolve_filing;
use crate::edgar::source::{FilingFetcher, FilingLister};
use crate::extractors::headings::{sanitize_headings, HeadingStrategy, ShapeHeadingStrategy};
use crate::extractors::section::slice_all;
use crate::extractors::text::{flatten, normalize_body};
use crate::utils::error::{AnalysisError, FetchError};

pub use report::{ExtractionResult, FilingSummary, ProxyReport, DISCLAIMER};

const DEFAULT_FORM: &str = "DEF 14A";

pub struct ProxyAnalyzer<S> {
    source: S,
    headings: Box<dyn HeadingStrategy>,
}

impl<S> ProxyAnalyzer<S>
where
    S: FilingLister + FilingFetcher,
{
    /// Analyzer using the shape-based heading heuristic.
    pub fn new(source: S) -> Self {
        Self {
            source,
            headings: Box::new(ShapeHeadingStrategy::new()),
        }
    }

    /// Swaps in another heading detector; slicing is unaffected.
    pub fn with_heading_strategy<H>(mut self, strategy: H) -> Self
    where
        H: HeadingStrategy + 'static,
    {
        self.headings = Box::new(strategy);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Extracts the proxy sections for `identifier`, optionally pinned to an accession number.
    pub async fn analyze_proxy(&self, identifier: &str, accession_number: Option<&str>) -> ExtractionResult {
        self.analyze_proxy_at(identifier, accession_number, Utc::now()).await
    }

    /// Same as `analyze_proxy` with an explicit clock, used for the
    /// recency window and the extraction timestamp.
    pub async fn analyze_proxy_at(
        &self,
        identifier: &str,
        accession_number: Option<&str>,
        now: DateTime<Utc>,
    ) -> ExtractionResult {
        tracing::info!("Analyzing proxy for {} (accession: {:?})", identifier, accession_number);
        match self.run(identifier, accession_number, now).await {
            Ok(report) => {
                let found = report.sections.values().filter(|s| s.present).count();
                tracing::info!(
                    "Extracted {}/{} sections from {} ({} bytes of text)",
                    found,
                    report.sections.len(),
                    report.filing.accession,
                    report.full_text_len
                );
                ExtractionResult::Success(Box::new(report))
            }
            Err(e) => {
                tracing::warn!("Proxy analysis failed for {}: {}", identifier, e);
                ExtractionResult::Failure { error: e.to_string() }
            }
        }
    }

    async fn run(
        &self,
        identifier: &str,
        accession_number: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ProxyReport, AnalysisError> {
        let selection = resolve_filing(&self.source, identifier, accession_number, now).await?;

        let request = ContentRequest {
            identifier: identifier.to_string(),
            accession_number: selection.accession_number.clone(),
            max_chars: None,
        };
        let content = self
            .source
            .fetch_content(&request)
            .await
            .map_err(FetchError::from)?;

        let body = content.body().ok_or(FetchError::NoText)?;
        let full_text = normalize_body(body);
        tracing::debug!("Normalized filing text to {} bytes", full_text.len());

        let headings = sanitize_headings(&full_text, self.headings.detect(&full_text));
        let sections: IndexMap<String, _> = slice_all(&full_text, &headings)
            .into_iter()
            .map(|(key, result)| (key.to_string(), result))
            .collect();

        Ok(ProxyReport {
            filing: summarize(
                selection,
                content.form_type,
                content.filing_date,
                content.url,
                now,
            ),
            sections,
            full_text_len: flatten(&full_text).len(),
            headings_index: headings,
            disclaimer: DISCLAIMER,
        })
    }
}

/// Fetched metadata wins over what the listing said.
fn summarize(
    selection: ResolvedFiling,
    form_type: Option<String>,
    filing_date: Option<String>,
    url: Option<String>,
    now: DateTime<Utc>,
) -> FilingSummary {
    FilingSummary {
        form: form_type
            .or(selection.form_type)
            .unwrap_or_else(|| DEFAULT_FORM.to_string()),
        accession: selection.accession_number,
        date: filing_date.or(selection.filing_date),
        url: url.or(selection.url),
        identifier: selection.identifier,
        extraction_timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, true),
    }
}
