// src/analyzer/report.rs
use indexmap::IndexMap;
use serde::Serialize;

use crate::extractors::headings::Heading;
use crate::extractors::section::SectionResult;

pub const DISCLAIMER: &str =
    "All text extracted directly from the SEC EDGAR proxy filing; no external sources or interpretations.";

/// Provenance of the analyzed filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilingSummary {
    pub form: String,
    pub accession: String,
    pub date: Option<String>,
    pub url: Option<String>,
    pub identifier: String,
    /// RFC 3339, UTC, `Z` suffix.
    pub extraction_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyReport {
    pub filing: FilingSummary,
    /// One entry per cue-table key, in cue-table order.
    pub sections: IndexMap<String, SectionResult>,
    pub full_text_len: usize,
    pub headings_index: Vec<Heading>,
    pub disclaimer: &'static str,
}

/// Outcome of one `analyze_proxy` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Success(Box<ProxyReport>),
    Failure { error: String },
}

impl ExtractionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success(_))
    }

    pub fn report(&self) -> Option<&ProxyReport> {
        match self {
            ExtractionResult::Success(report) => Some(report.as_ref()),
            ExtractionResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ExtractionResult::Success(_) => None,
            ExtractionResult::Failure { error } => Some(error),
        }
    }

    /// The externally visible payload.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ExtractionResult::Success(report) => serde_json::json!({
                "success": true,
                "filing": report.filing,
                "sections": report.sections,
                "full_text_len": report.full_text_len,
                "headings_index": report.headings_index,
                "disclaimer": report.disclaimer,
            }),
            ExtractionResult::Failure { error } => serde_json::json!({
                "success": false,
                "error": error,
            }),
        }
    }
}
