// src/edgar/models.rs
use serde::{Deserialize, Serialize};

use crate::extractors::text::RawBody;

/// Structure representing the EDGAR company submission index
/// Example: https://data.sec.gov/submissions/CIK0000320193.json
#[derive(Debug, Deserialize)]
pub struct CompanySubmission {
    pub cik: String,
    pub name: String,
    #[serde(default)]
    pub tickers: Vec<String>,
    pub filings: Filings,
}

#[derive(Debug, Deserialize)]
pub struct Filings {
    pub recent: FilingsList,
}

/// Column-oriented list of the most recent filings, newest first.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilingsList {
    pub accession_number: Vec<String>,
    pub filing_date: Vec<String>,
    pub form: Vec<String>,
    pub primary_document: Vec<String>,
}

/// One entry from a filing listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingCandidate {
    pub form_type: String,
    pub accession_number: String,
    /// ISO date or date-time as reported by the lister; may be unparseable.
    pub filing_date: Option<String>,
    pub url: Option<String>,
}

/// Parameters for the filing-listing collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingListRequest {
    pub identifier: String,
    pub form_type: Option<String>,
    pub days: u32,
    pub limit: usize,
}

/// Parameters for the content-fetching collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub identifier: String,
    pub accession_number: String,
    pub max_chars: Option<usize>,
}

/// Body and metadata of a fetched filing. The body may arrive in any of
/// `html`, `text` or the untyped `content` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilingContent {
    pub accession_number: Option<String>,
    pub url: Option<String>,
    pub form_type: Option<String>,
    pub filing_date: Option<String>,
    pub html: Option<String>,
    pub text: Option<String>,
    pub content: Option<String>,
    pub content_truncated: bool,
}

impl FilingContent {
    /// Picks the usable body: explicit html, then explicit text, then the
    /// untyped content sniffed for markup. Empty strings count as missing.
    pub fn body(&self) -> Option<RawBody<'_>> {
        fn non_empty(field: &Option<String>) -> Option<&str> {
            field.as_deref().filter(|s| !s.is_empty())
        }

        if let Some(html) = non_empty(&self.html) {
            return Some(RawBody::Markup(html));
        }
        if let Some(text) = non_empty(&self.text) {
            return Some(RawBody::Plain(text));
        }
        non_empty(&self.content).map(RawBody::sniff)
    }
}

/// The filing chosen for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFiling {
    pub identifier: String,
    pub accession_number: String,
    pub filing_date: Option<String>,
    pub form_type: Option<String>,
    pub url: Option<String>,
}

/// Accession number with separators removed, for comparisons.
pub fn normalize_accession(accession: &str) -> String {
    accession.chars().filter(|c| *c != '-').collect()
}

/// Whether two accession numbers name the same filing, ignoring hyphens.
pub fn same_accession(a: &str, b: &str) -> bool {
    normalize_accession(a) == normalize_accession(b)
}

/// Archive URL of a filing's primary document.
pub fn primary_doc_url(cik: &str, accession: &str, primary_doc: &str) -> String {
    let cik_trimmed = cik.trim_start_matches('0');
    format!(
        "https://www.sec.gov/Archives/edgar/data/{}/{}/{}",
        if cik_trimmed.is_empty() { "0" } else { cik_trimmed },
        normalize_accession(accession),
        primary_doc
    )
}

impl CompanySubmission {
    /// Flattens the column-oriented recent filings into candidates, newest first.
    /// Rows with a missing form or accession column are skipped.
    pub fn candidates(&self) -> Vec<FilingCandidate> {
        let recent = &self.filings.recent;
        recent
            .accession_number
            .iter()
            .enumerate()
            .filter_map(|(i, accession)| {
                let form = recent.form.get(i)?;
                let url = recent
                    .primary_document
                    .get(i)
                    .filter(|doc| !doc.is_empty())
                    .map(|doc| primary_doc_url(&self.cik, accession, doc));
                Some(FilingCandidate {
                    form_type: form.clone(),
                    accession_number: accession.clone(),
                    filing_date: recent.filing_date.get(i).cloned(),
                    url,
                })
            })
            .collect()
    }
}
