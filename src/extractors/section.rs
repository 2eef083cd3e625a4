// src/extractors/section.rs

// --- Imports ---
use crate::extractors::headings::Heading;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

// --- Cue Table ---
// Ordered section key -> ordered cue phrases. The `cue_used` field of every
// section result echoes these lists as-is, so the text here is part of the output.
pub static SECTION_CUES: &[(&str, &[&str])] = &[
    (
        "related_party",
        &[
            "Certain Relationships and Related Transactions",
            "Related Party",
            "Item 404",
            "Transactions with Related Persons",
        ],
    ),
    (
        "director_independence",
        &[
            "Director Independence",
            "Independence of the Board",
            "Independent Directors",
        ],
    ),
    (
        "board_committees",
        &[
            "Board Committees",
            "Committees of the Board",
            "Audit Committee",
            "Compensation Committee",
            "Nominating and Corporate Governance Committee",
        ],
    ),
    (
        "beneficial_ownership",
        &[
            "Security Ownership of Certain Beneficial Owners and Management",
            "Beneficial Ownership",
            "Principal Stockholders",
            "Ownership of Securities",
        ],
    ),
    (
        "exclusive_forum",
        &[
            "Exclusive Forum",
            "Forum Selection",
            "Choice of Forum",
            "Exclusive Jurisdiction",
        ],
    ),
    (
        "governance_overview",
        &[
            "Corporate Governance",
            "Governance",
            "Board Structure",
            "Classified Board",
            "Dual Class",
            "Stockholder Rights",
            "Supermajority",
            "Bylaws",
            "Certificate of Incorporation",
        ],
    ),
];

// --- Data Structures ---
/// Outcome of slicing one named section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionResult {
    pub present: bool,
    pub text: Option<String>,
    pub cue_used: Vec<String>,
}

impl SectionResult {
    /// `present` is derived from the span so it can never disagree with `text`.
    pub fn from_span(span: Option<String>, cues: &[&str]) -> Self {
        let text = span.filter(|s| !s.is_empty());
        Self {
            present: text.is_some(),
            text,
            cue_used: cues.iter().map(|cue| cue.to_string()).collect(),
        }
    }
}

// --- Slicer ---
pub struct SectionSlicer<'a> {
    text: &'a str,
    headings: &'a [Heading],
}

impl<'a> SectionSlicer<'a> {
    /// `headings` must be sorted ascending by offset.
    pub fn new(text: &'a str, headings: &'a [Heading]) -> Self {
        Self { text, headings }
    }

    /// Slices the span for one section, trimmed. Returns `None` when there are
    /// no headings at all, or when neither a heading nor the raw text mentions a cue.
    pub fn slice(&self, cues: &[&str]) -> Option<String> {
        if self.headings.is_empty() {
            return None;
        }

        let matchers = compile_cues(cues);

        // Earliest heading that mentions any cue wins, regardless of cue order
        let heading_start = self
            .headings
            .iter()
            .filter(|heading| matchers.iter().any(|re| re.is_match(&heading.title)))
            .map(|heading| heading.offset)
            .min();

        let start = match heading_start {
            Some(offset) => {
                tracing::trace!("Cue matched heading at offset {}", offset);
                offset
            }
            None => {
                // Inline fallback: first cue (in configured order) found anywhere in the text
                let offset = matchers
                    .iter()
                    .find_map(|re| re.find(self.text).map(|m| m.start()))?;
                tracing::trace!("Cue matched inline at offset {}", offset);
                offset
            }
        };

        let end = self.next_heading_after(start).unwrap_or(self.text.len());
        // Out-of-range or mid-char offsets yield no span
        Some(self.text.get(start..end)?.trim().to_string())
    }

    fn next_heading_after(&self, position: usize) -> Option<usize> {
        self.headings
            .iter()
            .map(|heading| heading.offset)
            .find(|offset| *offset > position)
    }
}

/// Case-insensitive literal matchers for each cue, in the given order.
fn compile_cues(cues: &[&str]) -> Vec<Regex> {
    cues.iter()
        .filter_map(|cue| {
            RegexBuilder::new(&regex::escape(cue))
                .case_insensitive(true)
                .build()
                .map_err(|e| tracing::warn!("Skipping cue '{}': {}", cue, e))
                .ok()
        })
        .collect()
}

/// Evaluates every entry of the cue table against one document.
pub fn slice_all(text: &str, headings: &[Heading]) -> Vec<(&'static str, SectionResult)> {
    let slicer = SectionSlicer::new(text, headings);
    SECTION_CUES
        .iter()
        .map(|(key, cues)| {
            let result = SectionResult::from_span(slicer.slice(cues), cues);
            tracing::debug!("Section '{}' present: {}", key, result.present);
            (*key, result)
        })
        .collect()
}
