// src/extractors/headings.rs
use serde::Serialize;

// --- Constants ---
const MIN_HEADING_CHARS: usize = 3;
const MAX_HEADING_CHARS: usize = 120;
const DISQUALIFYING_ENDINGS: [char; 4] = ['.', ':', ';', ','];

/// A heading-shaped line: byte offset of the start of its line, and its trimmed content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub offset: usize,
    pub title: String,
}

/// Strategy for spotting section boundaries in normalized text.
pub trait HeadingStrategy: Send + Sync {
    /// Returns headings sorted ascending by offset.
    fn detect(&self, text: &str) -> Vec<Heading>;
}

/// Shape heuristic: short lines in ALL CAPS or Title Case that do not end
/// in sentence punctuation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShapeHeadingStrategy;

impl ShapeHeadingStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Whether a single (untrimmed) line qualifies as a heading.
    pub fn is_heading_line(line: &str) -> bool {
        let stripped = line.trim();
        let char_count = stripped.chars().count();
        if !(MIN_HEADING_CHARS..=MAX_HEADING_CHARS).contains(&char_count) {
            return false;
        }
        if !(is_all_upper(stripped) || is_title_case(stripped)) {
            return false;
        }
        !stripped.ends_with(DISQUALIFYING_ENDINGS)
    }
}

impl HeadingStrategy for ShapeHeadingStrategy {
    fn detect(&self, text: &str) -> Vec<Heading> {
        let mut headings = Vec::new();
        let mut cursor = 0usize;

        for line in text.split('\n') {
            if Self::is_heading_line(line) {
                headings.push(Heading {
                    offset: cursor,
                    title: line.trim().to_string(),
                });
            }
            // The cursor moves past every line, heading or not
            cursor += line.len() + 1;
        }

        headings.sort_by_key(|heading| heading.offset);
        tracing::debug!("Detected {} heading candidates", headings.len());
        headings
    }
}

/// Puts a detector's output into the shape the slicer and the payload rely
/// on: offsets that land on char boundaries inside `text`, strictly
/// ascending, one heading per offset (the first one reported wins).
pub fn sanitize_headings(text: &str, mut headings: Vec<Heading>) -> Vec<Heading> {
    let reported = headings.len();
    headings.retain(|heading| text.is_char_boundary(heading.offset));
    // Stable sort keeps the first-reported heading ahead of later duplicates
    headings.sort_by_key(|heading| heading.offset);
    headings.dedup_by_key(|heading| heading.offset);

    if headings.len() != reported {
        tracing::debug!("Dropped {} unusable headings", reported - headings.len());
    }
    headings
}

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase()
}

/// At least one cased character and no lower-case ones ("ITEM 404").
fn is_all_upper(s: &str) -> bool {
    s.chars().any(is_cased) && !s.chars().any(char::is_lowercase)
}

/// Every cased run starts with one upper-case letter followed only by
/// lower-case letters ("Board Committees", not "Board of Directors").
fn is_title_case(s: &str) -> bool {
    let mut seen_cased = false;
    let mut previous_cased = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            seen_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            seen_cased = true;
        } else {
            previous_cased = false;
        }
    }

    seen_cased
}
