// src/extractors/text.rs
//! Flattens filing bodies into normalized, line-preserving text.
//!
//! The normalized form is what every downstream step indexes into: lines
//! with internal whitespace collapsed to single spaces, trimmed, blank lines
//! dropped, rejoined by `\n`. Heading offsets depend on those line breaks.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

// Elements whose content never reaches the normalized text
static NON_CONTENT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script, style").expect("Failed to compile NON_CONTENT_SELECTOR")
});

// Tag openers that mark an untyped body as markup
const MARKUP_OPENERS: [&str; 3] = ["<html", "<div", "<p"];

/// A filing body as handed over by the content collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawBody<'a> {
    Markup(&'a str),
    Plain(&'a str),
}

impl<'a> RawBody<'a> {
    /// Classifies an untyped body: markup if it contains any known tag opener.
    pub fn sniff(content: &'a str) -> Self {
        if looks_like_markup(content) {
            RawBody::Markup(content)
        } else {
            RawBody::Plain(content)
        }
    }
}

/// True when `content` contains `<html`, `<div` or `<p` (case-insensitive).
pub fn looks_like_markup(content: &str) -> bool {
    let lowered = content.to_lowercase();
    MARKUP_OPENERS.iter().any(|opener| lowered.contains(opener))
}

/// Normalizes a body of either kind.
pub fn normalize_body(body: RawBody<'_>) -> String {
    match body {
        RawBody::Markup(html) => html_to_text(html),
        RawBody::Plain(text) => normalize_text(text),
    }
}

/// Drops script/style elements, joins the remaining text nodes with `\n`
/// and normalizes the result.
pub fn html_to_text(html: &str) -> String {
    let mut document = Html::parse_document(html);

    let skipped: Vec<_> = document
        .select(&NON_CONTENT_SELECTOR)
        .map(|element| element.id())
        .collect();
    for id in skipped {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    let joined = document.root_element().text().collect::<Vec<_>>().join("\n");
    tracing::trace!("Flattened {} bytes of markup into {} bytes of text", html.len(), joined.len());
    normalize_text(&joined)
}

/// Collapses whitespace inside each line, trims it, drops blank lines and
/// rejoins with single newlines. Normalized input comes back unchanged.
pub fn normalize_text(text: &str) -> String {
    text.split('\n')
        .map(collapse_line)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-line variant of normalized text, used for reported lengths.
/// Same length as its input since each `\n` becomes one space.
pub fn flatten(normalized: &str) -> String {
    normalized.replace('\n', " ")
}

fn collapse_line(line: &str) -> String {
    line.replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
