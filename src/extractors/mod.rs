// src/extractors/mod.rs
pub mod headings;
pub mod section;
pub mod text;

// Re-export key extraction types for convenience
pub use headings::{sanitize_headings, Heading, HeadingStrategy, ShapeHeadingStrategy};
pub use section::{slice_all, SectionResult, SectionSlicer, SECTION_CUES};
pub use text::{flatten, normalize_body, RawBody};
