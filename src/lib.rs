// src/lib.rs
//! Locates named disclosure sections in SEC proxy statements and returns
//! them as raw text spans with provenance, without interpreting them.

pub mod analyzer;
pub mod edgar;
pub mod extractors;
pub mod utils;

pub use analyzer::{ExtractionResult, ProxyAnalyzer, ProxyReport};
pub use edgar::{EdgarClient, EdgarConfig, FilingFetcher, FilingLister};
pub use utils::AppError;
