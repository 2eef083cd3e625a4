// src/edgar/mod.rs
pub mod client;
pub mod models;
pub mod resolver;
pub mod source;

pub use client::{EdgarClient, EdgarConfig};
pub use models::{ContentRequest, FilingCandidate, FilingContent, FilingListRequest, ResolvedFiling};
pub use resolver::{choose_filing, resolve_filing};
pub use source::{FilingFetcher, FilingLister};
