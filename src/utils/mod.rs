// src/utils/mod.rs
pub mod error;
pub mod logging;

pub use error::{AnalysisError, AppError, EdgarError, FetchError, ResolveError}; // Re-export error types for convenience
