//! repofusion - Hybrid Repository Search
//!
//! Blends dense vector (semantic) retrieval with lexical (keyword/tag)
//! retrieval into a single ranked result list, guided by an LLM-backed
//! query-understanding step. Channel results are merged by repository
//! identity, rescaled into a common score space, reweighted and adjusted
//! by a popularity/recency trend signal.

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod intent;
pub mod model;
pub mod retrieval;

pub use error::{RepoFusionError, Result};
