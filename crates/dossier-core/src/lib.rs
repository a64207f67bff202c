//! Core types for the dossier domain-intelligence gatherer.
//!
//! This crate holds the report document model, the error taxonomy, and
//! the URL/filename normalizer. It performs no I/O.

mod error;
pub mod normalize;
pub mod types;

pub use error::{DossierError, Result};
pub use normalize::{normalize_to_host, to_directory_name};
pub use types::{Estimate, GeoMaps, ReportDocument, WhoisMap, WhoisValue};
