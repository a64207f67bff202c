//! CLI wiring for the dossier gatherer.

pub mod cli;
pub mod render;

pub use cli::run;
