//! Per-domain report cache on disk.
//!
//! One directory per domain under the output root, holding the
//! persisted `data.json` and any downloaded artifacts. A document is
//! written only by a complete run and never partially updated; once it
//! exists, re-opening the store short-circuits to the loaded document.

use dossier_core::{to_directory_name, DossierError, ReportDocument, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the persisted document inside a cache directory
pub const DATA_FILE: &str = "data.json";

/// Default output root, created under the working directory
const DEFAULT_OUTPUT_DIR: &str = "output";

/// Resolves and owns the cache directory for one domain.
#[derive(Debug)]
pub struct ReportStore {
    directory: PathBuf,
    document: Option<ReportDocument>,
}

impl ReportStore {
    /// Open (and create as needed) the cache directory for `url`.
    ///
    /// An explicit `output_root` must already exist; without one the
    /// process default `./output` is used and created when absent. An
    /// existing but unparsable `data.json` fails with
    /// [`DossierError::CorruptCache`] before any lookup can run.
    pub fn open(url: &str, output_root: Option<&Path>) -> Result<Self> {
        let root = match output_root {
            Some(path) if path.is_dir() => path.to_path_buf(),
            Some(path) => return Err(DossierError::InvalidOutputPath(path.to_path_buf())),
            None => {
                let default = std::env::current_dir()?.join(DEFAULT_OUTPUT_DIR);
                if !default.is_dir() {
                    fs::create_dir(&default)?;
                }
                default
            }
        };

        let directory = root.join(to_directory_name(url));
        if !directory.is_dir() {
            fs::create_dir(&directory)?;
        }

        let data_path = directory.join(DATA_FILE);
        let document = if data_path.is_file() {
            let text = fs::read_to_string(&data_path)?;
            let parsed =
                serde_json::from_str(&text).map_err(|e| DossierError::CorruptCache {
                    path: data_path.clone(),
                    detail: e.to_string(),
                })?;
            debug!(path = %data_path.display(), "loaded cached document");
            Some(parsed)
        } else {
            None
        };

        Ok(Self {
            directory,
            document,
        })
    }

    /// The per-domain cache directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// True when a previously persisted document was loaded.
    #[must_use]
    pub const fn loaded(&self) -> bool {
        self.document.is_some()
    }

    /// The loaded (or last persisted) document, if any.
    #[must_use]
    pub const fn document(&self) -> Option<&ReportDocument> {
        self.document.as_ref()
    }

    /// Persist a complete document as pretty-printed UTF-8 JSON. The
    /// store then answers `loaded()` for the rest of its lifetime.
    pub fn persist(&mut self, document: &ReportDocument) -> Result<()> {
        let text = serde_json::to_string_pretty(document)?;
        fs::write(self.directory.join(DATA_FILE), text)?;
        self.document = Some(document.clone());
        Ok(())
    }
}
