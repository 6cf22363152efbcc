// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The asset manifest: which assets a game wants loaded up front, and how.
//!
//! ```toml
//! [loader]
//! cycle_timeout_ms = 10000
//!
//! [[assets]]
//! kind = "data"
//! key = "gibbons_facts"
//! source = "assets/data/gibbons_facts.json"
//! ```

use preload_core::{AssetKind, LoadRequest, LoaderConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors raised while reading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest '{}': {source}", path.display())]
    Io {
        /// The manifest path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The manifest is not valid TOML or does not match the schema.
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
    /// An entry is structurally valid but unusable.
    #[error("invalid manifest entry #{index}: {reason}")]
    InvalidEntry {
        /// Zero-based position of the entry in `[[assets]]`.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },
}

/// One `[[assets]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// `image`, `audio` or `data` (`json` is accepted too).
    pub kind: AssetKind,
    /// The key the asset is stored under.
    pub key: String,
    /// The location handed to the fetcher.
    pub source: String,
}

impl ManifestEntry {
    /// Converts the entry into a load request.
    pub fn to_request(&self) -> LoadRequest {
        LoadRequest::new(self.kind, self.key.clone(), self.source.clone())
    }
}

/// A parsed asset manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Loader settings.
    #[serde(default)]
    pub loader: LoaderConfig,
    /// The assets to queue, in queue order.
    #[serde(default)]
    pub assets: Vec<ManifestEntry>,
}

impl AssetManifest {
    /// Parses and validates a manifest from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ManifestError> {
        let manifest: AssetManifest = toml::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reads, parses and validates a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded asset manifest from '{}'", path.display());
        Self::from_toml_str(&text)
    }

    /// Rejects entries with blank keys or sources.
    ///
    /// Repeated `(kind, key)` pairs are allowed: the loader keeps the entry that
    /// comes last in queue order.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for (index, entry) in self.assets.iter().enumerate() {
            if entry.key.trim().is_empty() {
                return Err(ManifestError::InvalidEntry {
                    index,
                    reason: "key is empty".to_string(),
                });
            }
            if entry.source.trim().is_empty() {
                return Err(ManifestError::InvalidEntry {
                    index,
                    reason: format!("source for '{}' is empty", entry.key),
                });
            }
        }
        Ok(())
    }

    /// The load requests, in manifest order.
    pub fn requests(&self) -> impl Iterator<Item = LoadRequest> + '_ {
        self.assets.iter().map(ManifestEntry::to_request)
    }
}
