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

use async_trait::async_trait;
use preload_core::{AssetFetcher, LoadError};
use std::path::{Component, Path, PathBuf};

/// Reads assets from a directory on disk.
///
/// Source locations are relative paths under the root (`assets/data/facts.json`).
/// Locations that would leave the root are refused.
#[derive(Debug, Clone)]
pub struct FileSystemFetcher {
    root: PathBuf,
}

impl FileSystemFetcher {
    /// Creates a fetcher serving files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory locations are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a source location to a path under the root.
    pub fn resolve(&self, location: &str) -> Result<PathBuf, LoadError> {
        let mut path = self.root.clone();
        for component in Path::new(location).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(LoadError::network(
                        location,
                        "location escapes the asset root",
                    ));
                }
            }
        }
        if path == self.root {
            return Err(LoadError::network(location, "empty location"));
        }
        Ok(path)
    }
}

#[async_trait]
impl AssetFetcher for FileSystemFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.resolve(location)?;
        log::trace!("Reading '{}'", path.display());
        tokio::fs::read(&path)
            .await
            .map_err(|e| LoadError::network(location, format!("{}: {e}", path.display())))
    }

    fn name(&self) -> &'static str {
        "FileSystemFetcher"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_rejects_escapes() {
        let fetcher = FileSystemFetcher::new("/srv/assets");

        assert_eq!(
            fetcher.resolve("./data/facts.json").unwrap(),
            PathBuf::from("/srv/assets/data/facts.json")
        );
        assert!(fetcher.resolve("../secrets.txt").is_err());
        assert!(fetcher.resolve("data/../../secrets.txt").is_err());
        assert!(fetcher.resolve("/etc/passwd").is_err());
        assert!(fetcher.resolve("").is_err());
    }

    #[tokio::test]
    async fn test_fetch_reads_file_bytes() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/facts.json"), b"{}").unwrap();

        let fetcher = FileSystemFetcher::new(dir.path());
        assert_eq!(fetcher.fetch("data/facts.json").await.unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_missing_file_is_a_network_failure() {
        let dir = tempdir().unwrap();
        let fetcher = FileSystemFetcher::new(dir.path());

        let err = fetcher.fetch("missing.png").await.unwrap_err();
        assert!(matches!(err, LoadError::Network { ref location, .. } if location == "missing.png"));
    }
}
