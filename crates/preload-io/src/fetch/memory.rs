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
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

#[derive(Debug, Clone)]
enum Entry {
    Bytes {
        bytes: Arc<[u8]>,
        delay: Option<Duration>,
    },
    Failure(String),
    Hang,
}

/// Serves assets from memory.
///
/// Useful for embedded assets and for tests: besides plain bytes, an entry can
/// be made slow, failing, or never settling at all.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryFetcher {
    /// Creates an empty fetcher; every location is "not found".
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&self, location: impl Into<String>, entry: Entry) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(location.into(), entry);
    }

    /// Serves `bytes` at `location`.
    pub fn insert(&self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.put(
            location,
            Entry::Bytes {
                bytes: bytes.into().into(),
                delay: None,
            },
        );
    }

    /// Serves `bytes` at `location` after sleeping for `delay`.
    pub fn insert_delayed(
        &self,
        location: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        delay: Duration,
    ) {
        self.put(
            location,
            Entry::Bytes {
                bytes: bytes.into().into(),
                delay: Some(delay),
            },
        );
    }

    /// Makes every fetch of `location` fail with `reason`.
    pub fn insert_failure(&self, location: impl Into<String>, reason: impl Into<String>) {
        self.put(location, Entry::Failure(reason.into()));
    }

    /// Makes every fetch of `location` pend forever.
    pub fn insert_hanging(&self, location: impl Into<String>) {
        self.put(location, Entry::Hang);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(location, bytes);
        self
    }

    /// Builder form of [`insert_delayed`](Self::insert_delayed).
    pub fn with_delayed(
        self,
        location: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        delay: Duration,
    ) -> Self {
        self.insert_delayed(location, bytes, delay);
        self
    }

    /// Builder form of [`insert_failure`](Self::insert_failure).
    pub fn with_failure(self, location: impl Into<String>, reason: impl Into<String>) -> Self {
        self.insert_failure(location, reason);
        self
    }

    /// Builder form of [`insert_hanging`](Self::insert_hanging).
    pub fn with_hanging(self, location: impl Into<String>) -> Self {
        self.insert_hanging(location);
        self
    }
}

#[async_trait]
impl AssetFetcher for MemoryFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        // Never hold the lock across an await.
        let entry = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(location)
            .cloned();

        match entry {
            Some(Entry::Bytes { bytes, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(bytes.to_vec())
            }
            Some(Entry::Failure(reason)) => Err(LoadError::network(location, reason)),
            Some(Entry::Hang) => std::future::pending().await,
            None => Err(LoadError::network(location, "not found")),
        }
    }

    fn name(&self) -> &'static str {
        "MemoryFetcher"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_inserted_bytes() {
        let fetcher = MemoryFetcher::new().with("a.json", "[]");
        assert_eq!(fetcher.fetch("a.json").await.unwrap(), b"[]");

        let err = fetcher.fetch("b.json").await.unwrap_err();
        assert_eq!(err, LoadError::network("b.json", "not found"));
    }

    #[tokio::test]
    async fn test_failure_entry() {
        let fetcher = MemoryFetcher::new().with_failure("down.png", "HTTP 503");
        let err = fetcher.fetch("down.png").await.unwrap_err();
        assert_eq!(err.to_string(), "failed to fetch 'down.png': HTTP 503");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_and_hang() {
        let fetcher = MemoryFetcher::new()
            .with_delayed("slow.json", "1", Duration::from_secs(5))
            .with_hanging("stuck.json");

        assert_eq!(fetcher.fetch("slow.json").await.unwrap(), b"1");

        let stuck =
            tokio::time::timeout(Duration::from_secs(60), fetcher.fetch("stuck.json")).await;
        assert!(stuck.is_err(), "a hanging entry must never settle");
    }
}
