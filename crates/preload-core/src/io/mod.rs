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

//! Collaborator contracts for getting raw asset bytes.

use crate::asset::LoadError;
use async_trait::async_trait;

/// The fetch primitive the loader composes with.
///
/// Implementors turn a source location into raw bytes. Any failure to do so
/// (missing file, transport error, non-success response) must be reported as
/// [`LoadError::Network`]; decoding is not the fetcher's concern.
///
/// A fetch may take arbitrarily long. The loader starts many fetches at once
/// and never cancels one, so implementors must be safe to call concurrently.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetches the bytes stored at `location`.
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError>;

    /// A short name for log lines.
    fn name(&self) -> &'static str {
        "AssetFetcher"
    }
}
