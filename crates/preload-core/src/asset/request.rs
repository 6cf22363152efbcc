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

use super::AssetKind;

/// A single queued load: what to load, under which key, and from where.
///
/// Requests are immutable once created and are consumed when a loading
/// cycle starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    kind: AssetKind,
    key: String,
    source: String,
}

impl LoadRequest {
    /// Creates a new request.
    pub fn new(kind: AssetKind, key: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            source: source.into(),
        }
    }

    /// The kind of asset, which selects the decoder.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// The key the loaded asset is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The location handed to the fetcher (a path or URL-like string).
    pub fn source(&self) -> &str {
        &self.source
    }
}
