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

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The category of an asset, which selects the decoder used to load it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// A raster image, decoded to RGBA8.
    Image,
    /// A sound file, decoded to interleaved `f32` samples.
    Audio,
    /// A structured-data document (JSON).
    #[serde(alias = "json")]
    Data,
}

impl AssetKind {
    /// Every kind, in a stable order.
    pub const ALL: [AssetKind; 3] = [AssetKind::Image, AssetKind::Audio, AssetKind::Data];

    /// The lowercase name used in manifests and log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Audio => "audio",
            AssetKind::Data => "data",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Returned when a string does not name any [`AssetKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown asset kind '{0}' (expected image, audio or data)")]
pub struct UnknownAssetKind(
    /// The rejected input.
    pub String,
);

impl FromStr for AssetKind {
    type Err = UnknownAssetKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(AssetKind::Image),
            "audio" => Ok(AssetKind::Audio),
            "data" | "json" => Ok(AssetKind::Data),
            _ => Err(UnknownAssetKind(s.to_string())),
        }
    }
}
