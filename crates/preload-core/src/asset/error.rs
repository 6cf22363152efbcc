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
use std::time::Duration;

/// Why a single load request settled as failed.
///
/// These errors never escape the loader: they are logged and counted toward
/// progress like a success, and the failed key is simply absent from the
/// result table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The bytes could not be obtained (missing file, transport error,
    /// non-success response).
    #[error("failed to fetch '{location}': {reason}")]
    Network {
        /// The source location that was requested.
        location: String,
        /// A human-readable cause.
        reason: String,
    },
    /// The bytes were obtained but could not be decoded into the requested kind.
    #[error("failed to decode {kind} asset '{location}': {reason}")]
    Decode {
        /// The kind of asset that was being decoded.
        kind: AssetKind,
        /// The source location the bytes came from.
        location: String,
        /// The decoder's error message.
        reason: String,
    },
    /// The request was still outstanding when the cycle deadline passed.
    #[error("'{location}' did not settle within {timeout:?}")]
    TimedOut {
        /// The source location that was requested.
        location: String,
        /// The configured cycle timeout.
        timeout: Duration,
    },
}

impl LoadError {
    /// Convenience constructor for [`LoadError::Network`].
    pub fn network(location: impl Into<String>, reason: impl ToString) -> Self {
        LoadError::Network {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Convenience constructor for [`LoadError::Decode`].
    pub fn decode(kind: AssetKind, location: impl Into<String>, reason: impl ToString) -> Self {
        LoadError::Decode {
            kind,
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// The source location of the failed request.
    pub fn location(&self) -> &str {
        match self {
            LoadError::Network { location, .. }
            | LoadError::Decode { location, .. }
            | LoadError::TimedOut { location, .. } => location,
        }
    }
}
