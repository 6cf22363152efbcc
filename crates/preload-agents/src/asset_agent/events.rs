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

use preload_core::{AssetKind, LoadError};

/// Lifecycle notifications, sent to the channel attached with
/// [`with_event_sender`](super::AssetLoadingAgent::with_event_sender).
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// A cycle began with `total` requests.
    CycleStarted {
        /// The cycle's generation.
        generation: u64,
        /// Number of requests in the cycle.
        total: usize,
    },
    /// One request settled.
    Settled {
        /// The cycle's generation.
        generation: u64,
        /// Kind of the settled request.
        kind: AssetKind,
        /// Key of the settled request.
        key: String,
        /// `None` on success.
        error: Option<LoadError>,
        /// Settled requests so far, this one included.
        completed: usize,
        /// Number of requests in the cycle.
        total: usize,
    },
    /// Every request of the cycle settled.
    CycleCompleted {
        /// The cycle's generation.
        generation: u64,
        /// Requests that produced an asset.
        succeeded: usize,
        /// Requests that failed.
        failed: usize,
    },
    /// The cycle was abandoned by a reset before it completed.
    CycleSuperseded {
        /// The abandoned cycle's generation.
        generation: u64,
    },
}
