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

//! Acts as the agent for asset loading.
//!
//! The [`AssetLoadingAgent`] owns a queue of [`LoadRequest`](preload_core::LoadRequest)s.
//! Starting a loading cycle drains the queue and launches one task per request;
//! each task fetches bytes through the injected
//! [`AssetFetcher`](preload_core::AssetFetcher) and decodes them with the lane
//! the [`DecoderSet`](preload_lanes::DecoderSet) assigns to the request's kind.
//!
//! Every request *settles* exactly once, as a success or as a failure. Both
//! count toward progress. Failures are logged and leave no entry in the
//! result table, so callers must check for missing assets after completion
//! instead of assuming completion means success.
//!
//! Each cycle carries a generation number. [`reset`](AssetLoadingAgent::reset)
//! moves to a new generation without cancelling in-flight loads; when those
//! loads settle later they are recognized as stale and dropped.

mod agent;
mod cycle;
mod error;
mod events;
mod metrics;
mod state;

pub use agent::AssetLoadingAgent;
pub use cycle::{CycleOutcome, LoadCycle};
pub use error::AgentError;
pub use events::LoadEvent;
