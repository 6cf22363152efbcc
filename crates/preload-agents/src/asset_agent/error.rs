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

use preload_telemetry::MetricsError;

/// Misuse of the agent itself. Individual load failures are never reported
/// this way; see [`LoadError`](preload_core::LoadError).
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// `start_loading` was called outside a Tokio runtime and no runtime
    /// handle was configured with `with_runtime`.
    #[error("no Tokio runtime available to drive the loading cycle")]
    NoRuntime,
    /// The loader metrics could not be registered in the given registry.
    #[error("failed to register loader metrics: {0}")]
    Metrics(#[from] MetricsError),
}
