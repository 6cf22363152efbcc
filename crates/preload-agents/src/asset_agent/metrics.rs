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

use preload_telemetry::{CounterHandle, HistogramHandle, MetricsRegistry, MetricsResult};

/// A collection of metric handles used by the loading agent.
#[derive(Debug, Clone)]
pub(crate) struct LoaderMetrics {
    /// Fetch + decode time per request, in milliseconds.
    pub(crate) load_time_ms: HistogramHandle,
    /// Requests settled, successes and failures alike.
    pub(crate) settled_total: CounterHandle,
    /// Requests that settled as failures.
    pub(crate) failed_total: CounterHandle,
}

impl LoaderMetrics {
    pub(crate) fn new(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            load_time_ms: registry.register_histogram(
                "assets",
                "load_time",
                vec![1.0, 5.0, 16.0, 33.0, 100.0, 500.0, 2000.0],
            )?,
            settled_total: registry.register_counter("assets", "settled_total")?,
            failed_total: registry.register_counter("assets", "failed_total")?,
        })
    }

    pub(crate) fn record_settled(&self, failed: bool) {
        let mut result = self.settled_total.increment().map(|_| ());
        if failed {
            result = result.and(self.failed_total.increment().map(|_| ()));
        }
        if let Err(e) = result {
            log::warn!("Failed to record load metrics: {e}");
        }
    }
}
