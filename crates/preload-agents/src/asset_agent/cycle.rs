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

use super::{
    metrics::LoaderMetrics,
    state::{QueuedRequest, Shared},
};
use preload_core::{AssetFetcher, LoadError, LoadRequest, LoadedAsset};
use preload_lanes::DecoderSet;
use preload_telemetry::ScopedMetricTimer;
use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinSet, time::Instant};

/// How a loading cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every request settled.
    Completed {
        /// Requests that produced an asset.
        succeeded: usize,
        /// Requests that failed.
        failed: usize,
    },
    /// The agent was reset (or dropped) before the cycle completed.
    Superseded,
}

/// A handle on a started loading cycle.
///
/// Dropping it has no effect on the cycle.
#[derive(Debug)]
pub struct LoadCycle {
    generation: u64,
    total: usize,
    outcome: watch::Receiver<Option<CycleOutcome>>,
}

impl LoadCycle {
    pub(crate) fn new(
        generation: u64,
        total: usize,
        outcome: watch::Receiver<Option<CycleOutcome>>,
    ) -> Self {
        Self {
            generation,
            total,
            outcome,
        }
    }

    /// The generation number of this cycle.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The number of requests this cycle started with.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The outcome, if the cycle has already ended.
    pub fn outcome(&self) -> Option<CycleOutcome> {
        *self.outcome.borrow()
    }

    /// Waits until the cycle completes or is superseded.
    ///
    /// When the cycle completes, the completion handler has already run by
    /// the time this resolves.
    pub async fn finished(mut self) -> CycleOutcome {
        match self.outcome.wait_for(Option::is_some).await {
            Ok(outcome) => (*outcome).unwrap_or(CycleOutcome::Superseded),
            // The agent went away before the cycle ended.
            Err(_) => CycleOutcome::Superseded,
        }
    }
}

/// What every task of one cycle needs.
#[derive(Clone)]
pub(crate) struct CycleContext {
    pub(crate) shared: Arc<Shared>,
    pub(crate) fetcher: Arc<dyn AssetFetcher>,
    pub(crate) decoders: DecoderSet,
    pub(crate) metrics: Option<LoaderMetrics>,
    pub(crate) generation: u64,
    pub(crate) deadline: Option<(Instant, Duration)>,
    pub(crate) decode_on_blocking_pool: bool,
}

impl CycleContext {
    /// Fetches and decodes one request, bounded by the cycle deadline.
    async fn load(&self, request: &LoadRequest) -> Result<LoadedAsset, LoadError> {
        let _timer = self
            .metrics
            .as_ref()
            .map(|metrics| ScopedMetricTimer::new(&metrics.load_time_ms));

        let Some((deadline, timeout)) = self.deadline else {
            return self.fetch_and_decode(request).await;
        };
        tokio::time::timeout_at(deadline, self.fetch_and_decode(request))
            .await
            .unwrap_or_else(|_| {
                Err(LoadError::TimedOut {
                    location: request.source().to_string(),
                    timeout,
                })
            })
    }

    async fn fetch_and_decode(&self, request: &LoadRequest) -> Result<LoadedAsset, LoadError> {
        let kind = request.kind();
        let bytes = self.fetcher.fetch(request.source()).await?;
        log::trace!(
            "Fetched {} bytes for '{}' via {}, decoding with {}",
            bytes.len(),
            request.key(),
            self.fetcher.name(),
            self.decoders.strategy_name(kind)
        );

        if !self.decode_on_blocking_pool {
            return self.decoders.decode(kind, request.source(), &bytes);
        }

        let decoders = self.decoders.clone();
        let location = request.source().to_string();
        tokio::task::spawn_blocking(move || decoders.decode(kind, &location, &bytes))
            .await
            .unwrap_or_else(|e| {
                Err(LoadError::decode(
                    kind,
                    request.source(),
                    format!("decoder task failed: {e}"),
                ))
            })
    }
}

/// Settles its request as failed if dropped before settling, so a panicking
/// or aborted load still counts toward completion.
struct PendingLoad {
    ctx: CycleContext,
    queued: QueuedRequest,
    settled: bool,
}

impl PendingLoad {
    fn settle(mut self, outcome: Result<LoadedAsset, LoadError>) {
        self.settled = true;
        self.ctx
            .shared
            .settle(self.ctx.generation, &self.queued, outcome, self.ctx.metrics.as_ref());
    }
}

impl Drop for PendingLoad {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let error = LoadError::network(
            self.queued.request.source(),
            "load task ended before settling",
        );
        self.ctx.shared.settle(
            self.ctx.generation,
            &self.queued,
            Err(error),
            self.ctx.metrics.as_ref(),
        );
    }
}

/// Drives one cycle: spawns a task per request and supervises them.
pub(crate) async fn run_cycle(ctx: CycleContext, requests: Vec<QueuedRequest>) {
    let generation = ctx.generation;

    if requests.is_empty() {
        ctx.shared.finish_empty(generation);
        return;
    }

    let mut tasks = JoinSet::new();
    for queued in requests {
        let pending = PendingLoad {
            ctx: ctx.clone(),
            queued,
            settled: false,
        };
        tasks.spawn(async move {
            let outcome = pending.ctx.load(&pending.queued.request).await;
            pending.settle(outcome);
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            if e.is_panic() {
                log::error!("A load task of cycle {generation} panicked: {e}");
            }
        }
    }
    log::debug!("All load tasks of cycle {generation} have ended");
}
