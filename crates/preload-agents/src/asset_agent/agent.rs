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

//! The AssetLoadingAgent queues load requests and runs them as loading cycles.

use std::sync::Arc;

use crossbeam_channel::Sender;
use preload_core::{
    AssetFetcher, AssetHandle, AssetKind, ImageData, LoadRequest, LoadedAsset, LoadedAssetTable,
    LoaderConfig, SoundData,
};
use preload_io::AssetManifest;
use preload_lanes::DecoderSet;
use preload_telemetry::MetricsRegistry;
use tokio::runtime::Handle;

use super::{
    cycle::{run_cycle, CycleContext, LoadCycle},
    error::AgentError,
    events::LoadEvent,
    metrics::LoaderMetrics,
    state::{QueuedRequest, Shared},
};

/// Aggregates heterogeneous asset loads into one observable loading cycle.
///
/// Requests are queued with [`enqueue`](Self::enqueue) (or the per-kind
/// shorthands) and started together with [`start_loading`](Self::start_loading).
/// Progress can be polled with [`progress`](Self::progress) or observed through
/// the handler registered with [`on_progress`](Self::on_progress); the handler
/// registered with [`on_complete`](Self::on_complete) runs once per cycle,
/// after every request has settled.
pub struct AssetLoadingAgent {
    fetcher: Arc<dyn AssetFetcher>,
    decoders: DecoderSet,
    config: LoaderConfig,
    runtime: Option<Handle>,
    queue: Vec<QueuedRequest>,
    next_ordinal: u64,
    shared: Arc<Shared>,
    metrics_registry: MetricsRegistry,
    metrics: Option<LoaderMetrics>,
}

impl AssetLoadingAgent {
    /// Creates an agent that fetches through `fetcher` and decodes with the
    /// default lanes.
    pub fn new(fetcher: impl AssetFetcher + 'static) -> Self {
        Self::with_shared_fetcher(Arc::new(fetcher))
    }

    /// Creates an agent around a fetcher that is shared with other owners.
    pub fn with_shared_fetcher(fetcher: Arc<dyn AssetFetcher>) -> Self {
        let metrics_registry = MetricsRegistry::new();
        let metrics = LoaderMetrics::new(&metrics_registry)
            .map_err(|e| log::error!("Failed to register loader metrics: {e}"))
            .ok();

        Self {
            fetcher,
            decoders: DecoderSet::default(),
            config: LoaderConfig::default(),
            runtime: None,
            queue: Vec::new(),
            next_ordinal: 0,
            shared: Arc::new(Shared::new()),
            metrics_registry,
            metrics,
        }
    }

    /// Replaces the decoding lanes.
    pub fn with_decoders(mut self, decoders: DecoderSet) -> Self {
        self.decoders = decoders;
        self
    }

    /// Replaces the loader settings.
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs loading cycles on `runtime` instead of the ambient one.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Attaches a channel that receives [`LoadEvent`]s.
    pub fn with_event_sender(self, sender: Sender<LoadEvent>) -> Self {
        self.shared.set_event_sender(Some(sender));
        self
    }

    /// Records loader metrics in `registry` instead of a private one.
    pub fn with_metrics_registry(
        mut self,
        registry: MetricsRegistry,
    ) -> Result<Self, AgentError> {
        self.metrics = Some(LoaderMetrics::new(&registry)?);
        self.metrics_registry = registry;
        Ok(self)
    }

    /// The registry the loader metrics are recorded in.
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics_registry
    }

    /// The current loader settings.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Replaces the loader settings. Takes effect from the next cycle.
    pub fn set_config(&mut self, config: LoaderConfig) {
        self.config = config;
    }

    /// Queues a request to load the asset at `source` under `(kind, key)`.
    ///
    /// While a cycle is running, the request is held for the next cycle and
    /// the current cycle's counters are left alone.
    pub fn enqueue(
        &mut self,
        kind: AssetKind,
        key: impl Into<String>,
        source: impl Into<String>,
    ) -> &mut Self {
        self.enqueue_request(LoadRequest::new(kind, key, source))
    }

    /// Queues an already built request.
    pub fn enqueue_request(&mut self, request: LoadRequest) -> &mut Self {
        let mut state = self.shared.state();
        if state.loading {
            log::warn!(
                "Queued '{}' while cycle {} is loading; it will load in the next cycle",
                request.key(),
                state.generation
            );
        } else {
            state.total += 1;
        }
        drop(state);

        self.queue.push(QueuedRequest {
            ordinal: self.next_ordinal,
            request,
        });
        self.next_ordinal += 1;
        self
    }

    /// Queues an image.
    pub fn queue_image(&mut self, key: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.enqueue(AssetKind::Image, key, source)
    }

    /// Queues a sound.
    pub fn queue_audio(&mut self, key: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.enqueue(AssetKind::Audio, key, source)
    }

    /// Queues a structured data document.
    pub fn queue_data(&mut self, key: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.enqueue(AssetKind::Data, key, source)
    }

    /// Queues every entry of `manifest`, in order, and adopts its loader settings.
    pub fn enqueue_manifest(&mut self, manifest: &AssetManifest) -> &mut Self {
        self.config = manifest.loader.clone();
        for request in manifest.requests() {
            self.enqueue_request(request);
        }
        log::debug!("Queued {} assets from manifest", manifest.assets.len());
        self
    }

    /// Number of requests waiting for the next cycle.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Registers the handler called with the completed fraction each time a
    /// request settles. Replaces any previous handler.
    pub fn on_progress(&mut self, handler: impl FnMut(f32) + Send + 'static) -> &mut Self {
        self.shared.handlers().progress = Some(Box::new(handler));
        self
    }

    /// Registers the handler called with the result table once every request
    /// of a cycle has settled. Replaces any previous handler.
    pub fn on_complete(
        &mut self,
        handler: impl FnMut(&LoadedAssetTable) + Send + 'static,
    ) -> &mut Self {
        self.shared.handlers().complete = Some(Box::new(handler));
        self
    }

    /// Starts a loading cycle with everything queued so far.
    ///
    /// Calling this while a cycle is running starts nothing and returns a
    /// handle on the running cycle. With nothing queued, the cycle completes
    /// asynchronously and the completion handler receives an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NoRuntime`] when called outside a Tokio runtime
    /// without a handle configured through [`with_runtime`](Self::with_runtime).
    pub fn start_loading(&mut self) -> Result<LoadCycle, AgentError> {
        let mut state = self.shared.state();
        if state.loading {
            log::debug!(
                "start_loading ignored: cycle {} is still loading",
                state.generation
            );
            return Ok(LoadCycle::new(
                state.generation,
                state.total,
                state.outcome_tx.subscribe(),
            ));
        }

        let runtime = self
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
            .ok_or(AgentError::NoRuntime)?;

        let requests = std::mem::take(&mut self.queue);
        let total = requests.len();
        let generation = state.begin(total);
        let cycle = LoadCycle::new(generation, total, state.outcome_tx.subscribe());
        drop(state);

        log::info!("Starting loading cycle {generation} with {total} assets");
        self.shared.emit(LoadEvent::CycleStarted { generation, total });

        let deadline = self
            .config
            .cycle_timeout()
            .map(|timeout| (tokio::time::Instant::now() + timeout, timeout));
        let ctx = CycleContext {
            shared: self.shared.clone(),
            fetcher: self.fetcher.clone(),
            decoders: self.decoders.clone(),
            metrics: self.metrics.clone(),
            generation,
            deadline,
            decode_on_blocking_pool: self.config.decode_on_blocking_pool,
        };
        runtime.spawn(run_cycle(ctx, requests));

        Ok(cycle)
    }

    /// Discards the queue, the results and the counters.
    ///
    /// Loads already in flight are not cancelled; their results are ignored
    /// when they settle. A running cycle ends as
    /// [`Superseded`](super::CycleOutcome::Superseded) and its completion
    /// handler never fires.
    pub fn reset(&mut self) -> &mut Self {
        self.queue.clear();
        let superseded = self.shared.state().clear();
        if let Some(generation) = superseded {
            log::info!("Loading cycle {generation} superseded by reset");
            self.shared.emit(LoadEvent::CycleSuperseded { generation });
        }
        self
    }

    /// Looks up a loaded asset. `None` if it was never loaded, failed, or the
    /// agent was reset since.
    pub fn get_asset(&self, kind: AssetKind, key: &str) -> Option<LoadedAsset> {
        self.shared.state().table.get(kind, key).cloned()
    }

    /// Looks up a loaded image.
    pub fn image(&self, key: &str) -> Option<AssetHandle<ImageData>> {
        self.shared.state().table.image(key).cloned()
    }

    /// Looks up a loaded sound.
    pub fn sound(&self, key: &str) -> Option<AssetHandle<SoundData>> {
        self.shared.state().table.sound(key).cloned()
    }

    /// Looks up a loaded data document.
    pub fn data(&self, key: &str) -> Option<AssetHandle<serde_json::Value>> {
        self.shared.state().table.data(key).cloned()
    }

    /// A snapshot of everything loaded so far.
    pub fn assets(&self) -> LoadedAssetTable {
        self.shared.state().table.clone()
    }

    /// `true` when no cycle is running and every counted request has settled.
    pub fn is_load_complete(&self) -> bool {
        let state = self.shared.state();
        !state.loading && state.completed >= state.total
    }

    /// `true` while a cycle is running.
    pub fn is_loading(&self) -> bool {
        self.shared.state().loading
    }

    /// Settled requests over counted requests, or `0.0` when nothing is counted.
    pub fn progress(&self) -> f32 {
        self.shared.state().progress()
    }

    /// `(completed, total)` for the current generation.
    pub fn counts(&self) -> (usize, usize) {
        let state = self.shared.state();
        (state.completed, state.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preload_io::MemoryFetcher;

    #[test]
    fn test_enqueue_counts_toward_total_while_idle() {
        let mut agent = AssetLoadingAgent::new(MemoryFetcher::new());
        agent
            .queue_image("hero", "hero.png")
            .queue_audio("theme", "theme.wav")
            .queue_data("config", "config.json");

        assert_eq!(agent.queued(), 3);
        assert_eq!(agent.counts(), (0, 3));
        assert_eq!(agent.progress(), 0.0);
        assert!(!agent.is_load_complete());
    }

    #[test]
    fn test_start_loading_without_runtime_fails() {
        let mut agent = AssetLoadingAgent::new(MemoryFetcher::new());
        agent.queue_data("config", "config.json");

        let result = agent.start_loading();

        assert!(matches!(result, Err(AgentError::NoRuntime)));
        // The queue is left untouched.
        assert_eq!(agent.queued(), 1);
        assert!(!agent.is_loading());
    }

    #[test]
    fn test_reset_clears_queue_and_counters() {
        let mut agent = AssetLoadingAgent::new(MemoryFetcher::new());
        agent.queue_data("a", "a.json").queue_data("b", "b.json");

        agent.reset();

        assert_eq!(agent.queued(), 0);
        assert_eq!(agent.counts(), (0, 0));
        assert!(agent.is_load_complete());
    }

    #[test]
    fn test_enqueue_manifest_adopts_loader_settings() {
        let manifest = AssetManifest::from_toml_str(
            r#"
            [loader]
            cycle_timeout_ms = 250

            [[assets]]
            kind = "image"
            key = "logo"
            source = "logo.png"
            "#,
        )
        .unwrap();
        let mut agent = AssetLoadingAgent::new(MemoryFetcher::new());

        agent.enqueue_manifest(&manifest);

        assert_eq!(agent.queued(), 1);
        assert_eq!(
            agent.config().cycle_timeout(),
            Some(std::time::Duration::from_millis(250))
        );
    }

    #[test]
    fn test_loader_metrics_are_registered() {
        let registry = MetricsRegistry::new();
        let agent = AssetLoadingAgent::new(MemoryFetcher::new())
            .with_metrics_registry(registry.clone())
            .unwrap();

        assert_eq!(agent.metrics().metric_count(), 3);
        assert_eq!(registry.metric_count(), 3);
    }
}
