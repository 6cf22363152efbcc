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

//! State shared between the agent and the tasks of its loading cycles.

use super::{cycle::CycleOutcome, events::LoadEvent, metrics::LoaderMetrics};
use crossbeam_channel::{Sender, TrySendError};
use preload_core::{AssetKind, LoadError, LoadRequest, LoadedAsset, LoadedAssetTable};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tokio::sync::watch;

pub(crate) type ProgressHandler = Box<dyn FnMut(f32) + Send>;
pub(crate) type CompleteHandler = Box<dyn FnMut(&LoadedAssetTable) + Send>;

/// A request together with its position in overall queue order.
#[derive(Debug, Clone)]
pub(crate) struct QueuedRequest {
    pub(crate) ordinal: u64,
    pub(crate) request: LoadRequest,
}

#[derive(Default)]
pub(crate) struct Handlers {
    pub(crate) progress: Option<ProgressHandler>,
    pub(crate) complete: Option<CompleteHandler>,
}

/// Counters and results of the current generation.
pub(crate) struct CycleState {
    pub(crate) generation: u64,
    pub(crate) loading: bool,
    pub(crate) total: usize,
    pub(crate) completed: usize,
    pub(crate) succeeded: usize,
    pub(crate) failed: usize,
    pub(crate) completion_fired: bool,
    pub(crate) table: LoadedAssetTable,
    /// Queue ordinal of the request each table entry came from.
    ordinals: HashMap<(AssetKind, String), u64>,
    /// Resolves the [`LoadCycle`](super::LoadCycle) handles of this generation.
    pub(crate) outcome_tx: Arc<watch::Sender<Option<CycleOutcome>>>,
}

impl CycleState {
    fn new() -> Self {
        let (outcome_tx, _) = watch::channel(None);
        Self {
            generation: 0,
            loading: false,
            total: 0,
            completed: 0,
            succeeded: 0,
            failed: 0,
            completion_fired: false,
            table: LoadedAssetTable::new(),
            ordinals: HashMap::new(),
            outcome_tx: Arc::new(outcome_tx),
        }
    }

    pub(crate) fn progress(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }

    /// Starts a new generation with `total` requests and returns it.
    pub(crate) fn begin(&mut self, total: usize) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.total = total;
        self.completed = 0;
        self.succeeded = 0;
        self.failed = 0;
        self.completion_fired = false;
        self.outcome_tx = Arc::new(watch::channel(None).0);
        self.generation
    }

    /// Abandons the current generation. Returns the generation of the cycle
    /// that was superseded, if one was running.
    pub(crate) fn clear(&mut self) -> Option<u64> {
        let superseded = self.loading.then_some(self.generation);
        if superseded.is_some() {
            self.outcome_tx.send_replace(Some(CycleOutcome::Superseded));
        }
        self.generation += 1;
        self.loading = false;
        self.total = 0;
        self.completed = 0;
        self.succeeded = 0;
        self.failed = 0;
        self.completion_fired = false;
        self.table.clear();
        self.ordinals.clear();
        superseded
    }

    /// Stores a decoded asset unless a request later in queue order already
    /// filled the same slot.
    fn record(&mut self, queued: &QueuedRequest, asset: LoadedAsset) {
        let slot = (queued.request.kind(), queued.request.key().to_string());
        if let Some(&stored) = self.ordinals.get(&slot) {
            if stored > queued.ordinal {
                log::debug!(
                    "Dropping '{}' ({}): superseded by a later request for the same key",
                    queued.request.key(),
                    queued.request.kind()
                );
                return;
            }
        }
        self.ordinals.insert(slot, queued.ordinal);
        self.table.insert(queued.request.key(), asset);
    }
}

/// Everything the agent shares with its in-flight tasks.
///
/// Lock order is `dispatch` then `state`. Queries take `state` alone.
pub(crate) struct Shared {
    state: Mutex<CycleState>,
    /// Held while a settlement updates the state and runs the handlers, so
    /// handlers observe settlements one at a time and in order.
    dispatch: Mutex<Handlers>,
    events: RwLock<Option<Sender<LoadEvent>>>,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(CycleState::new()),
            dispatch: Mutex::new(Handlers::default()),
            events: RwLock::new(None),
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, CycleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn handlers(&self) -> MutexGuard<'_, Handlers> {
        self.dispatch.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_event_sender(&self, sender: Option<Sender<LoadEvent>>) {
        *self.events.write().unwrap_or_else(PoisonError::into_inner) = sender;
    }

    pub(crate) fn emit(&self, event: LoadEvent) {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = events.as_ref() else {
            return;
        };
        // Never block a settling task on a slow listener.
        match sender.try_send(event) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(event)) => {
                log::debug!("Event channel is full, dropping {event:?}");
            }
        }
    }

    /// Applies the outcome of one request of cycle `generation`.
    ///
    /// Settlements from an earlier generation are discarded without touching
    /// any counter, table entry or handler.
    pub(crate) fn settle(
        &self,
        generation: u64,
        queued: &QueuedRequest,
        outcome: Result<LoadedAsset, LoadError>,
        metrics: Option<&LoaderMetrics>,
    ) {
        let mut handlers = self.handlers();

        let (settled_event, progress, completed, total, completion) = {
            let mut state = self.state();
            if state.generation != generation || !state.loading {
                log::debug!(
                    "Discarding stale settlement of '{}' from cycle {generation}",
                    queued.request.key()
                );
                return;
            }

            let error = match outcome {
                Ok(asset) => {
                    log::trace!(
                        "Loaded {} asset '{}'",
                        queued.request.kind(),
                        queued.request.key()
                    );
                    state.record(queued, asset);
                    state.succeeded += 1;
                    None
                }
                Err(e) => {
                    log::warn!("Failed to load asset '{}': {e}", queued.request.key());
                    state.failed += 1;
                    Some(e)
                }
            };
            if let Some(metrics) = metrics {
                metrics.record_settled(error.is_some());
            }
            state.completed = (state.completed + 1).min(state.total);

            let settled_event = LoadEvent::Settled {
                generation,
                kind: queued.request.kind(),
                key: queued.request.key().to_string(),
                error,
                completed: state.completed,
                total: state.total,
            };

            let completion = if state.completed >= state.total && !state.completion_fired {
                state.completion_fired = true;
                state.loading = false;
                Some((
                    state.table.clone(),
                    state.succeeded,
                    state.failed,
                    state.outcome_tx.clone(),
                ))
            } else {
                None
            };
            (
                settled_event,
                state.progress(),
                state.completed,
                state.total,
                completion,
            )
        };

        // Sent with the state lock released so queries never wait on listeners.
        self.emit(settled_event);

        log::trace!("Cycle {generation}: {completed}/{total} settled");
        if let Some(on_progress) = handlers.progress.as_mut() {
            on_progress(progress);
        }

        if let Some((table, succeeded, failed, outcome_tx)) = completion {
            log::info!(
                "Loading cycle {generation} finished: {succeeded} loaded, {failed} failed"
            );
            if let Some(on_complete) = handlers.complete.as_mut() {
                on_complete(&table);
            }
            self.emit(LoadEvent::CycleCompleted {
                generation,
                succeeded,
                failed,
            });
            outcome_tx.send_replace(Some(CycleOutcome::Completed { succeeded, failed }));
        }
    }

    /// Completes a cycle that started with nothing queued.
    pub(crate) fn finish_empty(&self, generation: u64) {
        let mut handlers = self.handlers();

        let outcome_tx = {
            let mut state = self.state();
            if state.generation != generation || state.completion_fired {
                return;
            }
            state.completion_fired = true;
            state.loading = false;
            state.outcome_tx.clone()
        };

        log::info!("Loading cycle {generation} finished: nothing was queued");
        if let Some(on_complete) = handlers.complete.as_mut() {
            // Nothing was loaded by this cycle.
            on_complete(&LoadedAssetTable::new());
        }
        self.emit(LoadEvent::CycleCompleted {
            generation,
            succeeded: 0,
            failed: 0,
        });
        outcome_tx.send_replace(Some(CycleOutcome::Completed {
            succeeded: 0,
            failed: 0,
        }));
    }
}
