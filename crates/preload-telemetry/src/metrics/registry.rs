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

use super::{MetricId, MetricValue, MetricsError, MetricsResult};
use std::{
    collections::BTreeMap,
    sync::{Arc, PoisonError, RwLock},
};

type Storage = Arc<RwLock<BTreeMap<MetricId, MetricValue>>>;

/// A thread-safe, in-memory store of named metrics.
///
/// Cloning the registry shares the same storage.
#[derive(Debug, Clone, Default)]
pub struct MetricsRegistry {
    storage: Storage,
}

impl MetricsRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a counter starting at zero. Registering an existing counter
    /// returns a handle to it without resetting it.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = MetricId::new(namespace, name);
        let mut storage = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        match storage.entry(id.clone()).or_insert(MetricValue::Counter(0)) {
            MetricValue::Counter(_) => Ok(CounterHandle {
                id,
                storage: self.storage.clone(),
            }),
            MetricValue::Histogram { .. } => Err(MetricsError::TypeMismatch(id)),
        }
    }

    /// Registers a histogram with the given upper bucket bounds.
    pub fn register_histogram(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        bucket_bounds: Vec<f64>,
    ) -> MetricsResult<HistogramHandle> {
        let id = MetricId::new(namespace, name);
        if bucket_bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MetricsError::InvalidBuckets(id));
        }

        let mut storage = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        let bucket_counts = vec![0; bucket_bounds.len()];
        match storage.entry(id.clone()).or_insert(MetricValue::Histogram {
            samples: Vec::new(),
            bucket_bounds,
            bucket_counts,
        }) {
            MetricValue::Histogram { .. } => Ok(HistogramHandle {
                id,
                storage: self.storage.clone(),
            }),
            MetricValue::Counter(_) => Err(MetricsError::TypeMismatch(id)),
        }
    }

    /// Returns a copy of a metric's current value.
    pub fn get(&self, id: &MetricId) -> MetricsResult<MetricValue> {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))
    }

    /// The number of registered metrics.
    pub fn metric_count(&self) -> usize {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// A sorted copy of every metric.
    pub fn snapshot(&self) -> Vec<(MetricId, MetricValue)> {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect()
    }
}

/// Handle for counter operations.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    storage: Storage,
}

impl CounterHandle {
    /// Increments the counter by 1, returning the new value.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.increment_by(1)
    }

    /// Increments the counter by `amount`, returning the new value.
    pub fn increment_by(&self, amount: u64) -> MetricsResult<u64> {
        let mut storage = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        match storage.get_mut(&self.id) {
            Some(MetricValue::Counter(value)) => {
                *value += amount;
                Ok(*value)
            }
            Some(_) => Err(MetricsError::TypeMismatch(self.id.clone())),
            None => Err(MetricsError::MetricNotFound(self.id.clone())),
        }
    }

    /// The current value.
    pub fn get(&self) -> MetricsResult<u64> {
        let storage = self.storage.read().unwrap_or_else(PoisonError::into_inner);
        match storage.get(&self.id) {
            Some(MetricValue::Counter(value)) => Ok(*value),
            Some(_) => Err(MetricsError::TypeMismatch(self.id.clone())),
            None => Err(MetricsError::MetricNotFound(self.id.clone())),
        }
    }

    /// The metric ID.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle for histogram operations.
#[derive(Debug, Clone)]
pub struct HistogramHandle {
    id: MetricId,
    storage: Storage,
}

impl HistogramHandle {
    /// Records a sample.
    pub fn observe(&self, sample: f64) -> MetricsResult<()> {
        let mut storage = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        match storage.get_mut(&self.id) {
            Some(MetricValue::Histogram {
                samples,
                bucket_bounds,
                bucket_counts,
            }) => {
                samples.push(sample);
                if let Some(bucket) = bucket_bounds.iter().position(|bound| sample <= *bound) {
                    bucket_counts[bucket] += 1;
                }
                Ok(())
            }
            Some(_) => Err(MetricsError::TypeMismatch(self.id.clone())),
            None => Err(MetricsError::MetricNotFound(self.id.clone())),
        }
    }

    /// The metric ID.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}
