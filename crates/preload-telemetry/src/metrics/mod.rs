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

//! Metric identifiers and values.

pub mod registry;

use std::fmt;

/// Identifies a metric by namespace and name, e.g. `assets:load_time`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricId {
    /// The broad category of the metric (e.g., "assets").
    pub namespace: String,
    /// The specific name of the metric (e.g., "failed_total").
    pub name: String,
}

impl MetricId {
    /// Creates a new `MetricId` with a namespace and a name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// The current value of a metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// A monotonically increasing count.
    Counter(u64),
    /// A distribution of samples across fixed buckets.
    Histogram {
        /// The raw samples recorded.
        samples: Vec<f64>,
        /// The upper bounds of the histogram buckets.
        bucket_bounds: Vec<f64>,
        /// The count of samples within each bucket. Samples above the last
        /// bound are only kept in `samples`.
        bucket_counts: Vec<u64>,
    },
}

impl MetricValue {
    /// Returns the value as a `u64` if it is a `Counter`.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            MetricValue::Counter(v) => Some(*v),
            MetricValue::Histogram { .. } => None,
        }
    }

    /// The number of recorded samples if this is a `Histogram`.
    pub fn sample_count(&self) -> Option<usize> {
        match self {
            MetricValue::Histogram { samples, .. } => Some(samples.len()),
            MetricValue::Counter(_) => None,
        }
    }
}

/// Errors raised by the metrics registry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    /// The requested metric was never registered.
    #[error("metric not found: {0}")]
    MetricNotFound(MetricId),
    /// A counter operation hit a histogram or vice versa.
    #[error("metric {0} has a different type")]
    TypeMismatch(MetricId),
    /// Histogram bucket bounds must be strictly increasing.
    #[error("invalid histogram buckets for {0}")]
    InvalidBuckets(MetricId),
}

/// Shorthand for metrics results.
pub type MetricsResult<T> = Result<T, MetricsError>;
