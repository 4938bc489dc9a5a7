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

//! Abstract definitions for loader metrics.

use std::fmt::{self, Display};
use thiserror::Error;

/// A unique identifier for a metric, made of a namespace and a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricId {
    /// The broad category of the metric (e.g., "image_loader").
    pub namespace: String,
    /// The specific name of the metric (e.g., "completed_total").
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

impl Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// The fundamental type of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// A value that only ever increases (e.g., total requests).
    Counter,
    /// A distribution of measurements (e.g., time to first image).
    Histogram,
}

/// The current value of a metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// A monotonically increasing count.
    Counter(u64),
    /// Running totals and the distribution of samples across fixed buckets.
    Histogram {
        /// Number of samples recorded.
        count: u64,
        /// Sum of every sample recorded.
        sum: f64,
        /// The upper bounds of the buckets.
        bucket_bounds: Vec<f64>,
        /// The count of samples at or below each bound.
        bucket_counts: Vec<u64>,
    },
}

impl MetricValue {
    /// Returns the [`MetricType`] corresponding to this value.
    pub fn metric_type(&self) -> MetricType {
        match self {
            MetricValue::Counter(_) => MetricType::Counter,
            MetricValue::Histogram { .. } => MetricType::Histogram,
        }
    }

    /// Returns the value as a `u64` if it is a `Counter`.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            MetricValue::Counter(v) => Some(*v),
            MetricValue::Histogram { .. } => None,
        }
    }

    /// Returns the number of samples if it is a `Histogram`.
    pub fn sample_count(&self) -> Option<u64> {
        match self {
            MetricValue::Histogram { count, .. } => Some(*count),
            MetricValue::Counter(_) => None,
        }
    }

    /// Returns the mean sample if it is a `Histogram` with at least one sample.
    pub fn mean(&self) -> Option<f64> {
        match self {
            MetricValue::Histogram { count, sum, .. } if *count > 0 => Some(sum / *count as f64),
            _ => None,
        }
    }

    /// Adds `sample` to a histogram's totals and buckets. Returns `false` for counters.
    pub fn observe(&mut self, sample: f64) -> bool {
        match self {
            MetricValue::Histogram {
                count,
                sum,
                bucket_bounds,
                bucket_counts,
            } => {
                *count += 1;
                *sum += sample;
                for (bucket, &bound) in bucket_counts.iter_mut().zip(bucket_bounds.iter()) {
                    if sample <= bound {
                        *bucket += 1;
                    }
                }
                true
            }
            MetricValue::Counter(_) => false,
        }
    }
}

/// A registered metric.
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric's identifier.
    pub id: MetricId,
    /// A human-readable description.
    pub description: String,
    /// The unit of measurement (e.g., "ms", "count").
    pub unit: String,
    /// The current value.
    pub value: MetricValue,
}

impl Metric {
    /// Creates a counter starting at zero.
    pub fn new_counter(id: MetricId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            unit: "count".to_string(),
            value: MetricValue::Counter(0),
        }
    }

    /// Creates an empty histogram with the given bucket upper bounds.
    pub fn new_histogram(
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        bucket_bounds: Vec<f64>,
    ) -> Self {
        let bucket_counts = vec![0; bucket_bounds.len()];
        Self {
            id,
            description: description.into(),
            unit: unit.into(),
            value: MetricValue::Histogram {
                count: 0,
                sum: 0.0,
                bucket_bounds,
                bucket_counts,
            },
        }
    }
}

/// A specialized `Result` type for metric operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// An error that can occur within the metrics system.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// The requested metric was never registered.
    #[error("Metric not found: {0}")]
    MetricNotFound(MetricId),
    /// An operation was attempted on a metric of the wrong type.
    #[error("Type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        /// The type the operation needs.
        expected: MetricType,
        /// The type actually registered.
        found: MetricType,
    },
    /// The storage layer failed.
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_id_display() {
        let id = MetricId::new("image_loader", "completed_total");
        assert_eq!(id.to_string(), "image_loader:completed_total");
    }

    #[test]
    fn new_histogram_has_one_count_per_bucket() {
        let metric = Metric::new_histogram(
            MetricId::new("image_loader", "time_to_final"),
            "Time to final image",
            "ms",
            vec![1.0, 10.0, 100.0],
        );
        match metric.value {
            MetricValue::Histogram { bucket_counts, .. } => assert_eq!(bucket_counts, vec![0; 3]),
            other => panic!("expected a histogram, got {other:?}"),
        }
    }

    #[test]
    fn histogram_keeps_running_totals() {
        let mut metric = Metric::new_histogram(
            MetricId::new("image_loader", "time_to_final"),
            "Time to final image",
            "ms",
            vec![1.0, 10.0],
        );
        assert_eq!(metric.value.mean(), None);

        for sample in [0.5, 4.5, 40.0] {
            assert!(metric.value.observe(sample));
        }

        assert_eq!(metric.value.sample_count(), Some(3));
        assert_eq!(metric.value.mean(), Some(15.0));
        match metric.value {
            MetricValue::Histogram { bucket_counts, .. } => assert_eq!(bucket_counts, vec![1, 2]),
            other => panic!("expected a histogram, got {other:?}"),
        }
    }

    #[test]
    fn value_accessors_respect_type() {
        assert_eq!(MetricValue::Counter(3).as_counter(), Some(3));
        assert_eq!(MetricValue::Counter(3).sample_count(), None);
        assert_eq!(MetricValue::Counter(3).mean(), None);
        assert!(!MetricValue::Counter(3).observe(1.0));
        assert_eq!(MetricValue::Counter(3).metric_type(), MetricType::Counter);
    }
}
