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

use phasset_core::telemetry::{
    Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult,
};
use std::fmt::Debug;

/// Interface for metric storage.
///
/// Updates must be atomic per metric: loader callbacks record from many
/// threads at once.
pub trait MetricsBackend: Send + Sync + Debug + 'static {
    /// Stores or replaces a metric.
    fn put_metric(&self, metric: Metric) -> MetricsResult<()>;

    /// Retrieves a snapshot of a metric.
    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric>;

    /// Checks if a metric exists.
    fn contains_metric(&self, id: &MetricId) -> bool;

    /// Applies `update` to a stored metric in place, under the backend's lock.
    fn update_metric(
        &self,
        id: &MetricId,
        update: &mut dyn FnMut(&mut Metric) -> MetricsResult<()>,
    ) -> MetricsResult<()>;

    /// Lists every stored metric.
    fn list_all_metrics(&self) -> Vec<Metric>;

    /// Number of stored metrics.
    fn metric_count(&self) -> usize;

    /// Increments a counter by `delta`, returning the new value.
    fn increment_counter(&self, id: &MetricId, delta: u64) -> MetricsResult<u64> {
        let mut new_value = 0;
        self.update_metric(id, &mut |metric| {
            let found = metric.value.metric_type();
            match metric.value {
                MetricValue::Counter(ref mut value) => {
                    *value = value.saturating_add(delta);
                    new_value = *value;
                    Ok(())
                }
                _ => Err(MetricsError::TypeMismatch {
                    expected: MetricType::Counter,
                    found,
                }),
            }
        })?;
        Ok(new_value)
    }

    /// Adds a sample to a histogram.
    fn record_histogram_sample(&self, id: &MetricId, sample: f64) -> MetricsResult<()> {
        self.update_metric(id, &mut |metric| {
            let found = metric.value.metric_type();
            if metric.value.observe(sample) {
                Ok(())
            } else {
                Err(MetricsError::TypeMismatch {
                    expected: MetricType::Histogram,
                    found,
                })
            }
        })
    }
}
