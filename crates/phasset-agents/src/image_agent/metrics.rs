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

use phasset_core::telemetry::MetricsResult;
use phasset_telemetry::metrics::registry::{CounterHandle, HistogramHandle};
use phasset_telemetry::MetricsRegistry;
use std::time::Duration;

/// Namespace of every metric registered by the image agent.
pub const METRICS_NAMESPACE: &str = "image_loader";

/// Metric handles updated by the image agent.
///
/// Recording never fails a request: errors from the backend are logged and dropped.
#[derive(Debug, Clone)]
pub struct LoaderMetrics {
    requests: CounterHandle,
    rejections: CounterHandle,
    completions: CounterHandle,
    failures: CounterHandle,
    cancellations: CounterHandle,
    partials: CounterHandle,
    time_to_final_ms: HistogramHandle,
}

impl LoaderMetrics {
    /// Registers the loader metrics in `registry`.
    pub fn register(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            requests: registry.register_counter(
                METRICS_NAMESPACE,
                "requests_total",
                "Loads started",
            )?,
            rejections: registry.register_counter(
                METRICS_NAMESPACE,
                "rejected_total",
                "Loads rejected before reaching the store",
            )?,
            completions: registry.register_counter(
                METRICS_NAMESPACE,
                "completed_total",
                "Loads that delivered a final image",
            )?,
            failures: registry.register_counter(
                METRICS_NAMESPACE,
                "failed_total",
                "Loads failed by the store",
            )?,
            cancellations: registry.register_counter(
                METRICS_NAMESPACE,
                "cancelled_total",
                "Loads cancelled while in flight",
            )?,
            partials: registry.register_counter(
                METRICS_NAMESPACE,
                "partials_total",
                "Degraded images delivered",
            )?,
            time_to_final_ms: registry.register_histogram(
                METRICS_NAMESPACE,
                "time_to_final",
                "Time from load to terminal event",
                "ms",
                vec![1.0, 5.0, 16.0, 33.0, 100.0, 500.0, 2000.0],
            )?,
        })
    }

    pub(crate) fn record_request(&self) {
        bump(&self.requests);
    }

    pub(crate) fn record_rejection(&self) {
        bump(&self.rejections);
    }

    pub(crate) fn record_partial(&self) {
        bump(&self.partials);
    }

    pub(crate) fn record_cancellation(&self) {
        bump(&self.cancellations);
    }

    pub(crate) fn record_completion(&self, elapsed: Duration) {
        bump(&self.completions);
        self.observe_final(elapsed);
    }

    pub(crate) fn record_failure(&self, elapsed: Duration) {
        bump(&self.failures);
        self.observe_final(elapsed);
    }

    fn observe_final(&self, elapsed: Duration) {
        let millis = elapsed.as_secs_f64() * 1000.0;
        if let Err(error) = self.time_to_final_ms.observe(millis) {
            log::warn!(
                "Failed to record metric {}: {}",
                self.time_to_final_ms.id(),
                error
            );
        }
    }
}

fn bump(counter: &CounterHandle) {
    if let Err(error) = counter.increment() {
        log::warn!("Failed to record metric {}: {}", counter.id(), error);
    }
}
