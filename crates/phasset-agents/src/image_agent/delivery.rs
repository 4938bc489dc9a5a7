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

//! Classification of store callbacks into load events.

use super::cancellation::RequestState;
use super::metrics::LoaderMetrics;
use phasset_core::{
    LoadError, LoadEvent, LoadObserver, ProgressRatio, StoreError, StoreEvent, StoreEventSink,
};
use std::sync::Arc;
use std::time::Instant;

/// What a single store event means for the caller.
#[derive(Debug)]
pub(crate) enum Delivery<I> {
    /// Nothing to report: a cancellation notice, or an event carrying nothing.
    Silent,
    Partial(I),
    Completed(I),
    Failed(StoreError),
}

impl<I> Delivery<I> {
    /// The cancelled flag wins over every other field, and a result wins over an error.
    pub(crate) fn classify(event: StoreEvent<I>) -> Self {
        if event.cancelled {
            return Delivery::Silent;
        }
        match (event.result, event.error) {
            (Some(image), _) if event.degraded => Delivery::Partial(image),
            (Some(image), _) => Delivery::Completed(image),
            (None, Some(error)) => Delivery::Failed(error),
            (None, None) => Delivery::Silent,
        }
    }
}

/// The sink handed to the store for one request.
pub(crate) struct DeliverySink<I> {
    local_identifier: String,
    observer: Box<dyn LoadObserver<I>>,
    state: Arc<RequestState>,
    metrics: Option<LoaderMetrics>,
    started: Instant,
}

impl<I> DeliverySink<I> {
    pub(crate) fn new(
        local_identifier: String,
        observer: Box<dyn LoadObserver<I>>,
        state: Arc<RequestState>,
        metrics: Option<LoaderMetrics>,
        started: Instant,
    ) -> Self {
        Self {
            local_identifier,
            observer,
            state,
            metrics,
            started,
        }
    }

    fn finish(&self, outcome: Result<I, StoreError>) {
        if !self.state.settle() {
            log::trace!(
                "Dropping terminal event for '{}': request already settled or cancelled.",
                self.local_identifier
            );
            return;
        }

        let elapsed = self.started.elapsed();
        let result = match outcome {
            Ok(image) => {
                log::debug!(
                    "Loaded '{}' in {:.1} ms.",
                    self.local_identifier,
                    elapsed.as_secs_f64() * 1000.0
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_completion(elapsed);
                }
                Ok(image)
            }
            Err(error) => {
                log::warn!(
                    "Asset store failed to load '{}': {}",
                    self.local_identifier,
                    error
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_failure(elapsed);
                }
                Err(LoadError::UnderlyingFetchError(error))
            }
        };
        self.observer.on_event(LoadEvent::Final(result));
    }
}

impl<I: Send> StoreEventSink<I> for DeliverySink<I> {
    fn progress(&self, fraction: f64) {
        if self.state.is_open() {
            self.observer
                .on_event(LoadEvent::Progress(ProgressRatio::from_fraction(fraction)));
        }
    }

    fn deliver(&self, event: StoreEvent<I>) {
        match Delivery::classify(event) {
            Delivery::Silent => {
                log::trace!("Silent store event for '{}'.", self.local_identifier);
            }
            Delivery::Partial(image) => {
                if self.state.is_open() {
                    if let Some(metrics) = &self.metrics {
                        metrics.record_partial();
                    }
                    self.observer.on_event(LoadEvent::Partial(image));
                }
            }
            Delivery::Completed(image) => self.finish(Ok(image)),
            Delivery::Failed(error) => self.finish(Err(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasset_core::PROGRESS_DENOMINATOR;
    use std::fmt;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Unavailable;

    impl fmt::Display for Unavailable {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("asset unavailable")
        }
    }

    impl std::error::Error for Unavailable {}

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl LoadObserver<u32> for Recorder {
        fn on_event(&self, event: LoadEvent<u32>) {
            let line = match event {
                LoadEvent::Progress(ratio) => format!("progress {}/{}", ratio.loaded, ratio.total),
                LoadEvent::Partial(image) => format!("partial {image}"),
                LoadEvent::Final(Ok(image)) => format!("final {image}"),
                LoadEvent::Final(Err(error)) => format!("error {error}"),
            };
            self.0.lock().unwrap().push(line);
        }
    }

    fn sink() -> (DeliverySink<u32>, Arc<RequestState>, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(RequestState::new());
        let sink = DeliverySink::new(
            "A".to_string(),
            Box::new(Recorder(log.clone())),
            state.clone(),
            None,
            Instant::now(),
        );
        (sink, state, log)
    }

    #[test]
    fn cancelled_flag_silences_any_payload() {
        let mut event = StoreEvent::final_result(1u32);
        event.cancelled = true;
        assert!(matches!(Delivery::classify(event), Delivery::Silent));

        let mut event = StoreEvent::<u32>::failure(Arc::new(Unavailable));
        event.cancelled = true;
        assert!(matches!(Delivery::classify(event), Delivery::Silent));
    }

    #[test]
    fn result_takes_precedence_over_error() {
        let mut event = StoreEvent::final_result(1u32);
        event.error = Some(Arc::new(Unavailable));
        assert!(matches!(Delivery::classify(event), Delivery::Completed(1)));

        let mut event = StoreEvent::degraded(2u32);
        event.error = Some(Arc::new(Unavailable));
        assert!(matches!(Delivery::classify(event), Delivery::Partial(2)));
    }

    #[test]
    fn empty_event_is_silent() {
        let event = StoreEvent::<u32> {
            result: None,
            error: None,
            cancelled: false,
            degraded: true,
        };
        assert!(matches!(Delivery::classify(event), Delivery::Silent));
    }

    #[test]
    fn nothing_follows_the_terminal_event() {
        let (sink, _, log) = sink();

        sink.progress(0.5);
        sink.deliver(StoreEvent::degraded(1));
        sink.deliver(StoreEvent::final_result(2));
        sink.progress(1.0);
        sink.deliver(StoreEvent::degraded(3));
        sink.deliver(StoreEvent::final_result(4));
        sink.deliver(StoreEvent::failure(Arc::new(Unavailable)));

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                format!("progress 500000/{PROGRESS_DENOMINATOR}"),
                "partial 1".to_string(),
                "final 2".to_string(),
            ]
        );
    }

    #[test]
    fn store_failure_is_wrapped() {
        let (sink, _, log) = sink();
        sink.deliver(StoreEvent::failure(Arc::new(Unavailable)));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["error Asset store failed to fetch image: asset unavailable".to_string()]
        );
    }

    #[test]
    fn local_cancel_silences_everything() {
        let (sink, state, log) = sink();
        sink.progress(0.2);
        assert!(state.cancel());

        sink.progress(0.4);
        sink.deliver(StoreEvent::degraded(1));
        sink.deliver(StoreEvent::final_result(2));

        assert_eq!(
            *log.lock().unwrap(),
            vec![format!("progress 200000/{PROGRESS_DENOMINATOR}")]
        );
    }
}
