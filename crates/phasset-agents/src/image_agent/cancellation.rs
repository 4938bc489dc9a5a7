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

//! Request state shared by the delivery sink and the caller's cancel function.

use super::metrics::LoaderMetrics;
use phasset_core::{AssetStore, Cancellation};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};

const OPEN: u8 = 0;
const SETTLED: u8 = 1;
const CANCELLED: u8 = 2;

/// Lifecycle of an in-flight request.
///
/// Starts open and moves exactly once, either to settled (terminal event
/// delivered) or to cancelled. Both transitions race through a single
/// `compare_exchange`, so only one of them can ever win.
#[derive(Debug)]
pub(crate) struct RequestState {
    phase: AtomicU8,
}

impl RequestState {
    pub(crate) fn new() -> Self {
        Self {
            phase: AtomicU8::new(OPEN),
        }
    }

    /// Whether intermediate events may still reach the observer.
    pub(crate) fn is_open(&self) -> bool {
        self.phase.load(Ordering::Acquire) == OPEN
    }

    /// Claims the terminal slot. Returns `true` for the single caller allowed to deliver it.
    pub(crate) fn settle(&self) -> bool {
        self.close(SETTLED)
    }

    /// Marks the request cancelled. Returns `true` if the store still needs to hear about it.
    pub(crate) fn cancel(&self) -> bool {
        self.close(CANCELLED)
    }

    fn close(&self, phase: u8) -> bool {
        self.phase
            .compare_exchange(OPEN, phase, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Binds a store request id to the caller's cancel function.
///
/// Holds the store weakly: a cancel function kept past the agent's lifetime
/// neither keeps the store alive nor fails when called.
pub(crate) struct CancellationBridge<S: AssetStore> {
    store: Weak<S>,
    request_id: S::RequestId,
    state: Arc<RequestState>,
    metrics: Option<LoaderMetrics>,
}

impl<S: AssetStore> CancellationBridge<S> {
    pub(crate) fn new(
        store: Weak<S>,
        request_id: S::RequestId,
        state: Arc<RequestState>,
        metrics: Option<LoaderMetrics>,
    ) -> Self {
        Self {
            store,
            request_id,
            state,
            metrics,
        }
    }

    fn cancel(&self) {
        if !self.state.cancel() {
            log::trace!(
                "Cancel of request {:?} ignored: already settled or cancelled.",
                self.request_id
            );
            return;
        }

        match self.store.upgrade() {
            Some(store) => {
                log::debug!("Cancelling store request {:?}.", self.request_id);
                store.cancel(self.request_id);
                if let Some(metrics) = &self.metrics {
                    metrics.record_cancellation();
                }
            }
            None => log::trace!(
                "Store already dropped; nothing to cancel for {:?}.",
                self.request_id
            ),
        }
    }

    pub(crate) fn into_cancellation(self) -> Cancellation {
        Cancellation::new(move || self.cancel())
    }
}
