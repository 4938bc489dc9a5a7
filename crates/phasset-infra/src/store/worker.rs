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

//! The background thread playing request scripts.

use super::script::{SimulatedFailure, Step};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use phasset_core::{StoreEvent, StoreEventSink};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

/// Cancellation handles of the requests not yet finished, by request id.
///
/// Dropping a handle cancels its request.
pub(crate) type InFlight = Arc<Mutex<HashMap<u64, Sender<()>>>>;

/// A request waiting for the worker.
pub(crate) struct Job<I> {
    pub id: u64,
    pub local_identifier: String,
    pub script: Arc<[Step<I>]>,
    pub sink: Arc<dyn StoreEventSink<I>>,
    pub cancel: Receiver<()>,
}

impl<I> Job<I> {
    fn is_cancelled(&self) -> bool {
        !matches!(self.cancel.try_recv(), Err(TryRecvError::Empty))
    }
}

/// Spawns the worker. It exits once every job sender is gone.
pub(crate) fn spawn<I>(jobs: Receiver<Job<I>>, in_flight: InFlight) -> thread::JoinHandle<()>
where
    I: Clone + Send + Sync + 'static,
{
    thread::spawn(move || {
        log::debug!("Memory asset store worker started.");
        for job in jobs.iter() {
            play(&job);
            in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&job.id);
            // `job` and its sink are dropped here, ending the consumer's stream.
        }
        log::debug!("Memory asset store worker stopped.");
    })
}

fn play<I: Clone>(job: &Job<I>) {
    for step in job.script.iter() {
        if job.is_cancelled() {
            report_cancelled(job);
            return;
        }
        match step {
            Step::Progress(fraction) => job.sink.progress(*fraction),
            Step::Degraded(image) => job.sink.deliver(StoreEvent::degraded(image.clone())),
            Step::Final(image) => {
                log::trace!("Request #{} for '{}' completed.", job.id, job.local_identifier);
                job.sink.deliver(StoreEvent::final_result(image.clone()));
                return;
            }
            Step::Fail(message) => {
                log::trace!(
                    "Request #{} for '{}' failed: {}",
                    job.id,
                    job.local_identifier,
                    message
                );
                job.sink
                    .deliver(StoreEvent::failure(Arc::new(SimulatedFailure(message.clone()))));
                return;
            }
            Step::Pause(duration) => match job.cancel.recv_timeout(*duration) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    report_cancelled(job);
                    return;
                }
            },
        }
    }

    if job.is_cancelled() {
        report_cancelled(job);
    } else {
        log::debug!(
            "Script for '{}' has no terminal step; request #{} ends without a result.",
            job.local_identifier,
            job.id
        );
    }
}

fn report_cancelled<I>(job: &Job<I>) {
    log::trace!("Request #{} for '{}' cancelled.", job.id, job.local_identifier);
    job.sink.deliver(StoreEvent::cancelled());
}
