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

use super::script::{MemoryAsset, Step};
use super::worker::{self, InFlight, Job};
use crossbeam_channel::Sender;
use phasset_core::{AssetStore, ImageRequest, StoreEventSink};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread;

/// Identifies a request made to a [`MemoryAssetStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryRequestId(pub u64);

impl fmt::Display for MemoryRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An in-process asset store playing scripted answers.
///
/// Each asset is registered with a list of [`Step`]s that is played for
/// every request made for it. Requests are served one at a time, in
/// submission order, by a dedicated worker thread, so every event reaches the
/// sink off the caller's thread.
///
/// Cancelling an in-flight request makes the worker deliver a single
/// cancelled event and drop the sink. Dropping the store cancels everything
/// still pending and joins the worker.
pub struct MemoryAssetStore<I> {
    assets: RwLock<HashMap<String, Arc<[Step<I>]>>>,
    in_flight: InFlight,
    next_id: AtomicU64,
    jobs: Option<Sender<Job<I>>>,
    worker: Option<thread::JoinHandle<()>>,
    lookups: AtomicUsize,
    requests: AtomicUsize,
    cancellations: AtomicUsize,
    last_request: Mutex<Option<ImageRequest>>,
}

impl<I> MemoryAssetStore<I>
where
    I: Clone + Send + Sync + 'static,
{
    /// Creates an empty store and starts its worker.
    pub fn new() -> Self {
        let (jobs, queue) = crossbeam_channel::unbounded();
        let in_flight = InFlight::default();
        let worker = worker::spawn(queue, Arc::clone(&in_flight));
        Self {
            assets: RwLock::new(HashMap::new()),
            in_flight,
            next_id: AtomicU64::new(1),
            jobs: Some(jobs),
            worker: Some(worker),
            lookups: AtomicUsize::new(0),
            requests: AtomicUsize::new(0),
            cancellations: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Registers `script` under `local_identifier`, replacing any previous one.
    pub fn insert(&self, local_identifier: impl Into<String>, script: Vec<Step<I>>) {
        let local_identifier = local_identifier.into();
        log::debug!(
            "Registering asset '{}' ({} steps).",
            local_identifier,
            script.len()
        );
        self.assets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(local_identifier, script.into());
    }

    /// Registers an asset that answers immediately with `image`.
    pub fn insert_image(&self, local_identifier: impl Into<String>, image: I) {
        self.insert(local_identifier, vec![Step::Final(image)]);
    }

    /// Builder form of [`MemoryAssetStore::insert`].
    pub fn with_asset(self, local_identifier: impl Into<String>, script: Vec<Step<I>>) -> Self {
        self.insert(local_identifier, script);
        self
    }

    /// Unregisters an asset. Requests already submitted keep playing.
    pub fn remove(&self, local_identifier: &str) -> bool {
        self.assets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(local_identifier)
            .is_some()
    }

    /// Number of registered assets.
    pub fn asset_count(&self) -> usize {
        self.assets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of `lookup` calls so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of `request_image` calls so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Number of `cancel` calls that hit a request still in flight.
    pub fn cancellation_count(&self) -> usize {
        self.cancellations.load(Ordering::SeqCst)
    }

    /// Number of requests submitted but not yet finished.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The most recent request handed to the store.
    pub fn last_request(&self) -> Option<ImageRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<I> Default for MemoryAssetStore<I>
where
    I: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I> fmt::Debug for MemoryAssetStore<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryAssetStore")
            .field("lookups", &self.lookups.load(Ordering::Relaxed))
            .field("requests", &self.requests.load(Ordering::Relaxed))
            .field("cancellations", &self.cancellations.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<I> AssetStore for MemoryAssetStore<I>
where
    I: Clone + Send + Sync + 'static,
{
    type Asset = MemoryAsset<I>;
    type Image = I;
    type RequestId = MemoryRequestId;

    fn lookup(&self, local_identifier: &str) -> Option<Self::Asset> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let assets = self.assets.read().unwrap_or_else(PoisonError::into_inner);
        assets.get(local_identifier).map(|script| MemoryAsset {
            local_identifier: local_identifier.to_string(),
            script: Arc::clone(script),
        })
    }

    fn request_image(
        &self,
        asset: Self::Asset,
        request: &ImageRequest,
        sink: Arc<dyn StoreEventSink<Self::Image>>,
    ) -> Self::RequestId {
        self.requests.fetch_add(1, Ordering::SeqCst);
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request.clone());

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (cancel_handle, cancel) = crossbeam_channel::bounded(1);
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, cancel_handle);

        let job = Job {
            id,
            local_identifier: asset.local_identifier,
            script: asset.script,
            sink,
            cancel,
        };
        let submitted = self
            .jobs
            .as_ref()
            .map(|jobs| jobs.send(job).is_ok())
            .unwrap_or(false);
        if !submitted {
            log::error!("Memory asset store worker is gone; request #{id} dropped.");
            self.in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&id);
        }

        log::trace!(
            "Submitted request #{} for '{}' at {:?}.",
            id,
            request.local_identifier,
            request.target_size
        );
        MemoryRequestId(id)
    }

    fn cancel(&self, request_id: Self::RequestId) {
        let handle = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&request_id.0);
        match handle {
            // Dropping the handle is what the worker observes.
            Some(_) => {
                self.cancellations.fetch_add(1, Ordering::SeqCst);
                log::trace!("Cancelled request {request_id}.");
            }
            None => log::trace!("Ignoring cancel for finished request {request_id}."),
        }
    }
}

impl<I> Drop for MemoryAssetStore<I> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        drop(self.jobs.take());

        if let Some(worker) = self.worker.take() {
            // A sink may hold the last reference to the store; never join from the worker itself.
            if worker.thread().id() != thread::current().id() && worker.join().is_err() {
                log::error!("Memory asset store worker panicked.");
            }
        }
    }
}
