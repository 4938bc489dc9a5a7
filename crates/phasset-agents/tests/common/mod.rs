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

//! A hand-driven asset store: tests decide when and what each request delivers.

#![allow(dead_code)]

use phasset_core::{AssetStore, ImageRequest, StoreEvent, StoreEventSink};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub type Image = String;

#[derive(Default)]
pub struct ManualStore {
    assets: HashSet<String>,
    next_id: AtomicU64,
    lookups: AtomicUsize,
    sinks: Mutex<HashMap<u64, Arc<dyn StoreEventSink<Image>>>>,
    requests: Mutex<Vec<ImageRequest>>,
    cancels: Mutex<Vec<u64>>,
}

impl ManualStore {
    pub fn with_assets(identifiers: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            assets: identifiers.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        })
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn cancels(&self) -> Vec<u64> {
        self.cancels.lock().unwrap().clone()
    }

    /// The sink of request `id`. Panics if the request was never issued or already released.
    pub fn sink(&self, id: u64) -> Arc<dyn StoreEventSink<Image>> {
        self.sinks
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .expect("request is in flight")
    }

    pub fn progress(&self, id: u64, fraction: f64) {
        self.sink(id).progress(fraction);
    }

    pub fn deliver(&self, id: u64, event: StoreEvent<Image>) {
        self.sink(id).deliver(event);
    }

    /// Forgets the sink of request `id`, as a store does once a request ended.
    pub fn release(&self, id: u64) {
        self.sinks.lock().unwrap().remove(&id);
    }
}

impl AssetStore for ManualStore {
    type Asset = String;
    type Image = Image;
    type RequestId = u64;

    fn lookup(&self, local_identifier: &str) -> Option<Self::Asset> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.assets.get(local_identifier).cloned()
    }

    fn request_image(
        &self,
        _asset: Self::Asset,
        request: &ImageRequest,
        sink: Arc<dyn StoreEventSink<Self::Image>>,
    ) -> Self::RequestId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.sinks.lock().unwrap().insert(id, sink);
        id
    }

    fn cancel(&self, request_id: Self::RequestId) {
        self.cancels.lock().unwrap().push(request_id);
    }
}

#[derive(Debug)]
pub struct Unreachable;

impl std::fmt::Display for Unreachable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("network unreachable")
    }
}

impl std::error::Error for Unreachable {}
