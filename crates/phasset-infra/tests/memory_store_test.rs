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

use crossbeam_channel::{Receiver, Sender};
use phasset_core::{
    AssetStore, ContentMode, DeliveryMode, ImageRequest, ResizeMode, Size, StoreEvent,
    StoreEventSink, TargetSize,
};
use phasset_infra::{MemoryAssetStore, Step};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, PartialEq)]
enum Recorded {
    Progress(f64),
    Degraded(&'static str),
    Final(&'static str),
    Failed(String),
    Cancelled,
}

struct ChannelSink(Sender<Recorded>);

impl StoreEventSink<&'static str> for ChannelSink {
    fn progress(&self, fraction: f64) {
        let _ = self.0.send(Recorded::Progress(fraction));
    }

    fn deliver(&self, event: StoreEvent<&'static str>) {
        let recorded = if event.cancelled {
            Recorded::Cancelled
        } else if let Some(error) = event.error {
            Recorded::Failed(error.to_string())
        } else if let Some(image) = event.result {
            if event.degraded {
                Recorded::Degraded(image)
            } else {
                Recorded::Final(image)
            }
        } else {
            panic!("store delivered an empty event");
        };
        let _ = self.0.send(recorded);
    }
}

fn request(id: &str) -> ImageRequest {
    ImageRequest {
        local_identifier: id.to_string(),
        target_size: TargetSize::Explicit(Size::new(100.0, 100.0)),
        resize_mode: ResizeMode::Fast,
        delivery_mode: DeliveryMode::Opportunistic,
        content_mode: ContentMode::AspectFit,
        network_access_allowed: false,
    }
}

fn submit(
    store: &MemoryAssetStore<&'static str>,
    id: &str,
) -> (phasset_infra::MemoryRequestId, Receiver<Recorded>) {
    let asset = store.lookup(id).expect("asset is registered");
    let (tx, rx) = crossbeam_channel::unbounded();
    let request_id = store.request_image(asset, &request(id), Arc::new(ChannelSink(tx)));
    (request_id, rx)
}

#[test]
fn unknown_identifier_is_not_found() {
    let store = MemoryAssetStore::<&'static str>::new();
    assert!(store.lookup("missing").is_none());
    assert_eq!(store.lookup_count(), 1);
    assert_eq!(store.request_count(), 0);
}

#[test]
fn script_plays_in_order_and_stops_at_final() {
    let store = MemoryAssetStore::new().with_asset(
        "A",
        vec![
            Step::Progress(0.5),
            Step::Degraded("low"),
            Step::Progress(1.0),
            Step::Final("high"),
            Step::Final("never"),
        ],
    );

    let (_, events) = submit(&store, "A");
    let events: Vec<_> = events.iter().collect();

    assert_eq!(
        events,
        vec![
            Recorded::Progress(0.5),
            Recorded::Degraded("low"),
            Recorded::Progress(1.0),
            Recorded::Final("high"),
        ]
    );
    assert_eq!(store.request_count(), 1);
    assert_eq!(store.in_flight_count(), 0);
}

#[test]
fn failure_step_delivers_error() {
    let store = MemoryAssetStore::new();
    store.insert("A", vec![Step::Fail("iCloud unreachable".into())]);

    let (_, events) = submit(&store, "A");
    let events: Vec<_> = events.iter().collect();

    assert_eq!(events, vec![Recorded::Failed("iCloud unreachable".into())]);
}

#[test]
fn cancel_interrupts_a_pause_and_reports_once() {
    let store = MemoryAssetStore::new().with_asset(
        "A",
        vec![
            Step::Progress(0.1),
            Step::Pause(Duration::from_secs(30)),
            Step::Final("high"),
        ],
    );

    let (request_id, events) = submit(&store, "A");
    assert_eq!(events.recv().unwrap(), Recorded::Progress(0.1));

    store.cancel(request_id);
    store.cancel(request_id);

    let rest: Vec<_> = events.iter().collect();
    assert_eq!(rest, vec![Recorded::Cancelled]);
    assert_eq!(store.cancellation_count(), 1);
}

#[test]
fn cancel_after_completion_is_ignored() {
    let store = MemoryAssetStore::new();
    store.insert_image("A", "high");

    let (request_id, events) = submit(&store, "A");
    let events: Vec<_> = events.iter().collect();
    assert_eq!(events, vec![Recorded::Final("high")]);

    store.cancel(request_id);
    assert_eq!(store.cancellation_count(), 0);
}

#[test]
fn last_request_is_recorded() {
    let store = MemoryAssetStore::new();
    store.insert_image("A", "high");

    let (_, events) = submit(&store, "A");
    events.iter().for_each(drop);

    let last = store.last_request().unwrap();
    assert_eq!(last.local_identifier, "A");
    assert_eq!(last.resize_mode, ResizeMode::Fast);
}

#[test]
fn dropping_the_store_cancels_pending_requests() {
    let store = MemoryAssetStore::new().with_asset(
        "A",
        vec![Step::Pause(Duration::from_secs(30)), Step::Final("high")],
    );

    let (_, events) = submit(&store, "A");
    drop(store);

    let events: Vec<_> = events.iter().collect();
    assert_eq!(events, vec![Recorded::Cancelled]);
}

#[test]
fn removed_assets_are_no_longer_found() {
    let store = MemoryAssetStore::new();
    store.insert_image("A", "high");
    assert_eq!(store.asset_count(), 1);

    assert!(store.remove("A"));
    assert!(!store.remove("A"));
    assert!(store.lookup("A").is_none());
}
