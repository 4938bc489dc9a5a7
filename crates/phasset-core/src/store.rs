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

//! The contract of the asset store collaborator.
//!
//! The store owns the actual fetch: it looks assets up by local identifier,
//! renders images asynchronously, and reports back through a
//! [`StoreEventSink`] from whichever thread it likes. The loader never assumes
//! an execution context for these calls.

use crate::error::StoreError;
use crate::request::ImageRequest;
use std::fmt::Debug;
use std::sync::Arc;

/// One result callback from the store.
///
/// Mirrors the raw shape stores report: any combination of fields may be set,
/// and the loader is responsible for classifying it.
#[derive(Debug)]
pub struct StoreEvent<I> {
    /// The rendered image, if any.
    pub result: Option<I>,
    /// The failure, if any.
    pub error: Option<StoreError>,
    /// Set when the request was cancelled. Overrides every other field.
    pub cancelled: bool,
    /// Set when `result` is a lower fidelity placeholder.
    pub degraded: bool,
}

impl<I> StoreEvent<I> {
    /// A full fidelity result.
    pub fn final_result(image: I) -> Self {
        Self {
            result: Some(image),
            error: None,
            cancelled: false,
            degraded: false,
        }
    }

    /// A degraded result that will be followed by a better one.
    pub fn degraded(image: I) -> Self {
        Self {
            result: Some(image),
            error: None,
            cancelled: false,
            degraded: true,
        }
    }

    /// A failed fetch.
    pub fn failure(error: StoreError) -> Self {
        Self {
            result: None,
            error: Some(error),
            cancelled: false,
            degraded: false,
        }
    }

    /// The notification stores emit once a request has been cancelled.
    pub fn cancelled() -> Self {
        Self {
            result: None,
            error: None,
            cancelled: true,
            degraded: false,
        }
    }
}

/// Receives store callbacks for a single request.
///
/// Implementations must tolerate calls from any thread, including
/// re-entrant calls made from inside [`AssetStore::request_image`].
pub trait StoreEventSink<I>: Send + Sync {
    /// Reports download progress as a fraction in `[0, 1]`.
    fn progress(&self, fraction: f64);

    /// Reports a result callback.
    fn deliver(&self, event: StoreEvent<I>);
}

/// An asset store able to render images for local identifiers.
///
/// Stores manage their own concurrency. Once a request has ended (terminal
/// event or cancellation), the store should drop its reference to the sink so
/// that channel-based consumers observe the end of the stream.
pub trait AssetStore: Send + Sync + 'static {
    /// A resolved asset, as returned by [`AssetStore::lookup`].
    type Asset: Send;
    /// The rendered image type.
    type Image: Send + 'static;
    /// Opaque token identifying an in-flight request.
    type RequestId: Copy + Debug + Send + Sync + 'static;

    /// Resolves a local identifier. Returns `None` if the store has no such asset.
    fn lookup(&self, local_identifier: &str) -> Option<Self::Asset>;

    /// Starts rendering `asset` according to `request`.
    ///
    /// Returns immediately; results arrive through `sink`.
    fn request_image(
        &self,
        asset: Self::Asset,
        request: &ImageRequest,
        sink: Arc<dyn StoreEventSink<Self::Image>>,
    ) -> Self::RequestId;

    /// Cancels an in-flight request. Unknown or finished ids are ignored.
    fn cancel(&self, request_id: Self::RequestId);
}
