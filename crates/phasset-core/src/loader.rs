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

//! The capability interface a loader exposes to the host image pipeline.
//!
//! # Cancellation is silent
//!
//! Cancelling a request produces **no terminal event**. After calling
//! [`Cancellation::cancel`], a caller must not wait for a `Final` event: none
//! will ever come. Callback consumers that need to tell "cancelled" apart from
//! "still pending" have to track that themselves. Channel consumers (see
//! [`LoadTicket`]) observe the end of the stream instead, once the store has
//! released the request.

use crate::error::LoadError;
use crate::event::LoadEvent;
use crate::math::Size;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// Receives the events of one load. Called from arbitrary threads.
pub trait LoadObserver<I>: Send + Sync {
    /// Handles one event. Events of a request arrive in delivery order.
    fn on_event(&self, event: LoadEvent<I>);
}

impl<I: Send> LoadObserver<I> for flume::Sender<LoadEvent<I>> {
    fn on_event(&self, event: LoadEvent<I>) {
        if self.send(event).is_err() {
            log::trace!("Load event dropped: receiver disconnected.");
        }
    }
}

type ProgressCallback = Box<dyn Fn(i64, i64) + Send + Sync>;
type PartialCallback<I> = Box<dyn Fn(I) + Send + Sync>;
type CompletionCallback<I> = Box<dyn Fn(Result<I, LoadError>) + Send + Sync>;

/// Closure-style observer: optional progress and partial callbacks plus a
/// mandatory completion callback.
pub struct LoaderCallbacks<I> {
    progress: Option<ProgressCallback>,
    partial: Option<PartialCallback<I>>,
    completion: CompletionCallback<I>,
}

impl<I> LoaderCallbacks<I> {
    /// Creates callbacks that only observe the terminal outcome.
    pub fn new(completion: impl Fn(Result<I, LoadError>) + Send + Sync + 'static) -> Self {
        Self {
            progress: None,
            partial: None,
            completion: Box::new(completion),
        }
    }

    /// Observes progress as `(loaded, total)`, with `total` fixed at one million.
    pub fn on_progress(mut self, progress: impl Fn(i64, i64) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Observes degraded intermediate images.
    pub fn on_partial(mut self, partial: impl Fn(I) + Send + Sync + 'static) -> Self {
        self.partial = Some(Box::new(partial));
        self
    }
}

impl<I: Send> LoadObserver<I> for LoaderCallbacks<I> {
    fn on_event(&self, event: LoadEvent<I>) {
        match event {
            LoadEvent::Progress(ratio) => {
                if let Some(progress) = &self.progress {
                    progress(ratio.loaded, ratio.total);
                }
            }
            LoadEvent::Partial(image) => {
                if let Some(partial) = &self.partial {
                    partial(image);
                }
            }
            LoadEvent::Final(result) => (self.completion)(result),
        }
    }
}

/// An idempotent, zero-argument cancel function returned by every load.
///
/// Calling it more than once, or after the request has finished, does
/// nothing. Clones share the same state.
#[derive(Clone)]
pub struct Cancellation {
    action: Option<Arc<dyn Fn() + Send + Sync>>,
    fired: Arc<AtomicBool>,
}

impl Cancellation {
    /// Wraps `action`, which will run at most once.
    pub fn new(action: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            action: Some(Arc::new(action)),
            fired: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A cancellation that does nothing, returned for rejected requests.
    pub fn noop() -> Self {
        Self {
            action: None,
            fired: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cancels the request. See the [module docs](self) for what to expect afterwards.
    pub fn cancel(&self) {
        if self.fired.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(action) = &self.action {
            action();
        }
    }

    /// Whether [`Cancellation::cancel`] has been called on this handle or a clone.
    pub fn is_cancelled(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Whether this handle was created by [`Cancellation::noop`].
    pub fn is_noop(&self) -> bool {
        self.action.is_none()
    }
}

impl fmt::Debug for Cancellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cancellation")
            .field("noop", &self.is_noop())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// A load delivered over a single ordered channel.
#[derive(Debug)]
pub struct LoadTicket<I> {
    events: flume::Receiver<LoadEvent<I>>,
    cancellation: Cancellation,
}

impl<I> LoadTicket<I> {
    /// Assembles a ticket from its parts.
    pub fn new(events: flume::Receiver<LoadEvent<I>>, cancellation: Cancellation) -> Self {
        Self {
            events,
            cancellation,
        }
    }

    /// The event stream of this request.
    pub fn events(&self) -> &flume::Receiver<LoadEvent<I>> {
        &self.events
    }

    /// The cancel function of this request.
    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    /// Shorthand for `self.cancellation().cancel()`.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Blocks until the terminal event and returns its outcome, skipping
    /// progress and partial events.
    ///
    /// Returns `None` if the stream ended without a terminal event, which is
    /// what a cancelled request looks like once the store lets go of it.
    pub fn wait_final(self) -> Option<Result<I, LoadError>> {
        for event in self.events.iter() {
            if let LoadEvent::Final(result) = event {
                return Some(result);
            }
        }
        None
    }

    /// Async flavour of [`LoadTicket::wait_final`].
    pub async fn wait_final_async(self) -> Option<Result<I, LoadError>> {
        while let Ok(event) = self.events.recv_async().await {
            if let LoadEvent::Final(result) = event {
                return Some(result);
            }
        }
        None
    }

    /// Splits the ticket into its receiver and cancel function.
    pub fn into_parts(self) -> (flume::Receiver<LoadEvent<I>>, Cancellation) {
        (self.events, self.cancellation)
    }
}

/// A loader that can serve some image URLs for the host pipeline.
///
/// The host asks every registered loader whether it can handle a URL and
/// picks the one with the highest [`ImageUrlLoader::priority`].
pub trait ImageUrlLoader: Send + Sync {
    /// The image type delivered to observers.
    type Image: Send + 'static;

    /// Whether this loader serves `url`. Pure.
    fn can_handle(&self, url: &Url) -> bool;

    /// Tie-breaker among loaders that can handle the same URL; higher wins.
    fn priority(&self) -> f32;

    /// Starts loading `url` for a view of `view_size` points at `display_scale`.
    ///
    /// Failures detected before the store is contacted are delivered to
    /// `observer` synchronously, before this returns, together with a no-op
    /// cancellation.
    fn load(
        &self,
        url: &Url,
        view_size: Size,
        display_scale: f64,
        observer: Box<dyn LoadObserver<Self::Image>>,
    ) -> Cancellation;

    /// Like [`ImageUrlLoader::load`], delivering events over a channel.
    fn fetch(&self, url: &Url, view_size: Size, display_scale: f64) -> LoadTicket<Self::Image> {
        let (sender, events) = flume::unbounded();
        let cancellation = self.load(url, view_size, display_scale, Box::new(sender));
        LoadTicket::new(events, cancellation)
    }
}
