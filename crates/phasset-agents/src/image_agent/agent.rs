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

//! The ImageLoadAgent resolves `phasset://` URLs against an asset store.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use phasset_core::{
    AssetStore, Cancellation, ImageRequest, ImageUrlLoader, LoadError, LoadEvent, LoadObserver,
    LoaderConfig, Size, Url,
};
use phasset_lanes::{codec, SchemeDispatcher};
use phasset_telemetry::MetricsRegistry;

use super::cancellation::{CancellationBridge, RequestState};
use super::delivery::DeliverySink;
use super::metrics::LoaderMetrics;

/// Loads images for `phasset://` URLs from an injected asset store.
///
/// The agent itself is stateless between requests; concurrent loads share
/// nothing but the store and the dispatcher.
pub struct ImageLoadAgent<S: AssetStore> {
    store: Arc<S>,
    dispatcher: SchemeDispatcher,
    metrics: Option<LoaderMetrics>,
}

impl<S: AssetStore> ImageLoadAgent<S> {
    /// Creates an agent over `store` with the default configuration and no metrics.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            dispatcher: SchemeDispatcher::default(),
            metrics: None,
        }
    }

    /// Creates an agent configured by `config`.
    ///
    /// Metrics are registered in `registry` when `config.record_metrics` is set.
    pub fn from_config(store: Arc<S>, config: &LoaderConfig, registry: &MetricsRegistry) -> Self {
        let agent = Self {
            store,
            dispatcher: SchemeDispatcher::from_config(config),
            metrics: None,
        };
        if config.record_metrics {
            agent.with_metrics(registry)
        } else {
            agent
        }
    }

    /// Records request outcomes in `registry`.
    ///
    /// If registration fails the agent keeps working without metrics.
    pub fn with_metrics(mut self, registry: &MetricsRegistry) -> Self {
        match LoaderMetrics::register(registry) {
            Ok(metrics) => self.metrics = Some(metrics),
            Err(error) => log::warn!("ImageLoadAgent: metrics disabled: {}", error),
        }
        self
    }

    /// The store requests are issued to.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The dispatcher deciding which URLs this agent serves.
    pub fn dispatcher(&self) -> &SchemeDispatcher {
        &self.dispatcher
    }

    /// Delivers a failure detected before the store was contacted.
    fn reject(&self, observer: Box<dyn LoadObserver<S::Image>>, error: LoadError) -> Cancellation {
        log::debug!("ImageLoadAgent: rejected request: {}", error);
        if let Some(metrics) = &self.metrics {
            metrics.record_rejection();
        }
        observer.on_event(LoadEvent::Final(Err(error)));
        Cancellation::noop()
    }
}

impl<S: AssetStore> ImageUrlLoader for ImageLoadAgent<S> {
    type Image = S::Image;

    fn can_handle(&self, url: &Url) -> bool {
        self.dispatcher.can_handle(url)
    }

    fn priority(&self) -> f32 {
        self.dispatcher.priority()
    }

    fn load(
        &self,
        url: &Url,
        view_size: Size,
        display_scale: f64,
        observer: Box<dyn LoadObserver<Self::Image>>,
    ) -> Cancellation {
        let started = Instant::now();
        if let Some(metrics) = &self.metrics {
            metrics.record_request();
        }

        if !self.dispatcher.can_handle(url) {
            return self.reject(observer, LoadError::UnsupportedScheme(url.scheme().to_string()));
        }

        let configuration = match codec::parse(url) {
            Ok(configuration) => configuration,
            Err(error) => return self.reject(observer, error.into()),
        };

        let Some(asset) = self.store.lookup(&configuration.local_identifier) else {
            return self.reject(
                observer,
                LoadError::AssetNotFound(configuration.local_identifier),
            );
        };

        let request = ImageRequest::resolve(&configuration, view_size, display_scale);
        log::trace!(
            "ImageLoadAgent: requesting '{}' at {:?} ({:?}, {:?}, {:?}, network={})",
            request.local_identifier,
            request.target_size,
            request.resize_mode,
            request.delivery_mode,
            request.content_mode,
            request.network_access_allowed
        );

        let state = Arc::new(RequestState::new());
        let sink = DeliverySink::new(
            configuration.local_identifier,
            observer,
            Arc::clone(&state),
            self.metrics.clone(),
            started,
        );
        let request_id = self.store.request_image(asset, &request, Arc::new(sink));

        CancellationBridge::new(
            Arc::downgrade(&self.store),
            request_id,
            state,
            self.metrics.clone(),
        )
        .into_cancellation()
    }
}

impl<S: AssetStore> fmt::Debug for ImageLoadAgent<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageLoadAgent")
            .field("dispatcher", &self.dispatcher)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}
