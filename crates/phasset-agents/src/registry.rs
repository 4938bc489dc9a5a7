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

//! Loader registry picking the loader that serves a URL.

use phasset_core::{Cancellation, ImageUrlLoader, LoadError, LoadEvent, LoadObserver, Size, Url};
use std::sync::Arc;

/// A registered loader producing images of type `I`.
pub type SharedLoader<I> = Arc<dyn ImageUrlLoader<Image = I>>;

/// Registry of image loaders, ordered by priority (highest first).
///
/// Among the loaders that accept a URL the one with the highest priority
/// wins; ties go to the loader registered first.
pub struct LoaderRegistry<I> {
    loaders: Vec<SharedLoader<I>>,
}

impl<I: Send + 'static> LoaderRegistry<I> {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    /// Registers a loader.
    pub fn register(&mut self, loader: SharedLoader<I>) {
        log::info!(
            "LoaderRegistry: Registered loader (priority={:.2})",
            loader.priority()
        );
        self.loaders.push(loader);
        // Stable sort keeps registration order among equal priorities.
        self.loaders.sort_by(|a, b| {
            b.priority()
                .partial_cmp(&a.priority())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// Returns the number of registered loaders.
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    /// Returns true if no loaders are registered.
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// The loader that would serve `url`, if any.
    pub fn resolve(&self, url: &Url) -> Option<&SharedLoader<I>> {
        self.loaders.iter().find(|loader| loader.can_handle(url))
    }

    /// Loads `url` with the best matching loader.
    ///
    /// When no loader accepts the URL, `observer` receives `UnsupportedScheme`
    /// synchronously and a no-op cancellation is returned.
    pub fn load(
        &self,
        url: &Url,
        view_size: Size,
        display_scale: f64,
        observer: Box<dyn LoadObserver<I>>,
    ) -> Cancellation {
        match self.resolve(url) {
            Some(loader) => loader.load(url, view_size, display_scale, observer),
            None => {
                log::debug!("LoaderRegistry: no loader for scheme '{}'", url.scheme());
                observer.on_event(LoadEvent::Final(Err(LoadError::UnsupportedScheme(
                    url.scheme().to_string(),
                ))));
                Cancellation::noop()
            }
        }
    }
}

impl<I: Send + 'static> Default for LoaderRegistry<I> {
    fn default() -> Self {
        Self::new()
    }
}
