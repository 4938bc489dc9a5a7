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

//! # Phasset Core
//!
//! Foundational crate containing the request model, the error taxonomy, and the
//! interface contracts shared by the phasset image loader crates.
//!
//! Nothing in here performs I/O. The asset store is an external collaborator
//! described by [`store::AssetStore`], and the host pipeline talks to loaders
//! through [`loader::ImageUrlLoader`].

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod event;
pub mod loader;
pub mod math;
pub mod request;
pub mod store;
pub mod telemetry;

pub use config::{ConfigError, LoaderConfig};
pub use error::{LoadError, ParseError, StoreError};
pub use event::{LoadEvent, ProgressRatio, PROGRESS_DENOMINATOR};
pub use loader::{Cancellation, ImageUrlLoader, LoadObserver, LoadTicket, LoaderCallbacks};
pub use math::Size;
pub use request::{
    ContentMode, DeliveryMode, FetchConfiguration, ImageRequest, ResizeMode, TargetSize,
};
pub use store::{AssetStore, StoreEvent, StoreEventSink};

/// Re-exported so implementors of the contracts do not need a direct `url` dependency.
pub use url::Url;
