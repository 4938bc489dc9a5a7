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

use super::{ContentMode, DeliveryMode, ResizeMode};
use crate::math::Size;

/// The size the store should render the image at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetSize {
    /// An explicit width and height, in pixels.
    Explicit(Size),
    /// The asset's intrinsic maximum resolution.
    Maximum,
}

/// The validated parameters of a single request, decoded from its URI.
///
/// A configuration is constructed once per request and never mutated.
/// `target_size` is `None` when the URI did not specify one; the effective
/// size then depends on the view the image is displayed in, see
/// [`FetchConfiguration::resolve_target_size`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfiguration {
    /// Non-empty, opaque key of the asset in the store.
    pub local_identifier: String,
    /// Explicit target size from the URI, if any.
    pub target_size: Option<TargetSize>,
    /// Resize precision hint.
    pub resize_mode: ResizeMode,
    /// Latency/fidelity hint.
    pub delivery_mode: DeliveryMode,
    /// Aspect ratio handling.
    pub content_mode: ContentMode,
    /// Whether the store may download the asset from the network.
    pub network_access_allowed: bool,
}

impl FetchConfiguration {
    /// Creates a configuration with every optional field at its default.
    pub fn new(local_identifier: impl Into<String>) -> Self {
        Self {
            local_identifier: local_identifier.into(),
            target_size: None,
            resize_mode: ResizeMode::default(),
            delivery_mode: DeliveryMode::default(),
            content_mode: ContentMode::default(),
            network_access_allowed: false,
        }
    }

    /// The explicit target size if present, else `view_size` scaled by `display_scale`.
    pub fn resolve_target_size(&self, view_size: Size, display_scale: f64) -> TargetSize {
        self.target_size
            .unwrap_or_else(|| TargetSize::Explicit(view_size.scaled(display_scale)))
    }
}

/// A fully resolved request, as handed to the asset store.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    /// Key of the requested asset.
    pub local_identifier: String,
    /// Effective target size.
    pub target_size: TargetSize,
    /// Resize precision hint.
    pub resize_mode: ResizeMode,
    /// Latency/fidelity hint.
    pub delivery_mode: DeliveryMode,
    /// Aspect ratio handling.
    pub content_mode: ContentMode,
    /// Whether the store may download the asset from the network.
    pub network_access_allowed: bool,
}

impl ImageRequest {
    /// Resolves a configuration against the view the image will be shown in.
    pub fn resolve(configuration: &FetchConfiguration, view_size: Size, display_scale: f64) -> Self {
        Self {
            local_identifier: configuration.local_identifier.clone(),
            target_size: configuration.resolve_target_size(view_size, display_scale),
            resize_mode: configuration.resize_mode,
            delivery_mode: configuration.delivery_mode,
            content_mode: configuration.content_mode,
            network_access_allowed: configuration.network_access_allowed,
        }
    }
}
