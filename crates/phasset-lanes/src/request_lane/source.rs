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

//! Building `phasset://` URIs from typed options.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use phasset_core::request::params::{
    CONTENT_MODE, DELIVERY_MODE, LOCAL_IDENTIFIER, NETWORK_ACCESS_ALLOWED, RESIZE_MODE,
    TARGET_SIZE,
};
use phasset_core::request::{MAXIMUM_SIZE_SENTINEL, PHASSET_SCHEME};
use super::codec::is_valid_dimension;
use phasset_core::{ContentMode, DeliveryMode, ParseError, ResizeMode, TargetSize};
use std::fmt::Write as _;
use url::Url;

/// Characters left untouched when encoding a query component.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Typed description of an image source, rendered as a `phasset://` URI.
///
/// Unset options are omitted from the URI so the loader applies its defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageSourceOptions {
    /// Key of the asset in the store.
    pub local_identifier: String,
    /// Explicit render size.
    pub target_size: Option<TargetSize>,
    /// Resize precision hint.
    pub resize_mode: Option<ResizeMode>,
    /// Latency/fidelity hint.
    pub delivery_mode: Option<DeliveryMode>,
    /// Aspect ratio handling.
    pub content_mode: Option<ContentMode>,
    /// Whether the store may use the network.
    pub network_access_allowed: Option<bool>,
}

impl ImageSourceOptions {
    /// Options for `local_identifier` with everything else unset.
    pub fn new(local_identifier: impl Into<String>) -> Self {
        Self {
            local_identifier: local_identifier.into(),
            ..Self::default()
        }
    }

    /// Sets the target size.
    pub fn with_target_size(mut self, target_size: TargetSize) -> Self {
        self.target_size = Some(target_size);
        self
    }

    /// Sets the resize mode.
    pub fn with_resize_mode(mut self, mode: ResizeMode) -> Self {
        self.resize_mode = Some(mode);
        self
    }

    /// Sets the delivery mode.
    pub fn with_delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.delivery_mode = Some(mode);
        self
    }

    /// Sets the content mode.
    pub fn with_content_mode(mut self, mode: ContentMode) -> Self {
        self.content_mode = Some(mode);
        self
    }

    /// Allows or forbids network access.
    pub fn with_network_access(mut self, allowed: bool) -> Self {
        self.network_access_allowed = Some(allowed);
        self
    }

    /// Renders `phasset://?<params>`.
    ///
    /// Parameters appear in a fixed order: `localIdentifier`, `targetSize`,
    /// `resizeMode`, `deliveryMode`, `contentMode`, `isNetworkAccessAllowed`.
    /// Values are percent-encoded; integral sizes print without a fraction.
    ///
    /// Fails on options the loader would reject: an empty identifier, or an
    /// explicit size with a negative or non-finite component.
    pub fn to_uri(&self) -> Result<String, ParseError> {
        if self.local_identifier.is_empty() {
            return Err(ParseError::MissingRequiredParameter(LOCAL_IDENTIFIER));
        }
        let mut pairs: Vec<(&str, String)> = vec![(LOCAL_IDENTIFIER, self.local_identifier.clone())];

        if let Some(target_size) = self.target_size {
            let value = match target_size {
                TargetSize::Maximum => MAXIMUM_SIZE_SENTINEL.to_string(),
                TargetSize::Explicit(size) => {
                    if !is_valid_dimension(size.width) || !is_valid_dimension(size.height) {
                        return Err(ParseError::InvalidParameterFormat(TARGET_SIZE));
                    }
                    format!("{}x{}", size.width, size.height)
                }
            };
            pairs.push((TARGET_SIZE, value));
        }
        if let Some(mode) = self.resize_mode {
            pairs.push((RESIZE_MODE, mode.raw().to_string()));
        }
        if let Some(mode) = self.delivery_mode {
            pairs.push((DELIVERY_MODE, mode.raw().to_string()));
        }
        if let Some(mode) = self.content_mode {
            pairs.push((CONTENT_MODE, mode.raw().to_string()));
        }
        if let Some(allowed) = self.network_access_allowed {
            pairs.push((NETWORK_ACCESS_ALLOWED, allowed.to_string()));
        }

        let mut uri = format!("{PHASSET_SCHEME}://?");
        for (index, (name, value)) in pairs.iter().enumerate() {
            if index > 0 {
                uri.push('&');
            }
            // Writing into a String cannot fail.
            let _ = write!(
                uri,
                "{}={}",
                utf8_percent_encode(name, COMPONENT),
                utf8_percent_encode(value, COMPONENT)
            );
        }
        Ok(uri)
    }

    /// Renders and parses the URI.
    pub fn to_url(&self) -> Result<Url, ParseError> {
        let uri = self.to_uri()?;
        // Every component is percent-encoded, so only the identifier can upset the parser.
        Url::parse(&uri).map_err(|_| ParseError::InvalidParameterFormat(LOCAL_IDENTIFIER))
    }
}
