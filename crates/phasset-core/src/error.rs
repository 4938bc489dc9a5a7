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

//! Defines the error taxonomy of the loader.
//!
//! Every error except [`LoadError::UnderlyingFetchError`] is detected before
//! the store is contacted. All of them reach the caller through the same
//! terminal event, so the caller handles failures uniformly whatever the stage.
//! Cancellation is deliberately not an error.

use std::sync::Arc;
use thiserror::Error;

/// An error reported by the asset store, shared so it can travel to any thread.
pub type StoreError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// An error produced while decoding request parameters from a URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A required parameter is absent or empty.
    #[error("Missing required query parameter '{0}'")]
    MissingRequiredParameter(&'static str),
    /// A parameter is present but its value is malformed or out of range.
    #[error("Invalid value for query parameter '{0}'")]
    InvalidParameterFormat(&'static str),
}

/// An error delivered through the terminal event of a load.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// The request URI does not use the loader's scheme.
    #[error("Unsupported image URL scheme '{0}'")]
    UnsupportedScheme(String),
    /// A required query parameter is absent or empty.
    #[error("Missing required query parameter '{0}'")]
    MissingRequiredParameter(&'static str),
    /// A query parameter is malformed or out of range.
    #[error("Invalid value for query parameter '{0}'")]
    InvalidParameterFormat(&'static str),
    /// No asset with the requested local identifier exists in the store.
    #[error("No asset found for local identifier '{0}'")]
    AssetNotFound(String),
    /// The store failed while fetching the image.
    #[error("Asset store failed to fetch image: {0}")]
    UnderlyingFetchError(#[source] StoreError),
}

impl LoadError {
    /// Whether this error was raised before the store was asked for an image.
    pub fn is_synchronous(&self) -> bool {
        !matches!(self, LoadError::UnderlyingFetchError(_))
    }

    /// Wraps any store error.
    pub fn fetch<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LoadError::UnderlyingFetchError(Arc::new(error))
    }
}

impl From<ParseError> for LoadError {
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::MissingRequiredParameter(field) => LoadError::MissingRequiredParameter(field),
            ParseError::InvalidParameterFormat(field) => LoadError::InvalidParameterFormat(field),
        }
    }
}
