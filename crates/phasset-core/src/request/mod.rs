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

//! The typed request model.
//!
//! A request URI is decoded once into a [`FetchConfiguration`], which is
//! immutable for the lifetime of the request. Right before the store is
//! contacted, the configuration is resolved against the caller's view into an
//! [`ImageRequest`], the value actually handed to the
//! [`AssetStore`](crate::store::AssetStore).

mod configuration;
mod modes;
pub mod params;

pub use configuration::*;
pub use modes::*;

/// The URI scheme served by the phasset loader, compared case-insensitively.
pub const PHASSET_SCHEME: &str = "phasset";

/// The literal that requests the asset's full native resolution.
///
/// Matched case-insensitively against the `targetSize` query parameter.
pub const MAXIMUM_SIZE_SENTINEL: &str = "PHImageManagerMaximumSize";
