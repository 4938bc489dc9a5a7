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

//! The request lane: from a raw URL to a validated [`FetchConfiguration`].
//!
//! - [`SchemeDispatcher`] decides whether a URL belongs to this loader.
//! - [`codec`] decodes the query string into a typed configuration.
//! - [`ImageSourceOptions`] goes the other way and builds conforming URLs.
//!
//! [`FetchConfiguration`]: phasset_core::FetchConfiguration

pub mod codec;
mod dispatcher;
mod source;

pub use dispatcher::SchemeDispatcher;
pub use source::ImageSourceOptions;
