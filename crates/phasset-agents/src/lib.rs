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

//! # Phasset Agents
//!
//! Drives the lanes against an injected asset store. [`ImageLoadAgent`] is the
//! loader handed to the host pipeline; [`LoaderRegistry`] plays the host's role
//! of picking a loader for a URL.

#![warn(missing_docs)]

pub mod image_agent;
pub mod registry;

pub use image_agent::{ImageLoadAgent, LoaderMetrics};
pub use registry::LoaderRegistry;
