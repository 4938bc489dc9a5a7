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

//! Acts as the **[A]gent** for image requests.
//!
//! The agent owns nothing but an `Arc` of the store and a dispatcher. Each
//! call to `load` runs the request lane synchronously (scheme check, query
//! decoding, asset lookup), then hands a delivery sink to the store and
//! returns a cancellation bridged to the store's request id.
//!
//! Per request, two flags shared between the sink and the cancellation decide
//! what still reaches the observer:
//!
//! - once a terminal event went out, nothing else does and cancelling is a no-op;
//! - once the caller cancelled, nothing goes out at all, terminal included.

pub mod agent;
mod cancellation;
mod delivery;
mod metrics;

pub use agent::ImageLoadAgent;
pub use metrics::LoaderMetrics;
