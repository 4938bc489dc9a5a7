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

//! Scripts describing how a stored asset answers a request.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// One step of a scripted fetch.
///
/// Steps run in order. `Final` and `Fail` end the request; anything after
/// them is never played.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<I> {
    /// Reports download progress, a fraction in `[0, 1]`.
    Progress(f64),
    /// Delivers a degraded placeholder image.
    Degraded(I),
    /// Delivers the full fidelity image.
    Final(I),
    /// Fails the request with the given message.
    Fail(String),
    /// Waits before playing the next step. Cancellation interrupts the wait.
    Pause(Duration),
}

impl<I> Step<I> {
    /// Whether this step ends the request.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Final(_) | Step::Fail(_))
    }
}

/// The error delivered for [`Step::Fail`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SimulatedFailure(pub String);

/// An asset resolved by [`MemoryAssetStore::lookup`](super::MemoryAssetStore).
#[derive(Debug)]
pub struct MemoryAsset<I> {
    /// The local identifier the asset was looked up with.
    pub local_identifier: String,
    pub(crate) script: Arc<[Step<I>]>,
}

impl<I> MemoryAsset<I> {
    /// The steps this asset plays for every request.
    pub fn script(&self) -> &[Step<I>] {
        &self.script
    }
}

impl<I> Clone for MemoryAsset<I> {
    fn clone(&self) -> Self {
        Self {
            local_identifier: self.local_identifier.clone(),
            script: Arc::clone(&self.script),
        }
    }
}
