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

//! Events delivered to the caller of a load.

use crate::error::LoadError;

/// Fixed denominator of every [`ProgressRatio`].
pub const PROGRESS_DENOMINATOR: i64 = 1_000_000;

/// Download progress as an exact integer ratio.
///
/// The store reports progress as a fraction; it is rescaled to
/// `loaded / PROGRESS_DENOMINATOR` so callers can do integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgressRatio {
    /// Amount loaded, in `0..=total`.
    pub loaded: i64,
    /// Always [`PROGRESS_DENOMINATOR`].
    pub total: i64,
}

impl ProgressRatio {
    /// Rescales a fraction in `[0, 1]`.
    ///
    /// Out-of-range values are clamped and NaN counts as no progress. The
    /// scaled value is truncated toward zero.
    pub fn from_fraction(fraction: f64) -> Self {
        let clamped = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        Self {
            loaded: (clamped * PROGRESS_DENOMINATOR as f64) as i64,
            total: PROGRESS_DENOMINATOR,
        }
    }

    /// Returns the ratio back as a fraction.
    pub fn fraction(&self) -> f64 {
        self.loaded as f64 / self.total as f64
    }
}

/// A single step of a load, in delivery order.
///
/// A request produces any number of `Progress` and `Partial` events followed by
/// exactly one `Final`. A request cancelled before its terminal event produces
/// no further events at all: there is no "cancelled" event.
#[derive(Debug, Clone)]
pub enum LoadEvent<I> {
    /// Download progress.
    Progress(ProgressRatio),
    /// A degraded, lower fidelity image. Supersedes previous partials.
    Partial(I),
    /// The terminal outcome of the request.
    Final(Result<I, LoadError>),
}

impl<I> LoadEvent<I> {
    /// Whether this event ends the request.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadEvent::Final(_))
    }
}
