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

//! Store hints carried on the wire as integer raw values.
//!
//! Every enum here exposes a total `from_raw` that rejects unknown integers
//! instead of reinterpreting them.

use serde::{Deserialize, Serialize};

/// Controls how precisely the store resizes its output to the target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResizeMode {
    /// No resizing; the store may return any size.
    #[default]
    None,
    /// Resize efficiently, possibly returning a slightly different size.
    Fast,
    /// Resize to exactly match the target size.
    Exact,
}

impl ResizeMode {
    /// Decodes a wire value. Returns `None` for anything outside `0..=2`.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Self::None),
            1 => Some(Self::Fast),
            2 => Some(Self::Exact),
            _ => None,
        }
    }

    /// The wire value of this mode.
    pub fn raw(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Fast => 1,
            Self::Exact => 2,
        }
    }
}

/// Trades latency against fidelity for the delivered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeliveryMode {
    /// Deliver degraded results first, then the high quality one.
    #[default]
    Opportunistic,
    /// Deliver only the highest quality result.
    HighQualityFormat,
    /// Deliver a fast result, even if degraded.
    FastFormat,
}

impl DeliveryMode {
    /// Decodes a wire value. Returns `None` for anything outside `0..=2`.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Self::Opportunistic),
            1 => Some(Self::HighQualityFormat),
            2 => Some(Self::FastFormat),
            _ => None,
        }
    }

    /// The wire value of this mode.
    pub fn raw(self) -> i64 {
        match self {
            Self::Opportunistic => 0,
            Self::HighQualityFormat => 1,
            Self::FastFormat => 2,
        }
    }
}

/// How the source aspect ratio is fitted into the target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContentMode {
    /// Scale to fit entirely within the target size.
    #[default]
    AspectFit,
    /// Scale to fill the target size, cropping if necessary.
    AspectFill,
}

impl ContentMode {
    /// Decodes a wire value. Returns `None` for anything outside `0..=1`.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Self::AspectFit),
            1 => Some(Self::AspectFill),
            _ => None,
        }
    }

    /// The wire value of this mode.
    pub fn raw(self) -> i64 {
        match self {
            Self::AspectFit => 0,
            Self::AspectFill => 1,
        }
    }
}
