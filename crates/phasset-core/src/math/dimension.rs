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

use serde::{Deserialize, Serialize};
use std::fmt;

/// A two-dimensional size in points or pixels.
///
/// The unit depends on the context: a view size is expressed in points, and
/// becomes pixels once scaled by the display density.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// The horizontal extent.
    pub width: f64,
    /// The vertical extent.
    pub height: f64,
}

impl Size {
    /// A size with both extents set to zero.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new `Size`.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns this size with both extents multiplied by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_multiplies_both_extents() {
        let size = Size::new(100.0, 50.0).scaled(3.0);
        assert_eq!(size, Size::new(300.0, 150.0));
    }

    #[test]
    fn display_uses_width_x_height() {
        assert_eq!(Size::new(100.0, 200.0).to_string(), "100x200");
        assert_eq!(Size::new(1.5, 2.0).to_string(), "1.5x2");
    }
}
