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

//! Loader configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default priority reported to the host pipeline.
pub const DEFAULT_PRIORITY: f32 = 1.0;

/// An error raised while reading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid RON for the expected shape.
    #[error("Invalid loader configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The document parsed but holds an unusable value.
    #[error("Invalid loader configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Configuration for an image loader instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Priority reported to the host when several loaders accept a URL.
    pub priority: f32,
    /// Whether request outcomes are recorded in the metrics registry.
    pub record_metrics: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            priority: DEFAULT_PRIORITY,
            record_metrics: true,
        }
    }
}

impl LoaderConfig {
    /// Parses a configuration from a RON document. Missing fields take their default.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the host pipeline cannot order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.priority.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "priority",
                reason: format!("{} is not a finite number", self.priority),
            });
        }
        Ok(())
    }
}
