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

//! Sandbox configuration, read from a RON document.

use anyhow::{Context, Result};
use phasset_core::{DeliveryMode, LoaderConfig};
use phasset_infra::{MemoryAssetStore, Step};
use phasset_lanes::ImageSourceOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// One scripted step of a demo asset. Images are plain labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DemoStep {
    Progress(f64),
    Degraded(String),
    Final(String),
    Fail(String),
    PauseMs(u64),
}

impl From<DemoStep> for Step<String> {
    fn from(step: DemoStep) -> Self {
        match step {
            DemoStep::Progress(fraction) => Step::Progress(fraction),
            DemoStep::Degraded(label) => Step::Degraded(label),
            DemoStep::Final(label) => Step::Final(label),
            DemoStep::Fail(message) => Step::Fail(message),
            DemoStep::PauseMs(millis) => Step::Pause(Duration::from_millis(millis)),
        }
    }
}

/// An asset seeded into the sandbox store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoAsset {
    pub local_identifier: String,
    pub steps: Vec<DemoStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub loader: LoaderConfig,
    pub assets: Vec<DemoAsset>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            assets: vec![
                DemoAsset {
                    local_identifier: "ED7AC36B-A150-4C38-BB8C-B6D696F4F2ED/L0/001".to_string(),
                    steps: vec![
                        DemoStep::Progress(0.25),
                        DemoStep::PauseMs(40),
                        DemoStep::Degraded("thumbnail 120x90".to_string()),
                        DemoStep::Progress(0.75),
                        DemoStep::PauseMs(40),
                        DemoStep::Progress(1.0),
                        DemoStep::Final("full 4032x3024".to_string()),
                    ],
                },
                DemoAsset {
                    local_identifier: "B84E8479-475C-4727-A4A4-B77AA9980897/L0/001".to_string(),
                    steps: vec![
                        DemoStep::Progress(0.5),
                        DemoStep::PauseMs(20),
                        DemoStep::Fail("iCloud download failed".to_string()),
                    ],
                },
            ],
        }
    }
}

impl SandboxConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_ron_str(&source)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source).context("Config is not valid RON")?;
        config.loader.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize config")
    }

    /// A store with every configured asset registered.
    pub fn build_store(&self) -> MemoryAssetStore<String> {
        let store = MemoryAssetStore::new();
        for asset in &self.assets {
            store.insert(
                asset.local_identifier.clone(),
                asset.steps.iter().cloned().map(Step::from).collect(),
            );
        }
        store
    }

    /// One `phasset://` URL per configured asset.
    pub fn asset_uris(&self) -> Result<Vec<String>> {
        self.assets
            .iter()
            .map(|asset| {
                ImageSourceOptions::new(asset.local_identifier.as_str())
                    .with_delivery_mode(DeliveryMode::Opportunistic)
                    .with_network_access(true)
                    .to_uri()
                    .with_context(|| {
                        format!("Asset '{}' has no valid URL", asset.local_identifier)
                    })
            })
            .collect()
    }
}
