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

use phasset_core::config::{LoaderConfig, DEFAULT_PRIORITY};
use phasset_core::request::PHASSET_SCHEME;
use url::Url;

/// Decides whether a URL belongs to the phasset loader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemeDispatcher {
    priority: f32,
}

impl SchemeDispatcher {
    /// Creates a dispatcher reporting `priority` to the host.
    pub fn new(priority: f32) -> Self {
        Self { priority }
    }

    /// Creates a dispatcher from the loader configuration.
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(config.priority)
    }

    /// True iff the scheme of `url` is `phasset`, ignoring case.
    pub fn can_handle(&self, url: &Url) -> bool {
        url.scheme().eq_ignore_ascii_case(PHASSET_SCHEME)
    }

    /// Like [`SchemeDispatcher::can_handle`] for a raw string. Unparseable input is rejected.
    pub fn can_handle_str(&self, uri: &str) -> bool {
        Url::parse(uri)
            .map(|url| self.can_handle(&url))
            .unwrap_or(false)
    }

    /// The priority used by the host to break ties among loaders; higher wins.
    pub fn priority(&self) -> f32 {
        self.priority
    }
}

impl Default for SchemeDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn accepts_phasset_scheme_in_any_case() {
        let dispatcher = SchemeDispatcher::default();
        assert!(dispatcher.can_handle(&url("phasset://?localIdentifier=ABC")));
        assert!(dispatcher.can_handle(&url("PHASSET://?localIdentifier=ABC")));
        assert!(dispatcher.can_handle_str("PhAsSeT://?localIdentifier=ABC"));
    }

    #[test]
    fn rejects_other_schemes() {
        let dispatcher = SchemeDispatcher::default();
        for raw in [
            "https://example.com/image.png",
            "file:///tmp/image.png",
            "phassets://?localIdentifier=ABC",
            "ph-asset://?localIdentifier=ABC",
            "data:image/png;base64,AAAA",
        ] {
            assert!(!dispatcher.can_handle(&url(raw)), "{raw} should be rejected");
        }
    }

    #[test]
    fn rejects_unparseable_strings() {
        assert!(!SchemeDispatcher::default().can_handle_str("not a url"));
    }

    #[test]
    fn priority_defaults_to_one_and_follows_config() {
        assert_eq!(SchemeDispatcher::default().priority(), 1.0);

        let config = LoaderConfig {
            priority: 4.5,
            ..LoaderConfig::default()
        };
        assert_eq!(SchemeDispatcher::from_config(&config).priority(), 4.5);
    }
}
