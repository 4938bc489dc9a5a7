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

// Loads phasset:// URLs against a scripted in-memory store and logs every event.
// Run with: cargo run -p phasset-sandbox -- [URL]...

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::SandboxConfig;
use env_logger::Env;
use phasset_agents::{ImageLoadAgent, LoaderRegistry};
use phasset_core::telemetry::MetricValue;
use phasset_core::{LoadEvent, Size, Url};
use phasset_telemetry::MetricsRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "phasset-sandbox", version, about = "Loads phasset:// URLs from a scripted store")]
struct Cli {
    /// URLs to load. Defaults to one URL per configured asset.
    uris: Vec<String>,

    /// RON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Width of the target view, in points.
    #[arg(long, default_value_t = 100.0)]
    view_width: f64,

    /// Height of the target view, in points.
    #[arg(long, default_value_t = 100.0)]
    view_height: f64,

    /// Display scale applied to the view size.
    #[arg(long, default_value_t = 2.0)]
    scale: f64,

    /// Cancel every load after this many milliseconds.
    #[arg(long)]
    cancel_after_ms: Option<u64>,

    /// Print the effective configuration as RON and exit.
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SandboxConfig::load(path)?,
        None => SandboxConfig::default(),
    };
    if cli.dump_config {
        println!("{}", config.to_ron_string()?);
        return Ok(());
    }

    let metrics = MetricsRegistry::new();
    let store = Arc::new(config.build_store());
    let agent = ImageLoadAgent::from_config(store, &config.loader, &metrics);
    let mut loaders = LoaderRegistry::new();
    loaders.register(Arc::new(agent));

    let uris = if cli.uris.is_empty() {
        config.asset_uris()?
    } else {
        cli.uris.clone()
    };
    let view_size = Size::new(cli.view_width, cli.view_height);
    let cancel_after = cli.cancel_after_ms.map(Duration::from_millis);

    for raw in &uris {
        let url = Url::parse(raw).with_context(|| format!("'{raw}' is not a valid URL"))?;
        run_load(&loaders, &url, view_size, cli.scale, cancel_after);
    }

    report_metrics(&metrics);
    Ok(())
}

fn run_load(
    loaders: &LoaderRegistry<String>,
    url: &Url,
    view_size: Size,
    scale: f64,
    cancel_after: Option<Duration>,
) {
    log::info!("Loading {url} into a {view_size} view at {scale}x");

    let (sender, events) = flume::unbounded();
    let cancellation = loaders.load(url, view_size, scale, Box::new(sender));

    if let Some(delay) = cancel_after {
        thread::sleep(delay);
        cancellation.cancel();
        log::info!("  cancel requested after {delay:?}");
    }

    let mut settled = false;
    for event in events.iter() {
        match event {
            LoadEvent::Progress(ratio) => {
                log::info!("  progress {}/{}", ratio.loaded, ratio.total)
            }
            LoadEvent::Partial(image) => log::info!("  partial: {image}"),
            LoadEvent::Final(Ok(image)) => {
                settled = true;
                log::info!("  final: {image}");
            }
            LoadEvent::Final(Err(error)) => {
                settled = true;
                log::error!("  failed: {error}");
            }
        }
    }
    if !settled {
        log::warn!("  stream ended without a terminal event (cancelled)");
    }
}

fn report_metrics(metrics: &MetricsRegistry) {
    let mut snapshot = metrics.get_namespace_metrics("image_loader");
    snapshot.sort_by(|a, b| a.id.name.cmp(&b.id.name));
    for metric in snapshot {
        match metric.value {
            MetricValue::Counter(value) => log::info!("{} = {}", metric.id, value),
            MetricValue::Histogram { count, .. } => {
                log::info!(
                    "{} = {} samples, mean {:.1} {}",
                    metric.id,
                    count,
                    metric.value.mean().unwrap_or(0.0),
                    metric.unit
                );
            }
        }
    }
}
