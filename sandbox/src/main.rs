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

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use preload_agents::{AssetLoadingAgent, CycleOutcome};
use preload_core::{AssetKind, LoadedAsset};
use preload_io::{AssetManifest, FileSystemFetcher};

/// Loads every asset of a manifest in one cycle and prints what came back.
#[derive(Parser)]
#[command(name = "sandbox", version, about)]
struct Cli {
    /// Path to the asset manifest (TOML).
    manifest: PathBuf,

    /// Directory asset sources are resolved against. Defaults to the
    /// manifest's directory.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Overrides the manifest's cycle timeout, in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    preload_telemetry::logging::init_logging(&cli.log).context("Failed to initialize logging")?;

    let manifest = AssetManifest::load(&cli.manifest)
        .with_context(|| format!("Failed to read manifest '{}'", cli.manifest.display()))?;
    let root = match cli.root {
        Some(root) => root,
        None => cli
            .manifest
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default(),
    };
    log::info!(
        "Loading {} assets from '{}'",
        manifest.assets.len(),
        root.display()
    );

    let mut agent = AssetLoadingAgent::new(FileSystemFetcher::new(root));
    agent.enqueue_manifest(&manifest);
    if let Some(timeout_ms) = cli.timeout_ms {
        let config = agent
            .config()
            .clone()
            .with_cycle_timeout(Duration::from_millis(timeout_ms));
        agent.set_config(config);
    }
    agent.on_progress(|fraction| log::info!("Progress: {:>5.1}%", fraction * 100.0));

    let outcome = agent.start_loading()?.finished().await;
    match outcome {
        CycleOutcome::Completed { succeeded, failed } => {
            println!("Loaded {succeeded} assets, {failed} failed");
        }
        CycleOutcome::Superseded => println!("Loading cycle was superseded"),
    }

    let table = agent.assets();
    for kind in AssetKind::ALL {
        for key in table.keys(kind) {
            if let Some(asset) = table.get(kind, key) {
                println!("  {kind:<5} {key:<20} {}", describe(asset));
            }
        }
    }
    for entry in &manifest.assets {
        if !table.contains(entry.kind, &entry.key) {
            println!("  {:<5} {:<20} missing", entry.kind, entry.key);
        }
    }

    for (id, value) in agent.metrics().snapshot() {
        log::debug!("{id} = {value:?}");
    }
    Ok(())
}

fn describe(asset: &LoadedAsset) -> String {
    match asset {
        LoadedAsset::Image(image) => format!("{}x{} pixels", image.width, image.height),
        LoadedAsset::Audio(sound) => format!(
            "{:.2}s, {} channel(s) at {} Hz",
            sound.duration_secs(),
            sound.channels,
            sound.sample_rate
        ),
        LoadedAsset::Data(value) => {
            let text = value.to_string();
            match text.char_indices().nth(48) {
                Some((cut, _)) => format!("{}...", &text[..cut]),
                None => text,
            }
        }
    }
}
