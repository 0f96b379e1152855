// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// aitu-sim: loopback host simulator.
//
// Builds a bridge over a simulated host, runs a short scenario of calls
// against it and logs what came back. Usage:
//
//     aitu-sim [--framed] [CONFIG.json]
//
// `RUST_LOG` controls verbosity (default `info`).

mod services;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use aitu_bridge::Bridge;
use aitu_core::BridgeConfig;
use aitu_core::error::Result;
use aitu_transport::{JsonFileStore, KeyValueStore};

use services::data_dir;
use services::loopback::{self, SimEnv, SimMode};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!(version = Bridge::version(), "aitu-sim starting");

    if let Err(e) = run().await {
        error!(error = %e, "simulation failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let mut mode = SimMode::DirectCall;
    let mut config_path: Option<PathBuf> = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--framed" => mode = SimMode::Framed,
            path => config_path = Some(PathBuf::from(path)),
        }
    }

    let config = match &config_path {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };

    let dir = data_dir::data_dir();
    let store: Arc<dyn KeyValueStore> =
        Arc::new(JsonFileStore::open(data_dir::origin_store_path(&dir)));
    let first_load = store.get(&config.origin_storage_key).is_none();

    let (tx, rx) = mpsc::unbounded_channel();
    let env = SimEnv::new(mode, tx, store, first_load);
    let bridge = Bridge::new(&env, config);
    info!(
        transport = %bridge.transport_kind(),
        supported = bridge.is_supported(),
        first_load,
        "bridge ready"
    );

    let responder = tokio::spawn(loopback::respond(bridge.clone(), rx));
    let outcome = scenario(&bridge).await;
    responder.abort();
    outcome
}

async fn scenario(bridge: &Bridge) -> Result<()> {
    let qr = bridge.get_qr().await?;
    info!(%qr, "getQr");

    let geo = bridge.get_geo().await?;
    info!(latitude = geo.latitude, longitude = geo.longitude, "getGeo");

    match bridge.check_biometry().await {
        Ok(data) => info!(%data, "checkBiometry"),
        Err(e) => warn!(kind = ?e.host_kind(), "checkBiometry rejected: {e}"),
    }

    let storage = bridge.storage();
    storage.set_item("theme", "dark").await?;
    let theme = storage.get_item("theme").await?;
    info!(?theme, "storage round trip");

    let me = bridge.get_me().await?;
    info!(name = %me.name, id = %me.id, "GetMe");

    if let Err(e) = bridge.vibrate(&[8_000, 4_000]).await {
        info!("vibrate refused before dispatch: {e}");
    }
    bridge.vibrate(&[200, 100, 200]).await?;

    info!(pending = bridge.pending_count(), "scenario finished");
    Ok(())
}
