//! Junction Signal Pipeline - Main Entry Point

use controller::{init_logging, ControlLoop, Settings};
use tokio::sync::watch;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== Junction AI Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1);
    let settings = Settings::load(config_path.as_deref())?;
    let mut control_loop = ControlLoop::from_settings(&settings)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("ctrl-c received, shutting down");
                let _ = shutdown_tx.send(true);
            }
            Err(err) => warn!("failed to listen for ctrl-c: {}", err),
        }
    });

    control_loop.run(shutdown_rx).await?;

    info!("pipeline stopped");
    Ok(())
}
