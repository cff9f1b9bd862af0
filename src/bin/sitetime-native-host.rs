//! Chrome Native Messaging Host for sitetime
//!
//! Runs as a standalone native messaging host for the sitetime browser extension.
//! It communicates via stdin/stdout using Chrome's native messaging protocol, so
//! all logging goes to stderr.

use env_logger::Env;
use log::{error, info};
use sitetime_lib::config::Settings;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Initialization error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = sitetime_lib::run_native_host(settings).await {
        error!("Native host error: {e}");
        std::process::exit(1);
    }
    info!("Extension disconnected, exiting");
}
