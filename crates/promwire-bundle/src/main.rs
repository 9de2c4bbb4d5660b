//! promwire demo host.
//!
//! Builds a bundle from `promwire.yaml` (when present) plus argv, starts the
//! exporter, and serves scrapes until interrupted.

use tracing_subscriber::{fmt, EnvFilter};

use promwire_bundle::{config, Bundle};
use promwire_core::Lifecycle;

const CONFIG_FILE: &str = "promwire.yaml";

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let section = if std::path::Path::new(CONFIG_FILE).exists() {
        config::load_from_file(CONFIG_FILE).expect("config load failed")
    } else {
        config::ExporterSection::default()
    };

    let mut bundle = Bundle::builder()
        .flag_args(std::env::args())
        .expect("flag parsing failed")
        .build(section)
        .expect("bundle build failed");

    bundle.start().await.expect("exporter start failed");
    if let Some(addr) = bundle.local_addr() {
        tracing::info!(%addr, "scrape endpoint ready");
    }

    tokio::signal::ctrl_c().await.expect("failed to wait for ctrl-c");

    if let Err(err) = bundle.stop().await {
        tracing::warn!(%err, "exporter stopped with error");
    }
}
