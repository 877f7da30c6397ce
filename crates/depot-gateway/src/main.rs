//! Depot Gateway - manifest fetch and static upgrade tree

use clap::Parser;
use depot_gateway::{run_server, GatewayConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "depot-gateway")]
#[command(about = "HTTP gateway for the Depot release-artifact store")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "DEPOT_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8866", env = "DEPOT_PORT")]
    port: u16,

    /// Bucket served under /upgrade/
    #[arg(short, long, env = "DEPOT_BUCKET")]
    bucket: String,

    /// Metadata root directory
    #[arg(long, default_value = "./depot/root", env = "DEPOT_META_ROOT")]
    meta_root: PathBuf,

    /// Content root directory
    #[arg(long, default_value = "./depot/data", env = "DEPOT_DATA_ROOT")]
    data_root: PathBuf,

    /// Enable debug logging
    #[arg(short, long, env = "DEPOT_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("depot_gateway={log_level},depot_core={log_level},tower_http=debug")
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting depot gateway on {}:{}", args.host, args.port);
    tracing::info!("bucket: {}", args.bucket);

    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        bucket: args.bucket,
        meta_root: args.meta_root,
        data_root: args.data_root,
    };

    run_server(config).await
}
