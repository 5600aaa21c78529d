use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use clap::Parser;
use jot_back::{AppState, StoreConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const PORT: u16 = 7890;
const DATA_FILE: &str = "data.ron";

/// Serve the todo list API.
#[derive(Debug, Parser)]
#[command(name = "jot-server", version)]
struct Args {
    #[arg(long, env = "JOT_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    #[arg(long, env = "JOT_PORT", default_value_t = PORT)]
    port: u16,

    /// Where the todos are kept between runs.
    #[arg(long, env = "JOT_DATA_FILE", default_value = DATA_FILE)]
    data_file: PathBuf,

    /// Keep todos in memory only.
    #[arg(long)]
    in_memory: bool,

    /// PEM certificate; serves https together with --tls-key.
    #[arg(long, env = "SSL_CERT", requires = "tls_key")]
    tls_cert: Option<PathBuf>,

    #[arg(long, env = "SSL_KEY", requires = "tls_cert")]
    tls_key: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match args.in_memory {
        true => StoreConfig::Memory,
        false => StoreConfig::File(args.data_file),
    };

    let app = jot_back::app(Arc::new(AppState::new(config)));
    let addr = SocketAddr::new(args.host, args.port);

    let handle = Handle::new();
    tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

    match (args.tls_cert, args.tls_key) {
        (Some(cert), Some(key)) => {
            let tls = RustlsConfig::from_pem_file(cert, key).await?;

            info!(%addr, "listening with tls");

            axum_server::bind_rustls(addr, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        _ => {
            info!(%addr, "listening");

            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }

    Ok(())
}

async fn shutdown_on_ctrl_c(handle: Handle) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {:?}", err);
        return;
    }

    info!("shutting down");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
