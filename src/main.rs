//! Forms backend server binary.

use std::sync::Arc;

use clap::Parser;
use forms_backend::api::{self, ApiConfig};
use forms_backend::store::MemoryFormStore;
use tracing::info;

/// CLI arguments for the forms backend.
#[derive(Parser, Debug)]
#[command(name = "forms-backend", about = "Discord OAuth2 forms backend")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    bind_addr: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,forms_backend=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    let config = ApiConfig::from_env()?;

    let store = Arc::new(MemoryFormStore::new());
    let app = api::router(config, store);

    let listener = tokio::net::TcpListener::bind(&args.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "forms backend listening");
    axum::serve(listener, app).await?;

    Ok(())
}
