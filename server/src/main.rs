use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stall_server::{build_router, seed_demo_catalog, AppState};

#[derive(Parser)]
#[command(name = "stall-server", about = "In-memory shop API daemon")]
struct Cli {
    /// HTTP port to listen on.
    #[arg(long, default_value_t = 4000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let state = Arc::new(AppState::default());
    seed_demo_catalog(&state).await;

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", cli.port);
    tracing::info!("stall server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server failed");
}
