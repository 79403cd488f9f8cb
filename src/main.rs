//! unsei — sanmeigaku fortune engine and JSON API service.
//! Ganzhi charts, five-element scoring, daily/time fortunes, and a
//! points/streak layer over encrypted per-user file storage.

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use unsei::store::{StatsStore, UserStore, VisitorStore};
use unsei::{api, AppState};

#[derive(Parser)]
#[command(name = "unsei", version, about = "Sanmeigaku fortune engine and JSON API")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5001", env = "UNSEI_PORT")]
    port: u16,

    /// Data directory (user records, visitor records, stats)
    #[arg(short, long, default_value = "data", env = "UNSEI_DATA")]
    data: String,

    /// Secret used to encrypt stored user records
    #[arg(long, default_value = "sanmeigaku-secret-key", env = "UNSEI_SECRET")]
    secret: String,

    /// Bearer key protecting /api/admin/stats (open when unset)
    #[arg(long, env = "UNSEI_ADMIN_KEY")]
    admin_key: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let data_dir = std::path::PathBuf::from(&args.data);

    let users = UserStore::open(data_dir.join("users"), &args.secret)
        .expect("failed to open user store");
    let visitors =
        VisitorStore::open(data_dir.join("visitors")).expect("failed to open visitor store");
    let stats =
        StatsStore::open(data_dir.join("stats.json")).expect("failed to open stats store");

    let auth_status = if args.admin_key.is_some() { "enabled" } else { "disabled" };

    let state = AppState {
        users: Arc::new(users),
        visitors: Arc::new(visitors),
        stats: Arc::new(stats),
        admin_key: args.admin_key,
        started_at: std::time::Instant::now(),
    };
    let app = api::router(state);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = args.port,
        data = %args.data,
        admin_auth = auth_status,
        "unsei starting"
    );

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
    info!("shutting down");
}
