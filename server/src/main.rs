use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use todo_server::{
    db::{self, DatabaseUrl},
    AppState, Config,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let database_url = DatabaseUrl::parse(&cfg.database_url)?;
    info!(
        database_url = %database_url.redacted(),
        listen_addr = %cfg.listen_addr,
        listen_port = cfg.listen_port,
        public_url = %cfg.public_url.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        max_connections = cfg.max_connections,
        "Starting todo server"
    );

    // Schema must exist before the listener is bound.
    let pool = db::connect(&database_url, cfg.max_connections).await?;
    db::create_schema(&pool, database_url.driver()).await?;

    let addr = cfg.listen_socket();
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let state = AppState::new(pool.clone()).with_public_url(cfg.public_url.clone());
    todo_server::run(listener, state, shutdown_signal()).await?;

    pool.close().await;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
