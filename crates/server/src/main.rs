use std::{net::SocketAddr, sync::Arc};

use server::{
    build_router,
    config::{load_settings, prepare_database_url},
    AppState,
};
use server_api::ApiContext;
use storage::{seed, Storage};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    if settings.seed_on_start {
        seed_if_empty(&storage).await?;
    }

    let state = AppState {
        api: ApiContext::new(storage),
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn seed_if_empty(storage: &Storage) -> anyhow::Result<()> {
    if storage.count_todos().await? > 0 {
        return Ok(());
    }
    let inserted = seed::seed(storage, seed::DEFAULT_RANDOM_TODOS).await?;
    info!(count = inserted.len(), "seeded empty todo store");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c; graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
