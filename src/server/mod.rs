use std::io;
use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::data::DatasetStore;
use crate::projector::{ProjectorConfig, Selection};

pub mod api;
pub mod page;
pub mod routes;
pub mod static_files;

/// Shared by every handler. The store is never written after startup.
#[derive(Debug)]
pub struct AppState {
    pub store: Arc<DatasetStore>,
    pub projector: ProjectorConfig,
    pub initial_selection: Selection,
}

impl AppState {
    pub fn new(store: Arc<DatasetStore>, config: &AppConfig) -> Self {
        AppState {
            store,
            projector: config.projector.clone(),
            initial_selection: config.initial_selection.clone(),
        }
    }
}

/// Blocks on a fresh tokio runtime until ctrl-c.
pub fn run_server(state: AppState, bind_addr: &str) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(Arc::new(state), bind_addr))
}

pub async fn serve(state: Arc<AppState>, bind_addr: &str) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("travel-buddy listening on http://{}", listener.local_addr()?);
    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
