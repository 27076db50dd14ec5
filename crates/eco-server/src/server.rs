use std::future::Future;
use std::sync::Arc;

use eco_store::{FileLedgerStore, LedgerStore};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// EcoTrack ledger server.
pub struct EcoServer {
    config: ServerConfig,
    store: Arc<dyn LedgerStore>,
}

impl EcoServer {
    /// Open the file-backed store under `config.data_dir`.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let store = FileLedgerStore::open(&config.data_dir)?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(config: ServerConfig, store: Arc<dyn LedgerStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(
            Arc::clone(&self.store),
            self.config.profile.clone(),
        ))
    }

    /// Bind `config.bind_addr` and serve until the process exits.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve_on(listener, std::future::pending()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        tracing::info!(
            addr = %listener.local_addr()?,
            data_dir = %self.config.data_dir.display(),
            "eco ledger server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
