//! Process lifecycle: `Uninitialized -> Initializing -> Ready -> ShuttingDown -> Stopped`.
//!
//! The router can only be obtained from [`Ready`], which only
//! [`Bootstrap::initialize`] produces after the schema is in place.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::Config;
use crate::db::CustomerStorage;
use crate::error::CrmError;
use crate::router::{CrmState, crm_router};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Ready,
    ShuttingDown,
    Stopped,
}

impl Phase {
    pub fn can_advance_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Uninitialized, Initializing)
                | (Initializing, Ready)
                | (Initializing, Stopped)
                | (Ready, ShuttingDown)
                | (ShuttingDown, Stopped)
        )
    }
}

/// Current phase, observable through [`Lifecycle::subscribe`].
#[derive(Clone)]
pub struct Lifecycle {
    tx: Arc<watch::Sender<Phase>>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Phase::Uninitialized);
        Self { tx: Arc::new(tx) }
    }

    pub fn phase(&self) -> Phase {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.tx.subscribe()
    }

    pub fn advance(&self, next: Phase) -> Result<(), CrmError> {
        let mut from = next;
        let moved = self.tx.send_if_modified(|current| {
            from = *current;
            if current.can_advance_to(next) {
                *current = next;
                true
            } else {
                false
            }
        });
        if !moved {
            return Err(CrmError::Lifecycle { from, to: next });
        }
        info!(from = ?from, to = ?next, "lifecycle transition");
        Ok(())
    }
}

pub struct Bootstrap {
    cfg: Config,
    lifecycle: Lifecycle,
}

impl Bootstrap {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Open storage and ensure the schema. On any failure the pool is
    /// released, the phase ends at `Stopped`, and the error is returned.
    pub async fn initialize(self) -> Result<Ready, CrmError> {
        let Self { cfg, lifecycle } = self;
        lifecycle.advance(Phase::Initializing)?;

        let storage = match CustomerStorage::connect(&cfg.database).await {
            Ok(storage) => storage,
            Err(e) => {
                error!(database_url = %cfg.database.url, error = %e, "failed to open storage");
                lifecycle.advance(Phase::Stopped)?;
                return Err(e);
            }
        };

        if let Err(e) = storage.ensure_schema().await {
            error!(error = %e, "failed to ensure schema");
            storage.close().await;
            lifecycle.advance(Phase::Stopped)?;
            return Err(e);
        }

        lifecycle.advance(Phase::Ready)?;
        Ok(Ready {
            cfg,
            storage,
            lifecycle,
        })
    }
}

/// Storage is open and the schema exists; requests may be served.
pub struct Ready {
    cfg: Config,
    storage: CustomerStorage,
    lifecycle: Lifecycle,
}

impl Ready {
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn storage(&self) -> &CustomerStorage {
        &self.storage
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn router(&self) -> Router {
        let state = CrmState::new(self.storage.clone(), self.cfg.pagination);
        crm_router(state)
    }

    /// Serve until `shutdown` resolves, then release storage.
    /// Storage is released even when serving fails.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), CrmError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        if let Ok(addr) = listener.local_addr() {
            info!("HTTP server listening on {}", addr);
        }
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;
        if let Err(e) = &served {
            error!(error = %e, "HTTP server stopped with error");
        }

        let shutting_down = self.lifecycle.advance(Phase::ShuttingDown);
        self.storage.close().await;
        let stopped = self.lifecycle.advance(Phase::Stopped);

        served?;
        shutting_down.and(stopped)
    }
}
