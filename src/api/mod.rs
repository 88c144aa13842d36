// src/api/mod.rs

pub mod query;
pub mod response;
pub mod router;

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::arb::{scanner_for, Scanner};
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::mock_feed::CatalogStore;


const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);


/// Everything a request handler needs. Shared across connections behind an `Arc`.
pub struct AppState {
    pub store: CatalogStore,
    pub scanner: Arc<dyn Scanner>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(catalog: Catalog, config: AppConfig) -> Self {
        Self::with_store(CatalogStore::new(catalog), config)
    }

    pub fn with_store(store: CatalogStore, config: AppConfig) -> Self {
        Self {
            store,
            scanner: scanner_for(config.scan.strategy),
            config,
        }
    }
}


/// Accepts connections on `listener` forever, one task per connection.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    info!(addr = %listener.local_addr()?, "API listening");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                // Usually transient (EMFILE, ECONNABORTED); keep the listener up.
                warn!(error = %e, "accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        let state = Arc::clone(&state);

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let state = Arc::clone(&state);
                // Routes only look at the head; drop the body so the future stays Send.
                let (head, _) = req.into_parts();
                let req = Request::from_parts(head, ());
                async move { Ok::<_, Infallible>(router::respond(&state, &req).await) }
            });

            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                warn!(%peer, error = %e, "connection error");
            }
        });
    }
}
