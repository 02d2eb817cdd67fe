//! HTTP boundary
//!
//! Exposes the E-utilities operations as JSON endpoints:
//!
//! | Route | Operation |
//! |-------|-----------|
//! | `GET /` | liveness, `{"status": "ok"}` |
//! | `GET /healthz` | health, `{"health": "ok"}` |
//! | `POST /echo` | echoes `{"text": ..}` back as `{"echo": ..}` |
//! | `GET /pubmed/search` | [`PubMedClient::search_articles`] |
//! | `GET /pubmed/summary` | [`PubMedClient::fetch_summaries`] |
//! | `GET /pubmed/abstract` | [`PubMedClient::fetch_abstracts`] |
//! | `GET /pubmed/search_and_fetch` | [`PubMedClient::search_and_fetch`] |

pub mod error;
pub mod handlers;

use std::future::Future;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::info;

use crate::pubmed::PubMedClient;

pub use error::ApiError;

/// Shared per-process state; the client is cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub client: PubMedClient,
}

/// Build the application router
pub fn router(client: PubMedClient) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/echo", post(handlers::echo))
        .route("/pubmed/search", get(handlers::search))
        .route("/pubmed/summary", get(handlers::summary))
        .route("/pubmed/abstract", get(handlers::abstracts))
        .route("/pubmed/search_and_fetch", get(handlers::search_and_fetch))
        .with_state(AppState { client })
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, client: PubMedClient, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "HTTP server listening");
    }

    axum::serve(listener, router(client))
        .with_graceful_shutdown(shutdown)
        .await
}
