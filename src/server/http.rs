//! HTTP server implementation
//!
//! hyper http1 with TokioIo for async handling. One connection per task;
//! all handlers share the [`AppState`] behind an Arc.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::Args;
use crate::db::Database;
use crate::routes;
use crate::stores::StoreService;
use crate::types::Result;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Lazily-connected database handle, initialized by the first request
    pub db: Database,
}

impl AppState {
    pub fn new(args: Args) -> Self {
        let db = Database::new(&args);
        Self { args, db }
    }

    /// Get a store service over the shared collection handle
    pub async fn stores(&self) -> Result<StoreService> {
        let collection = self.db.stores().await?;
        Ok(StoreService::new(collection.clone()))
    }
}

/// Run the HTTP server until the process is stopped
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Signpost listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(|q| q.to_string());

    debug!("[{}] {} {}", addr, method, path);

    let response = match (method, path.as_str()) {
        // Liveness probe
        (Method::GET, "/health") | (Method::GET, "/healthz") => routes::health_check(&state),

        // Version info for deployment verification
        (Method::GET, "/version") => routes::version_info(),

        // Store listing and search
        (Method::GET, "/stores") => routes::stores::list(state, query.as_deref()).await,
        (Method::POST, "/stores/search") => routes::stores::search(state, req).await,

        // One-shot feed import
        (Method::POST, "/stores/import") => routes::stores::import(state).await,

        // Single-store routes: get, nearby, close, open, update
        (method, p) if p.starts_with("/stores/") => {
            routes::stores::dispatch(state, method, p, query.as_deref(), req).await
        }

        _ => routes::not_found(&path),
    };

    Ok(response)
}
