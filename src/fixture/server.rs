//! Fixture server - TCP listener and request dispatch

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::common::{Error, Result};

use super::clock::Clock;
use super::payloads;
use super::routes::{QueryParams, Route};

/// Shared, read-only request state
#[derive(Clone)]
struct AppState {
    clock: Arc<dyn Clock>,
}

/// Build the fixture router
///
/// Every request goes through [`dispatch`] so that the method check applies
/// to unknown paths as well.
pub fn router(clock: Arc<dyn Clock>) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(AppState { clock })
}

async fn dispatch(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET {
        tracing::debug!(%method, path = uri.path(), "Rejecting non-GET request");
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let params = Query::<Vec<(String, String)>>::try_from_uri(&uri)
        .map(|Query(pairs)| QueryParams::new(pairs))
        .unwrap_or_default();
    let route = Route::resolve(uri.path());
    let default_date = state.clock.default_date();

    let (status, body) = payloads::respond(&route, &params, &default_date);
    tracing::debug!(
        path = uri.path(),
        route = ?route,
        status = status.as_u16(),
        "Served fixture"
    );

    (status, Json(body)).into_response()
}

/// A running fixture server
///
/// Call [`FixtureServer::stop`] to shut down and wait for the listening
/// socket to be released. Dropping a running server aborts its task instead.
pub struct FixtureServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<std::io::Result<()>>>,
}

impl FixtureServer {
    /// Bind `addr` and start serving in a background task
    ///
    /// Returns once the socket is listening. Port `0` binds a free port; use
    /// [`FixtureServer::addr`] to find out which.
    pub async fn start(addr: SocketAddr, clock: Arc<dyn Clock>) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|error| Error::ServerBind { addr, error })?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(clock);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    // A dropped sender also means shut down
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tracing::info!("Fixture server listening at http://{}", addr);

        Ok(Self {
            addr,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Address the server is bound to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL for requests against this server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting connections and wait for the serving task to finish
    pub async fn stop(mut self) -> Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        let result = match self.handle.take() {
            Some(handle) => match handle.await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(Error::ServerStopped(e.to_string())),
                Err(e) => Err(Error::ServerStopped(e.to_string())),
            },
            None => Ok(()),
        };

        tracing::info!("Fixture server stopped");
        result
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
