use std::future::Future;
use std::net::SocketAddr;

use log::info;

use super::routes::routes;
use super::types::AppState;
use crate::error_handling::types::WebError;

/// Web server for the blog pages and assets
pub struct WebServer {
    state: AppState,
}

impl WebServer {
    /// Create a new WebServer instance
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Serve on `addr` until `shutdown` resolves, then drain open connections.
    pub async fn start<S>(&self, addr: SocketAddr, shutdown: S) -> Result<(), WebError>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let (bound, server) = warp::serve(routes(self.state.clone()))
            .try_bind_with_graceful_shutdown(addr, shutdown)
            .map_err(|e| WebError::Bind(format!("{}: {}", addr, e)))?;
        info!("Listening on http://{}", bound);
        server.await;
        info!("Web server stopped");
        Ok(())
    }
}
