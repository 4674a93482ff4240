use gs_sdk::Hub;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::router::build_router;

/// GifStream HTTP server bound to one [`Hub`].
pub struct GifStreamServer {
    config: ServerConfig,
    hub: Hub,
}

impl GifStreamServer {
    pub fn new(config: ServerConfig, hub: Hub) -> Self {
        Self { config, hub }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.hub.clone(), &self.config)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "GifStream server listening");
        axum::serve(listener, app).await?;
        Ok(())
    }
}
