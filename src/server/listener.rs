use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::error;

use crate::error::PassforgeError;

/// Bind the HTTP listener. Failures surface as `PassforgeError::Io`.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, PassforgeError> {
    TcpListener::bind(addr).await.map_err(|e| {
        error!(%addr, error = %e, "failed to bind HTTP listener");
        PassforgeError::Io(e)
    })
}
