//! REST API for the IPAM service
//!
//! Provides HTTP endpoints for managing VLANs, hosts, and address lookups.
//!
//! # Endpoints
//!
//! ## VLANs
//! - `GET /vlan/` - List all VLANs
//! - `POST /vlan/` - Create a new VLAN
//! - `GET /vlan/{number|name}/` - Get VLAN details
//! - `DELETE /vlan/{number|name}/` - Delete a VLAN and its addresses
//!
//! ## Hosts
//! - `GET /host/` - List all hosts
//! - `POST /host/` - Create a host, allocating an address per VLAN
//! - `GET /host/{name}/` - Get host details
//! - `DELETE /host/{name}/` - Delete a host and its addresses
//!
//! ## Queries
//! - `GET /query/?ip=A.B.C.D` - Resolve an allocated address to its label
//! - `GET /query/?hostname=frag` - Search hosts by name fragment
//!
//! ## Discovery & Health
//! - `GET /` - Endpoint discovery
//! - `GET /version/` - Crate version
//! - `GET /stats/` - Store statistics
//! - `GET /health` - Health check

pub mod dto;
pub mod handlers;
pub mod router;
pub mod state;

pub use dto::*;
pub use router::{create_router, ApiServerConfig, ENDPOINTS};
pub use state::AppState;

use std::sync::Arc;

/// Start the API server
pub async fn start_server(
    state: Arc<AppState>,
    config: ApiServerConfig,
) -> Result<(), std::io::Error> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr()).await?;

    tracing::info!("Starting API server on {}", config.bind_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
