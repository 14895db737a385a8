//! REST API handlers
//!
//! Implements handlers for the VLAN, host, and query endpoints. Every
//! mutating handler takes the manager write guard for the duration of the
//! operation; read handlers share the read guard.

use super::dto::*;
use super::state::AppState;
use crate::addr::parse_ipv4;
use crate::models::{Host, Vlan};
use crate::service::{IpamManager, VlanSelector};
use crate::Error;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// Convert internal error to API response
fn error_response(err: Error) -> (StatusCode, Json<ApiError>) {
    let (status, error) = match &err {
        Error::VlanNotFound(_) | Error::HostNotFound(_) | Error::AddressNotFound(_) => {
            (StatusCode::NOT_FOUND, ApiError::not_found(err.to_string()))
        }
        Error::VlanNameInUse(_) | Error::VlanNumberInUse(_) | Error::HostNameInUse(_) => {
            (StatusCode::CONFLICT, ApiError::conflict(err.to_string()))
        }
        Error::PoolExhausted { .. } => (
            StatusCode::PRECONDITION_FAILED,
            ApiError::precondition_failed(err.to_string()),
        ),
        Error::UnknownVlan(_)
        | Error::DuplicateVlanRequested(_)
        | Error::InvalidAddress(_)
        | Error::InvalidCidr(_)
        | Error::MissingQuery(_) => {
            (StatusCode::BAD_REQUEST, ApiError::bad_request(err.to_string()))
        }
    };

    (status, Json(error))
}

// ============================================================================
// Rendering
// ============================================================================

fn vlan_simple(vlan: &Vlan) -> VlanSimple {
    VlanSimple {
        name: vlan.name.clone(),
        number: vlan.number,
        range: vlan.cidr_string(),
        url: format!("/vlan/{}/", vlan.name),
    }
}

fn vlan_full(manager: &IpamManager, vlan: &Vlan) -> VlanFull {
    VlanFull {
        name: vlan.name.clone(),
        number: vlan.number,
        range: vlan.cidr_string(),
        hosts: manager.vlan_hosts(vlan.id),
    }
}

fn host_simple(manager: &IpamManager, host: &Host) -> HostSimple {
    HostSimple {
        name: host.name.clone(),
        vlans: manager.host_vlans(host.id),
        url: format!("/host/{}/", host.name),
    }
}

fn host_full(manager: &IpamManager, host: &Host) -> HostFull {
    HostFull {
        name: host.name.clone(),
        ips: manager
            .host_addresses(host.id)
            .into_iter()
            .map(|(number, value)| (number.to_string(), crate::addr::format_ipv4(value)))
            .collect(),
    }
}

// ============================================================================
// VLAN Handlers
// ============================================================================

/// List all VLANs
pub async fn list_vlans(State(state): State<Arc<AppState>>) -> Json<Vec<VlanSimple>> {
    let manager = state.manager.read().await;
    Json(manager.list_vlans().iter().map(vlan_simple).collect())
}

/// Get a single VLAN by number or name
pub async fn vlan_info(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
) -> Result<Json<VlanFull>, (StatusCode, Json<ApiError>)> {
    if ident.is_empty() {
        return Err(error_response(Error::MissingQuery(
            "vlan number or name".to_string(),
        )));
    }

    let manager = state.manager.read().await;
    let selector = VlanSelector::parse(&ident);
    let vlan = manager
        .find_vlan(&selector)
        .ok_or_else(|| error_response(Error::VlanNotFound(selector.to_string())))?;

    Ok(Json(vlan_full(&manager, &vlan)))
}

/// Create a new VLAN
pub async fn create_vlan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateVlanRequest>,
) -> Result<(StatusCode, Json<VlanSimple>), (StatusCode, Json<ApiError>)> {
    let manager = state.manager.write().await;
    let vlan = manager
        .create_vlan(&req.name, req.number, &req.mask)
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(vlan_simple(&vlan))))
}

/// Delete a VLAN and its addresses
pub async fn delete_vlan(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
) -> Result<(StatusCode, Json<EmptyResponse>), (StatusCode, Json<ApiError>)> {
    let manager = state.manager.write().await;
    manager
        .delete_vlan(&VlanSelector::parse(&ident))
        .map_err(error_response)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(EmptyResponse::ok("Vlan deleted")),
    ))
}

// ============================================================================
// Host Handlers
// ============================================================================

/// List all hosts
pub async fn list_hosts(State(state): State<Arc<AppState>>) -> Json<Vec<HostSimple>> {
    let manager = state.manager.read().await;
    Json(
        manager
            .list_hosts()
            .iter()
            .map(|host| host_simple(&manager, host))
            .collect(),
    )
}

/// Get a single host by name
pub async fn host_info(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<HostFull>, (StatusCode, Json<ApiError>)> {
    if name.is_empty() {
        return Err(error_response(Error::MissingQuery("host name".to_string())));
    }

    let manager = state.manager.read().await;
    let host = manager
        .get_host(&name)
        .ok_or_else(|| error_response(Error::HostNotFound(name.clone())))?;

    Ok(Json(host_full(&manager, &host)))
}

/// Create a host and allocate an address in each requested VLAN
pub async fn create_host(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateHostRequest>,
) -> Result<(StatusCode, Json<HostSimple>), (StatusCode, Json<ApiError>)> {
    let manager = state.manager.write().await;
    let host = manager
        .create_host(&req.name, &req.vlans)
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(host_simple(&manager, &host))))
}

/// Delete a host and its addresses
pub async fn delete_host(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<EmptyResponse>), (StatusCode, Json<ApiError>)> {
    let manager = state.manager.write().await;
    manager.delete_host(&name).map_err(error_response)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(EmptyResponse::ok("Host deleted")),
    ))
}

// ============================================================================
// Query Handlers
// ============================================================================

/// Resolve an address to its label, or search hosts by name fragment
///
/// `?ip=A.B.C.D` resolves an allocated address to `"{host}_{vlan}_ip"`.
/// `?hostname=frag` matches host names by substring: one match renders the
/// full record, several render the simple listing.
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveQuery>,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    let manager = state.manager.read().await;

    if let Some(ip) = query.ip.as_deref() {
        let value = parse_ipv4(ip).map_err(error_response)?;
        let label = manager.resolve_address(value).map_err(error_response)?;
        return Ok(Json(label).into_response());
    }

    if let Some(fragment) = query.hostname.as_deref() {
        let matches = manager.search_hosts(fragment);
        return match matches.as_slice() {
            [] => Err(error_response(Error::HostNotFound(fragment.to_string()))),
            [host] => Ok(Json(host_full(&manager, host)).into_response()),
            _ => Ok(Json(
                matches
                    .iter()
                    .map(|host| host_simple(&manager, host))
                    .collect::<Vec<_>>(),
            )
            .into_response()),
        };
    }

    Err(error_response(Error::MissingQuery(
        "ip or hostname".to_string(),
    )))
}

// ============================================================================
// Stats
// ============================================================================

/// Get store statistics
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let manager = state.manager.read().await;
    Json(manager.stats())
}
