//! Connectivity reporting endpoints
//!
//! The client shell forwards its online/offline events here.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ConnectivityUpdate {
    pub online: bool,
}

#[derive(Debug, Serialize)]
pub struct ConnectivityStatus {
    pub online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed: Option<bool>,
}

/// Current connectivity state
pub async fn get_connectivity(State(state): State<AppState>) -> Json<ConnectivityStatus> {
    Json(ConnectivityStatus {
        online: state.advisory.connectivity().is_online(),
        changed: None,
    })
}

/// Report an online/offline edge
pub async fn set_connectivity(
    State(state): State<AppState>,
    Json(update): Json<ConnectivityUpdate>,
) -> Json<ConnectivityStatus> {
    let transition = state.advisory.connectivity().set_online(update.online);
    Json(ConnectivityStatus {
        online: update.online,
        changed: Some(transition.is_some()),
    })
}
