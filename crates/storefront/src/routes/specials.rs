//! Specials route handlers.
//!
//! These endpoints answer with bare JSON rather than the `success`
//! envelope: the landing page widget reads the list directly.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use terp_haus_core::Special;
use tracing::{instrument, warn};

use crate::error::Result;
use crate::services::specials::{RotationSlot, SpecialsDocument};
use crate::state::AppState;

/// Publish acknowledgement.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct RotationQuery {
    pub index: Option<usize>,
}

/// Current specials.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Special>> {
    Json(state.specials().list())
}

/// Replace the specials list.
#[instrument(skip_all)]
pub async fn publish(
    State(state): State<AppState>,
    body: std::result::Result<Json<SpecialsDocument>, JsonRejection>,
) -> (StatusCode, Json<Ack>) {
    match body {
        Ok(Json(document)) => {
            state.specials().replace(document.items);
            (StatusCode::OK, Json(Ack { ok: true }))
        }
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected specials publish");
            (StatusCode::BAD_REQUEST, Json(Ack { ok: false }))
        }
    }
}

/// The special to display at rotation step `index`.
pub async fn rotation(
    State(state): State<AppState>,
    query: std::result::Result<Query<RotationQuery>, QueryRejection>,
) -> Result<Json<RotationSlot>> {
    let Query(query) = query?;
    Ok(Json(state.specials().rotation(query.index.unwrap_or(0))))
}
