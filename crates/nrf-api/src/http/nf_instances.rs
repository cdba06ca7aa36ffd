//! NF instance registration/update/deregistration/fetch/list handlers
//! (`/nnrf-nfm/v1/nf-instances[/...]`).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header::LOCATION};
use axum::response::{IntoResponse, Response};
use axum::{Json, extract::rejection::JsonRejection};
use nrf_api_models::{NfProfile, UriList};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::state::ApiState;
use crate::http::errors::ApiError;

pub(crate) async fn register(
    State(state): State<Arc<ApiState>>,
    Path(nf_instance_id): Path<Uuid>,
    body: Result<Json<NfProfile>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(mut profile) = body.map_err(|err| ApiError::bad_request(err.to_string()))?;
    profile.nf_instance_id = nf_instance_id;

    let outcome = state.registry.manager.register(profile).await?;
    let status = if outcome.existed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        [(LOCATION, outcome.location)],
        Json(outcome.profile),
    )
        .into_response())
}

pub(crate) async fn update(
    State(state): State<Arc<ApiState>>,
    Path(nf_instance_id): Path<Uuid>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Response, ApiError> {
    match state.registry.manager.update(nf_instance_id, patch).await? {
        Some(profile) => Ok((StatusCode::OK, Json(profile)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub(crate) async fn deregister(
    State(state): State<Arc<ApiState>>,
    Path(nf_instance_id): Path<Uuid>,
) -> StatusCode {
    state.registry.manager.deregister(nf_instance_id).await;
    StatusCode::NO_CONTENT
}

pub(crate) async fn get_one(
    State(state): State<Arc<ApiState>>,
    Path(nf_instance_id): Path<Uuid>,
) -> Result<Json<NfProfile>, ApiError> {
    state
        .registry
        .manager
        .get_one(nf_instance_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("nf_instance not found: {nf_instance_id}")))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListParams {
    #[serde(rename = "nf-type")]
    nf_type: String,
    limit: Option<u32>,
}

pub(crate) async fn list(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<UriList>, ApiError> {
    let list = state
        .registry
        .manager
        .get_many(&params.nf_type, params.limit)
        .await?;
    Ok(Json(list))
}
