//! Discovery endpoint (`GET /nnrf-disc/v1/nf-instances`).

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use nrf_api_models::SearchResult;
use nrf_core::{DiscoveryQuery, Outcome};
use serde::Deserialize;

use crate::app::state::ApiState;
use crate::http::errors::ApiError;

/// Seconds a discovery result may be cached by the requester, per spec §6.
/// The discovery cache's own refresh TTL is an internal staleness bound, not
/// this value — `validityPeriod` is a contract with the caller, not a mirror
/// of our cache.
const DISCOVERY_VALIDITY_PERIOD_SECS: u32 = 60;

#[derive(Debug, Deserialize)]
pub(crate) struct DiscoverParams {
    #[serde(rename = "target-nf-type")]
    target_nf_type: String,
    #[serde(rename = "requester-nf-type")]
    requester_nf_type: Option<String>,
    #[serde(rename = "service-names")]
    service_names: Option<Vec<String>>,
    #[serde(rename = "s-nssais")]
    s_nssais: Option<Vec<String>>,
    dnn: Option<String>,
    supi: Option<String>,
    #[serde(rename = "target-plmn-list")]
    target_plmn_list: Option<Vec<String>>,
    guami: Option<Vec<String>>,
    #[serde(rename = "amf-region-id")]
    amf_region_id: Option<String>,
    #[serde(rename = "amf-set-id")]
    amf_set_id: Option<String>,
}

pub(crate) async fn discover(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<DiscoverParams>,
) -> Result<Json<SearchResult>, ApiError> {
    if params.target_nf_type.trim().is_empty() {
        return Err(ApiError::bad_request("target-nf-type is required"));
    }

    let query = DiscoveryQuery {
        service_names: params.service_names,
        s_nssais: params.s_nssais,
        dnn: params.dnn,
        supi: params.supi,
        target_plmn_list: params.target_plmn_list,
        guami: params.guami,
        amf_region_id: params.amf_region_id,
        amf_set_id: params.amf_set_id,
    };

    let requester_nf_type = params.requester_nf_type.as_deref().unwrap_or("*");
    let result = state.registry.discovery.lookup(&params.target_nf_type, &query).await;
    let outcome = match &result {
        Ok(_) => Outcome::Success,
        Err(_) => Outcome::Failure,
    };
    state
        .telemetry
        .record_discovery(requester_nf_type, &params.target_nf_type, outcome);
    let nf_instances = result?;

    Ok(Json(SearchResult {
        validity_period: DISCOVERY_VALIDITY_PERIOD_SECS,
        nf_instances,
    }))
}
