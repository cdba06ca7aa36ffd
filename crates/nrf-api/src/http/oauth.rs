//! OAuth2 client-credentials token endpoint (`POST /oauth2/token`).

use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use nrf_api_models::{AccessTokenReq, AccessTokenRsp};

use crate::app::state::ApiState;
use crate::http::errors::ApiError;

pub(crate) async fn token(
    State(state): State<Arc<ApiState>>,
    Form(request): Form<AccessTokenReq>,
) -> Result<Json<AccessTokenRsp>, ApiError> {
    let response = state.registry.tokens.issue(&request).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrf_api_models::{NfProfile, NfStatus};
    use nrf_core::{LocationAuthority, NotifierConfig, NullMetricsSink, Registry};
    use nrf_telemetry::Metrics;
    use std::time::Duration;
    use uuid::Uuid;

    async fn state_with_registered_instance() -> (Arc<ApiState>, Uuid) {
        let registry = Arc::new(Registry::in_memory(
            LocationAuthority {
                scheme: "https".into(),
                register_ip: "127.0.0.1".into(),
                port: 29510,
            },
            Vec::new(),
            true,
            Duration::from_secs(5),
            Some(b"test-secret"),
            "nrf-test",
            NotifierConfig::default(),
            Arc::new(NullMetricsSink),
        ));
        let id = Uuid::new_v4();
        registry
            .manager
            .register(NfProfile {
                nf_instance_id: id,
                nf_type: "SMF".into(),
                nf_status: NfStatus::Registered,
                nf_services: None,
                plmn_list: Some(vec![nrf_api_models::PlmnId { mcc: "001".into(), mnc: "01".into() }]),
                s_nssais: None,
                allowed_nssais: None,
                info: None,
                heart_beat_timer: 30,
                expire_at: None,
                created_at: None,
            })
            .await
            .expect("register");
        (
            Arc::new(ApiState::new(
                registry,
                Metrics::new().expect("metrics"),
                Arc::new(serde_json::json!({})),
            )),
            id,
        )
    }

    #[tokio::test]
    async fn issues_a_token_for_a_registered_instance() {
        let (state, id) = state_with_registered_instance().await;
        let Json(response) = token(
            State(state),
            Form(AccessTokenReq { grant_type: "client_credentials".into(), nf_instance_id: id, scope: None }),
        )
        .await
        .expect("token");
        assert_eq!(response.token_type, "Bearer");
    }

    #[tokio::test]
    async fn rejects_unregistered_instance() {
        let (state, _) = state_with_registered_instance().await;
        let err = token(
            State(state),
            Form(AccessTokenReq { grant_type: "client_credentials".into(), nf_instance_id: Uuid::new_v4(), scope: None }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }
}
