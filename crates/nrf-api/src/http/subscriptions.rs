//! Subscription create/update/remove handlers (`/nnrf-nfm/v1/subscriptions[/...]`).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use nrf_api_models::{NrfSubscriptionData, SubscrCond};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::state::ApiState;
use crate::http::errors::ApiError;

pub(crate) async fn create(
    State(state): State<Arc<ApiState>>,
    Json(subscription): Json<NrfSubscriptionData>,
) -> Result<Response, ApiError> {
    let created = state.registry.subscriptions.create(subscription).await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// JSON Merge Patch body for a subscription update. Every field is optional;
/// only the ones present are applied, mirroring the profile patch semantics.
#[derive(Debug, Deserialize, Default)]
pub(crate) struct SubscriptionPatch {
    #[serde(rename = "nfStatusNotificationUri")]
    notification_uri: Option<String>,
    #[serde(rename = "subscrCond")]
    subscr_cond: Option<SubscrCond>,
    #[serde(rename = "validityTime", default, deserialize_with = "deserialize_some")]
    validity_time: Option<Option<DateTime<Utc>>>,
}

fn deserialize_some<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<DateTime<Utc>>::deserialize(deserializer).map(Some)
}

pub(crate) async fn update(
    State(state): State<Arc<ApiState>>,
    Path(subscription_id): Path<Uuid>,
    Json(patch): Json<SubscriptionPatch>,
) -> Result<Response, ApiError> {
    if patch.notification_uri.is_none() && patch.subscr_cond.is_none() && patch.validity_time.is_none() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    let updated = state
        .registry
        .subscriptions
        .update(subscription_id, patch.notification_uri, patch.subscr_cond, patch.validity_time)
        .await?;
    Ok((StatusCode::OK, Json(updated)).into_response())
}

pub(crate) async fn remove(
    State(state): State<Arc<ApiState>>,
    Path(subscription_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.registry.subscriptions.remove(subscription_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrf_core::{LocationAuthority, NotifierConfig, NullMetricsSink, Registry};
    use nrf_telemetry::Metrics;
    use std::time::Duration;

    fn state() -> Arc<ApiState> {
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
        Arc::new(ApiState::new(
            registry,
            Metrics::new().expect("metrics"),
            Arc::new(serde_json::json!({})),
        ))
    }

    fn sample() -> NrfSubscriptionData {
        NrfSubscriptionData {
            subscription_id: None,
            nf_status_notification_uri: "http://subscriber.example/notify".into(),
            req_nf_type: Some("SMF".into()),
            subscr_cond: SubscrCond { nf_type: Some("AMF".into()), nf_instance_id: None, service_name: None },
            validity_time: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_an_id() {
        let response = create(State(state()), Json(sample())).await.expect("create");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn remove_unknown_subscription_is_not_found() {
        let err = remove(State(state()), Path(Uuid::new_v4())).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_with_no_fields_is_no_content() {
        let state = state();
        let response = create(State(state.clone()), Json(sample())).await.expect("create");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = update(
            State(state),
            Path(Uuid::new_v4()),
            Json(SubscriptionPatch::default()),
        )
        .await
        .expect("update");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
