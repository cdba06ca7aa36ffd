//! Sample domain values shared across integration-style tests in the
//! workspace, plus an environment probe used by tests that only make sense
//! with an external container runtime available.

use chrono::Utc;
use nrf_api_models::{NfProfile, NfStatus, NrfSubscriptionData, PlmnId, SubscrCond};
use std::path::Path;
use std::process::Command;
use uuid::Uuid;

/// Returns `true` if a Docker daemon is reachable for integration tests.
#[must_use]
pub fn docker_available() -> bool {
    docker_available_with_host(std::env::var("DOCKER_HOST").ok())
}

fn docker_available_with_host(host: Option<String>) -> bool {
    if let Some(host) = host {
        if let Some(path) = host.strip_prefix("unix://") {
            return Path::new(path).exists();
        }
        return true;
    }

    Path::new("/var/run/docker.sock").exists()
        || Command::new("docker")
            .args(["info"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
}

/// A minimal, valid `AMF` profile: a `plmnList`/`guami` carrying registrant,
/// the profile shape most discovery/subscription tests filter against.
#[must_use]
pub fn amf_profile() -> NfProfile {
    NfProfile {
        nf_instance_id: Uuid::new_v4(),
        nf_type: "AMF".to_string(),
        nf_status: NfStatus::Registered,
        nf_services: None,
        plmn_list: Some(vec![PlmnId {
            mcc: "001".to_string(),
            mnc: "01".to_string(),
        }]),
        s_nssais: None,
        allowed_nssais: None,
        info: None,
        heart_beat_timer: 30,
        expire_at: None,
        created_at: Some(Utc::now()),
    }
}

/// A minimal, valid `SMF` profile, the usual counterpart fixture when a
/// test needs two distinct `nfType`s registered at once.
#[must_use]
pub fn smf_profile() -> NfProfile {
    NfProfile {
        nf_instance_id: Uuid::new_v4(),
        nf_type: "SMF".to_string(),
        nf_status: NfStatus::Registered,
        nf_services: None,
        plmn_list: Some(vec![PlmnId {
            mcc: "001".to_string(),
            mnc: "01".to_string(),
        }]),
        s_nssais: None,
        allowed_nssais: None,
        info: None,
        heart_beat_timer: 30,
        expire_at: None,
        created_at: Some(Utc::now()),
    }
}

/// A subscription request targeting every `AMF` status change, the common
/// case exercised by notifier/fan-out tests.
#[must_use]
pub fn amf_status_subscription(notification_uri: impl Into<String>) -> NrfSubscriptionData {
    NrfSubscriptionData {
        subscription_id: None,
        nf_status_notification_uri: notification_uri.into(),
        req_nf_type: None,
        subscr_cond: SubscrCond {
            nf_type: Some("AMF".to_string()),
            nf_instance_id: None,
            service_name: None,
        },
        validity_time: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amf_profile_is_registered_with_a_plmn() {
        let profile = amf_profile();
        assert_eq!(profile.nf_type, "AMF");
        assert_eq!(profile.nf_status, NfStatus::Registered);
        assert!(profile.plmn_list.is_some());
    }

    #[test]
    fn amf_and_smf_fixtures_have_distinct_ids() {
        assert_ne!(amf_profile().nf_instance_id, smf_profile().nf_instance_id);
    }

    #[test]
    fn subscription_fixture_carries_the_notification_uri() {
        let subscription = amf_status_subscription("https://amf.example/callback");
        assert_eq!(
            subscription.nf_status_notification_uri,
            "https://amf.example/callback"
        );
        assert_eq!(subscription.subscr_cond.nf_type.as_deref(), Some("AMF"));
    }

    #[test]
    fn docker_available_respects_unix_socket_env() {
        assert!(!docker_available_with_host(Some(
            "unix:///definitely/missing.sock".into()
        )));
    }

    #[test]
    fn docker_available_accepts_tcp_env() {
        assert!(docker_available_with_host(Some(
            "tcp://127.0.0.1:2375".into()
        )));
    }
}
