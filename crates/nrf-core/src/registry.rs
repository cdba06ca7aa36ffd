//! Registry manager (component D): register / update / deregister / fetch,
//! location URI assignment, default-PLMN injection and heartbeat expiry.
//!
//! This is the only component permitted to write [`NfProfile`] rows — the
//! discovery cache and subscription notifier only ever read from it or react
//! to the events it publishes.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use nrf_api_models::{NfProfile, NfStatus, PlmnId, UriList, UriListItem, UriListLink};
use nrf_events::{Event, EventBus};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::discovery::DiscoveryCache;
use crate::error::{CoreError, CoreResult};
use crate::metrics_sink::{MetricsSink, Outcome, SharedMetricsSink};
use crate::store::SharedProfileStore;

/// SBI scheme + registration coordinates used to assemble a profile's
/// `Location` header, per spec §4.4: `{scheme}://{registerIP}:{port}/nnrf-nfm/v1/nf-instances/{id}`.
#[derive(Debug, Clone)]
pub struct LocationAuthority {
    /// URI scheme the NRF itself is reachable on (`"http"` or `"https"`).
    pub scheme: String,
    /// Advertised registration IP/hostname.
    pub register_ip: String,
    /// Advertised port.
    pub port: u16,
}

impl LocationAuthority {
    /// Build the `Location` URI for a newly (re-)registered profile.
    #[must_use]
    pub fn location_for(&self, nf_instance_id: Uuid) -> String {
        format!(
            "{}://{}:{}/nnrf-nfm/v1/nf-instances/{}",
            self.scheme, self.register_ip, self.port, nf_instance_id
        )
    }
}

/// Outcome of a register/upsert call.
#[derive(Debug, Clone)]
pub struct RegisterOutcome {
    /// The profile as stored, after default-PLMN injection and expiry computation.
    pub profile: NfProfile,
    /// `Location` header value for the `201 Created` response.
    pub location: String,
    /// Whether this instance id already existed (re-register vs first register).
    pub existed: bool,
}

/// Registers, updates, deregisters and fetches [`NfProfile`] documents,
/// enforcing the invariants in spec §3 and §4.4.
pub struct RegistryManager {
    store: SharedProfileStore,
    cache: Arc<DiscoveryCache>,
    events: EventBus,
    metrics: SharedMetricsSink,
    authority: LocationAuthority,
    /// Default PLMN set injected when a register omits `plmnList`. Reloaded
    /// at runtime by the external PLMN poller (spec §6); `invalidate_all` on
    /// the cache is the caller's responsibility when this changes.
    default_plmn_list: RwLock<Vec<PlmnId>>,
    /// When `false`, register performs the deprecated "one profile per NF
    /// type" `deleteMany` before upsert instead of setting `expire_at`.
    profile_expiry_enabled: bool,
}

impl RegistryManager {
    /// Construct a manager over the given collaborators.
    #[must_use]
    pub fn new(
        store: SharedProfileStore,
        cache: Arc<DiscoveryCache>,
        events: EventBus,
        metrics: SharedMetricsSink,
        authority: LocationAuthority,
        default_plmn_list: Vec<PlmnId>,
        profile_expiry_enabled: bool,
    ) -> Self {
        Self {
            store,
            cache,
            events,
            metrics,
            authority,
            default_plmn_list: RwLock::new(default_plmn_list),
            profile_expiry_enabled,
        }
    }

    /// Replace the default PLMN set used for future registrations. Does not
    /// retroactively touch stored profiles; the caller should also call
    /// [`DiscoveryCache::invalidate_all`] since matching against `plmnList`
    /// may now behave differently for future lookups against new profiles.
    pub async fn set_default_plmn_list(&self, plmn_list: Vec<PlmnId>) {
        *self.default_plmn_list.write().await = plmn_list;
    }

    /// Register or re-register `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when required fields are missing or
    /// malformed, including when `plmnList` is empty both on the incoming
    /// profile and the registry default.
    pub async fn register(&self, mut profile: NfProfile) -> CoreResult<RegisterOutcome> {
        let result = self.register_inner(&mut profile).await;
        self.metrics.record_registration(
            if result.as_ref().is_ok_and(|outcome| outcome.existed) {
                "update"
            } else {
                "register"
            },
            &profile.nf_type,
            Outcome::from_result(&result),
        );
        result
    }

    async fn register_inner(&self, profile: &mut NfProfile) -> CoreResult<RegisterOutcome> {
        validate_identity(profile)?;
        self.apply_default_plmn(profile).await?;
        validate_services(profile)?;

        let now = Utc::now();
        if self.profile_expiry_enabled {
            profile.expire_at = Some(now + ChronoDuration::seconds(3 * i64::from(profile.heart_beat_timer)));
        } else {
            profile.expire_at = None;
        }

        if !self.profile_expiry_enabled {
            self.store.delete_many_by_type(&profile.nf_type).await;
        }

        let existed_before = self.store.get_one(profile.nf_instance_id).await.is_some();
        if !existed_before {
            profile.created_at = Some(now);
        }
        let existed = self.store.put(profile.clone()).await;
        self.cache.invalidate(&profile.nf_type).await;

        let location = self.authority.location_for(profile.nf_instance_id);
        let event = if existed {
            Event::NfProfileUpdated {
                nf_instance_id: profile.nf_instance_id,
                nf_type: profile.nf_type.clone(),
                nf_status: status_str(profile.nf_status).to_string(),
            }
        } else {
            Event::NfRegistered {
                nf_instance_id: profile.nf_instance_id,
                nf_type: profile.nf_type.clone(),
                nf_status: status_str(profile.nf_status).to_string(),
            }
        };
        let _ = self.events.publish(event);

        Ok(RegisterOutcome {
            profile: profile.clone(),
            location,
            existed,
        })
    }

    async fn apply_default_plmn(&self, profile: &mut NfProfile) -> CoreResult<()> {
        let needs_default = profile.plmn_list.as_ref().is_none_or(Vec::is_empty);
        if !needs_default {
            return Ok(());
        }
        let default = self.default_plmn_list.read().await.clone();
        if default.is_empty() {
            return Err(CoreError::Validation {
                detail: "plmnList is empty and no registry default is configured".to_string(),
            });
        }
        profile.plmn_list = Some(default);
        Ok(())
    }

    /// Apply a JSON Merge Patch (RFC 7396) to an existing profile, returning
    /// the patched profile or `None` when no-op (the patch was empty).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no profile with `id` exists, and
    /// [`CoreError::Validation`] if the patched document fails to deserialize
    /// back into a valid [`NfProfile`] or trips the same invariants as register.
    pub async fn update(&self, id: Uuid, patch: serde_json::Value) -> CoreResult<Option<NfProfile>> {
        let existing = self.store.get_one(id).await.ok_or(CoreError::NotFound {
            resource: "nf_instance",
            id: id.to_string(),
        })?;

        if patch.as_object().is_some_and(serde_json::Map::is_empty) {
            self.metrics
                .record_registration("update", &existing.nf_type, Outcome::Success);
            return Ok(None);
        }

        let mut document = serde_json::to_value(&existing).map_err(|err| CoreError::SystemFailure {
            source: Box::new(err),
        })?;
        merge_patch(&mut document, &patch);
        let mut patched: NfProfile = serde_json::from_value(document).map_err(|err| {
            self.metrics.record_registration("update", &existing.nf_type, Outcome::Failure);
            CoreError::Validation {
                detail: format!("patch produced an invalid profile: {err}"),
            }
        })?;
        patched.nf_instance_id = id;

        let outcome = self.register_inner(&mut patched).await;
        self.metrics
            .record_registration("update", &existing.nf_type, Outcome::from_result(&outcome));
        outcome.map(|result| Some(result.profile))
    }

    /// Deregister `id`. Returns `true` if a profile was removed.
    pub async fn deregister(&self, id: Uuid) -> bool {
        let Some(profile) = self.store.get_one(id).await else {
            self.metrics.record_registration("deregister", "unknown", Outcome::Success);
            return false;
        };
        let removed = self.store.delete(id).await;
        if removed {
            self.cache.invalidate(&profile.nf_type).await;
            let _ = self.events.publish(Event::NfDeregistered {
                nf_instance_id: id,
                nf_type: profile.nf_type.clone(),
            });
        }
        self.metrics.record_registration(
            "deregister",
            &profile.nf_type,
            if removed { Outcome::Success } else { Outcome::Failure },
        );
        removed
    }

    /// Sweep every profile whose `expire_at` has passed, invalidating its
    /// cache bucket and publishing a `DEREGISTERED` event for each. Intended
    /// to be called on a periodic interval by the owning binary.
    pub async fn sweep_expired(&self) -> Vec<NfProfile> {
        let expired = self.store.sweep_expired(Utc::now()).await;
        for profile in &expired {
            self.cache.invalidate(&profile.nf_type).await;
            let _ = self.events.publish(Event::NfHeartbeatExpired {
                nf_instance_id: profile.nf_instance_id,
                nf_type: profile.nf_type.clone(),
            });
            let _ = self.events.publish(Event::NfDeregistered {
                nf_instance_id: profile.nf_instance_id,
                nf_type: profile.nf_type.clone(),
            });
        }
        expired
    }

    /// Fetch one profile by id.
    pub async fn get_one(&self, id: Uuid) -> Option<NfProfile> {
        self.store.get_one(id).await
    }

    /// Fetch a truncated, deterministically-ordered [`UriList`] of every
    /// profile of `nf_type`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if `limit` is not positive.
    pub async fn get_many(&self, nf_type: &str, limit: Option<u32>) -> CoreResult<UriList> {
        if let Some(limit) = limit
            && limit == 0
        {
            return Err(CoreError::Validation {
                detail: "limit must be a positive integer".to_string(),
            });
        }
        let mut profiles = self.store.get_many_by_type(nf_type).await;
        profiles.sort_by_key(|profile| profile.nf_instance_id);
        let limit = limit.map_or(profiles.len(), |limit| limit as usize);
        let link = profiles
            .into_iter()
            .take(limit)
            .map(|profile| UriListLink {
                item: UriListItem {
                    href: self.authority.location_for(profile.nf_instance_id),
                },
            })
            .collect();
        Ok(UriList { link })
    }
}

fn status_str(status: NfStatus) -> &'static str {
    match status {
        NfStatus::Registered => "REGISTERED",
        NfStatus::Suspended => "SUSPENDED",
        NfStatus::Undiscoverable => "UNDISCOVERABLE",
    }
}

fn validate_identity(profile: &NfProfile) -> CoreResult<()> {
    if profile.nf_type.trim().is_empty() {
        return Err(CoreError::Validation {
            detail: "nfType is required".to_string(),
        });
    }
    if profile.nf_instance_id.is_nil() {
        return Err(CoreError::Validation {
            detail: "nfInstanceId is required".to_string(),
        });
    }
    if profile.heart_beat_timer < 1 {
        return Err(CoreError::Validation {
            detail: "heartBeatTimer must be at least 1 second".to_string(),
        });
    }
    Ok(())
}

fn validate_services(profile: &NfProfile) -> CoreResult<()> {
    for service in profile.nf_services.as_deref().unwrap_or_default() {
        if service.scheme != "http" && service.scheme != "https" {
            return Err(CoreError::Validation {
                detail: format!("nfService '{}' has unsupported scheme '{}'", service.service_instance_id, service.scheme),
            });
        }
        if service.ip_end_points.is_empty() {
            return Err(CoreError::Validation {
                detail: format!("nfService '{}' has no ipEndPoints", service.service_instance_id),
            });
        }
    }
    Ok(())
}

/// Apply an RFC 7396 JSON Merge Patch: object fields merge recursively,
/// `null` deletes a key, scalars/arrays in the patch replace wholesale.
fn merge_patch(target: &mut serde_json::Value, patch: &serde_json::Value) {
    if let Some(patch_object) = patch.as_object() {
        if !target.is_object() {
            *target = serde_json::Value::Object(serde_json::Map::new());
        }
        let target_object = target.as_object_mut().expect("just normalized to an object");
        for (key, value) in patch_object {
            if value.is_null() {
                target_object.remove(key);
            } else {
                merge_patch(target_object.entry(key.clone()).or_insert(serde_json::Value::Null), value);
            }
        }
    } else {
        *target = patch.clone();
    }
}

/// Absolute expiry (`now + 3*heartBeatTimer`) used by tests to assert the
/// property described in spec §8 item 4.
#[must_use]
pub fn expected_expiry(heart_beat_timer: u32, now: DateTime<Utc>) -> DateTime<Utc> {
    now + ChronoDuration::seconds(3 * i64::from(heart_beat_timer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics_sink::NullMetricsSink;
    use crate::store::InMemoryProfileStore;
    use nrf_api_models::{IpEndPoint, NfService};
    use std::time::Duration;

    fn authority() -> LocationAuthority {
        LocationAuthority {
            scheme: "https".into(),
            register_ip: "10.0.0.1".into(),
            port: 29510,
        }
    }

    fn manager(default_plmn: Vec<PlmnId>, expiry_enabled: bool) -> RegistryManager {
        let store: SharedProfileStore = Arc::new(InMemoryProfileStore::new());
        let cache = Arc::new(DiscoveryCache::new(store.clone(), Duration::from_secs(5)));
        RegistryManager::new(
            store,
            cache,
            EventBus::new(),
            Arc::new(NullMetricsSink),
            authority(),
            default_plmn,
            expiry_enabled,
        )
    }

    fn profile(nf_type: &str) -> NfProfile {
        NfProfile {
            nf_instance_id: Uuid::new_v4(),
            nf_type: nf_type.into(),
            nf_status: NfStatus::Registered,
            nf_services: Some(vec![NfService {
                service_instance_id: "svc1".into(),
                service_name: "namf-comm".into(),
                scheme: "https".into(),
                api_prefix: None,
                ip_end_points: vec![IpEndPoint {
                    ipv4_address: Some("10.0.0.2".into()),
                    ipv6_address: None,
                    port: Some(8080),
                    transport: Some("TCP".into()),
                }],
                versions: None,
            }]),
            plmn_list: None,
            s_nssais: None,
            allowed_nssais: None,
            info: None,
            heart_beat_timer: 30,
            expire_at: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn register_without_plmn_inherits_default() {
        let manager = manager(vec![PlmnId { mcc: "001".into(), mnc: "01".into() }], true);
        let outcome = manager.register(profile("AMF")).await.expect("register");
        assert_eq!(
            outcome.profile.plmn_list,
            Some(vec![PlmnId { mcc: "001".into(), mnc: "01".into() }])
        );
        assert!(outcome.location.ends_with(&outcome.profile.nf_instance_id.to_string()));
        assert!(!outcome.existed);
    }

    #[tokio::test]
    async fn register_without_plmn_and_no_default_fails() {
        let manager = manager(vec![], true);
        let err = manager.register(profile("AUSF")).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[tokio::test]
    async fn second_register_emits_profile_changed_not_registered() {
        let manager = manager(vec![PlmnId { mcc: "001".into(), mnc: "01".into() }], true);
        let profile = profile("SMF");
        let first = manager.register(profile.clone()).await.expect("first");
        assert!(!first.existed);
        let second = manager.register(profile).await.expect("second");
        assert!(second.existed);
    }

    #[tokio::test]
    async fn expire_at_is_three_times_heartbeat_when_enabled() {
        let manager = manager(vec![PlmnId { mcc: "001".into(), mnc: "01".into() }], true);
        let mut p = profile("PCF");
        p.heart_beat_timer = 10;
        let before = Utc::now();
        let outcome = manager.register(p).await.expect("register");
        let expire_at = outcome.profile.expire_at.expect("expiry set");
        assert!(expire_at > before + ChronoDuration::seconds(29));
        assert!(expire_at <= expected_expiry(10, Utc::now()) + ChronoDuration::seconds(1));
    }

    #[tokio::test]
    async fn legacy_mode_clears_other_profiles_of_same_type() {
        let manager = manager(vec![PlmnId { mcc: "001".into(), mnc: "01".into() }], false);
        let first = manager.register(profile("UDM")).await.expect("first");
        assert!(first.profile.expire_at.is_none());
        manager.register(profile("UDM")).await.expect("second");
        let listing = manager.get_many("UDM", None).await.expect("list");
        assert_eq!(listing.link.len(), 1);
    }

    #[tokio::test]
    async fn deregister_removes_profile() {
        let manager = manager(vec![PlmnId { mcc: "001".into(), mnc: "01".into() }], true);
        let outcome = manager.register(profile("NSSF")).await.expect("register");
        assert!(manager.deregister(outcome.profile.nf_instance_id).await);
        assert!(manager.get_one(outcome.profile.nf_instance_id).await.is_none());
    }

    #[tokio::test]
    async fn update_merge_patches_existing_profile() {
        let manager = manager(vec![PlmnId { mcc: "001".into(), mnc: "01".into() }], true);
        let outcome = manager.register(profile("AMF")).await.expect("register");
        let id = outcome.profile.nf_instance_id;

        let patch = serde_json::json!({ "nfStatus": "SUSPENDED" });
        let patched = manager.update(id, patch).await.expect("update").expect("some");
        assert_eq!(patched.nf_status, NfStatus::Suspended);
    }

    #[tokio::test]
    async fn update_with_empty_patch_is_a_no_op() {
        let manager = manager(vec![PlmnId { mcc: "001".into(), mnc: "01".into() }], true);
        let outcome = manager.register(profile("AMF")).await.expect("register");
        let id = outcome.profile.nf_instance_id;
        let result = manager.update(id, serde_json::json!({})).await.expect("update");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let manager = manager(vec![], true);
        let err = manager.update(Uuid::new_v4(), serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn get_many_rejects_zero_limit() {
        let manager = manager(vec![], true);
        let err = manager.get_many("AMF", Some(0)).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }
}
