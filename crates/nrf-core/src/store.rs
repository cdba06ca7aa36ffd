//! Document-oriented persistence for NF profiles and subscriptions.
//!
//! The spec describes a generic KV document store; production deployments
//! plug in whatever backs it (a real document store is explicitly
//! out-of-scope here). What's left is the shape two call sites need: a
//! profile store keyed by `nfInstanceId` with a TTL sweep, and a
//! subscription store keyed by `subscriptionId`. This module defines both as
//! narrow async traits and ships one in-memory implementation of each,
//! sharded to reduce lock contention under concurrent registration traffic.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nrf_api_models::{NfProfile, NrfSubscriptionData, SubscrCond};
use tokio::sync::RwLock;
use uuid::Uuid;

const SHARD_COUNT: usize = 16;

fn shard_of(id: Uuid) -> usize {
    let bytes = id.as_bytes();
    (bytes[0] as usize) % SHARD_COUNT
}

/// Persistence for [`NfProfile`] documents.
///
/// Collection is implicitly `NfProfile`; the `urilist` collection the
/// upstream implementation persists separately is not modeled here —
/// `get_many_by_type` computes the equivalent listing on demand, which
/// removes a derived view that only ever mirrored this store.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a single profile by instance id.
    async fn get_one(&self, id: Uuid) -> Option<NfProfile>;

    /// Fetch every profile of the given NF type, in no particular order.
    async fn get_many_by_type(&self, nf_type: &str) -> Vec<NfProfile>;

    /// Fetch every `REGISTERED` profile of the given NF type.
    async fn get_many_registered_by_type(&self, nf_type: &str) -> Vec<NfProfile>;

    /// Upsert a profile. Returns `true` if a profile with the same id
    /// already existed (update), `false` if this was an insert.
    async fn put(&self, profile: NfProfile) -> bool;

    /// Remove a profile by id. Returns `true` if a profile was removed.
    async fn delete(&self, id: Uuid) -> bool;

    /// Remove every profile of the given type. Used only by the deprecated
    /// "one profile per NF type" legacy mode. Returns the removal count.
    async fn delete_many_by_type(&self, nf_type: &str) -> usize;

    /// Remove and return every profile whose `expire_at` is at or before
    /// `now`. Called periodically by the expiry sweep task.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<NfProfile>;
}

/// Persistence for [`NrfSubscriptionData`] documents.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Fetch a single subscription by id.
    async fn get_one(&self, id: Uuid) -> Option<NrfSubscriptionData>;

    /// Fetch every subscription currently stored.
    async fn get_all(&self) -> Vec<NrfSubscriptionData>;

    /// Insert a subscription, failing if its id is already taken.
    /// Returns `true` on insert, `false` if the id already existed.
    async fn put_if_absent(&self, subscription: NrfSubscriptionData) -> bool;

    /// Apply a partial update; returns the patched document, or `None` if
    /// no subscription with that id exists.
    async fn patch(
        &self,
        id: Uuid,
        notification_uri: Option<String>,
        subscr_cond: Option<SubscrCond>,
        validity_time: Option<Option<DateTime<Utc>>>,
    ) -> Option<NrfSubscriptionData>;

    /// Remove a subscription by id. Returns `true` if one was removed.
    async fn delete(&self, id: Uuid) -> bool;

    /// Remove every subscription whose `subscr_cond.nf_instance_id` matches
    /// the given id. Called when that NF instance deregisters. Returns the
    /// removal count.
    async fn delete_by_nf_instance_id(&self, nf_instance_id: Uuid) -> usize;
}

/// Sharded in-memory [`ProfileStore`].
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    shards: Vec<RwLock<HashMap<Uuid, NfProfile>>>,
}

impl InMemoryProfileStore {
    /// Construct an empty store.
    #[must_use]
    pub fn new() -> Self {
        let shards = (0..SHARD_COUNT).map(|_| RwLock::new(HashMap::new())).collect();
        Self { shards }
    }

    fn shard(&self, id: Uuid) -> &RwLock<HashMap<Uuid, NfProfile>> {
        &self.shards[shard_of(id)]
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_one(&self, id: Uuid) -> Option<NfProfile> {
        self.shard(id).read().await.get(&id).cloned()
    }

    async fn get_many_by_type(&self, nf_type: &str) -> Vec<NfProfile> {
        let mut out = Vec::new();
        for shard in &self.shards {
            out.extend(
                shard
                    .read()
                    .await
                    .values()
                    .filter(|profile| profile.nf_type == nf_type)
                    .cloned(),
            );
        }
        out
    }

    async fn get_many_registered_by_type(&self, nf_type: &str) -> Vec<NfProfile> {
        let mut out = Vec::new();
        for shard in &self.shards {
            out.extend(shard.read().await.values().filter(|profile| {
                profile.nf_type == nf_type && profile.nf_status == nrf_api_models::NfStatus::Registered
            }).cloned());
        }
        out
    }

    async fn put(&self, profile: NfProfile) -> bool {
        let id = profile.nf_instance_id;
        self.shard(id).write().await.insert(id, profile).is_some()
    }

    async fn delete(&self, id: Uuid) -> bool {
        self.shard(id).write().await.remove(&id).is_some()
    }

    async fn delete_many_by_type(&self, nf_type: &str) -> usize {
        let mut removed = 0;
        for shard in &self.shards {
            let mut guard = shard.write().await;
            let before = guard.len();
            guard.retain(|_, profile| profile.nf_type != nf_type);
            removed += before - guard.len();
        }
        removed
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<NfProfile> {
        let mut expired = Vec::new();
        for shard in &self.shards {
            let mut guard = shard.write().await;
            let due: Vec<Uuid> = guard
                .values()
                .filter(|profile| profile.expire_at.is_some_and(|at| at <= now))
                .map(|profile| profile.nf_instance_id)
                .collect();
            for id in due {
                if let Some(profile) = guard.remove(&id) {
                    expired.push(profile);
                }
            }
        }
        expired
    }
}

/// Sharded in-memory [`SubscriptionStore`].
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    shards: Vec<RwLock<HashMap<Uuid, NrfSubscriptionData>>>,
}

impl InMemorySubscriptionStore {
    /// Construct an empty store.
    #[must_use]
    pub fn new() -> Self {
        let shards = (0..SHARD_COUNT).map(|_| RwLock::new(HashMap::new())).collect();
        Self { shards }
    }

    fn shard(&self, id: Uuid) -> &RwLock<HashMap<Uuid, NrfSubscriptionData>> {
        &self.shards[shard_of(id)]
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn get_one(&self, id: Uuid) -> Option<NrfSubscriptionData> {
        self.shard(id).read().await.get(&id).cloned()
    }

    async fn get_all(&self) -> Vec<NrfSubscriptionData> {
        let mut out = Vec::new();
        for shard in &self.shards {
            out.extend(shard.read().await.values().cloned());
        }
        out
    }

    async fn put_if_absent(&self, subscription: NrfSubscriptionData) -> bool {
        let Some(id) = subscription.subscription_id else {
            return false;
        };
        let mut guard = self.shard(id).write().await;
        if guard.contains_key(&id) {
            return false;
        }
        guard.insert(id, subscription);
        true
    }

    async fn patch(
        &self,
        id: Uuid,
        notification_uri: Option<String>,
        subscr_cond: Option<SubscrCond>,
        validity_time: Option<Option<DateTime<Utc>>>,
    ) -> Option<NrfSubscriptionData> {
        let mut guard = self.shard(id).write().await;
        let subscription = guard.get_mut(&id)?;
        if let Some(uri) = notification_uri {
            subscription.nf_status_notification_uri = uri;
        }
        if let Some(cond) = subscr_cond {
            subscription.subscr_cond = cond;
        }
        if let Some(validity) = validity_time {
            subscription.validity_time = validity;
        }
        Some(subscription.clone())
    }

    async fn delete(&self, id: Uuid) -> bool {
        self.shard(id).write().await.remove(&id).is_some()
    }

    async fn delete_by_nf_instance_id(&self, nf_instance_id: Uuid) -> usize {
        let mut removed = 0;
        for shard in &self.shards {
            let mut guard = shard.write().await;
            let before = guard.len();
            guard.retain(|_, subscription| {
                subscription.subscr_cond.nf_instance_id != Some(nf_instance_id)
            });
            removed += before - guard.len();
        }
        removed
    }
}

/// Shared handle type used across the app's wiring.
pub type SharedProfileStore = Arc<dyn ProfileStore>;
/// Shared handle type used across the app's wiring.
pub type SharedSubscriptionStore = Arc<dyn SubscriptionStore>;
