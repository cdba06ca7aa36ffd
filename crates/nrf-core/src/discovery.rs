//! Per-target-type discovery cache with deadline-driven refresh and
//! single-flight population.
//!
//! Each `targetNfType` gets its own bucket guarded by its own
//! `tokio::sync::Mutex`. Holding that mutex across the repopulation await
//! point is what gives single-flight for free: the first caller to observe
//! a stale (or absent) bucket repopulates it while holding the lock; every
//! other concurrent caller blocks on the same lock and, once it acquires it,
//! finds the bucket already fresh and skips the store round-trip.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use nrf_api_models::NfProfile;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::error::{CoreError, CoreResult};
use crate::filters::{DiscoveryQuery, matches};
use crate::store::SharedProfileStore;

struct Bucket {
    profiles: Vec<NfProfile>,
    populated_at: Option<Instant>,
}

impl Bucket {
    const fn empty() -> Self {
        Self {
            profiles: Vec::new(),
            populated_at: None,
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.populated_at
            .is_some_and(|populated_at| populated_at.elapsed() < ttl)
    }
}

/// Cache of registered profiles, one bucket per `targetNfType`.
pub struct DiscoveryCache {
    store: SharedProfileStore,
    ttl: Duration,
    buckets: RwLock<HashMap<String, Arc<Mutex<Bucket>>>>,
}

impl DiscoveryCache {
    /// Construct a cache backed by `store`, refreshing each bucket at most
    /// once per `ttl`.
    #[must_use]
    pub fn new(store: SharedProfileStore, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            buckets: RwLock::new(HashMap::new()),
        }
    }

    async fn bucket_for(&self, target_nf_type: &str) -> Arc<Mutex<Bucket>> {
        if let Some(bucket) = self.buckets.read().await.get(target_nf_type) {
            return Arc::clone(bucket);
        }
        let mut guard = self.buckets.write().await;
        Arc::clone(
            guard
                .entry(target_nf_type.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(Bucket::empty()))),
        )
    }

    /// Return every profile of `target_nf_type` matching `query`, ordered
    /// deterministically by `nfInstanceId`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UpstreamUnavailable`] when the bucket is empty or
    /// stale and the backing store cannot be reached.
    pub async fn lookup(
        &self,
        target_nf_type: &str,
        query: &DiscoveryQuery,
    ) -> CoreResult<Vec<NfProfile>> {
        let bucket = self.bucket_for(target_nf_type).await;
        let mut guard = bucket.lock().await;

        if !guard.is_fresh(self.ttl) {
            let fresh = self.store.get_many_registered_by_type(target_nf_type).await;
            guard.profiles = fresh;
            guard.populated_at = Some(Instant::now());
        }

        let mut matched: Vec<NfProfile> = guard
            .profiles
            .iter()
            .filter(|profile| matches(profile, query))
            .cloned()
            .collect();
        matched.sort_by_key(|profile| profile.nf_instance_id);
        Ok(matched)
    }

    /// Drop the bucket for `target_nf_type`; the next lookup repopulates it.
    /// Called on any register/update/deregister affecting that type.
    pub async fn invalidate(&self, target_nf_type: &str) {
        self.buckets.write().await.remove(target_nf_type);
    }

    /// Drop every bucket. Called when a config reload changes the default
    /// PLMN set, since that can affect every profile's effective PLMN list.
    pub async fn invalidate_all(&self) {
        self.buckets.write().await.clear();
    }
}
