#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

//! Domain logic for the NF Repository: storage, discovery, registration,
//! subscriptions and token issuance.
//!
//! This crate has no HTTP or config-format dependency — `nrf-api` and
//! `nrf-app` wire its pieces together behind axum handlers and a YAML config
//! loader respectively. Every async trait here (`ProfileStore`,
//! `SubscriptionStore`, `MetricsSink`) exists so this crate can be exercised
//! against in-memory fakes without any of that outer machinery.

pub mod discovery;
pub mod error;
pub mod filters;
pub mod metrics_sink;
pub mod registry;
pub mod store;
pub mod subscriptions;
pub mod tokens;

pub use discovery::DiscoveryCache;
pub use error::{CoreError, CoreResult};
pub use filters::{DiscoveryQuery, matches};
pub use metrics_sink::{MetricsSink, NullMetricsSink, Outcome, SharedMetricsSink};
pub use registry::{LocationAuthority, RegisterOutcome, RegistryManager};
pub use store::{
    InMemoryProfileStore, InMemorySubscriptionStore, ProfileStore, SharedProfileStore,
    SharedSubscriptionStore, SubscriptionStore,
};
pub use subscriptions::{NotifierConfig, SubscriptionManager};
pub use tokens::TokenIssuer;

use std::sync::Arc;
use std::time::Duration;

use nrf_api_models::PlmnId;
use nrf_events::EventBus;

/// Bundles the registry manager, discovery cache, subscription manager and
/// token issuer that share one store and one event bus.
///
/// Handed around as a single `Arc<Registry>` by the owning binary rather than
/// constructed as ad-hoc globals, so tests can stand up as many independent
/// instances as they like.
pub struct Registry {
    /// Register / update / deregister / fetch profiles.
    pub manager: RegistryManager,
    /// Cached, filtered discovery lookups.
    pub discovery: Arc<DiscoveryCache>,
    /// Subscription CRUD and notification fan-out.
    pub subscriptions: Arc<SubscriptionManager>,
    /// OAuth2 client-credentials token issuance.
    pub tokens: TokenIssuer,
    events: EventBus,
}

impl Registry {
    /// Assemble a registry over fresh in-memory stores.
    #[must_use]
    pub fn in_memory(
        authority: LocationAuthority,
        default_plmn_list: Vec<PlmnId>,
        profile_expiry_enabled: bool,
        discovery_ttl: Duration,
        signing_secret: Option<&[u8]>,
        token_issuer_name: impl Into<String>,
        notifier_config: NotifierConfig,
        metrics: SharedMetricsSink,
    ) -> Self {
        let profile_store: SharedProfileStore = Arc::new(InMemoryProfileStore::new());
        let subscription_store: SharedSubscriptionStore = Arc::new(InMemorySubscriptionStore::new());
        let events = EventBus::new();
        let discovery = Arc::new(DiscoveryCache::new(profile_store.clone(), discovery_ttl));
        let manager = RegistryManager::new(
            profile_store.clone(),
            discovery.clone(),
            events.clone(),
            metrics.clone(),
            authority,
            default_plmn_list,
            profile_expiry_enabled,
        );
        let subscriptions = Arc::new(SubscriptionManager::new(
            subscription_store,
            events.clone(),
            metrics,
            notifier_config,
        ));
        let tokens = TokenIssuer::new(profile_store, signing_secret, token_issuer_name, None);

        Self {
            manager,
            discovery,
            subscriptions,
            tokens,
            events,
        }
    }

    /// Start the subscription notifier's background fan-out task.
    ///
    /// `location_of` renders an `nfInstanceId` into the same `Location`-style
    /// URI the registry manager assigns on register, so notification bodies
    /// and `Location` headers agree.
    pub fn spawn_notifier(&self, location_of: impl Fn(uuid::Uuid) -> String + Send + Sync + 'static) -> tokio::task::JoinHandle<()> {
        Arc::clone(&self.subscriptions).spawn(location_of)
    }

    /// Borrow the event bus, e.g. so an admin endpoint can stream recent
    /// lifecycle events.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::in_memory(
            LocationAuthority {
                scheme: "https".into(),
                register_ip: "127.0.0.1".into(),
                port: 29510,
            },
            vec![PlmnId { mcc: "001".into(), mnc: "01".into() }],
            true,
            Duration::from_secs(5),
            Some(b"test-secret"),
            "nrf-test",
            NotifierConfig::default(),
            Arc::new(NullMetricsSink),
        )
    }

    #[tokio::test]
    async fn register_then_discover_round_trips_through_the_facade() {
        let registry = registry();
        let profile = nrf_api_models::NfProfile {
            nf_instance_id: uuid::Uuid::new_v4(),
            nf_type: "AMF".into(),
            nf_status: nrf_api_models::NfStatus::Registered,
            nf_services: None,
            plmn_list: None,
            s_nssais: None,
            allowed_nssais: None,
            info: None,
            heart_beat_timer: 30,
            expire_at: None,
            created_at: None,
        };
        let outcome = registry.manager.register(profile).await.expect("register");
        let found = registry
            .discovery
            .lookup("AMF", &DiscoveryQuery::default())
            .await
            .expect("lookup");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].nf_instance_id, outcome.profile.nf_instance_id);
    }
}
