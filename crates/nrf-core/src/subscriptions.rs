//! Subscription CRUD and lifecycle-event notification fan-out (component E).
//!
//! [`SubscriptionManager`] owns the [`SubscriptionStore`] and, once
//! [`SubscriptionManager::spawn`] is called, drives a background task that
//! listens to [`Event`]s published by the registry manager and POSTs a
//! [`NotificationData`] body to each matching subscriber. Delivery is
//! at-most-once: a failed POST is logged and dropped, never retried. Per
//! subscriber, delivery is strictly ordered (a lazily-spawned worker task per
//! subscriber id drains its own queue); across subscribers, delivery is
//! concurrent.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use nrf_api_models::{NotificationData, NotificationEventType, NrfSubscriptionData, SubscrCond};
use nrf_events::{Event, EventBus};
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_stream::StreamExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::metrics_sink::{MetricsSink, Outcome, SharedMetricsSink};
use crate::store::SharedSubscriptionStore;

/// Tunables for the notification worker.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Per-request timeout applied to every notification POST.
    pub request_timeout: Duration,
    /// How long [`SubscriptionManager::shutdown`] waits for queued
    /// notifications to drain before abandoning the rest.
    pub shutdown_grace_period: Duration,
    /// URL template POSTed to when an `AMF` instance deregisters or expires,
    /// with `{id}` substituted for its `nfInstanceId`. `None` disables the hook.
    pub amf_oam_hook_url_template: Option<String>,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            shutdown_grace_period: Duration::from_secs(2),
            amf_oam_hook_url_template: Some("http://amf:29518/namf-oam/v1/amfInstanceDown/{id}".to_string()),
        }
    }
}

struct NotificationJob {
    uri: String,
    body: NotificationData,
}

struct Worker {
    sender: mpsc::UnboundedSender<NotificationJob>,
    handle: JoinHandle<()>,
}

/// Owns subscription persistence and the notification fan-out worker.
pub struct SubscriptionManager {
    store: SharedSubscriptionStore,
    events: EventBus,
    metrics: SharedMetricsSink,
    http: reqwest::Client,
    config: NotifierConfig,
    workers: RwLock<HashMap<Uuid, Worker>>,
}

impl SubscriptionManager {
    /// Construct a manager over `store`, reacting to events on `events`.
    #[must_use]
    pub fn new(
        store: SharedSubscriptionStore,
        events: EventBus,
        metrics: SharedMetricsSink,
        config: NotifierConfig,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            store,
            events,
            metrics,
            http,
            config,
            workers: RwLock::new(HashMap::new()),
        }
    }

    /// Create a subscription, assigning it a fresh `subscriptionId`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CreateSubscriptionError`] on the astronomically
    /// unlikely event of a `subscriptionId` collision.
    pub async fn create(&self, mut subscription: NrfSubscriptionData) -> CoreResult<NrfSubscriptionData> {
        let id = Uuid::new_v4();
        subscription.subscription_id = Some(id);
        let nf_type_label = subscription.subscr_cond.nf_type.clone().unwrap_or_else(|| "*".to_string());

        if !self.store.put_if_absent(subscription.clone()).await {
            self.metrics.record_subscription("subscribe", &nf_type_label, Outcome::Failure);
            return Err(CoreError::CreateSubscriptionError);
        }

        let _ = self.events.publish(Event::SubscriptionCreated {
            subscription_id: id,
            nf_type: subscription.subscr_cond.nf_type.clone(),
        });
        self.metrics.record_subscription("subscribe", &nf_type_label, Outcome::Success);
        Ok(subscription)
    }

    /// Patch the notification URI, filter condition and/or validity time of
    /// an existing subscription.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no subscription with `id` exists.
    pub async fn update(
        &self,
        id: Uuid,
        notification_uri: Option<String>,
        subscr_cond: Option<SubscrCond>,
        validity_time: Option<Option<DateTime<Utc>>>,
    ) -> CoreResult<NrfSubscriptionData> {
        let updated = self
            .store
            .patch(id, notification_uri, subscr_cond, validity_time)
            .await
            .ok_or(CoreError::NotFound {
                resource: "subscription",
                id: id.to_string(),
            })?;
        self.metrics.record_subscription(
            "update",
            updated.subscr_cond.nf_type.as_deref().unwrap_or("*"),
            Outcome::Success,
        );
        Ok(updated)
    }

    /// Remove a subscription and stop its worker, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no subscription with `id` exists.
    pub async fn remove(&self, id: Uuid) -> CoreResult<()> {
        let existing = self.store.get_one(id).await.ok_or(CoreError::NotFound {
            resource: "subscription",
            id: id.to_string(),
        })?;
        self.store.delete(id).await;
        self.workers.write().await.remove(&id);
        let _ = self.events.publish(Event::SubscriptionRemoved { subscription_id: id });
        self.metrics.record_subscription(
            "unsubscribe",
            existing.subscr_cond.nf_type.as_deref().unwrap_or("*"),
            Outcome::Success,
        );
        Ok(())
    }

    /// Fetch a subscription by id.
    pub async fn get(&self, id: Uuid) -> Option<NrfSubscriptionData> {
        self.store.get_one(id).await
    }

    /// Spawn the background task that consumes registry lifecycle events and
    /// delivers notifications. `location_of` renders an `nfInstanceId` into
    /// the `Location`-style URI carried in the notification body.
    pub fn spawn(
        self: Arc<Self>,
        location_of: impl Fn(Uuid) -> String + Send + Sync + 'static,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut stream = self.events.subscribe(None);
            while let Some(received) = stream.next().await {
                match received {
                    Ok(envelope) => self.handle_event(envelope.event, &location_of).await,
                    Err(error) => debug!(%error, "notifier lagged behind the event bus"),
                }
            }
        })
    }

    async fn handle_event(&self, event: Event, location_of: &(impl Fn(Uuid) -> String + Send + Sync)) {
        let (nf_instance_id, nf_type, notification_event, purge_subscriptions) = match event {
            Event::NfRegistered { nf_instance_id, nf_type, .. } => {
                (nf_instance_id, nf_type, NotificationEventType::Registered, false)
            }
            Event::NfProfileUpdated { nf_instance_id, nf_type, .. } => {
                (nf_instance_id, nf_type, NotificationEventType::ProfileChanged, false)
            }
            Event::NfHeartbeatExpired { nf_instance_id, nf_type } => {
                (nf_instance_id, nf_type, NotificationEventType::Deregistered, true)
            }
            Event::NfDeregistered { nf_instance_id, nf_type } => {
                (nf_instance_id, nf_type, NotificationEventType::Deregistered, true)
            }
            _ => return,
        };

        let body = NotificationData {
            event: notification_event,
            nf_instance_uri: location_of(nf_instance_id),
        };

        let subscriptions = self.store.get_all().await;
        for subscription in subscriptions
            .iter()
            .filter(|subscription| subscr_matches(&subscription.subscr_cond, nf_instance_id, &nf_type))
        {
            if let Some(subscription_id) = subscription.subscription_id {
                self.enqueue(subscription_id, subscription.nf_status_notification_uri.clone(), body.clone())
                    .await;
            }
        }

        if purge_subscriptions {
            let removed = self.store.delete_by_nf_instance_id(nf_instance_id).await;
            if removed > 0 {
                debug!(removed, %nf_instance_id, "purged subscriptions scoped to a deregistered instance");
            }
            self.fire_amf_oam_hook(&nf_type, nf_instance_id);
        }
    }

    fn fire_amf_oam_hook(&self, nf_type: &str, nf_instance_id: Uuid) {
        if nf_type != "AMF" {
            return;
        }
        let Some(template) = &self.config.amf_oam_hook_url_template else {
            return;
        };
        let url = template.replace("{id}", &nf_instance_id.to_string());
        let http = self.http.clone();
        tokio::spawn(async move {
            if let Err(error) = http.post(&url).send().await {
                warn!(%url, %error, "amf oam hook delivery failed");
            }
        });
    }

    async fn enqueue(&self, subscription_id: Uuid, uri: String, body: NotificationData) {
        // A single write lock keeps "check for a live worker, else create
        // one" atomic; per-subscriber contention is low enough that this
        // never becomes a bottleneck relative to the outbound POST itself.
        let mut workers = self.workers.write().await;
        if let Some(worker) = workers.get(&subscription_id)
            && worker.sender.send(NotificationJob { uri: uri.clone(), body: body.clone() }).is_ok()
        {
            return;
        }
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(Self::drain(self.http.clone(), receiver));
        let _ = sender.send(NotificationJob { uri, body });
        workers.insert(subscription_id, Worker { sender, handle });
    }

    async fn drain(http: reqwest::Client, mut receiver: mpsc::UnboundedReceiver<NotificationJob>) {
        while let Some(job) = receiver.recv().await {
            if let Err(error) = http.post(&job.uri).json(&job.body).send().await {
                warn!(uri = %job.uri, %error, "subscriber notification delivery failed");
            }
        }
    }

    /// Stop accepting new work and wait up to
    /// [`NotifierConfig::shutdown_grace_period`] for queued notifications to
    /// drain before abandoning whatever remains in-flight.
    pub async fn shutdown(&self) {
        let drained: Vec<Worker> = self.workers.write().await.drain().map(|(_, worker)| worker).collect();
        let (senders, handles): (Vec<_>, Vec<_>) = drained.into_iter().map(|worker| (worker.sender, worker.handle)).unzip();
        drop(senders);
        let join_all = async {
            for handle in handles {
                let _ = handle.await;
            }
        };
        if timeout(self.config.shutdown_grace_period, join_all).await.is_err() {
            debug!("notifier shutdown grace period elapsed with work still in flight");
        }
    }
}

fn subscr_matches(cond: &SubscrCond, nf_instance_id: Uuid, nf_type: &str) -> bool {
    if let Some(wanted_type) = &cond.nf_type
        && wanted_type != nf_type
    {
        return false;
    }
    if let Some(wanted_id) = cond.nf_instance_id
        && wanted_id != nf_instance_id
    {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics_sink::NullMetricsSink;
    use crate::store::InMemorySubscriptionStore;

    fn sample_subscription(nf_type: Option<&str>) -> NrfSubscriptionData {
        NrfSubscriptionData {
            subscription_id: None,
            nf_status_notification_uri: "http://subscriber.example/notify".into(),
            req_nf_type: Some("SMF".into()),
            subscr_cond: SubscrCond {
                nf_type: nf_type.map(str::to_string),
                nf_instance_id: None,
                service_name: None,
            },
            validity_time: None,
        }
    }

    fn manager() -> SubscriptionManager {
        SubscriptionManager::new(
            Arc::new(InMemorySubscriptionStore::new()),
            EventBus::new(),
            Arc::new(NullMetricsSink),
            NotifierConfig::default(),
        )
    }

    #[tokio::test]
    async fn create_assigns_an_id_and_persists() {
        let manager = manager();
        let created = manager.create(sample_subscription(Some("AMF"))).await.expect("create");
        assert!(created.subscription_id.is_some());
        assert!(manager.get(created.subscription_id.unwrap()).await.is_some());
    }

    #[tokio::test]
    async fn update_unknown_subscription_is_not_found() {
        let manager = manager();
        let err = manager
            .update(Uuid::new_v4(), Some("http://x".into()), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn remove_deletes_and_stops_returning_it() {
        let manager = manager();
        let created = manager.create(sample_subscription(None)).await.expect("create");
        let id = created.subscription_id.unwrap();
        manager.remove(id).await.expect("remove");
        assert!(manager.get(id).await.is_none());
    }

    #[tokio::test]
    async fn remove_unknown_subscription_is_not_found() {
        let manager = manager();
        let err = manager.remove(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn subscr_cond_matches_require_every_set_field() {
        let nf_instance_id = Uuid::new_v4();
        let cond = SubscrCond {
            nf_type: Some("AMF".into()),
            nf_instance_id: Some(nf_instance_id),
            service_name: None,
        };
        assert!(subscr_matches(&cond, nf_instance_id, "AMF"));
        assert!(!subscr_matches(&cond, nf_instance_id, "SMF"));
        assert!(!subscr_matches(&cond, Uuid::new_v4(), "AMF"));
    }

    #[tokio::test]
    async fn shutdown_completes_without_outstanding_workers() {
        let manager = manager();
        manager.shutdown().await;
    }
}
