//! Event payload types carried across the platform.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Identifier assigned to each event emitted by the platform.
pub type EventId = u64;

/// Default buffer size for the in-memory replay ring.
pub const DEFAULT_REPLAY_CAPACITY: usize = 1_024;

/// Typed domain events surfaced across the system.
///
/// These are internal to the NRF process: the registry manager (D) and
/// subscription/notifier worker (E) are the producers, the discovery cache
/// (C) and the notifier fan-out are the consumers. Nothing here crosses the
/// HTTP boundary directly.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// An NF instance completed initial registration.
    NfRegistered {
        /// Identifier of the registered NF instance.
        nf_instance_id: Uuid,
        /// NF type of the registered instance (e.g. `"AMF"`, `"SMF"`).
        nf_type: String,
        /// Registration status reported by the NF (e.g. `"REGISTERED"`).
        nf_status: String,
    },
    /// An already-registered NF instance's profile was replaced or patched.
    NfProfileUpdated {
        /// Identifier of the updated NF instance.
        nf_instance_id: Uuid,
        /// NF type of the updated instance.
        nf_type: String,
        /// Registration status reported by the NF after the update.
        nf_status: String,
    },
    /// An NF instance's heartbeat timer expired without a keep-alive update.
    NfHeartbeatExpired {
        /// Identifier of the NF instance whose profile expired.
        nf_instance_id: Uuid,
        /// NF type of the expired instance.
        nf_type: String,
    },
    /// An NF instance was explicitly deregistered.
    NfDeregistered {
        /// Identifier of the deregistered NF instance.
        nf_instance_id: Uuid,
        /// NF type of the deregistered instance.
        nf_type: String,
    },
    /// A subscription was created by an NF instance.
    SubscriptionCreated {
        /// Identifier of the new subscription.
        subscription_id: Uuid,
        /// NF type the subscription filters on, if any.
        nf_type: Option<String>,
    },
    /// A subscription was removed, either explicitly or because it expired.
    SubscriptionRemoved {
        /// Identifier of the removed subscription.
        subscription_id: Uuid,
    },
    /// System health status changed (degraded or restored components).
    HealthChanged {
        /// Components currently considered degraded.
        degraded: Vec<String>,
    },
}

impl Event {
    /// Machine-friendly discriminator, used for log fields and metrics labels.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NfRegistered { .. } => "nf_registered",
            Self::NfProfileUpdated { .. } => "nf_profile_updated",
            Self::NfHeartbeatExpired { .. } => "nf_heartbeat_expired",
            Self::NfDeregistered { .. } => "nf_deregistered",
            Self::SubscriptionCreated { .. } => "subscription_created",
            Self::SubscriptionRemoved { .. } => "subscription_removed",
            Self::HealthChanged { .. } => "health_changed",
        }
    }
}

/// Metadata wrapper around events. Each envelope tracks the event id and emission timestamp.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct EventEnvelope {
    /// Monotonic identifier assigned to the wrapped event.
    pub id: EventId,
    /// Timestamp recording when the envelope was produced.
    pub timestamp: DateTime<Utc>,
    /// Wrapped event payload.
    pub event: Event,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_maps_registry_variants() {
        assert_event_kind(
            &Event::NfRegistered {
                nf_instance_id: Uuid::nil(),
                nf_type: "AMF".into(),
                nf_status: "REGISTERED".into(),
            },
            "nf_registered",
        );
        assert_event_kind(
            &Event::NfProfileUpdated {
                nf_instance_id: Uuid::nil(),
                nf_type: "AMF".into(),
                nf_status: "REGISTERED".into(),
            },
            "nf_profile_updated",
        );
        assert_event_kind(
            &Event::NfHeartbeatExpired {
                nf_instance_id: Uuid::nil(),
                nf_type: "AMF".into(),
            },
            "nf_heartbeat_expired",
        );
        assert_event_kind(
            &Event::NfDeregistered {
                nf_instance_id: Uuid::nil(),
                nf_type: "AMF".into(),
            },
            "nf_deregistered",
        );
    }

    #[test]
    fn event_kind_maps_subscription_and_health_variants() {
        assert_event_kind(
            &Event::SubscriptionCreated {
                subscription_id: Uuid::nil(),
                nf_type: Some("SMF".into()),
            },
            "subscription_created",
        );
        assert_event_kind(
            &Event::SubscriptionRemoved {
                subscription_id: Uuid::nil(),
            },
            "subscription_removed",
        );
        assert_event_kind(
            &Event::HealthChanged {
                degraded: vec!["profile_store".into()],
            },
            "health_changed",
        );
    }

    #[test]
    fn envelope_carries_fields() {
        let event = Event::HealthChanged {
            degraded: vec!["profile_store".into()],
        };
        let envelope = EventEnvelope {
            id: 42,
            timestamp: Utc::now(),
            event: event.clone(),
        };
        assert_eq!(envelope.id, 42);
        assert_eq!(envelope.event, event);
    }

    fn assert_event_kind(event: &Event, expected: &str) {
        assert_eq!(event.kind(), expected);
    }
}
