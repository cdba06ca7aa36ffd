//! Periodic registry maintenance: heartbeat-expiry sweeps and the default
//! PLMN list refresh against the external configuration source.

use std::sync::Arc;
use std::time::Duration;

use nrf_config::DEFAULT_PLMN_POLL_INTERVAL_SECS;
use nrf_core::Registry;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Interval on which heartbeat-expired profiles are swept out of the
/// registry. Not configurable from the YAML document; the reference
/// implementation instead relies on a Mongo TTL index over `expireAt`, which
/// the in-memory store here has no equivalent for.
const EXPIRY_SWEEP_INTERVAL: Duration = Duration::from_secs(10);

/// Sweep heartbeat-expired profiles out of the registry on a fixed interval.
pub(crate) fn spawn_expiry_sweep(registry: Arc<Registry>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(EXPIRY_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let expired = registry.manager.sweep_expired().await;
            if !expired.is_empty() {
                info!(count = expired.len(), "swept expired nf profiles");
            }
        }
    })
}

/// Poll `webui_uri` for the default PLMN list on a fixed interval, installing
/// it into the registry manager and invalidating discovery's cache so future
/// lookups observe it immediately.
pub(crate) fn spawn_plmn_poll(
    registry: Arc<Registry>,
    client: reqwest::Client,
    webui_uri: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker =
            tokio::time::interval(Duration::from_secs(DEFAULT_PLMN_POLL_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            match nrf_config::fetch_default_plmn_list(&client, &webui_uri).await {
                Ok(plmn_list) => {
                    registry.manager.set_default_plmn_list(plmn_list).await;
                    registry.discovery.invalidate_all().await;
                }
                Err(err) => {
                    warn!(error = %err, "failed to refresh default plmn list");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrf_core::{LocationAuthority, NotifierConfig, NullMetricsSink};

    fn registry() -> Arc<Registry> {
        Arc::new(Registry::in_memory(
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
        ))
    }

    #[tokio::test]
    async fn expiry_sweep_task_keeps_running() {
        let handle = spawn_expiry_sweep(registry());
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn plmn_poll_task_keeps_running_when_source_unreachable() {
        let handle = spawn_plmn_poll(
            registry(),
            reqwest::Client::new(),
            "http://127.0.0.1:1".to_string(),
        );
        assert!(!handle.is_finished());
        handle.abort();
    }
}
