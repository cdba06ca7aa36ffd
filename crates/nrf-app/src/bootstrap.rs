use std::borrow::Cow;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::orchestrator::{spawn_expiry_sweep, spawn_plmn_poll};
use nrf_api::ApiServer;
use nrf_api_models::PlmnId;
use nrf_config::{Config, DEFAULT_AMF_OAM_URI};
use nrf_core::{LocationAuthority, NotifierConfig, Registry};
use nrf_telemetry::{GlobalContextGuard, LoggingConfig, Metrics, OpenTelemetryConfig};

/// Default location of the YAML configuration document when
/// `NRF_CONFIG_PATH` is unset.
const DEFAULT_CONFIG_PATH: &str = "config/nrfcfg.yaml";

/// Refresh interval for the discovery cache's per-`nfType` buckets.
const DISCOVERY_CACHE_TTL: Duration = Duration::from_secs(10);

/// Issuer name stamped into every access token this instance mints.
const TOKEN_ISSUER: &str = "nrf";

/// Dependencies required to bootstrap the NRF application.
pub(crate) struct BootstrapDependencies {
    logging: LoggingConfig<'static>,
    otel_config: Option<OpenTelemetryConfig<'static>>,
    config: Config,
    telemetry: Metrics,
    registry: Arc<Registry>,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment for the binary entrypoint.
    pub(crate) fn from_env() -> AppResult<Self> {
        let logging = LoggingConfig::default();
        let otel_config = load_otel_config_from_env();

        let config_path = std::env::var("NRF_CONFIG_PATH")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let config =
            nrf_config::load(&config_path).map_err(|err| AppError::config("config.load", err))?;
        nrf_config::check_version(&config)
            .map_err(|err| AppError::config("config.check_version", err))?;

        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;

        let registry = Arc::new(build_registry(&config, &telemetry));

        Ok(Self {
            logging,
            otel_config,
            config,
            telemetry,
            registry,
        })
    }
}

fn location_authority(config: &Config) -> LocationAuthority {
    let sbi = &config.configuration.sbi;
    LocationAuthority {
        scheme: sbi.scheme.as_str().to_string(),
        register_ip: sbi.register_ip.clone(),
        port: sbi.port,
    }
}

fn build_registry(config: &Config, telemetry: &Metrics) -> Registry {
    let authority = location_authority(config);

    let default_plmn_list = config
        .configuration
        .default_plmn_id
        .as_ref()
        .map(|plmn| {
            vec![PlmnId {
                mcc: plmn.mcc.clone(),
                mnc: plmn.mnc.clone(),
            }]
        })
        .unwrap_or_default();

    let signing_secret = config.configuration.token_signing_secret.clone();

    let amf_oam_uri = config
        .configuration
        .amf_oam_uri
        .clone()
        .unwrap_or_else(|| DEFAULT_AMF_OAM_URI.to_string());
    let notifier_config = NotifierConfig {
        amf_oam_hook_url_template: Some(format!("{amf_oam_uri}/{{id}}")),
        ..NotifierConfig::default()
    };

    Registry::in_memory(
        authority,
        default_plmn_list,
        config.configuration.nf_profile_expiry_enable,
        DISCOVERY_CACHE_TTL,
        signing_secret.as_deref().map(str::as_bytes),
        TOKEN_ISSUER,
        notifier_config,
        Arc::new(telemetry.clone()),
    )
}

/// Entry point for the NRF application boot sequence.
///
/// # Errors
///
/// Returns an error if dependency construction or application startup fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    Box::pin(run_app_with(dependencies)).await
}

/// Boot sequence that relies entirely on injected dependencies to simplify testing.
pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    let otel_ref = dependencies
        .otel_config
        .as_ref()
        .map(|cfg| cfg as &OpenTelemetryConfig);
    let _otel_guard = nrf_telemetry::init_logging_with_otel(&dependencies.logging, otel_ref)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("bootstrap");

    info!("NRF application bootstrap starting");

    let BootstrapDependencies {
        logging: _,
        otel_config: _,
        config,
        telemetry,
        registry,
    } = dependencies;

    let sweep_task = spawn_expiry_sweep(Arc::clone(&registry));
    let plmn_task = config.configuration.webui_uri.clone().map(|webui_uri| {
        spawn_plmn_poll(Arc::clone(&registry), reqwest::Client::new(), webui_uri)
    });
    let authority = location_authority(&config);
    let notifier_task = registry.spawn_notifier(move |nf_instance_id| authority.location_for(nf_instance_id));

    let api = ApiServer::new(Arc::clone(&registry), telemetry.clone())
        .map_err(|err| AppError::api_server("api_server.new", err))?;

    let port = config.configuration.sbi.port;
    let bind_ip = config
        .configuration
        .sbi
        .binding_ip
        .parse()
        .map_err(|_| AppError::InvalidConfig {
            field: "bindingIP",
            reason: "not_an_ip_address",
            value: Some(config.configuration.sbi.binding_ip.clone()),
        })?;
    let addr = SocketAddr::new(bind_ip, port);
    info!(addr = %addr, "Launching API listener");

    let serve_result = api.serve(addr).await;

    for (name, task) in [("expiry sweep", Some(sweep_task)), ("plmn poll", plmn_task)]
        .into_iter()
        .filter_map(|(name, task)| task.map(|task| (name, task)))
    {
        if !task.is_finished() {
            task.abort();
        }
        if let Err(err) = task.await {
            if !err.is_cancelled() {
                warn!(error = %err, task = name, "background task join failed");
            }
        }
    }
    if !notifier_task.is_finished() {
        notifier_task.abort();
    }

    serve_result.map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

fn load_otel_config_from_env() -> Option<OpenTelemetryConfig<'static>> {
    let enabled = env_flag("NRF_ENABLE_OTEL");
    let service_name =
        std::env::var("NRF_OTEL_SERVICE_NAME").unwrap_or_else(|_| "nrf-app".to_string());
    let endpoint = std::env::var("NRF_OTEL_EXPORTER").ok();
    otel_config_from_values(enabled, service_name, endpoint)
}

fn env_flag(name: &str) -> bool {
    env_flag_value(std::env::var(name).ok().as_deref())
}

fn env_flag_value(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn otel_config_from_values(
    enabled: bool,
    service_name: String,
    endpoint: Option<String>,
) -> Option<OpenTelemetryConfig<'static>> {
    if !enabled {
        return None;
    }
    Some(OpenTelemetryConfig {
        enabled: true,
        service_name: Cow::Owned(service_name),
        endpoint: endpoint.map(Cow::Owned),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_flag_handles_truthy_and_falsey() {
        assert!(env_flag_value(Some("TrUe")));
        assert!(!env_flag_value(Some("no")));
        assert!(!env_flag_value(None));
    }

    #[test]
    fn load_otel_config_reads_values() {
        let cfg = otel_config_from_values(true, "svc".into(), Some("http://collector".into()))
            .expect("otel config");
        assert_eq!(cfg.service_name.as_ref(), "svc");
        assert_eq!(cfg.endpoint.as_deref(), Some("http://collector"));
        assert!(otel_config_from_values(false, "svc".into(), None).is_none());
    }

    #[test]
    fn build_registry_applies_the_configured_default_plmn() {
        let config: Config = serde_yaml::from_str(
            r#"
info:
  version: "1.0.0"
configuration:
  sbi:
    scheme: http
    registerIP: 127.0.0.1
    bindingIP: 0.0.0.0
    port: 29510
  defaultPlmnId:
    mcc: "208"
    mnc: "93"
"#,
        )
        .expect("config parses");
        let telemetry = Metrics::new().expect("metrics");
        let _registry = build_registry(&config, &telemetry);
        let authority = location_authority(&config);
        assert_eq!(
            authority.location_for(uuid::Uuid::nil()),
            "http://127.0.0.1:29510/nnrf-nfm/v1/nf-instances/00000000-0000-0000-0000-000000000000"
        );
    }
}
