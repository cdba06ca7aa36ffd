use httpmock::MockServer;
use httpmock::prelude::*;
use nrf_config::{ConfigError, check_version, fetch_default_plmn_list, load};

fn sample_yaml(webui_uri: &str) -> String {
    format!(
        r#"
info:
  version: "1.0.0"
  description: integration test
configuration:
  sbi:
    scheme: http
    registerIP: 127.0.0.1
    bindingIP: 0.0.0.0
    port: 29510
  nfProfileExpiryEnable: true
  nfKeepAliveTime: 10
  defaultPlmnId:
    mcc: "208"
    mnc: "93"
  webuiUri: "{webui_uri}"
  serviceNameList:
    - nnrf-nfm
    - nnrf-disc
logger:
  NRF:
    debugLevel: info
"#
    )
}

#[tokio::test]
async fn load_then_fetch_default_plmn_list_against_a_live_source() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nrf/plmn");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({
                    "plmnList": [{"mcc": "001", "mnc": "01"}]
                }));
        })
        .await;

    let mut file = tempfile::NamedTempFile::new()?;
    std::io::Write::write_all(&mut file, sample_yaml(&server.base_url()).as_bytes())?;

    let config = load(file.path())?;
    check_version(&config)?;
    assert_eq!(
        config.configuration.webui_uri.as_deref(),
        Some(server.base_url().as_str())
    );

    let client = reqwest::Client::new();
    let plmn_list = fetch_default_plmn_list(
        &client,
        config.configuration.webui_uri.as_deref().expect("webuiUri"),
    )
    .await?;
    assert_eq!(plmn_list.len(), 1);
    assert_eq!(plmn_list[0].mcc, "001");
    assert_eq!(plmn_list[0].mnc, "01");

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn fetch_default_plmn_list_surfaces_upstream_failures() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nrf/plmn");
            then.status(503);
        })
        .await;

    let client = reqwest::Client::new();
    let result = fetch_default_plmn_list(&client, &server.base_url()).await;
    assert!(result.is_err());
}

#[test]
fn rejects_a_configuration_document_with_the_wrong_version() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    let yaml = sample_yaml("http://webui:5001").replace("version: \"1.0.0\"", "version: \"0.9.0\"");
    std::io::Write::write_all(&mut file, yaml.as_bytes())?;

    let config = load(file.path())?;
    let err = check_version(&config).unwrap_err();
    assert!(matches!(err, ConfigError::VersionMismatch { .. }));
    Ok(())
}
