mod common;

use anyhow::Result;
use reqwest::StatusCode;
use vendor_desk::config;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    // OK with a database, SERVICE_UNAVAILABLE without one; both mean the server is up
    let status = res.status();
    assert!(
        status == StatusCode::OK || status == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        status
    );

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], status == StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn root_lists_entities() -> Result<()> {
    let server = common::ensure_server().await?;

    let body = reqwest::get(format!("{}/", server.base_url))
        .await?
        .json::<serde_json::Value>()
        .await?;

    assert_eq!(body["success"], true);
    let entities = body["data"]["entities"].as_array().cloned().unwrap_or_default();
    assert_eq!(entities, vec!["Alchemy_Routing", "CTS", "team_report"]);
    Ok(())
}

#[tokio::test]
async fn invalid_patch_is_rejected_over_http() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .patch(format!("{}/CTS/7", server.base_url))
        .json(&serde_json::json!({ "vendor_name; DROP TABLE \"CTS\"": "x" }))
        .send()
        .await?;

    // The server reads .env too; load it so both sides see the same config
    let _ = dotenvy::dotenv();
    let expected = if config::config().security.require_auth {
        StatusCode::UNAUTHORIZED
    } else {
        StatusCode::BAD_REQUEST
    };
    assert_eq!(res.status(), expected);

    let body = res.json::<serde_json::Value>().await?;
    if expected == StatusCode::BAD_REQUEST {
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["vendor_name; DROP TABLE \"CTS\""], "Unknown field");
    }
    Ok(())
}
