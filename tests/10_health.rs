mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn health_reports_ok_with_database() -> Result<()> {
    let Some(server) = common::try_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let resp = client.get(format!("{}/health", server.base_url)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let Some(server) = common::try_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let resp = client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["name"], "Prompti API");
    assert!(body["endpoints"].is_object());
    Ok(())
}
