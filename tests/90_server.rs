mod common;

use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn binary_serves_health() -> Result<()> {
    let Some(url) = common::database_url() else { return Ok(()) };
    let server = common::TestServer::spawn(&url)?;
    server.wait_ready(Duration::from_secs(15)).await?;

    let res = reqwest::get(format!("{}/health", server.base_url)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}
