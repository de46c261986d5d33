use std::time::{Duration, Instant};

use anyhow::Context;
use serde_json::{json, Value};

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config;

pub async fn handle(url: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let base_url = url.unwrap_or_else(default_base_url);
    let health_url = format!("{}/health", base_url.trim_end_matches('/'));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .context("failed to build HTTP client")?;

    let started = Instant::now();
    let response = match client.get(&health_url).send().await {
        Ok(response) => response,
        Err(e) => {
            output_error(output_format, &format!("{} is unreachable: {}", base_url, e), Some("UNREACHABLE"))?;
            anyhow::bail!("ping failed");
        }
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(
            output_format,
            &format!("{} is healthy ({} ms)", base_url, elapsed_ms),
            Some(json!({ "url": base_url, "status": status.as_u16(), "elapsed_ms": elapsed_ms, "health": body })),
        )
    } else {
        output_error(
            output_format,
            &format!("{} answered {} ({} ms)", base_url, status, elapsed_ms),
            body.get("code").and_then(Value::as_str),
        )?;
        anyhow::bail!("server is not healthy")
    }
}

fn default_base_url() -> String {
    let server = &config::config().server;
    // 0.0.0.0 is a bind address, not somewhere to connect to
    let host = if server.host == "0.0.0.0" { "127.0.0.1" } else { server.host.as_str() };
    format!("http://{}:{}", host, server.port)
}
