//! `launchpad health` — check the health of a running instance.
//!
//! Sends a `GET /health` request to the specified URL and displays
//! the response as formatted text or raw JSON. With `--backend` the
//! instance is asked to check its backend through the proxy route.

use std::time::Duration;

use axum::http::Method;

use crate::cli::HealthArgs;
use crate::client::ProxyClient;
use crate::error::{ClientError, ForwardError, LaunchpadError};
use crate::health::HealthResponse;
use crate::proxy::forward::{self, SendRequest};
use crate::server::build_http_client;

const CHECK_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn execute(args: HealthArgs) -> Result<(), LaunchpadError> {
    if args.backend {
        return backend(&args).await;
    }

    let url = format!("{}/health", args.url.trim_end_matches('/'));
    let client = build_http_client();
    let request_id = uuid::Uuid::new_v4().to_string();

    let response = forward::send(SendRequest {
        client: &client,
        method: Method::GET,
        url: &url,
        body: None,
        timeout: CHECK_TIMEOUT,
        request_id: &request_id,
    })
    .await?;

    if !response.status.is_success() {
        return Err(LaunchpadError::HealthCheckFailed(response.status));
    }

    if args.json {
        println!("{}", String::from_utf8_lossy(&response.body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthResponse>(&response.body) {
        Ok(health) => {
            let uptime = format_uptime(health.uptime_seconds);
            println!("\u{2713} launchpad is healthy ({})", args.url);
            println!("  version:        {} ({})", health.version, health.build.commit);
            println!("  uptime:         {uptime}");
            println!(
                "  backend:        {} (timeout {}ms)",
                health.backend.url, health.backend.timeout_ms
            );
            println!(
                "  config:         {} ({})",
                health.config.source, health.config.version
            );
            println!(
                "  analytics:      {}",
                if health.config.analytics { "enabled" } else { "disabled" }
            );
            println!(
                "  requests:       {} forwarded, {} failed",
                health.stats.requests_forwarded, health.stats.requests_failed
            );
            println!("  signups:        {}", health.stats.waitlist_signups);
        }
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&response.body));
        }
    }

    Ok(())
}

async fn backend(args: &HealthArgs) -> Result<(), LaunchpadError> {
    let client = ProxyClient::new(build_http_client(), &args.url, CHECK_TIMEOUT);

    match client.backend_health().await {
        Ok(report) => {
            if args.json {
                let json = serde_json::to_string(&report).map_err(|e| {
                    LaunchpadError::HttpRequest(ForwardError::InvalidResponse(e.to_string()))
                })?;
                println!("{json}");
            } else {
                println!(
                    "\u{2713} {} is healthy (via {})",
                    report.backend_url, args.url
                );
                println!("  status:         {}", report.status);
                println!("  checked at:     {}", report.timestamp);
                println!("  response:       {}", report.data);
            }
            Ok(())
        }
        Err(ClientError::Rejected { status, message }) => {
            eprintln!("\u{2717} {message}");
            Err(LaunchpadError::HealthCheckFailed(
                axum::http::StatusCode::from_u16(status)
                    .unwrap_or(axum::http::StatusCode::SERVICE_UNAVAILABLE),
            ))
        }
        Err(ClientError::Transport { source, .. }) => Err(LaunchpadError::HttpRequest(source)),
    }
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
