//! `launchpad run` — start the landing page server.
//!
//! Loads the site config (explicit, auto-detected, or built-in), applies
//! the CLI backend overrides, and serves the page, the waitlist form and
//! the proxy route until SIGTERM or Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::{self, validation, LoadedConfig};
use crate::error::LaunchpadError;
use crate::logging;
use crate::server::{self, AppState};

/// Apply `--backend-url` and `--timeout` on top of the loaded config.
pub fn apply_overrides(
    mut loaded: LoadedConfig,
    backend_url: Option<&str>,
    timeout: Option<u64>,
) -> Result<LoadedConfig, LaunchpadError> {
    if backend_url.is_none() && timeout.is_none() {
        return Ok(loaded);
    }

    let mut site = (*loaded.config).clone();
    if let Some(url) = backend_url {
        site.proxy.backend_url = url.to_string();
    }
    if let Some(ms) = timeout {
        site.proxy.timeout = ms;
    }
    validation::validate(&site).map_err(|errors| LaunchpadError::ConfigValidation { errors })?;

    loaded.config = Arc::new(site);
    Ok(loaded)
}

pub async fn execute(args: RunArgs) -> Result<(), LaunchpadError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let loaded = config::resolve(args.config.as_deref()).await?;
    let loaded = apply_overrides(loaded, args.backend_url.as_deref(), args.timeout)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    if !args.public_dir.join("favicon_io").is_dir() {
        tracing::warn!(
            public_dir = %args.public_dir.display(),
            "favicon_io directory not found, icon requests will 404"
        );
    }

    let source = loaded.source_name.clone();
    let version = loaded.version.short().to_string();
    let analytics = loaded.config.analytics.is_some();

    let state = Arc::new(AppState::new(loaded, args.public_dir.clone()));
    let backend_url = state.backend.base_url().to_string();
    let timeout_ms = state.backend.timeout().as_millis();

    let router = server::build_router(state, args.max_body);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        backend = %backend_url,
        timeout_ms = %timeout_ms,
        config = %source,
        config_version = %version,
        analytics,
        "launchpad started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("launchpad stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_overrides_keeps_config() {
        let loaded = apply_overrides(LoadedConfig::builtin(), None, None).unwrap();
        assert_eq!(loaded.config.proxy.backend_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn overrides_replace_proxy_settings() {
        let loaded = apply_overrides(
            LoadedConfig::builtin(),
            Some("https://api.example.com/"),
            Some(5_000),
        )
        .unwrap();
        assert_eq!(loaded.config.proxy.base_url(), "https://api.example.com");
        assert_eq!(loaded.config.proxy.timeout, 5_000);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let err = apply_overrides(LoadedConfig::builtin(), Some("api:8000"), None).unwrap_err();
        assert!(matches!(err, LaunchpadError::ConfigValidation { .. }));
    }
}
