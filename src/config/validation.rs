//! Site configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`SiteConfig`] for values
//! that would break the page or the proxy at runtime: a malformed
//! backend origin, an out-of-range timeout, bad colours, and incomplete
//! analytics settings. Returns a list of [`ValidationError`] values
//! with per-field suggestions.

use url::Url;

use super::model::SiteConfig;
use crate::error::ValidationError;

pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Validate the backend base URL. Returns `Ok(())` or a human-readable error.
pub fn validate_backend_url(url: &str) -> Result<(), String> {
    let parsed = Url::parse(url).map_err(|_| format!("'{url}' is not a valid URL"))?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(format!(
            "unsupported scheme '{scheme}' (expected http or https)"
        ));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err("backend URL cannot carry a query string or fragment".into());
    }
    Ok(())
}

/// Validate a `#rgb` or `#rrggbb` colour. Returns `Ok(())` or a human-readable error.
pub fn validate_color(color: &str) -> Result<(), String> {
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| format!("'{color}' must start with '#'"))?;
    if (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(format!("'{color}' is not a #rgb or #rrggbb colour"))
    }
}

fn error(section: &str, field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        section: section.into(),
        field: field.into(),
        message: message.into(),
        suggestion: None,
    }
}

pub fn validate(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let site = &config.site;
    if site.title.trim().is_empty() {
        errors.push(error("site", "title", "title cannot be empty"));
    }
    if let Err(msg) = validate_color(&site.theme_color) {
        errors.push(ValidationError {
            suggestion: (!site.theme_color.starts_with('#'))
                .then(|| format!("did you mean '#{}'?", site.theme_color)),
            ..error("site", "theme_color", msg)
        });
    }
    if !site.url.is_empty() && Url::parse(&site.url).is_err() {
        errors.push(error(
            "site",
            "url",
            format!("'{}' is not a valid URL", site.url),
        ));
    }
    if !site.og_image.is_empty()
        && !site.og_image.starts_with('/')
        && Url::parse(&site.og_image).is_err()
    {
        errors.push(ValidationError {
            suggestion: Some(format!("did you mean '/{}'?", site.og_image)),
            ..error(
                "site",
                "og_image",
                "must be an absolute path or a full URL",
            )
        });
    }
    if !site.contact_email.is_empty() && !site.contact_email.contains('@') {
        errors.push(error(
            "site",
            "contact_email",
            format!("'{}' is not an email address", site.contact_email),
        ));
    }

    let proxy = &config.proxy;
    if let Err(msg) = validate_backend_url(&proxy.backend_url) {
        let suggestion = (!proxy.backend_url.contains("://"))
            .then(|| format!("did you mean 'http://{}'?", proxy.backend_url));
        errors.push(ValidationError {
            suggestion,
            ..error("proxy", "backend_url", msg)
        });
    }
    if proxy.timeout == 0 || proxy.timeout > MAX_TIMEOUT_MS {
        errors.push(error(
            "proxy",
            "timeout",
            format!(
                "{}ms is out of range (1..={MAX_TIMEOUT_MS})",
                proxy.timeout
            ),
        ));
    }

    if let Some(analytics) = &config.analytics {
        for (field, value) in [
            ("api_key", &analytics.api_key),
            ("project_id", &analytics.project_id),
            ("app_id", &analytics.app_id),
            ("measurement_id", &analytics.measurement_id),
            ("sdk_version", &analytics.sdk_version),
        ] {
            if value.trim().is_empty() {
                errors.push(error(
                    "analytics",
                    field,
                    format!("{field} cannot be empty"),
                ));
            }
        }
        // Interpolated into the CDN script URL.
        if !analytics
            .sdk_version
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.')
        {
            errors.push(error(
                "analytics",
                "sdk_version",
                format!("'{}' is not a version like 10.12.2", analytics.sdk_version),
            ));
        }
        if !analytics.measurement_id.is_empty() && !analytics.measurement_id.starts_with("G-") {
            errors.push(ValidationError {
                suggestion: Some(format!("did you mean 'G-{}'?", analytics.measurement_id)),
                ..error(
                    "analytics",
                    "measurement_id",
                    "measurement IDs start with 'G-'",
                )
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &SiteConfig) -> String {
    let analytics = config
        .analytics
        .as_ref()
        .map_or_else(|| "disabled".to_string(), |a| format!("firebase ({})", a.measurement_id));

    let lines = [
        format!("  site:      {}", config.site.title),
        format!("  backend:   {}", config.proxy.base_url()),
        format!("  timeout:   {}ms", config.proxy.timeout),
        format!("  analytics: {analytics}"),
    ];

    format!("{} is valid\n{}", path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::AnalyticsConfig;

    fn analytics() -> AnalyticsConfig {
        AnalyticsConfig {
            sdk_version: "10.12.2".into(),
            api_key: "key".into(),
            auth_domain: None,
            project_id: "demo".into(),
            storage_bucket: None,
            messaging_sender_id: None,
            app_id: "1:2:web:3".into(),
            measurement_id: "G-TEST".into(),
        }
    }

    #[test]
    fn default_config_passes() {
        assert!(validate(&SiteConfig::default()).is_ok());
    }

    #[test]
    fn backend_url_without_scheme_suggests_http() {
        let mut config = SiteConfig::default();
        config.proxy.backend_url = "localhost:8000".into();
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.suggestion.as_deref() == Some("did you mean 'http://localhost:8000'?")));
    }

    #[test]
    fn backend_url_with_other_scheme_fails() {
        let mut config = SiteConfig::default();
        config.proxy.backend_url = "ftp://files.example.com".into();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("unsupported scheme")));
    }

    #[test]
    fn backend_url_with_query_fails() {
        let mut config = SiteConfig::default();
        config.proxy.backend_url = "http://api:8000/?x=1".into();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn zero_timeout_fails() {
        let mut config = SiteConfig::default();
        config.proxy.timeout = 0;
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors[0].field, "timeout");
    }

    #[test]
    fn theme_color_without_hash_suggests_fix() {
        let mut config = SiteConfig::default();
        config.site.theme_color = "2563eb".into();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors[0].suggestion.as_deref(), Some("did you mean '#2563eb'?"));
    }

    #[test]
    fn color_rules() {
        assert!(validate_color("#fff").is_ok());
        assert!(validate_color("#2563EB").is_ok());
        assert!(validate_color("#12345").is_err());
        assert!(validate_color("#gggggg").is_err());
    }

    #[test]
    fn empty_analytics_fields_fail() {
        let mut config = SiteConfig::default();
        config.analytics = Some(AnalyticsConfig {
            api_key: String::new(),
            ..analytics()
        });
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "api_key"));
    }

    #[test]
    fn measurement_id_prefix_checked() {
        let mut config = SiteConfig::default();
        config.analytics = Some(AnalyticsConfig {
            measurement_id: "PQEXZ".into(),
            ..analytics()
        });
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors[0].suggestion.as_deref(), Some("did you mean 'G-PQEXZ'?"));
    }

    #[test]
    fn sdk_version_must_be_numeric() {
        let mut config = SiteConfig::default();
        config.analytics = Some(AnalyticsConfig {
            sdk_version: "10.12.2/../evil".into(),
            ..analytics()
        });
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "sdk_version");
    }

    #[test]
    fn report_mentions_backend() {
        let report = format_validation_report("launchpad.yaml", &SiteConfig::default());
        assert!(report.starts_with("launchpad.yaml is valid"));
        assert!(report.contains("http://127.0.0.1:8000"));
        assert!(report.contains("analytics: disabled"));
    }
}
