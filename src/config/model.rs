//! Serde data structures for the Launchpad site configuration file.
//!
//! Contains [`SiteConfig`] (the root), [`SiteMeta`] for page metadata
//! and copy, [`ProxySettings`] for the backend origin and timeout, and
//! [`AnalyticsConfig`] for the optional browser analytics bootstrap.
//! All types use `deny_unknown_fields` for strict parsing, and every
//! field has a default so an empty file is a valid config.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_sdk_version() -> String {
    "10.12.2".to_string()
}

fn is_default_proxy(v: &ProxySettings) -> bool {
    v.backend_url == DEFAULT_BACKEND_URL && v.timeout == default_timeout()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteMeta,

    #[serde(default, skip_serializing_if = "is_default_proxy")]
    pub proxy: ProxySettings,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AnalyticsConfig>,
}

/// Page metadata and copy rendered into the landing page.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub author: String,
    /// Canonical public URL, used for `og:url`. Empty to omit.
    pub url: String,
    pub og_image: String,
    pub theme_color: String,
    pub headline: String,
    pub headline_accent: String,
    pub tagline: String,
    pub company: String,
    pub contact_email: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Your App - Modern Web Application".into(),
            description: "A modern web application with a waitlist for early access".into(),
            keywords: vec!["web application".into(), "waitlist".into(), "early access".into()],
            author: "Your Company".into(),
            url: String::new(),
            og_image: "/og-image.png".into(),
            theme_color: "#2563eb".into(),
            headline: "Your Next Big Thing".into(),
            headline_accent: "Starts Here".into(),
            tagline: "Join our community and be the first to experience what we're building."
                .into(),
            company: "Your Company".into(),
            contact_email: "hello@example.com".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProxySettings {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Backend call timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            timeout: default_timeout(),
        }
    }
}

impl ProxySettings {
    /// Backend origin with any trailing slash removed, ready for
    /// `base + endpoint` concatenation.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }
}

/// Firebase web app settings for the analytics bootstrap script.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsConfig {
    #[serde(default = "default_sdk_version")]
    pub sdk_version: String,

    pub api_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_domain: Option<String>,

    pub project_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,

    pub app_id: String,

    pub measurement_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: SiteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.proxy.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.proxy.timeout, 30_000);
        assert_eq!(config.site.theme_color, "#2563eb");
        assert!(config.analytics.is_none());
    }

    #[test]
    fn partial_site_section_keeps_other_defaults() {
        let config: SiteConfig =
            serde_json::from_str(r#"{"site": {"title": "Orbit"}}"#).unwrap();
        assert_eq!(config.site.title, "Orbit");
        assert_eq!(config.site.headline, "Your Next Big Thing");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<SiteConfig>(r#"{"sites": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let proxy = ProxySettings {
            backend_url: "https://api.example.com/".into(),
            timeout: 1000,
        };
        assert_eq!(proxy.base_url(), "https://api.example.com");
    }
}
