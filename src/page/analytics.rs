//! Browser-only analytics bootstrap.
//!
//! Emits a module script that loads the Firebase web SDK from the CDN
//! and initializes Analytics with the configured web app settings. The
//! server never talks to the analytics service itself.

use serde::Serialize;

use crate::config::model::AnalyticsConfig;

const SDK_BASE: &str = "https://www.gstatic.com/firebasejs";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WebConfig<'a> {
    api_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_domain: Option<&'a str>,
    project_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_bucket: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    messaging_sender_id: Option<&'a str>,
    app_id: &'a str,
    measurement_id: &'a str,
}

/// Serialize to JSON that is safe inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

pub fn bootstrap_script(config: &AnalyticsConfig) -> Result<String, serde_json::Error> {
    let web_config = WebConfig {
        api_key: &config.api_key,
        auth_domain: config.auth_domain.as_deref(),
        project_id: &config.project_id,
        storage_bucket: config.storage_bucket.as_deref(),
        messaging_sender_id: config.messaging_sender_id.as_deref(),
        app_id: &config.app_id,
        measurement_id: &config.measurement_id,
    };
    let app_sdk = format!("{SDK_BASE}/{}/firebase-app.js", config.sdk_version);
    let analytics_sdk = format!("{SDK_BASE}/{}/firebase-analytics.js", config.sdk_version);

    Ok(format!(
        "<script type=\"module\">\n\
         import {{ initializeApp }} from {};\n\
         import {{ getAnalytics, isSupported }} from {};\n\
         const app = initializeApp({});\n\
         isSupported().then((ok) => {{ if (ok) getAnalytics(app); }});\n\
         </script>",
        script_json(&app_sdk)?,
        script_json(&analytics_sdk)?,
        script_json(&web_config)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AnalyticsConfig {
        AnalyticsConfig {
            sdk_version: "10.12.2".into(),
            api_key: "AIzaTest".into(),
            auth_domain: Some("demo.firebaseapp.com".into()),
            project_id: "demo".into(),
            storage_bucket: None,
            messaging_sender_id: None,
            app_id: "1:2:web:3".into(),
            measurement_id: "G-TEST".into(),
        }
    }

    #[test]
    fn script_carries_camel_case_config() {
        let script = bootstrap_script(&config()).unwrap();
        assert!(script.contains(r#""apiKey":"AIzaTest""#));
        assert!(script.contains(r#""authDomain":"demo.firebaseapp.com""#));
        assert!(script.contains(r#""measurementId":"G-TEST""#));
        assert!(!script.contains("storageBucket"));
        assert!(script.contains("https://www.gstatic.com/firebasejs/10.12.2/firebase-analytics.js"));
    }

    #[test]
    fn closing_tags_cannot_escape_the_script() {
        let mut config = config();
        config.project_id = "</script><script>alert(1)".into();
        let script = bootstrap_script(&config).unwrap();
        assert_eq!(script.matches("</script>").count(), 1);
        assert!(script.contains("\\u003c/script\\u003e"));
    }
}
