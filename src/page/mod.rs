//! Landing page shell and its handlers.
//!
//! [`render`] builds the whole HTML document: metadata, icon and manifest
//! links, the hero, the waitlist form (or the success panel), the footer,
//! the optional [`analytics`] bootstrap, and a small script that submits
//! the form through `/api/proxy` without a page load. Without JavaScript
//! the form posts to `/waitlist`, which [`waitlist_handler`] answers with
//! the page rendered in the resulting state.

pub mod analytics;
pub mod manifest;

use std::fmt::Write;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse};
use axum::{Form, Json};
use chrono::Datelike;

use crate::client::{BackendClient, DEFAULT_JOIN_ERROR};
use crate::config::model::SiteConfig;
use crate::form::{self, FormOutcome, Submission};
use crate::proxy::request_id;
use crate::server::AppState;

const SCRIPT: &str = include_str!("waitlist.js");

const STYLE: &str = "\
*{box-sizing:border-box}\
body{margin:0;font-family:system-ui,-apple-system,Segoe UI,Roboto,sans-serif;color:#111827;\
background:linear-gradient(#f9fafb,#fff);-webkit-font-smoothing:antialiased}\
main{max-width:80rem;margin:0 auto;padding:5rem 1rem 4rem;text-align:center;min-height:80vh}\
h1{font-size:clamp(2.5rem,6vw,3.75rem);margin:0 0 1.5rem}\
.accent{color:var(--brand)}\
.tagline{font-size:1.25rem;color:#4b5563;max-width:48rem;margin:0 auto 2rem}\
.waitlist{max-width:28rem;margin:0 auto}\
.lead{color:#4b5563}\
.row{display:flex;flex-wrap:wrap;gap:.75rem}\
.row input{flex:1;min-width:12rem;padding:.75rem 1rem;border:1px solid #d1d5db;border-radius:.5rem}\
.row button{padding:.75rem 1.5rem;border:0;border-radius:.5rem;background:var(--brand);color:#fff;font-weight:600;cursor:pointer}\
.row button:disabled{opacity:.5;cursor:not-allowed}\
.consent{display:flex;gap:.5rem;align-items:flex-start;margin-top:1rem;font-size:.75rem;color:#4b5563;text-align:left}\
.error{color:#dc2626;font-size:.875rem}\
.note{font-size:.75rem;color:#6b7280}\
.success{background:#f0fdf4;border:1px solid #bbf7d0;border-radius:.5rem;padding:1.5rem;color:#15803d}\
.success h3{color:#14532d}\
footer{border-top:1px solid #e5e7eb;padding:2rem 1rem;text-align:center;color:#6b7280}";

const SUCCESS_PANEL: &str = "<div class=\"success\">\
<svg width=\"48\" height=\"48\" fill=\"none\" stroke=\"currentColor\" viewBox=\"0 0 24 24\" aria-hidden=\"true\">\
<path stroke-linecap=\"round\" stroke-linejoin=\"round\" stroke-width=\"2\" \
d=\"M9 12l2 2 4-4m6 2a9 9 0 11-18 0 9 9 0 0118 0z\"/></svg>\
<h3>You're on the list!</h3>\
<p>We'll notify you as soon as we launch.</p></div>";

/// Form state to render.
#[derive(Debug, Default)]
pub struct FormView<'a> {
    pub email: &'a str,
    pub consent: bool,
    pub message: Option<&'a str>,
    pub joined: bool,
}

#[must_use]
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Resolve a root-relative asset against the canonical site URL.
fn absolute(site_url: &str, path: &str) -> String {
    if path.starts_with('/') && !site_url.is_empty() {
        format!("{}{path}", site_url.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}

fn write_head(out: &mut String, config: &SiteConfig) {
    let site = &config.site;
    let title = escape(&site.title);
    let description = escape(&site.description);
    let image = escape(&absolute(&site.url, &site.og_image));

    // write! to String is infallible (only fails on OOM which is unrecoverable)
    let _ = write!(
        out,
        "<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <meta name=\"description\" content=\"{description}\">\n\
         <meta name=\"keywords\" content=\"{}\">\n\
         <meta name=\"author\" content=\"{}\">\n\
         <meta name=\"robots\" content=\"index, follow\">\n\
         <meta name=\"theme-color\" content=\"{}\">\n\
         <meta property=\"og:type\" content=\"website\">\n",
        escape(&site.keywords.join(", ")),
        escape(&site.author),
        escape(&site.theme_color),
    );
    if !site.url.is_empty() {
        let _ = writeln!(out, "<meta property=\"og:url\" content=\"{}\">", escape(&site.url));
    }
    let _ = writeln!(out, "<meta property=\"og:title\" content=\"{title}\">");
    let _ = writeln!(out, "<meta property=\"og:description\" content=\"{description}\">");
    if !site.og_image.is_empty() {
        let _ = writeln!(out, "<meta property=\"og:image\" content=\"{image}\">");
    }
    let _ = writeln!(out, "<meta name=\"twitter:card\" content=\"summary_large_image\">");
    let _ = writeln!(out, "<meta name=\"twitter:title\" content=\"{title}\">");
    let _ = writeln!(out, "<meta name=\"twitter:description\" content=\"{description}\">");
    if !site.og_image.is_empty() {
        let _ = writeln!(out, "<meta name=\"twitter:image\" content=\"{image}\">");
    }
    out.push_str(
        "<link rel=\"icon\" type=\"image/x-icon\" href=\"/favicon_io/favicon.ico\">\n\
         <link rel=\"apple-touch-icon\" sizes=\"180x180\" href=\"/favicon_io/apple-touch-icon.png\">\n\
         <link rel=\"icon\" type=\"image/png\" sizes=\"32x32\" href=\"/favicon_io/favicon-32x32.png\">\n\
         <link rel=\"icon\" type=\"image/png\" sizes=\"16x16\" href=\"/favicon_io/favicon-16x16.png\">\n\
         <link rel=\"manifest\" href=\"/favicon_io/site.webmanifest\">\n",
    );
    let _ = writeln!(
        out,
        "<style>:root{{--brand:{}}}{STYLE}</style>",
        escape(&site.theme_color)
    );

    if let Some(analytics) = &config.analytics {
        match analytics::bootstrap_script(analytics) {
            Ok(script) => {
                out.push_str(&script);
                out.push('\n');
            }
            Err(e) => tracing::warn!(error = %e, "skipping analytics bootstrap"),
        }
    }
    out.push_str("</head>\n");
}

fn write_form(out: &mut String, config: &SiteConfig, view: &FormView<'_>) {
    let contact = escape(&config.site.contact_email);
    let _ = write!(
        out,
        "<h2>Join the waiting list</h2>\n\
         <p class=\"lead\">Be the first to know when we launch.</p>\n\
         <form id=\"waitlist-form\" method=\"post\" action=\"/waitlist\" \
         data-consent-message=\"{}\" data-already-message=\"{}\" \
         data-generic-message=\"{}\" data-default-message=\"{}\">\n\
         <div class=\"row\">\
         <input type=\"email\" name=\"email\" value=\"{}\" placeholder=\"Enter your email\" \
         autocomplete=\"email\" required>\
         <button type=\"submit\">Join Waitlist</button></div>\n\
         <label class=\"consent\"><input type=\"checkbox\" id=\"consent\" name=\"consent\"{} required>\
         <span>I consent to storing my email address to notify me when the service launches. \
         You can unsubscribe at any time by emailing \
         <a href=\"mailto:{contact}?subject=Unsubscribe%20from%20Waitlist\">{contact}</a>.</span></label>\n",
        escape(form::CONSENT_REQUIRED),
        escape(form::ALREADY_ON_WAITLIST),
        escape(form::GENERIC_FAILURE),
        escape(DEFAULT_JOIN_ERROR),
        escape(view.email),
        if view.consent { " checked" } else { "" },
    );
    match view.message {
        Some(message) => {
            let _ = writeln!(
                out,
                "<p id=\"waitlist-error\" class=\"error\" role=\"alert\">{}</p>",
                escape(message)
            );
        }
        None => out.push_str("<p id=\"waitlist-error\" class=\"error\" role=\"alert\" hidden></p>\n"),
    }
    out.push_str(
        "<p class=\"note\">We only use your email to notify you when we launch. No spam, ever.</p>\n\
         </form>\n",
    );
}

#[must_use]
pub fn render(config: &SiteConfig, view: &FormView<'_>) -> String {
    let site = &config.site;
    let mut out = String::with_capacity(8 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n");
    write_head(&mut out, config);

    let _ = write!(
        out,
        "<body>\n<main>\n<h1>{}<br><span class=\"accent\">{}</span></h1>\n\
         <p class=\"tagline\">{}</p>\n<section id=\"waitlist\" class=\"waitlist\">\n",
        escape(&site.headline),
        escape(&site.headline_accent),
        escape(&site.tagline),
    );
    if view.joined {
        out.push_str(SUCCESS_PANEL);
        out.push('\n');
    } else {
        write_form(&mut out, config, view);
    }
    let _ = write!(
        out,
        "</section>\n</main>\n\
         <template id=\"waitlist-success\">{SUCCESS_PANEL}</template>\n\
         <footer><p>&copy; {} {}. All rights reserved.</p></footer>\n\
         <script>\n{SCRIPT}</script>\n</body>\n</html>\n",
        chrono::Utc::now().year(),
        escape(&site.company),
    );
    out
}

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render(&state.config.config, &FormView::default()))
}

pub async fn waitlist_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(submission): Form<Submission>,
) -> Html<String> {
    let request_id = request_id(&headers);
    let api = BackendClient::new(&state.backend, &request_id);
    let outcome = form::submit(&api, &submission).await;

    match &outcome {
        FormOutcome::Success => {
            state.stats.signups.fetch_add(1, Ordering::Relaxed);
            tracing::info!(request_id = %request_id, "waitlist signup accepted");
        }
        FormOutcome::Invalid(message) => {
            tracing::info!(request_id = %request_id, reason = %message, "waitlist form rejected");
        }
        FormOutcome::Failed(message) => {
            tracing::warn!(request_id = %request_id, reason = %message, "waitlist signup failed");
        }
    }

    let view = FormView {
        email: &submission.email,
        consent: submission.consent,
        message: outcome.message(),
        joined: outcome == FormOutcome::Success,
    };
    Html(render(&state.config.config, &view))
}

pub async fn manifest_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        Json(manifest::web_manifest(&state.config.config.site)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::AnalyticsConfig;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn default_page_has_metadata_and_form() {
        let html = render(&SiteConfig::default(), &FormView::default());
        assert!(html.contains("<title>Your App - Modern Web Application</title>"));
        assert!(html.contains("<meta name=\"theme-color\" content=\"#2563eb\">"));
        assert!(html.contains("og:description"));
        assert!(html.contains("<link rel=\"manifest\" href=\"/favicon_io/site.webmanifest\">"));
        assert!(html.contains("placeholder=\"Enter your email\""));
        assert!(html.contains("Join Waitlist"));
        assert!(html.contains("id=\"waitlist-error\" class=\"error\" role=\"alert\" hidden"));
        assert!(!html.contains("firebase-app.js"));
    }

    #[test]
    fn og_image_is_absolute_when_site_url_is_known() {
        let mut config = SiteConfig::default();
        config.site.url = "https://launch.example.com/".into();
        let html = render(&config, &FormView::default());
        assert!(html.contains("content=\"https://launch.example.com/og-image.png\""));
    }

    #[test]
    fn failed_view_keeps_input_and_shows_message() {
        let view = FormView {
            email: "a@example.com",
            consent: true,
            message: Some(form::ALREADY_ON_WAITLIST),
            joined: false,
        };
        let html = render(&SiteConfig::default(), &view);
        assert!(html.contains("value=\"a@example.com\""));
        assert!(html.contains(" checked required"));
        assert!(html.contains("This email is already on the waitlist!</p>"));
    }

    #[test]
    fn joined_view_replaces_form_with_success_panel() {
        let view = FormView {
            joined: true,
            ..FormView::default()
        };
        let html = render(&SiteConfig::default(), &view);
        assert!(!html.contains("<form"));
        assert!(html.contains("<section id=\"waitlist\" class=\"waitlist\">\n<div class=\"success\">"));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut config = SiteConfig::default();
        config.site.headline = "<script>alert(1)</script>".into();
        let view = FormView {
            email: "\"><img src=x>",
            ..FormView::default()
        };
        let html = render(&config, &view);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("value=\"&quot;&gt;&lt;img src=x&gt;\""));
    }

    #[test]
    fn analytics_script_only_when_configured() {
        let mut config = SiteConfig::default();
        config.analytics = Some(AnalyticsConfig {
            sdk_version: "10.12.2".into(),
            api_key: "key".into(),
            auth_domain: None,
            project_id: "demo".into(),
            storage_bucket: None,
            messaging_sender_id: None,
            app_id: "1:2:web:3".into(),
            measurement_id: "G-TEST".into(),
        });
        let html = render(&config, &FormView::default());
        assert!(html.contains("firebase-analytics.js"));
        assert!(html.find("firebase-app.js") < html.find("</head>"));
    }
}
