//! Web app manifest served at `/favicon_io/site.webmanifest`.

use serde::Serialize;

use crate::config::model::SiteMeta;

#[derive(Debug, Serialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub icons: Vec<ManifestIcon>,
    pub theme_color: String,
    pub background_color: String,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime: String,
}

fn icon(size: u32) -> ManifestIcon {
    ManifestIcon {
        src: format!("/favicon_io/android-chrome-{size}x{size}.png"),
        sizes: format!("{size}x{size}"),
        mime: "image/png".into(),
    }
}

#[must_use]
pub fn web_manifest(site: &SiteMeta) -> WebManifest {
    // "Your App - Modern Web Application" -> "Your App"
    let short_name = site
        .title
        .split(" - ")
        .next()
        .unwrap_or(&site.title)
        .trim()
        .to_string();

    WebManifest {
        name: site.title.clone(),
        short_name,
        icons: vec![icon(192), icon(512)],
        theme_color: site.theme_color.clone(),
        background_color: "#ffffff".into(),
        display: "standalone".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_uses_site_identity() {
        let manifest = web_manifest(&SiteMeta::default());
        assert_eq!(manifest.short_name, "Your App");
        assert_eq!(manifest.theme_color, "#2563eb");

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["icons"][0]["type"], "image/png");
        assert_eq!(json["icons"][1]["sizes"], "512x512");
    }
}
