//! Leaflet HTML page writer
//!
//! Renders an initialized [`MarkerLayer`] into a standalone HTML document
//! that draws the same markers with Leaflet in a browser.
//!
//! # Example
//!
//! ```rust,ignore
//! use shroommap::LeafletPage;
//!
//! let html = LeafletPage::new().render(app.surface())?;
//! std::fs::write("map.html", html)?;
//! ```

use serde_json::{json, Value};

use super::MarkerLayer;
use crate::{Result, ShroomError};

const LEAFLET_VERSION: &str = "1.9.4";

/// Leaflet page writer
pub struct LeafletPage {
    title: String,
    leaflet_version: String,
}

impl LeafletPage {
    pub fn new() -> Self {
        Self {
            title: "Mushroom map".to_string(),
            leaflet_version: LEAFLET_VERSION.to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Render the layer's view and markers as an HTML document
    pub fn render(&self, layer: &MarkerLayer) -> Result<String> {
        let view = layer.view().ok_or_else(|| {
            ShroomError::WriterError("Map surface has not been initialized".to_string())
        })?;

        let markers: Vec<Value> = layer
            .markers()
            .map(|(_, spec)| {
                json!({
                    "position": [spec.position.lat, spec.position.lon],
                    "icon": {
                        "iconUrl": spec.icon.url,
                        "iconSize": [spec.icon.size.0, spec.icon.size.1],
                        "popupAnchor": [spec.icon.popup_anchor.0, spec.icon.popup_anchor.1],
                        "className": spec.class_name,
                    },
                    "popup": spec.popup,
                })
            })
            .collect();

        let config = json!({
            "center": [view.center.lat, view.center.lon],
            "zoom": view.zoom,
            "tileUrl": view.tile_url,
            "markers": markers,
        });
        let config = serde_json::to_string(&config)
            .map_err(|e| ShroomError::WriterError(format!("Failed to serialize map: {}", e)))?;

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const config = {config};
const map = L.map('map', {{ center: config.center, zoom: config.zoom }});
L.tileLayer(config.tileUrl).addTo(map);
const markers = L.layerGroup().addTo(map);
for (const m of config.markers) {{
  L.marker(m.position, {{ icon: L.icon(m.icon) }}).addTo(markers).bindPopup(m.popup);
}}
</script>
</body>
</html>
"#,
            title = html_escape::encode_text(&self.title),
            version = self.leaflet_version,
            config = escape_script(&config),
        ))
    }
}

impl Default for LeafletPage {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep embedded JSON from closing the surrounding `<script>` element
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}
