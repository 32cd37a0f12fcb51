//! Marker reconciliation
//!
//! [`MarkerReconciler`] owns the map surface and keeps the drawn markers in
//! step with the visible set. Every [`render`](MarkerReconciler::render)
//! removes all bound markers and places a fresh one per visible record. A
//! record the surface refuses to place is skipped; the rest still render.

use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{ColorTag, Record, RecordId, Tag};
use crate::surface::{IconSpec, MapSurface, MarkerHandle, MarkerSpec, PlacementError};

/// Fill used if a color name fails to parse
const FALLBACK_FILL: &str = "#808080";

/// A record currently drawn as a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerBinding {
    pub record: RecordId,
    pub handle: MarkerHandle,
}

/// Outcome of one render pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSummary {
    pub placed: usize,
    pub skipped: Vec<(RecordId, PlacementError)>,
}

pub struct MarkerReconciler<S: MapSurface> {
    surface: S,
    icon: IconSpec,
    bindings: Vec<MarkerBinding>,
}

impl<S: MapSurface> MarkerReconciler<S> {
    /// Take ownership of an initialized surface
    pub fn new(surface: S, icon: IconSpec) -> Self {
        Self {
            surface,
            icon,
            bindings: Vec::new(),
        }
    }

    /// Draw exactly the records in `visible`
    pub fn render(&mut self, visible: &[Record]) -> RenderSummary {
        self.clear();

        let mut summary = RenderSummary::default();
        for record in visible {
            match self.surface.add_marker(marker_for(record, &self.icon)) {
                Ok(handle) => {
                    self.bindings.push(MarkerBinding {
                        record: record.id,
                        handle,
                    });
                    summary.placed += 1;
                }
                Err(err) => {
                    warn!("Skipping record {} ({}): {}", record.id, record.name, err);
                    summary.skipped.push((record.id, err));
                }
            }
        }

        debug!(
            "Rendered {} markers, skipped {}",
            summary.placed,
            summary.skipped.len()
        );
        summary
    }

    /// Remove every bound marker from the surface
    pub fn clear(&mut self) {
        for binding in self.bindings.drain(..) {
            if !self.surface.remove_marker(binding.handle) {
                warn!(
                    "Marker {} for record {} was already gone",
                    binding.handle.0, binding.record
                );
            }
        }
    }

    pub fn bindings(&self) -> &[MarkerBinding] {
        &self.bindings
    }

    /// Ids of the records currently drawn, in render order
    pub fn bound_records(&self) -> Vec<RecordId> {
        self.bindings.iter().map(|binding| binding.record).collect()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

/// Build the marker for one record
pub fn marker_for(record: &Record, icon: &IconSpec) -> MarkerSpec {
    MarkerSpec {
        position: record.position,
        icon: icon.clone(),
        class_name: style_class(record.color),
        fill: fill_color(record.color),
        popup: popup_html(record),
    }
}

/// Popup markup for one record
pub fn popup_html(record: &Record) -> String {
    let mut html = String::from("<ul class=\"popup-list\">");
    html.push_str(&format!(
        "<li class=\"capitalize\">Name: {}</li>",
        html_escape::encode_text(&record.name)
    ));
    html.push_str(&format!(
        "<li class=\"capitalize\">Spots: {}</li>",
        record.spots.label()
    ));
    html.push_str(&format!(
        "<li class=\"capitalize\">Color: {}</li>",
        record.color.label()
    ));
    html.push_str("</ul>");
    html
}

/// Style class for a color, e.g. `mushroom-color-red`
pub fn style_class(color: ColorTag) -> String {
    format!("mushroom-color-{}", color.name()).to_lowercase()
}

/// Hex fill for a color, resolved through CSS named colors
pub fn fill_color(color: ColorTag) -> String {
    csscolorparser::parse(color.name())
        .map(|c| c.to_css_hex())
        .unwrap_or_else(|_| FALLBACK_FILL.to_string())
}
