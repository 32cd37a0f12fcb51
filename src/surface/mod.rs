//! Map surface abstraction
//!
//! The map surface is the external drawing collaborator. The pipeline only
//! needs to initialize it with a view and add or remove markers; everything
//! else (tiles, pixels, DOM) stays behind this trait.
//!
//! # Implementations
//!
//! - [`MarkerLayer`] - in-memory marker layer with GeoJSON export
//!
//! [`LeafletPage`] turns a view plus a marker layer into a standalone HTML
//! page.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::LatLng;

pub mod layer;
pub mod leaflet;

pub use layer::MarkerLayer;
pub use leaflet::LeafletPage;

/// Highest zoom level accepted by slippy-map tile servers
pub const MAX_ZOOM: u8 = 22;

/// Map surface could not be initialized
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("Invalid map center {0}")]
    InvalidCenter(LatLng),

    #[error("Zoom level {0} exceeds the maximum of 22")]
    InvalidZoom(u8),

    #[error("Tile URL template '{0}' must contain {{z}}, {{x}} and {{y}}")]
    InvalidTileUrl(String),
}

/// A single marker could not be placed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("Invalid marker coordinate {0}")]
    InvalidCoordinate(LatLng),

    #[error("Map surface has not been initialized")]
    NotInitialized,
}

/// Initial map viewport and base tile layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    /// Slippy-map template, e.g. `https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png`
    pub tile_url: String,
}

impl MapView {
    pub fn validate(&self) -> Result<(), SurfaceError> {
        if !self.center.is_valid() {
            return Err(SurfaceError::InvalidCenter(self.center));
        }
        if self.zoom > MAX_ZOOM {
            return Err(SurfaceError::InvalidZoom(self.zoom));
        }
        if !["{z}", "{x}", "{y}"]
            .iter()
            .all(|placeholder| self.tile_url.contains(placeholder))
        {
            return Err(SurfaceError::InvalidTileUrl(self.tile_url.clone()));
        }
        Ok(())
    }
}

/// Marker icon descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSpec {
    pub url: String,
    /// Width and height in pixels
    pub size: (u32, u32),
    /// Popup offset relative to the icon anchor
    pub popup_anchor: (i32, i32),
}

impl Default for IconSpec {
    fn default() -> Self {
        Self {
            url: "./images/mushroom.svg".to_string(),
            size: (66, 64),
            popup_anchor: (0, -28),
        }
    }
}

/// Everything the surface needs to draw one marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSpec {
    pub position: LatLng,
    pub icon: IconSpec,
    /// Style class attached to the marker element
    pub class_name: String,
    /// Hex fill color for surfaces without stylesheets
    pub fill: String,
    pub popup: String,
}

/// Surface-issued identifier of a placed marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MarkerHandle(pub u64);

/// Trait for map surfaces
pub trait MapSurface {
    /// Set up the viewport and base tile layer
    fn init(&mut self, view: &MapView) -> Result<(), SurfaceError>;

    /// Place a marker, returning its handle
    fn add_marker(&mut self, marker: MarkerSpec) -> Result<MarkerHandle, PlacementError>;

    /// Remove a marker. Returns `false` if the handle is unknown.
    fn remove_marker(&mut self, handle: MarkerHandle) -> bool;

    /// Number of markers currently drawn
    fn marker_count(&self) -> usize;
}
