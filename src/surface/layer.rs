//! In-memory marker layer
//!
//! Keeps placed markers keyed by handle and exports them as a GeoJSON
//! FeatureCollection. Coordinates outside WGS84 bounds are rejected at
//! placement time.

use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

use super::{MapSurface, MapView, MarkerHandle, MarkerSpec, PlacementError, SurfaceError};

#[derive(Debug, Default)]
pub struct MarkerLayer {
    view: Option<MapView>,
    markers: BTreeMap<MarkerHandle, MarkerSpec>,
    next_handle: u64,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport set by [`MapSurface::init`]
    pub fn view(&self) -> Option<&MapView> {
        self.view.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.view.is_some()
    }

    pub fn get(&self, handle: MarkerHandle) -> Option<&MarkerSpec> {
        self.markers.get(&handle)
    }

    /// Markers in placement order
    pub fn markers(&self) -> impl Iterator<Item = (MarkerHandle, &MarkerSpec)> + '_ {
        self.markers.iter().map(|(handle, spec)| (*handle, spec))
    }

    /// GeoJSON FeatureCollection of the drawn markers.
    ///
    /// GeoJSON orders coordinates as `[lon, lat]`.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .markers()
            .map(|(handle, spec)| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [spec.position.lon, spec.position.lat],
                    },
                    "properties": {
                        "handle": handle.0,
                        "popup": spec.popup,
                        "className": spec.class_name,
                        "marker-color": spec.fill,
                        "icon": spec.icon,
                    },
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

impl MapSurface for MarkerLayer {
    fn init(&mut self, view: &MapView) -> Result<(), SurfaceError> {
        view.validate()?;
        self.view = Some(view.clone());
        self.markers.clear();
        Ok(())
    }

    fn add_marker(&mut self, marker: MarkerSpec) -> Result<MarkerHandle, PlacementError> {
        if self.view.is_none() {
            return Err(PlacementError::NotInitialized);
        }
        if !marker.position.is_valid() {
            return Err(PlacementError::InvalidCoordinate(marker.position));
        }
        let handle = MarkerHandle(self.next_handle);
        self.next_handle += 1;
        debug!("Placed marker {} at {}", handle.0, marker.position);
        self.markers.insert(handle, marker);
        Ok(handle)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) -> bool {
        self.markers.remove(&handle).is_some()
    }

    fn marker_count(&self) -> usize {
        self.markers.len()
    }
}
