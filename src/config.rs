//! Map configuration
//!
//! Defaults can be overridden through environment variables:
//!
//! | Variable             | Field            |
//! |----------------------|------------------|
//! | `SHROOMMAP_LAT`      | view center lat  |
//! | `SHROOMMAP_LON`      | view center lon  |
//! | `SHROOMMAP_ZOOM`     | view zoom        |
//! | `SHROOMMAP_TILE_URL` | tile URL template |
//!
//! Command line flags are applied on top by the binaries.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::model::LatLng;
use crate::surface::{IconSpec, MapView, SurfaceError};

pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 52.081222,
    lon: 5.235965,
};
pub const DEFAULT_ZOOM: u8 = 19;
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    InvalidEnv { key: String, value: String },

    #[error(transparent)]
    InvalidView(#[from] SurfaceError),
}

/// Everything needed to boot the map surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub view: MapView,
    pub icon: IconSpec,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            view: MapView {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM,
                tile_url: DEFAULT_TILE_URL.to_string(),
            },
            icon: IconSpec::default(),
        }
    }
}

impl MapConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides taken from `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(lat) = parse_var(&lookup, "SHROOMMAP_LAT")? {
            config.view.center.lat = lat;
        }
        if let Some(lon) = parse_var(&lookup, "SHROOMMAP_LON")? {
            config.view.center.lon = lon;
        }
        if let Some(zoom) = parse_var(&lookup, "SHROOMMAP_ZOOM")? {
            config.view.zoom = zoom;
        }
        if let Some(url) = lookup("SHROOMMAP_TILE_URL") {
            config.view.tile_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.view.validate()?;
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                key: key.to_string(),
                value,
            }),
    }
}
