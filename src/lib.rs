/*!
# shroommap - filterable map of mushroom observations

shroommap keeps a map surface in sync with a set of geotagged mushroom
observations, narrowed by two independent categorical filters (cap color and
spot pattern).

## Example

```rust,ignore
use shroommap::{Attribute, MapConfig, MarkerLayer, Orchestrator, Source};

let config = MapConfig::from_env()?;
let mut app = Orchestrator::boot(MarkerLayer::new(), &config)?;
app.load(&Source::from_connection_string("builtin://mushrooms")?).await;

app.select(Attribute::Color, "red");
let geojson = app.surface().to_geojson();
```

## Architecture

```text
DataSource ──fetch──► RecordStore ──canonical──► filter::apply ──visible──► MarkerReconciler ──► MapSurface
                                                       ▲
                              FilterControl ──event────┘ (via Orchestrator)
```

- [`source`] - bulk-fetch data sources (built-in, file, HTTP)
- [`store`] - canonical and visible record sets
- [`filter`] - selection resolution and the pure filter function
- [`reconcile`] - clear-and-rebuild marker reconciliation
- [`control`] - filter controls emitting selection events
- [`surface`] - map surface trait, in-memory marker layer, Leaflet page writer
- [`orchestrator`] - startup sequencing and the event cycle
*/

use thiserror::Error;

pub mod config;
pub mod control;
pub mod filter;
pub mod model;
pub mod orchestrator;
pub mod reconcile;
pub mod source;
pub mod store;
pub mod surface;

pub use config::{ConfigError, MapConfig};
pub use control::{ControlEvent, FilterControl};
pub use filter::{Constraint, FilterSelection, SelectionMismatch};
pub use model::{Attribute, ColorTag, Enumeration, LatLng, Record, RecordId, SpotTag, Tag};
pub use orchestrator::{Orchestrator, Phase, Status};
pub use reconcile::{MarkerBinding, MarkerReconciler, RenderSummary};
pub use source::{DataSource, FetchError, Source};
pub use store::RecordStore;
pub use surface::{
    IconSpec, LeafletPage, MapSurface, MapView, MarkerHandle, MarkerLayer, MarkerSpec,
    PlacementError, SurfaceError,
};

/// Version of the shroommap library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main library error type
#[derive(Debug, Error)]
pub enum ShroomError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid data source: {0}")]
    SourceError(String),

    #[error("Output error: {0}")]
    WriterError(String),
}

pub type Result<T> = std::result::Result<T, ShroomError>;
