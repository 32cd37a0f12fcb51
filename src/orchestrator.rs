//! Startup sequencing and the filter event cycle
//!
//! ```text
//! Booting ──load()──► Loading ──ok──► Ready ◄──┐ control event:
//!                        │                     │   update selection,
//!                        └──err──► LoadFailed  └── refilter, render
//! ```
//!
//! The map surface is initialized in [`Orchestrator::boot`]; if that fails
//! nothing else can happen. Every later state keeps a usable surface, even
//! when the fetch fails.

use serde::Serialize;
use std::future::Future;
use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::control::{ControlEvent, FilterControl};
use crate::filter::FilterSelection;
use crate::model::{Attribute, Record, COLORS, SPOTS};
use crate::reconcile::{MarkerReconciler, RenderSummary};
use crate::source::{DataSource, FetchError};
use crate::store::RecordStore;
use crate::surface::{MapSurface, SurfaceError};

/// Pipeline lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Booting,
    Loading,
    Ready,
    LoadFailed,
}

/// User-facing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Loading,
    Ready,
    NoData,
    LoadFailed,
}

pub struct Orchestrator<S: MapSurface> {
    phase: Phase,
    store: RecordStore,
    selection: FilterSelection,
    color_control: FilterControl,
    spot_control: FilterControl,
    reconciler: MarkerReconciler<S>,
    load_error: Option<FetchError>,
}

impl<S: MapSurface> Orchestrator<S> {
    /// Initialize the map surface. Failure here is fatal.
    pub fn boot(mut surface: S, config: &MapConfig) -> Result<Self, SurfaceError> {
        surface.init(&config.view)?;
        info!(
            "Map surface initialized at {} (zoom {})",
            config.view.center, config.view.zoom
        );
        Ok(Self {
            phase: Phase::Booting,
            store: RecordStore::new(),
            selection: FilterSelection::new(),
            color_control: FilterControl::new(Attribute::Color),
            spot_control: FilterControl::new(Attribute::Spots),
            reconciler: MarkerReconciler::new(surface, config.icon.clone()),
            load_error: None,
        })
    }

    /// Fetch records from `source` and draw them
    pub async fn load<D: DataSource>(&mut self, source: &D) -> Phase {
        info!("Loading records from {}", source.describe());
        self.load_with(|| source.fetch()).await
    }

    /// Run the `Loading` transition with an arbitrary fetch operation.
    ///
    /// Only the first call does anything; later calls return the current
    /// phase.
    pub async fn load_with<F, Fut>(&mut self, fetch: F) -> Phase
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Record>, FetchError>>,
    {
        if self.phase != Phase::Booting {
            warn!("Records already requested (phase {:?}); skipping fetch", self.phase);
            return self.phase;
        }

        self.phase = Phase::Loading;
        match self.store.load(fetch).await {
            Ok(()) => {
                self.reconciler.render(self.store.visible());
                self.color_control.populate(&COLORS);
                self.spot_control.populate(&SPOTS);
                self.phase = Phase::Ready;
                info!("Ready with {} records", self.store.canonical().len());
            }
            Err(err) => {
                self.reconciler.render(&[]);
                self.color_control.disable();
                self.spot_control.disable();
                self.load_error = Some(err);
                self.phase = Phase::LoadFailed;
                warn!("Falling back to an empty map");
            }
        }
        self.phase
    }

    /// Process one control event: update the selection, refilter, redraw.
    ///
    /// Events outside `Ready` are ignored and return `None`.
    pub fn handle(&mut self, event: ControlEvent) -> Option<RenderSummary> {
        if self.phase != Phase::Ready {
            debug!("Ignoring {:?} in phase {:?}", event, self.phase);
            return None;
        }
        self.selection.update(&event);
        self.store.refilter(&self.selection);
        let visible = self.store.visible();
        debug!("{} of {} records visible", visible.len(), self.store.canonical().len());
        Some(self.reconciler.render(visible))
    }

    /// Pick `value` on the control for `attribute` and process the event
    pub fn select(&mut self, attribute: Attribute, value: &str) -> Option<RenderSummary> {
        let event = self.control_mut(attribute).select(value)?;
        self.handle(event)
    }

    /// Clear the control for `attribute` and process the event
    pub fn reset(&mut self, attribute: Attribute) -> Option<RenderSummary> {
        let event = self.control_mut(attribute).reset()?;
        self.handle(event)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> Status {
        match self.phase {
            Phase::Booting | Phase::Loading => Status::Loading,
            Phase::Ready if self.store.is_empty() => Status::NoData,
            Phase::Ready => Status::Ready,
            Phase::LoadFailed => Status::LoadFailed,
        }
    }

    pub fn load_error(&self) -> Option<&FetchError> {
        self.load_error.as_ref()
    }

    pub fn canonical(&self) -> &[Record] {
        self.store.canonical()
    }

    pub fn visible(&self) -> &[Record] {
        self.store.visible()
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn control(&self, attribute: Attribute) -> &FilterControl {
        match attribute {
            Attribute::Color => &self.color_control,
            Attribute::Spots => &self.spot_control,
        }
    }

    fn control_mut(&mut self, attribute: Attribute) -> &mut FilterControl {
        match attribute {
            Attribute::Color => &mut self.color_control,
            Attribute::Spots => &mut self.spot_control,
        }
    }

    pub fn reconciler(&self) -> &MarkerReconciler<S> {
        &self.reconciler
    }

    pub fn surface(&self) -> &S {
        self.reconciler.surface()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorTag, LatLng, RecordId, SpotTag};
    use crate::surface::MarkerLayer;

    fn scenario() -> Vec<Record> {
        vec![
            Record::new("R1", LatLng::new(52.0812, 5.2359), ColorTag::Red, SpotTag::White),
            Record::new("R2", LatLng::new(52.0813, 5.2360), ColorTag::Red, SpotTag::None),
            Record::new("R3", LatLng::new(52.0814, 5.2361), ColorTag::Brown, SpotTag::White),
        ]
    }

    fn booted() -> Orchestrator<MarkerLayer> {
        Orchestrator::boot(MarkerLayer::new(), &MapConfig::default()).unwrap()
    }

    fn visible_names(app: &Orchestrator<MarkerLayer>) -> Vec<&str> {
        app.visible().iter().map(|r| r.name.as_str()).collect()
    }

    fn assert_markers_match_visible(app: &Orchestrator<MarkerLayer>) {
        let visible: Vec<RecordId> = app.visible().iter().map(|r| r.id).collect();
        assert_eq!(app.reconciler().bound_records(), visible);
        assert_eq!(app.surface().marker_count(), visible.len());
    }

    #[test]
    fn test_boot_fails_on_bad_view() {
        let mut config = MapConfig::default();
        config.view.tile_url = "not a template".to_string();
        assert!(Orchestrator::boot(MarkerLayer::new(), &config).is_err());
    }

    #[tokio::test]
    async fn test_load_success_renders_everything() {
        let mut app = booted();
        assert_eq!(app.phase(), Phase::Booting);
        assert!(!app.control(Attribute::Color).is_enabled());

        let phase = app.load_with(|| async { Ok(scenario()) }).await;
        assert_eq!(phase, Phase::Ready);
        assert_eq!(app.status(), Status::Ready);
        assert_eq!(visible_names(&app), vec!["R1", "R2", "R3"]);
        assert_markers_match_visible(&app);
        assert!(app.control(Attribute::Color).is_enabled());
        assert_eq!(app.control(Attribute::Spots).options().len(), 5);
    }

    #[tokio::test]
    async fn test_filter_scenario() {
        let mut app = booted();
        app.load_with(|| async { Ok(scenario()) }).await;

        app.select(Attribute::Color, "0").unwrap();
        assert_eq!(visible_names(&app), vec!["R1", "R2"]);
        assert_markers_match_visible(&app);

        app.select(Attribute::Spots, "white").unwrap();
        assert_eq!(visible_names(&app), vec!["R1"]);
        assert_markers_match_visible(&app);

        app.reset(Attribute::Color).unwrap();
        assert_eq!(visible_names(&app), vec!["R1", "R3"]);
        assert_markers_match_visible(&app);
        assert_eq!(app.control(Attribute::Color).value(), None);
        assert_eq!(app.canonical().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_selection_empties_map() {
        let mut app = booted();
        app.load_with(|| async { Ok(scenario()) }).await;

        let summary = app.select(Attribute::Color, "purple").unwrap();
        assert_eq!(summary.placed, 0);
        assert!(app.visible().is_empty());
        assert_eq!(app.surface().marker_count(), 0);

        app.reset(Attribute::Color).unwrap();
        assert_eq!(app.visible().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_fetch_is_no_data() {
        let mut app = booted();
        let phase = app.load_with(|| async { Ok(Vec::new()) }).await;
        assert_eq!(phase, Phase::Ready);
        assert_eq!(app.status(), Status::NoData);
        assert!(app.visible().is_empty());
        assert_eq!(app.surface().marker_count(), 0);
        assert!(app.load_error().is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_empty_map() {
        let mut app = booted();
        let phase = app
            .load_with(|| async { Err(FetchError::Unreachable("connection refused".to_string())) })
            .await;

        assert_eq!(phase, Phase::LoadFailed);
        assert_eq!(app.status(), Status::LoadFailed);
        assert!(app.surface().is_initialized());
        assert_eq!(app.surface().marker_count(), 0);
        assert!(!app.control(Attribute::Color).is_enabled());
        assert!(!app.control(Attribute::Spots).is_enabled());
        assert!(matches!(app.load_error(), Some(FetchError::Unreachable(_))));

        // controls are hidden, so nothing happens
        assert!(app.select(Attribute::Color, "0").is_none());
        assert!(app
            .handle(ControlEvent::Reset { attribute: Attribute::Color })
            .is_none());
    }

    #[tokio::test]
    async fn test_single_fetch_per_session() {
        let mut app = booted();
        app.load_with(|| async { Ok(scenario()) }).await;
        let phase = app.load_with(|| async { Ok(Vec::new()) }).await;
        assert_eq!(phase, Phase::Ready);
        assert_eq!(app.canonical().len(), 3);
    }

    #[tokio::test]
    async fn test_events_before_load_are_ignored() {
        let mut app = booted();
        let event = ControlEvent::SelectionChanged {
            attribute: Attribute::Color,
            value: "0".to_string(),
        };
        assert!(app.handle(event).is_none());
        assert!(app.selection().is_unconstrained());
    }

    #[cfg(feature = "builtin-data")]
    #[tokio::test]
    async fn test_load_builtin_source() {
        let mut app = booted();
        let phase = app.load(&crate::source::BuiltinSource).await;
        assert_eq!(phase, Phase::Ready);
        assert_markers_match_visible(&app);

        app.select(Attribute::Color, "red");
        assert!(app.visible().iter().all(|r| r.color == ColorTag::Red));
        assert_markers_match_visible(&app);
    }
}
