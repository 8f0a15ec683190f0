//! geoscribe application - interactive feature map
//!
//! [`MapApp`] ties the pieces together:
//! - the [`FeatureStore`] both views render from
//! - the [`ModeController`] and [`SelectionSync`] driving the [`MapSurface`]
//! - the list panel, legend, naming dialog and place search
//!
//! The app never performs I/O. `update` returns [`Effect`]s (persistence
//! calls, geocoding searches, downloads) that the host executes, feeding the
//! results back as messages.

use geoscribe_geo::{GeometryCodec, Measurement};
use serde::Serialize;

use crate::config::AppConfig;
use crate::geocode::{GeocodeQuery, GeocodeResult};
use crate::list::ListView;
use crate::loading::LoadingIndicator;
use crate::message::Message;
use crate::mode::{InteractionMode, ModeController};
use crate::model::{FeatureId, PendingDraft, VisibilityFilter};
use crate::notice::{Notice, Notices};
use crate::persist::{PersistRequest, PersistTask};
use crate::selection::SelectionSync;
use crate::store::FeatureStore;
use crate::surface::{MapSurface, SurfaceSnapshot};

/// Work the host performs on behalf of the app.
#[derive(Debug)]
pub enum Effect {
    /// Run against the persistence API, then send `Message::Persisted`
    Persist(PersistTask),
    /// Run a place search, then send `GeocodeMessage::Results`
    Geocode(GeocodeQuery),
    /// Offer a document for download, then send `ExportMessage::Finished`
    Download { file_name: String, contents: String },
}

// ============================================================================
// Render state
// ============================================================================

/// Details panel contents for the selected feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedDetails<'a> {
    pub id: &'a FeatureId,
    pub name: &'a str,
    pub geometry_type: &'static str,
    pub editing: bool,
}

/// Everything the host needs to draw the screen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderState<'a> {
    pub map: SurfaceSnapshot<'a>,
    pub mode: InteractionMode,
    pub loading: bool,
    pub list: ListView,
    pub selected: Option<SelectedDetails<'a>>,
    pub draft: Option<&'a PendingDraft>,
    pub geocode_results: &'a [GeocodeResult],
    pub last_measurement: Option<&'a Measurement>,
}

// ============================================================================
// Application
// ============================================================================

pub struct MapApp {
    pub(crate) config: AppConfig,
    pub(crate) codec: GeometryCodec,
    pub(crate) store: FeatureStore,
    pub(crate) filter: VisibilityFilter,
    pub(crate) mode: ModeController,
    pub(crate) selection: SelectionSync,
    pub(crate) surface: MapSurface,
    /// Drawn shape waiting in the naming dialog
    pub(crate) draft: Option<PendingDraft>,
    /// List panel search text
    pub(crate) search: String,
    pub(crate) geocode_results: Vec<GeocodeResult>,
    pub(crate) last_measurement: Option<Measurement>,
    pub(crate) loading: LoadingIndicator,
    pub(crate) notices: Notices,
}

impl MapApp {
    pub fn new(config: AppConfig) -> Self {
        let surface = MapSurface::new(&config);
        Self {
            codec: GeometryCodec::new(),
            store: FeatureStore::new(),
            filter: VisibilityFilter::default(),
            mode: ModeController::new(),
            selection: SelectionSync::new(),
            surface,
            draft: None,
            search: String::new(),
            geocode_results: Vec::new(),
            last_measurement: None,
            loading: LoadingIndicator::new(),
            notices: Notices::default(),
            config,
        }
    }

    /// Mount the select tool and request the initial feature load.
    pub fn start(&mut self) -> Vec<Effect> {
        log::info!("🗺️ Starting, features from {}", self.config.features_url());
        self.mode.sync(&self.selection, &mut self.surface);
        self.render();
        vec![self.persist(PersistRequest::LoadAll)]
    }

    pub fn update(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::Tool(msg) => self.handle_tool(msg),
            Message::Map(msg) => self.handle_map(msg),
            Message::Draft(msg) => self.handle_draft(msg),
            Message::Feature(msg) => self.handle_feature(msg),
            Message::List(msg) => self.handle_list(msg),
            Message::Geocode(msg) => self.handle_geocode(msg),
            Message::Export(msg) => self.handle_export(msg),
            Message::Persisted(outcome) => self.handle_persisted(outcome),
        }
    }

    pub fn render_state(&self) -> RenderState<'_> {
        let visible = self.store.visible(&self.filter);
        let selected = self
            .selection
            .selected_feature(&self.store)
            .map(|f| SelectedDetails {
                id: &f.id,
                name: &f.name,
                geometry_type: f.geometry_type().name(),
                editing: self.selection.is_editing(),
            });

        RenderState {
            map: self.surface.snapshot(),
            mode: self.mode.mode(),
            loading: self.loading.is_loading(),
            list: ListView::build(
                &visible,
                &self.filter,
                &self.search,
                self.selection.selected(),
                self.selection.hovered(),
            ),
            selected,
            draft: self.draft.as_ref(),
            geocode_results: &self.geocode_results,
            last_measurement: self.last_measurement.as_ref(),
        }
    }

    /// Drain queued notifications.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }

    /// Tear down the map surface. Further input is ignored.
    pub fn close(&mut self) {
        self.surface.close();
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    pub fn filter(&self) -> &VisibilityFilter {
        &self.filter
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode.mode()
    }

    pub fn selection(&self) -> &SelectionSync {
        &self.selection
    }

    pub fn surface(&self) -> &MapSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut MapSurface {
        &mut self.surface
    }

    pub fn draft(&self) -> Option<&PendingDraft> {
        self.draft.as_ref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn geocode_results(&self) -> &[GeocodeResult] {
        &self.geocode_results
    }

    pub fn last_measurement(&self) -> Option<&Measurement> {
        self.last_measurement.as_ref()
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn list_view(&self) -> ListView {
        let visible = self.store.visible(&self.filter);
        ListView::build(
            &visible,
            &self.filter,
            &self.search,
            self.selection.selected(),
            self.selection.hovered(),
        )
    }

    // ------------------------------------------------------------------------
    // Shared helpers for the handlers
    // ------------------------------------------------------------------------

    pub(crate) fn persist(&self, request: PersistRequest) -> Effect {
        log::debug!("📤 Queueing {}", request.describe());
        Effect::Persist(PersistTask::new(request, &self.loading))
    }

    /// Rebuild the features layer from the store.
    pub(crate) fn render(&mut self) {
        let visible = self.store.visible(&self.filter);
        self.surface
            .render(&visible, self.selection.selected(), self.selection.hovered());
    }

    /// Re-apply highlight styles after a selection or hover change.
    pub(crate) fn restyle(&mut self) {
        self.surface
            .restyle(self.selection.selected(), self.selection.hovered());
    }

    pub(crate) fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

impl std::fmt::Debug for MapApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapApp")
            .field("features", &self.store.len())
            .field("mode", &self.mode.mode())
            .field("selected", &self.selection.selected())
            .field("editing", &self.selection.is_editing())
            .field("draft", &self.draft.is_some())
            .field("in_flight", &self.loading.in_flight())
            .finish()
    }
}
