//! Behavioural tests for the application as a whole.
//!
//! These drive [`MapApp`] through messages the way the browser host does,
//! executing persistence effects against an in-memory [`MockApi`].

mod mode_tests;

use std::cell::{Cell, RefCell};

use geoscribe_geo::{Coord, GeometryCodec};

use crate::api::{ApiError, FeatureApi, FeatureRecord, NewFeature};
use crate::app::{Effect, MapApp};
use crate::config::{AppConfig, LogLevel};
use crate::geocode::GeocodeQuery;
use crate::message::{MapMessage, Message};
use crate::model::FeatureId;
use crate::notice::{Notice, NoticeLevel};
use crate::persist::{self, PersistRequest};
use crate::surface::{PointerEvent, PointerKind};

pub(crate) fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(LogLevel::Debug.to_level_filter())
        .try_init();
}

// ============================================================================
// Mock persistence API
// ============================================================================

/// How the next call(s) to the mock should fail.
#[derive(Debug, Clone)]
pub(crate) enum Failure {
    Domain(Option<String>),
    Transport(String),
}

impl Failure {
    fn to_error(&self) -> ApiError {
        match self {
            Failure::Domain(message) => ApiError::domain(message.clone()),
            Failure::Transport(message) => ApiError::Transport(message.clone()),
        }
    }
}

/// In-memory feature store behind the [`FeatureApi`] trait.
#[derive(Debug, Default)]
pub(crate) struct MockApi {
    records: RefCell<Vec<FeatureRecord>>,
    next_id: Cell<i64>,
    failure: RefCell<Option<Failure>>,
    calls: RefCell<Vec<String>>,
}

impl MockApi {
    pub fn with_records(records: Vec<FeatureRecord>) -> Self {
        let next = records
            .iter()
            .filter_map(|r| match r.id {
                FeatureId::Number(n) => Some(n),
                FeatureId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        let api = Self::default();
        api.next_id.set(next + 1);
        *api.records.borrow_mut() = records;
        api
    }

    /// Fail every call until [`MockApi::succeed`].
    pub fn fail(&self, failure: Failure) {
        *self.failure.borrow_mut() = Some(failure);
    }

    pub fn succeed(&self) {
        *self.failure.borrow_mut() = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn records(&self) -> Vec<FeatureRecord> {
        self.records.borrow().clone()
    }

    fn begin(&self, call: String) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(call);
        match &*self.failure.borrow() {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

impl FeatureApi for MockApi {
    async fn list(&self) -> Result<Vec<FeatureRecord>, ApiError> {
        self.begin("GET".to_string())?;
        Ok(self.records())
    }

    async fn create(&self, feature: &NewFeature) -> Result<FeatureRecord, ApiError> {
        self.begin(format!("POST {}", feature.name))?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let record = FeatureRecord {
            id: FeatureId::Number(id),
            name: feature.name.clone(),
            wkt_string: feature.wkt_string.clone(),
            geometry_type: feature.geometry_type.clone(),
        };
        self.records.borrow_mut().push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: &FeatureRecord) -> Result<FeatureRecord, ApiError> {
        self.begin(format!("PUT {}", record.id))?;
        let mut records = self.records.borrow_mut();
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record.clone())
            }
            None => Err(ApiError::domain(Some("Feature not found".to_string()))),
        }
    }

    async fn delete(&self, id: &FeatureId) -> Result<(), ApiError> {
        self.begin(format!("DELETE {}", id))?;
        self.records.borrow_mut().retain(|r| &r.id != id);
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub(crate) fn record(id: i64, name: &str, wkt: &str) -> FeatureRecord {
    let geometry_type = wkt
        .split('(')
        .next()
        .map(|keyword| match keyword.trim() {
            "POINT" => "Point",
            "LINESTRING" => "LineString",
            _ => "Polygon",
        })
        .unwrap_or_default();
    FeatureRecord {
        id: FeatureId::Number(id),
        name: name.to_string(),
        wkt_string: wkt.to_string(),
        geometry_type: geometry_type.to_string(),
    }
}

/// A point near Ankara, a line near Istanbul and a polygon near Izmir, far
/// enough apart that clicks at start-up zoom hit exactly one of them.
pub(crate) fn sample_records() -> Vec<FeatureRecord> {
    vec![
        record(1, "Kızılay", "POINT(32.85 39.92)"),
        record(2, "Boğaz Köprüsü", "LINESTRING(28.90 41.00,29.10 41.05)"),
        record(
            3,
            "Gölcük",
            "POLYGON((27.00 38.30,27.10 38.30,27.10 38.40,27.00 38.40,27.00 38.30))",
        ),
    ]
}

pub(crate) fn point_at() -> Coord {
    at(32.85, 39.92)
}

pub(crate) fn inside_polygon() -> Coord {
    at(27.05, 38.35)
}

/// Nowhere near any sample feature.
pub(crate) fn empty_spot() -> Coord {
    at(36.0, 37.0)
}

/// Rendering coordinate of a geographic position.
pub(crate) fn at(lon: f64, lat: f64) -> Coord {
    GeometryCodec::new()
        .lon_lat_to_rendering(lon, lat)
        .last_vertex()
        .unwrap()
}

pub(crate) fn id(n: i64) -> FeatureId {
    FeatureId::Number(n)
}

// ============================================================================
// Harness
// ============================================================================

/// An app plus its mock API, executing effects synchronously.
pub(crate) struct Harness {
    pub app: MapApp,
    pub api: MockApi,
    pub downloads: Vec<(String, String)>,
    pub geocode_queries: Vec<GeocodeQuery>,
}

impl Harness {
    /// Started app loaded with [`sample_records`].
    pub fn new() -> Self {
        Self::with_records(sample_records())
    }

    pub fn with_records(records: Vec<FeatureRecord>) -> Self {
        init_logging();
        let mut harness = Self {
            app: MapApp::new(AppConfig::default()),
            api: MockApi::with_records(records),
            downloads: Vec::new(),
            geocode_queries: Vec::new(),
        };
        let effects = harness.app.start();
        harness.run(effects);
        harness
    }

    /// Update and run every resulting effect to completion.
    pub fn send(&mut self, message: impl Into<Message>) {
        let effects = self.app.update(message.into());
        self.run(effects);
    }

    /// Update without running the resulting effects.
    pub fn send_deferred(&mut self, message: impl Into<Message>) -> Vec<Effect> {
        self.app.update(message.into())
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Persist(task) => {
                    let outcome = pollster::block_on(persist::execute(&self.api, task));
                    let more = self.app.update(Message::Persisted(outcome));
                    self.run(more);
                }
                Effect::Geocode(query) => self.geocode_queries.push(query),
                Effect::Download {
                    file_name,
                    contents,
                } => self.downloads.push((file_name, contents)),
            }
        }
    }

    pub fn pointer(&mut self, kind: PointerKind, at: Coord) {
        self.send(MapMessage::Pointer(PointerEvent::new(kind, at.x, at.y)));
    }

    pub fn click(&mut self, at: Coord) {
        self.pointer(PointerKind::Click, at);
    }

    pub fn double_click(&mut self, at: Coord) {
        self.pointer(PointerKind::DoubleClick, at);
    }

    pub fn drag(&mut self, from: Coord, to: Coord) {
        self.pointer(PointerKind::DragStart, from);
        self.pointer(PointerKind::Drag, to);
        self.pointer(PointerKind::DragEnd, to);
    }

    pub fn notices(&mut self) -> Vec<Notice> {
        self.app.take_notices()
    }

    /// Texts of the queued notices at `level`, draining the queue.
    pub fn notice_texts(&mut self, level: NoticeLevel) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.text)
            .collect()
    }

    pub fn visible_ids(&self) -> Vec<FeatureId> {
        self.app
            .surface()
            .features()
            .iter()
            .map(|f| f.id.clone())
            .collect()
    }

    pub fn list_ids(&self) -> Vec<FeatureId> {
        self.app.list_view().ids().cloned().collect()
    }

    /// Calls made to the API after the initial load.
    pub fn api_calls_after_load(&self) -> Vec<String> {
        self.api.calls().into_iter().skip(1).collect()
    }
}

/// Request carried by a persistence effect, for assertions.
pub(crate) fn persist_request(effect: &Effect) -> Option<&PersistRequest> {
    match effect {
        Effect::Persist(task) => Some(task.request()),
        _ => None,
    }
}
