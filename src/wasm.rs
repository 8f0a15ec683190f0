//! Browser entry point.
//!
//! [`WebMapApp`] wraps [`MapApp`] for JavaScript: the page forwards DOM
//! input, reads `render_state()` to draw, and drains camera requests and
//! notices. Persistence and geocoding calls run on the browser event loop
//! via `spawn_local`; `on_change` fires after each of them completes.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use geoscribe_geo::{Coord, GeometryType};

use crate::api::HttpFeatureApi;
use crate::app::{Effect, MapApp};
use crate::config::AppConfig;
use crate::geocode::NominatimClient;
use crate::message::{
    DraftMessage, ExportMessage, FeatureMessage, GeocodeMessage, ListMessage, MapMessage, Message,
    ToolMessage,
};
use crate::mode::{DrawKind, MeasureKind};
use crate::model::FeatureId;
use crate::persist;
use crate::surface::{Key, PointerEvent, PointerKind, View};

struct Inner {
    app: MapApp,
    api: Rc<HttpFeatureApi>,
    geocoder: Rc<NominatimClient>,
    on_change: Option<js_sys::Function>,
}

#[wasm_bindgen]
pub struct WebMapApp {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl WebMapApp {
    /// Create the app from a JSON configuration, or from the stored one.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebMapApp, JsValue> {
        console_error_panic_hook::set_once();

        let config = match config_json {
            Some(json) => AppConfig::from_json(&json).map_err(to_js)?,
            None => AppConfig::load_or_default(),
        };
        if let Err(e) = console_log::init_with_level(config.log_level.to_level()) {
            web_sys::console::warn_1(&format!("Logger already initialised: {}", e).into());
        }
        log::info!("geoscribe {} starting", env!("CARGO_PKG_VERSION"));

        let api = HttpFeatureApi::from_config(&config).map_err(to_js)?;
        let geocoder = NominatimClient::new(config.geocoder.clone());

        Ok(Self {
            inner: Rc::new(RefCell::new(Inner {
                app: MapApp::new(config),
                api: Rc::new(api),
                geocoder: Rc::new(geocoder),
                on_change: None,
            })),
        })
    }

    /// Mount the select tool and load the stored features.
    pub fn start(&self) {
        let effects = self.inner.borrow_mut().app.start();
        run_effects(&self.inner, effects);
    }

    /// Called with no arguments after every asynchronous completion.
    pub fn set_on_change(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().on_change = Some(callback);
    }

    pub fn save_config(&self) -> Result<(), JsValue> {
        self.inner
            .borrow()
            .app
            .config()
            .save_to_local_storage()
            .map_err(to_js)
    }

    // ------------------------------------------------------------------------
    // Toolbar
    // ------------------------------------------------------------------------

    /// `"Point"`, `"LineString"` (or `"Line"`) or `"Polygon"`.
    pub fn select_draw(&self, kind: &str) -> Result<(), JsValue> {
        let kind = match kind {
            "Point" => DrawKind::Point,
            "LineString" | "Line" => DrawKind::Line,
            "Polygon" => DrawKind::Polygon,
            other => return Err(JsValue::from_str(&format!("Unknown draw tool '{}'", other))),
        };
        self.send(ToolMessage::Draw(kind).into());
        Ok(())
    }

    /// `"Length"` or `"Area"`.
    pub fn toggle_measure(&self, kind: &str) -> Result<(), JsValue> {
        let kind = match kind {
            "Length" | "LineString" => MeasureKind::Length,
            "Area" | "Polygon" => MeasureKind::Area,
            other => return Err(JsValue::from_str(&format!("Unknown measure tool '{}'", other))),
        };
        self.send(ToolMessage::Measure(kind).into());
        Ok(())
    }

    pub fn stop(&self) {
        self.send(ToolMessage::Stop.into());
    }

    pub fn export(&self) {
        self.send(ExportMessage::Requested.into());
    }

    // ------------------------------------------------------------------------
    // Map canvas
    // ------------------------------------------------------------------------

    /// Pointer input in rendering coordinates; `kind` is one of `click`,
    /// `doubleClick`, `move`, `dragStart`, `drag`, `dragEnd`.
    pub fn pointer(&self, kind: &str, x: f64, y: f64) -> Result<(), JsValue> {
        let kind: PointerKind =
            serde_json::from_value(serde_json::Value::from(kind)).map_err(to_js)?;
        self.send(MapMessage::Pointer(PointerEvent::new(kind, x, y)).into());
        Ok(())
    }

    /// A DOM `KeyboardEvent.key` value.
    pub fn key(&self, key: &str) {
        self.send(MapMessage::Key(Key::from_dom(key)).into());
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.send(MapMessage::ViewportResized { width, height }.into());
    }

    pub fn view_changed(&self, x: f64, y: f64, zoom: f64) {
        self.send(MapMessage::ViewChanged(View::new(Coord { x, y }, zoom)).into());
    }

    // ------------------------------------------------------------------------
    // Naming dialog and details panel
    // ------------------------------------------------------------------------

    pub fn save_draft(&self, name: String) {
        self.send(DraftMessage::Save(name).into());
    }

    pub fn cancel_draft(&self) {
        self.send(DraftMessage::Cancel.into());
    }

    pub fn edit(&self) {
        self.send(FeatureMessage::Edit.into());
    }

    pub fn finish_edit(&self) {
        self.send(FeatureMessage::FinishEdit.into());
    }

    pub fn rename(&self, name: String) {
        self.send(FeatureMessage::Rename(name).into());
    }

    pub fn delete_selected(&self) {
        self.send(FeatureMessage::Delete.into());
    }

    pub fn close_details(&self) {
        self.send(FeatureMessage::CloseDetails.into());
    }

    // ------------------------------------------------------------------------
    // List panel, legend and place search
    // ------------------------------------------------------------------------

    pub fn feature_clicked(&self, id: JsValue) -> Result<(), JsValue> {
        let id = feature_id(&id).ok_or_else(|| JsValue::from_str("Feature id expected"))?;
        self.send(ListMessage::Clicked(id).into());
        Ok(())
    }

    /// `null` or `undefined` clears the hover.
    pub fn feature_hovered(&self, id: JsValue) {
        self.send(ListMessage::Hovered(feature_id(&id)).into());
    }

    pub fn search_changed(&self, text: String) {
        self.send(ListMessage::SearchChanged(text).into());
    }

    pub fn toggle_visibility(&self, geometry_type: &str) -> Result<(), JsValue> {
        let geometry_type: GeometryType = geometry_type.parse().map_err(to_js)?;
        self.send(ListMessage::VisibilityToggled(geometry_type).into());
        Ok(())
    }

    pub fn geocode(&self, text: String) {
        self.send(GeocodeMessage::Search(text).into());
    }

    pub fn choose_location(&self, index: usize) {
        self.send(GeocodeMessage::Chosen(index).into());
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// JSON render snapshot of the whole screen.
    pub fn render_state(&self) -> Result<String, JsValue> {
        let inner = self.inner.borrow();
        serde_json::to_string(&inner.app.render_state()).map_err(to_js)
    }

    /// JSON array of camera fit/animate requests queued since the last call.
    pub fn take_camera_requests(&self) -> Result<String, JsValue> {
        let requests = self.inner.borrow_mut().app.surface_mut().take_camera_requests();
        serde_json::to_string(&requests).map_err(to_js)
    }

    /// JSON array of notices queued since the last call.
    pub fn take_notices(&self) -> Result<String, JsValue> {
        let notices = self.inner.borrow_mut().app.take_notices();
        serde_json::to_string(&notices).map_err(to_js)
    }

    pub fn is_loading(&self) -> bool {
        self.inner.borrow().app.is_loading()
    }

    /// Release the map surface; call when the view goes away.
    pub fn close(&self) {
        self.inner.borrow_mut().app.close();
    }

    fn send(&self, message: Message) {
        let effects = self.inner.borrow_mut().app.update(message);
        run_effects(&self.inner, effects);
    }
}

// ============================================================================
// Effect execution
// ============================================================================

fn run_effects(inner: &Rc<RefCell<Inner>>, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::Persist(task) => {
                let api = Rc::clone(&inner.borrow().api);
                let inner = Rc::clone(inner);
                spawn_local(async move {
                    let outcome = persist::execute(api.as_ref(), task).await;
                    complete(&inner, Message::Persisted(outcome));
                });
            }
            Effect::Geocode(query) => {
                let geocoder = Rc::clone(&inner.borrow().geocoder);
                let inner = Rc::clone(inner);
                spawn_local(async move {
                    let results = geocoder.search(&query).await;
                    complete(&inner, GeocodeMessage::Results(results).into());
                });
            }
            Effect::Download {
                file_name,
                contents,
            } => {
                let result = download(&file_name, &contents).map_err(|e| format!("{:?}", e));
                let effects = inner
                    .borrow_mut()
                    .app
                    .update(ExportMessage::Finished(result).into());
                run_effects(inner, effects);
            }
        }
    }
}

/// Feed an asynchronous result back and let the page know.
fn complete(inner: &Rc<RefCell<Inner>>, message: Message) {
    let (effects, callback) = {
        let mut state = inner.borrow_mut();
        let effects = state.app.update(message);
        (effects, state.on_change.clone())
    };
    run_effects(inner, effects);

    if let Some(callback) = callback {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            log::warn!("on_change callback failed: {:?}", e);
        }
    }
}

/// Offer `contents` as a file download through a temporary anchor.
fn download(file_name: &str, contents: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object available"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("Document has no body"))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(contents));
    let options = BlobPropertyBag::new();
    options.set_type("application/json");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Url::revoke_object_url(&url)?;

    log::debug!("💾 Offered {} ({} bytes)", file_name, contents.len());
    Ok(())
}

fn feature_id(value: &JsValue) -> Option<FeatureId> {
    if let Some(n) = value.as_f64() {
        if n.fract() == 0.0 {
            return Some(FeatureId::Number(n as i64));
        }
    }
    value.as_string().map(FeatureId::Text)
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
