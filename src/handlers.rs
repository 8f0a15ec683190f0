//! Message handlers for the geoscribe application.
//!
//! Each handler processes one category of messages, keeping
//! [`MapApp::update`] a plain dispatch.

use geoscribe_geo::{DecodeError, ExportEntry};

use crate::api::{ApiError, FeatureRecord, NewFeature};
use crate::app::{Effect, MapApp};
use crate::constants::GENERIC_ERROR_MESSAGE;
use crate::error::{Error, ValidationError};
use crate::geocode::{self, GeocodeQuery};
use crate::message::{
    DraftMessage, ExportMessage, FeatureMessage, GeocodeMessage, ListMessage, MapMessage,
    ToolMessage,
};
use crate::model::{Feature, FeatureId};
use crate::notice::Notice;
use crate::persist::{PersistOutcome, PersistRequest};
use crate::surface::{Key, SurfaceEvent};

/// Notice text for a failed persistence call.
///
/// Domain failures read "<action> failed: <message>"; anything else falls
/// back to the normalized user message.
fn failure_text(action: &str, err: ApiError) -> String {
    if err.is_domain() {
        format!(
            "{} failed: {}",
            action,
            err.domain_message().unwrap_or(GENERIC_ERROR_MESSAGE)
        )
    } else {
        Error::from(err).user_message()
    }
}

impl MapApp {
    // ========================================================================
    // Toolbar
    // ========================================================================

    pub(crate) fn handle_tool(&mut self, msg: ToolMessage) -> Vec<Effect> {
        self.discard_draft();
        match msg {
            ToolMessage::Draw(kind) => {
                log::debug!("🔄 Draw tool selected: {:?}", kind);
                self.mode
                    .select_draw(kind, &mut self.selection, &mut self.surface);
            }
            ToolMessage::Measure(kind) => {
                log::debug!("🔄 Measure tool toggled: {:?}", kind);
                self.mode
                    .toggle_measure(kind, &mut self.selection, &mut self.surface);
            }
            ToolMessage::Stop => {
                log::debug!("🔄 Stop");
                self.mode.stop(&self.selection, &mut self.surface);
            }
        }
        self.restyle();
        Vec::new()
    }

    // ========================================================================
    // Map canvas
    // ========================================================================

    pub(crate) fn handle_map(&mut self, msg: MapMessage) -> Vec<Effect> {
        match msg {
            MapMessage::Pointer(event) => {
                if self.draft.is_some() {
                    log::trace!("Ignoring {:?} while a draft awaits a name", event.kind);
                    return Vec::new();
                }
                let events = self.surface.handle_pointer(event);
                events
                    .into_iter()
                    .flat_map(|event| self.handle_surface_event(event))
                    .collect()
            }
            MapMessage::Key(Key::Escape) => {
                if self.draft.is_some() {
                    self.discard_draft();
                } else if self.mode.cancel_gesture(&mut self.surface) {
                    log::debug!("⎋ Sketch cancelled, {:?} stays active", self.mode.mode());
                }
                Vec::new()
            }
            MapMessage::Key(_) => Vec::new(),
            MapMessage::ViewportResized { width, height } => {
                self.surface.set_viewport(width, height);
                Vec::new()
            }
            MapMessage::ViewChanged(view) => {
                self.surface.set_view(view);
                Vec::new()
            }
        }
    }

    fn handle_surface_event(&mut self, event: SurfaceEvent) -> Vec<Effect> {
        match event {
            SurfaceEvent::SelectionChanged(id) => {
                self.mode.apply_map_selection(
                    id,
                    &mut self.selection,
                    &self.store,
                    &mut self.surface,
                );
                self.restyle();
                Vec::new()
            }
            SurfaceEvent::DrawCompleted(draft) => {
                if self.draft.is_some() {
                    log::warn!("Second draft while one is pending, dropped");
                    return Vec::new();
                }
                log::info!("✏️ {} drawn, waiting for a name", draft.geometry_type());
                self.draft = Some(draft);
                Vec::new()
            }
            SurfaceEvent::FeatureModified { id, wkt } => {
                let Some(feature) = self.store.get(&id) else {
                    log::warn!("Modified feature {} is no longer in the store", id);
                    return Vec::new();
                };
                let record = FeatureRecord {
                    id: feature.id.clone(),
                    name: feature.name.clone(),
                    wkt_string: wkt,
                    geometry_type: feature.geometry_type().name().to_string(),
                };
                vec![self.persist(PersistRequest::Update(record))]
            }
            SurfaceEvent::MeasurementCompleted(measurement) => {
                log::info!("📏 {:?}: {}", measurement.kind, measurement.text);
                self.last_measurement = Some(measurement);
                Vec::new()
            }
            SurfaceEvent::SketchCancelled => Vec::new(),
        }
    }

    // ========================================================================
    // Naming dialog
    // ========================================================================

    pub(crate) fn handle_draft(&mut self, msg: DraftMessage) -> Vec<Effect> {
        match msg {
            DraftMessage::Save(name) => {
                let Some(draft) = &self.draft else {
                    log::warn!("Save requested without a pending draft");
                    return Vec::new();
                };
                let name = name.trim();
                if name.is_empty() {
                    self.notify(Notice::warning(ValidationError::EmptyName.to_string()));
                    return Vec::new();
                }
                let request = PersistRequest::Create(NewFeature {
                    name: name.to_string(),
                    geometry_type: draft.geometry_type().name().to_string(),
                    wkt_string: draft.wkt.clone(),
                });
                self.discard_draft();
                vec![self.persist(request)]
            }
            DraftMessage::Cancel => {
                self.discard_draft();
                Vec::new()
            }
        }
    }

    fn discard_draft(&mut self) {
        if self.draft.take().is_some() {
            log::debug!("Draft dismissed");
        }
        self.surface.clear_draft();
    }

    // ========================================================================
    // Details panel
    // ========================================================================

    pub(crate) fn handle_feature(&mut self, msg: FeatureMessage) -> Vec<Effect> {
        match msg {
            FeatureMessage::Edit => {
                if self.mode.begin_edit(&mut self.selection, &mut self.surface) {
                    log::debug!("✏️ Editing {:?}", self.selection.selected());
                }
                Vec::new()
            }
            FeatureMessage::FinishEdit => {
                self.mode.end_edit(&mut self.selection, &mut self.surface);
                self.render();
                Vec::new()
            }
            FeatureMessage::Rename(name) => {
                let Some(feature) = self.selection.selected_feature(&self.store) else {
                    return Vec::new();
                };
                let name = name.trim();
                if name.is_empty() {
                    self.notify(Notice::warning(ValidationError::EmptyName.to_string()));
                    return Vec::new();
                }
                match feature.to_record(&self.codec) {
                    Ok(mut record) => {
                        record.name = name.to_string();
                        vec![self.persist(PersistRequest::Update(record))]
                    }
                    Err(e) => {
                        self.notify(Notice::error(format!(
                            "Update failed: {}",
                            Error::from(e).user_message()
                        )));
                        Vec::new()
                    }
                }
            }
            FeatureMessage::Delete => match self.selection.selected() {
                Some(id) => {
                    let request = PersistRequest::Delete(id.clone());
                    vec![self.persist(request)]
                }
                None => Vec::new(),
            },
            FeatureMessage::CloseDetails => {
                self.mode.deselect(&mut self.selection, &mut self.surface);
                self.restyle();
                Vec::new()
            }
        }
    }

    // ========================================================================
    // List panel and legend
    // ========================================================================

    pub(crate) fn handle_list(&mut self, msg: ListMessage) -> Vec<Effect> {
        match msg {
            ListMessage::Clicked(id) => {
                if self.draft.is_some() {
                    log::trace!("Ignoring list click while a draft awaits a name");
                    return Vec::new();
                }
                self.mode
                    .select_feature(id, &mut self.selection, &self.store, &mut self.surface);
                self.restyle();
            }
            ListMessage::Hovered(id) => {
                if self.selection.hover(id) {
                    self.restyle();
                }
            }
            ListMessage::SearchChanged(text) => {
                self.search = text;
            }
            ListMessage::VisibilityToggled(geometry_type) => {
                let visible = self.filter.toggle(geometry_type);
                log::debug!("👁️ {} visible: {}", geometry_type, visible);
                self.render();
            }
        }
        Vec::new()
    }

    // ========================================================================
    // Place search
    // ========================================================================

    pub(crate) fn handle_geocode(&mut self, msg: GeocodeMessage) -> Vec<Effect> {
        match msg {
            GeocodeMessage::Search(text) => {
                match GeocodeQuery::new(&text, self.config.geocoder.min_query_len) {
                    Ok(query) => {
                        self.geocode_results.clear();
                        vec![Effect::Geocode(query)]
                    }
                    Err(e) => {
                        self.notify(Notice::info(e.to_string()));
                        Vec::new()
                    }
                }
            }
            GeocodeMessage::Results(Ok(results)) => {
                if results.is_empty() {
                    self.notify(Notice::warning("No results found for your search."));
                }
                self.geocode_results = geocode::truncate(results, self.config.geocoder.limit);
                Vec::new()
            }
            GeocodeMessage::Results(Err(e)) => {
                log::error!("Geocoding error: {}", e);
                self.geocode_results.clear();
                self.notify(Notice::error("Geocoding service is currently unavailable."));
                Vec::new()
            }
            GeocodeMessage::Chosen(index) => {
                let Some(result) = self.geocode_results.get(index) else {
                    log::warn!("No geocoding result at index {}", index);
                    return Vec::new();
                };
                match result.coordinate() {
                    Ok((lon, lat)) => {
                        log::debug!("📍 Going to {}", result.display_name);
                        self.surface.go_to(lon, lat);
                        self.geocode_results.clear();
                    }
                    Err(e) => {
                        log::error!("Bad coordinates in result '{}': {}", result.display_name, e);
                        self.notify(Notice::error(Error::from(e).user_message()));
                    }
                }
                Vec::new()
            }
        }
    }

    // ========================================================================
    // Export
    // ========================================================================

    pub(crate) fn handle_export(&mut self, msg: ExportMessage) -> Vec<Effect> {
        match msg {
            ExportMessage::Requested => {
                let visible = self.store.visible(&self.filter);
                if visible.is_empty() {
                    self.notify(Notice::info("There is no data to export."));
                    return Vec::new();
                }
                let ids: Vec<serde_json::Value> = visible.iter().map(|f| f.id.to_json()).collect();
                let document = self.codec.export_collection(visible.iter().zip(&ids).map(
                    |(feature, id)| ExportEntry {
                        id,
                        name: &feature.name,
                        geometry: &feature.geometry,
                    },
                ));
                match document {
                    Ok(contents) => vec![Effect::Download {
                        file_name: self.config.export_file_name.clone(),
                        contents,
                    }],
                    Err(e) => {
                        log::error!("Export failed: {}", e);
                        self.notify(Notice::error("An error occurred during export."));
                        Vec::new()
                    }
                }
            }
            ExportMessage::Finished(Ok(())) => {
                self.notify(Notice::success("Data exported successfully!"));
                Vec::new()
            }
            ExportMessage::Finished(Err(reason)) => {
                log::error!("Export failed: {}", reason);
                self.notify(Notice::error("An error occurred during export."));
                Vec::new()
            }
        }
    }

    // ========================================================================
    // Persistence outcomes
    // ========================================================================

    pub(crate) fn handle_persisted(&mut self, outcome: PersistOutcome) -> Vec<Effect> {
        match outcome {
            PersistOutcome::Loaded(Ok(records)) => {
                let decoded: Result<Vec<Feature>, DecodeError> = records
                    .iter()
                    .map(|r| Feature::from_record(r, &self.codec))
                    .collect();
                match decoded {
                    Ok(features) => {
                        log::info!("📥 Loaded {} features", features.len());
                        self.store.load(features);
                        self.selection.prune(&self.store, &mut self.surface);
                        self.mode.sync(&self.selection, &mut self.surface);
                        self.render();
                    }
                    Err(e) => {
                        log::error!("Initial data could not be decoded: {}", e);
                        self.notify(Notice::error(Error::from(e).user_message()));
                    }
                }
            }
            PersistOutcome::Loaded(Err(e)) => {
                log::error!("Initial load failed: {}", e);
                self.notify(Notice::error("Could not load initial data."));
            }
            PersistOutcome::Created(Ok(record)) => match Feature::from_record(&record, &self.codec) {
                Ok(feature) => {
                    self.store.add(feature);
                    self.render();
                    self.notify(Notice::success("Feature saved!"));
                }
                Err(e) => {
                    log::error!("Saved feature {} could not be decoded: {}", record.id, e);
                    self.notify(Notice::error(Error::from(e).user_message()));
                }
            },
            PersistOutcome::Created(Err(e)) => {
                self.notify(Notice::error(failure_text("Save", e)));
            }
            PersistOutcome::Updated { sent, result } => self.apply_update(sent, result),
            PersistOutcome::Deleted { id, result } => self.apply_delete(id, result),
        }
        Vec::new()
    }

    fn apply_update(&mut self, sent: FeatureRecord, result: Result<FeatureRecord, ApiError>) {
        let applied = result
            .map_err(|e| failure_text("Update", e))
            .and_then(|record| {
                Feature::from_record(&record, &self.codec).map_err(|e| {
                    format!("Update failed: {}", Error::from(e).user_message())
                })
            })
            .map(|feature| self.store.replace(&sent.id, feature));

        match applied {
            Ok(replaced) => {
                if !replaced {
                    log::warn!("Updated feature {} is no longer in the store", sent.id);
                }
                if self.selection.is_editing() {
                    self.mode.end_edit(&mut self.selection, &mut self.surface);
                }
                self.render();
                self.notify(Notice::success("Feature updated!"));
            }
            Err(text) => {
                // Put the unconfirmed shape back to what the store holds.
                self.render();
                self.notify(Notice::error(text));
            }
        }
    }

    fn apply_delete(&mut self, id: FeatureId, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                if self.store.remove(&id).is_none() {
                    log::warn!("Deleted feature {} was not in the store", id);
                }
                if self.selection.selected() == Some(&id) {
                    self.mode.deselect(&mut self.selection, &mut self.surface);
                }
                self.render();
                self.notify(Notice::success("Feature deleted!"));
            }
            Err(e) => {
                self.notify(Notice::error(failure_text("Delete", e)));
            }
        }
    }
}
