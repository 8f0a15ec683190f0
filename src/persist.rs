//! Persistence requests issued by the app and executed by the host.
//!
//! The app never awaits anything itself: it hands out [`PersistTask`]s and
//! receives a [`PersistOutcome`] back as a message once [`execute`] finishes.

use web_time::Instant;

use crate::api::{ApiError, FeatureApi, FeatureRecord, NewFeature};
use crate::loading::{LoadingGuard, LoadingIndicator};
use crate::model::FeatureId;

#[derive(Debug, Clone, PartialEq)]
pub enum PersistRequest {
    LoadAll,
    Create(NewFeature),
    Update(FeatureRecord),
    Delete(FeatureId),
}

impl PersistRequest {
    pub fn describe(&self) -> String {
        match self {
            PersistRequest::LoadAll => "load features".to_string(),
            PersistRequest::Create(f) => format!("create {} '{}'", f.geometry_type, f.name),
            PersistRequest::Update(r) => format!("update feature {}", r.id),
            PersistRequest::Delete(id) => format!("delete feature {}", id),
        }
    }
}

/// A request together with the loading guard it holds until it completes.
#[derive(Debug)]
pub struct PersistTask {
    request: PersistRequest,
    guard: LoadingGuard,
}

impl PersistTask {
    pub fn new(request: PersistRequest, loading: &LoadingIndicator) -> Self {
        Self {
            request,
            guard: loading.begin(),
        }
    }

    pub fn request(&self) -> &PersistRequest {
        &self.request
    }
}

#[derive(Debug)]
pub enum PersistOutcome {
    Loaded(Result<Vec<FeatureRecord>, ApiError>),
    Created(Result<FeatureRecord, ApiError>),
    Updated {
        sent: FeatureRecord,
        result: Result<FeatureRecord, ApiError>,
    },
    Deleted {
        id: FeatureId,
        result: Result<(), ApiError>,
    },
}

impl PersistOutcome {
    pub fn is_ok(&self) -> bool {
        match self {
            PersistOutcome::Loaded(r) => r.is_ok(),
            PersistOutcome::Created(r) => r.is_ok(),
            PersistOutcome::Updated { result, .. } => result.is_ok(),
            PersistOutcome::Deleted { result, .. } => result.is_ok(),
        }
    }
}

/// Run one task against `api`. The loading guard is released when this
/// future completes or is dropped.
pub async fn execute<A: FeatureApi>(api: &A, task: PersistTask) -> PersistOutcome {
    let PersistTask { request, guard } = task;
    let label = request.describe();
    let started = Instant::now();
    log::debug!("🌐 {} ({} in flight)", label, guard.in_flight());

    let outcome = match request {
        PersistRequest::LoadAll => PersistOutcome::Loaded(api.list().await),
        PersistRequest::Create(feature) => PersistOutcome::Created(api.create(&feature).await),
        PersistRequest::Update(record) => {
            let result = api.update(&record).await;
            PersistOutcome::Updated { sent: record, result }
        }
        PersistRequest::Delete(id) => {
            let result = api.delete(&id).await;
            PersistOutcome::Deleted { id, result }
        }
    };

    if outcome.is_ok() {
        log::debug!("🌐 {} finished in {:.1?}", label, started.elapsed());
    } else {
        log::warn!("🌐 {} failed after {:.1?}", label, started.elapsed());
    }
    drop(guard);
    outcome
}
