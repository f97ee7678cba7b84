//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, StoreError};
use crate::health::{HealthChecks, Probe};
use crate::metrics::{self, LatencyTimer};
use crate::people::{PeopleStore, Person};

/// Application state shared with handlers.
#[derive(Clone, Default)]
pub struct AppState {
    /// Person records.
    pub people: PeopleStore,
    /// Health checks, when the probes are enabled.
    pub health: Option<Arc<HealthChecks>>,
    /// Prometheus render handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create app state around a store, with probes and metrics disabled.
    pub fn new(people: PeopleStore) -> Self {
        Self {
            people,
            health: None,
            metrics: None,
        }
    }

    /// Build app state from configuration.
    pub fn from_config(config: &Config, metrics_handle: Option<PrometheusHandle>) -> Self {
        let people = if config.seed_people {
            PeopleStore::seeded()
        } else {
            PeopleStore::new()
        };

        let mut state = Self::new(people);
        if config.health_enabled {
            state = state.with_health(HealthChecks::from_config(config));
        }
        state.metrics = metrics_handle;
        state
    }

    /// Enable the health probes.
    pub fn with_health(mut self, checks: HealthChecks) -> Self {
        self.health = Some(Arc::new(checks));
        self
    }

    /// Enable the /metrics endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Query string accepted by the health probes.
#[derive(Debug, Default, Deserialize)]
pub struct HealthQuery {
    /// `1` to include every check result on success.
    #[serde(default)]
    pub full: Option<String>,
}

impl HealthQuery {
    fn is_full(&self) -> bool {
        self.full.as_deref() == Some("1")
    }
}

/// Decode a create body. Empty and `null` bodies yield the default person.
pub fn decode_person(body: &[u8]) -> Result<Person, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Person::default());
    }
    let person: Option<Person> = serde_json::from_slice(body)?;
    Ok(person.unwrap_or_default())
}

/// List every person.
pub async fn list_people(State(state): State<AppState>) -> Json<Vec<Person>> {
    let _timer = LatencyTimer::new("GET /people");
    Json(state.people.list().await)
}

/// Get one person. Unknown IDs yield the empty person with 200.
pub async fn get_person(State(state): State<AppState>, Path(id): Path<String>) -> Json<Person> {
    let _timer = LatencyTimer::new("GET /people/:id");

    let person = state.people.get(&id).await.unwrap_or_else(|| {
        debug!(id = %id, "Person not found");
        Person::default()
    });

    Json(person)
}

/// Create a person under the path ID and return the updated list.
pub async fn create_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Vec<Person>>, ApiError> {
    let _timer = LatencyTimer::new("POST /people/:id");

    let person = decode_person(&body).map_err(|e| {
        warn!(id = %id, error = %e, "Rejected person body");
        metrics::inc_people_create_rejected("malformed");
        e
    })?;

    match state.people.create(&id, person).await {
        Ok(people) => {
            metrics::inc_people_created();
            metrics::set_people_stored(people.len());
            Ok(Json(people))
        }
        Err(e @ StoreError::DuplicateId { .. }) => {
            warn!(id = %id, "Rejected duplicate person");
            metrics::inc_people_create_rejected("duplicate");
            Err(e.into())
        }
    }
}

/// Delete a person and return the updated list. Unknown IDs are a no-op.
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Vec<Person>> {
    let _timer = LatencyTimer::new("DELETE /people/:id");

    let (removed, people) = state.people.delete(&id).await;
    if removed.is_some() {
        metrics::inc_people_deleted();
        metrics::set_people_stored(people.len());
    } else {
        debug!(id = %id, "Delete of unknown person ignored");
    }

    Json(people)
}

/// Liveness probe handler - returns 200 if alive, 503 otherwise.
pub async fn live(State(state): State<AppState>, Query(query): Query<HealthQuery>) -> Response {
    probe_response(&state, Probe::Liveness, &query).await
}

/// Readiness probe handler - returns 200 if ready, 503 otherwise.
pub async fn ready(State(state): State<AppState>, Query(query): Query<HealthQuery>) -> Response {
    probe_response(&state, Probe::Readiness, &query).await
}

async fn probe_response(state: &AppState, probe: Probe, query: &HealthQuery) -> Response {
    let Some(checks) = state.health.as_ref() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let report = checks.evaluate(probe).await;
    debug!(probe = %report.probe, healthy = report.is_healthy(), "Probe evaluated");

    if report.is_healthy() {
        let body = if query.is_full() {
            report.details()
        } else {
            Default::default()
        };
        (StatusCode::OK, Json(body)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(report.details())).into_response()
    }
}

/// Prometheus scrape handler.
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.as_ref() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
