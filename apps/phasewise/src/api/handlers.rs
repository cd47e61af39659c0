//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        ConceptNoteResponse, EditRequest, EditResponse, HealthResponse, InsightsResponse,
        PhaseJson, PhaseResponse, ProgressRequest, ProjectJson, ProjectResponse, ProjectsResponse,
        SearchQuery, SearchResponse, SuggestionsResponse,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use phasewise_core::{
    Percent, PhaseContent, PhaseKind, PhasewiseError, ProjectId, StrategicPlanSource, catalog,
};

// =============================================================================
// HELPERS
// =============================================================================

/// HTTP status for a core error.
fn status_for(error: &PhasewiseError) -> StatusCode {
    match error {
        PhasewiseError::ProjectNotFound(_)
        | PhasewiseError::PhaseNotFound(_)
        | PhasewiseError::SectionNotFound(_) => StatusCode::NOT_FOUND,
        PhasewiseError::Serialization(_) | PhasewiseError::Config(_) => StatusCode::BAD_REQUEST,
        PhasewiseError::ExportFailed(_) | PhasewiseError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Resolve a `{phase}` path segment: a numeric id or a slug.
fn parse_phase(raw: &str) -> Result<PhaseKind, PhasewiseError> {
    PhaseKind::parse(raw).ok_or_else(|| PhasewiseError::PhaseNotFound(raw.parse().unwrap_or(0)))
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// PROJECT HANDLERS
// =============================================================================

/// List every catalog project with its progress and health.
pub async fn projects_handler(State(state): State<AppState>) -> impl IntoResponse {
    let workspace = state.workspace.read().await;
    let projects = catalog::projects()
        .iter()
        .filter_map(|p| workspace.view(p.id, |s| ProjectJson::new(p, s)).ok())
        .collect();

    let summary = catalog::portfolio_summary();

    (StatusCode::OK, Json(ProjectsResponse { projects, summary }))
}

/// One project: board, health and linked plans.
pub async fn project_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> impl IntoResponse {
    let id = ProjectId(id);
    let project = match catalog::project(id) {
        Ok(p) => p,
        Err(e) => return (status_for(&e), Json(ProjectResponse::error(e.to_string()))),
    };

    let workspace = state.workspace.read().await;
    match workspace.view(id, |s| ProjectResponse::success(project, s)) {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => (status_for(&e), Json(ProjectResponse::error(e.to_string()))),
    }
}

// =============================================================================
// PHASE HANDLERS
// =============================================================================

/// Read a phase's content and board state.
pub async fn phase_handler(
    State(state): State<AppState>,
    Path((id, phase)): Path<(u32, String)>,
) -> impl IntoResponse {
    let kind = match parse_phase(&phase) {
        Ok(k) => k,
        Err(e) => return (status_for(&e), Json(PhaseResponse::error(e.to_string()))),
    };

    let workspace = state.workspace.read().await;
    match workspace.view(ProjectId(id), |s| PhaseJson::new(s, kind)) {
        Ok(view) => (StatusCode::OK, Json(PhaseResponse::success(view))),
        Err(e) => (status_for(&e), Json(PhaseResponse::error(e.to_string()))),
    }
}

/// Replace a phase's content with previously saved content.
pub async fn rehydrate_handler(
    State(state): State<AppState>,
    Path((id, phase)): Path<(u32, String)>,
    Json(content): Json<PhaseContent>,
) -> impl IntoResponse {
    let kind = match parse_phase(&phase) {
        Ok(k) => k,
        Err(e) => return (status_for(&e), Json(PhaseResponse::error(e.to_string()))),
    };

    let mut workspace = state.workspace.write().await;
    let session = match workspace.open(ProjectId(id)) {
        Ok(s) => s,
        Err(e) => return (status_for(&e), Json(PhaseResponse::error(e.to_string()))),
    };
    session.rehydrate(kind, content);

    (StatusCode::OK, Json(PhaseResponse::success(PhaseJson::new(session, kind))))
}

/// Apply one editor operation.
pub async fn edit_handler(
    State(state): State<AppState>,
    Path((id, phase)): Path<(u32, String)>,
    Json(request): Json<EditRequest>,
) -> impl IntoResponse {
    let kind = match parse_phase(&phase) {
        Ok(k) => k,
        Err(e) => return (status_for(&e), Json(EditResponse::error(e.to_string()))),
    };

    let mut workspace = state.workspace.write().await;
    let session = match workspace.open(ProjectId(id)) {
        Ok(s) => s,
        Err(e) => return (status_for(&e), Json(EditResponse::error(e.to_string()))),
    };
    let today = chrono::Local::now().date_naive();
    let (edit, report) = session.edit(kind, |editor| request.apply(editor, today));

    (StatusCode::OK, Json(EditResponse::success(edit, report)))
}

/// Report a phase's progress directly.
pub async fn progress_handler(
    State(state): State<AppState>,
    Path((id, phase)): Path<(u32, String)>,
    Json(request): Json<ProgressRequest>,
) -> impl IntoResponse {
    let kind = match parse_phase(&phase) {
        Ok(k) => k,
        Err(e) => return (status_for(&e), Json(EditResponse::error(e.to_string()))),
    };

    let mut workspace = state.workspace.write().await;
    let session = match workspace.open(ProjectId(id)) {
        Ok(s) => s,
        Err(e) => return (status_for(&e), Json(EditResponse::error(e.to_string()))),
    };
    let report = session.report_phase_progress(kind, Percent::from(request.progress));

    (StatusCode::OK, Json(EditResponse::reported(report)))
}

/// A phase's suggested tasks, due dates counted from today.
pub async fn suggestions_handler(Path(phase): Path<String>) -> impl IntoResponse {
    match parse_phase(&phase) {
        Ok(kind) => {
            let today = chrono::Local::now().date_naive();
            (StatusCode::OK, Json(SuggestionsResponse::success(kind, today)))
        }
        Err(e) => (status_for(&e), Json(SuggestionsResponse::error(e.to_string()))),
    }
}

// =============================================================================
// CONCEPT NOTE HANDLER
// =============================================================================

/// Render the Concept Note for a project.
pub async fn concept_note_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> impl IntoResponse {
    let today = chrono::Local::now().date_naive();
    let workspace = state.workspace.read().await;
    let note = workspace.view(ProjectId(id), |s| s.concept_note(state.plan.as_ref(), today));

    match note {
        Ok(Some(note)) => (StatusCode::OK, Json(ConceptNoteResponse::success(note))),
        Ok(None) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ConceptNoteResponse::error("Export failed")),
        ),
        Err(e) => (status_for(&e), Json(ConceptNoteResponse::error(e.to_string()))),
    }
}

// =============================================================================
// STRATEGY HANDLERS
// =============================================================================

/// Search the strategic plan.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let hits = state.plan.plan().search(&query.q);
    (
        StatusCode::OK,
        Json(SearchResponse {
            term: query.q,
            hits,
        }),
    )
}

/// Planning insights for a project.
pub async fn insights_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> impl IntoResponse {
    let id = ProjectId(id);
    match catalog::project(id) {
        Ok(_) => (
            StatusCode::OK,
            Json(InsightsResponse::success(state.plan.plan().insights(Some(id)))),
        ),
        Err(e) => (status_for(&e), Json(InsightsResponse::error(e.to_string()))),
    }
}
