//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::NaiveDate;
use phasewise_core::catalog::{self, Plan, PortfolioSummary, Project};
use phasewise_core::content::{
    BudgetField, GoalField, ImpactMetricField, KpiField, RiskField, TaskField,
};
use phasewise_core::{
    ConceptNote, Edit, ItemId, Percent, Phase, PhaseContent, PhaseEditor, PhaseKind, PhaseReport,
    PhaseSchema, PhaseStatus, ProjectHealth, ProjectSession, SearchHit,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// PROJECTS
// =============================================================================

/// A catalog project with its current progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectJson {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub attendees: String,
    pub details: String,
    pub progress: Percent,
    pub health: ProjectHealth,
}

impl ProjectJson {
    /// Build from a catalog entry and its session.
    pub fn new(project: &Project, session: &ProjectSession) -> Self {
        Self {
            id: project.id.0,
            name: project.name.to_string(),
            description: project.description.to_string(),
            date: project.date.to_string(),
            location: project.location.to_string(),
            attendees: project.attendees.to_string(),
            details: project.details.to_string(),
            progress: session.overall_progress(),
            health: session.health(),
        }
    }
}

/// A calendar plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanJson {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub date: String,
    pub location: String,
}

impl From<&Plan> for PlanJson {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id,
            name: plan.name.to_string(),
            description: plan.description.to_string(),
            date: plan.date.to_string(),
            location: plan.location.to_string(),
        }
    }
}

/// Project list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectJson>,
    pub summary: PortfolioSummary,
}

/// One project: catalog data, phase board and linked plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub success: bool,
    pub project: Option<ProjectJson>,
    pub phases: Vec<Phase>,
    pub aggregate: Option<Percent>,
    pub concept_complete: bool,
    pub plans: Vec<PlanJson>,
    pub error: Option<String>,
}

impl ProjectResponse {
    pub fn success(project: &Project, session: &ProjectSession) -> Self {
        Self {
            success: true,
            project: Some(ProjectJson::new(project, session)),
            phases: session.board().snapshot(),
            aggregate: Some(session.aggregate_progress()),
            concept_complete: session.is_concept_complete(),
            plans: catalog::plans_for(project.id).map(PlanJson::from).collect(),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            project: None,
            phases: Vec::new(),
            aggregate: None,
            concept_complete: false,
            plans: Vec::new(),
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// PHASES
// =============================================================================

/// A phase's board entry together with its editable content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseJson {
    pub kind: PhaseKind,
    pub name: String,
    pub description: String,
    pub progress: Percent,
    pub status: PhaseStatus,
    pub locked: bool,
    /// Only present for the Concept phase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept_complete: Option<bool>,
    pub content: PhaseContent,
}

impl PhaseJson {
    pub fn new(session: &ProjectSession, kind: PhaseKind) -> Self {
        let phase = session.board().phase(kind);
        let editor: &PhaseEditor = session.editor(kind);
        Self {
            kind,
            name: kind.name().to_string(),
            description: kind.description().to_string(),
            progress: phase.progress,
            status: phase.status,
            locked: phase.locked,
            concept_complete: (kind == PhaseKind::Concept).then(|| editor.is_concept_complete()),
            content: editor.snapshot(),
        }
    }
}

/// Phase read response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseResponse {
    pub success: bool,
    pub phase: Option<PhaseJson>,
    pub error: Option<String>,
}

impl PhaseResponse {
    pub fn success(phase: PhaseJson) -> Self {
        Self {
            success: true,
            phase: Some(phase),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            phase: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// EDITS
// =============================================================================

/// One editor operation, tagged by `op`.
///
/// ```json
/// { "op": "update_task", "section": "market", "id": "m1", "field": "title", "value": "..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditRequest {
    SetContent { section: String, content: String },

    AddTask { section: String },
    /// Add the phase's `suggestion`-th suggested task, due from today.
    AddSuggestedTask { section: String, suggestion: usize },
    UpdateTask { section: String, id: ItemId, field: TaskField, value: String },
    DeleteTask { section: String, id: ItemId },
    ToggleTask { section: String, id: ItemId },

    AddGoal { section: String },
    UpdateGoal { section: String, id: ItemId, field: GoalField, value: String },
    DeleteGoal { section: String, id: ItemId },
    ToggleGoal { section: String, id: ItemId },

    AddRisk { section: String },
    UpdateRisk { section: String, id: ItemId, field: RiskField, value: String },
    DeleteRisk { section: String, id: ItemId },

    AddBudgetItem { section: String },
    UpdateBudgetItem { section: String, id: ItemId, field: BudgetField, value: String },
    DeleteBudgetItem { section: String, id: ItemId },

    AddKpi { section: String },
    UpdateKpi { section: String, id: ItemId, field: KpiField, value: String },
    DeleteKpi { section: String, id: ItemId },

    AddImpactMetric { section: String },
    UpdateImpactMetric { section: String, id: ItemId, field: ImpactMetricField, value: String },
    DeleteImpactMetric { section: String, id: ItemId },
}

impl EditRequest {
    /// Run the operation against an editor. `today` anchors suggested due dates.
    pub fn apply(&self, editor: &mut PhaseEditor, today: NaiveDate) -> Edit {
        use EditRequest as E;
        match self {
            E::SetContent { section, content } => editor.set_section_content(section, content),

            E::AddTask { section } => editor.add_task(section),
            E::AddSuggestedTask { section, suggestion } => {
                editor.add_suggested_task(section, *suggestion, today)
            }
            E::UpdateTask { section, id, field, value } => editor.update_task(section, id, *field, value),
            E::DeleteTask { section, id } => editor.delete_task(section, id),
            E::ToggleTask { section, id } => editor.toggle_task(section, id),

            E::AddGoal { section } => editor.add_goal(section),
            E::UpdateGoal { section, id, field, value } => editor.update_goal(section, id, *field, value),
            E::DeleteGoal { section, id } => editor.delete_goal(section, id),
            E::ToggleGoal { section, id } => editor.toggle_goal(section, id),

            E::AddRisk { section } => editor.add_risk(section),
            E::UpdateRisk { section, id, field, value } => editor.update_risk(section, id, *field, value),
            E::DeleteRisk { section, id } => editor.delete_risk(section, id),

            E::AddBudgetItem { section } => editor.add_budget_item(section),
            E::UpdateBudgetItem { section, id, field, value } => {
                editor.update_budget_item(section, id, *field, value)
            }
            E::DeleteBudgetItem { section, id } => editor.delete_budget_item(section, id),

            E::AddKpi { section } => editor.add_kpi(section),
            E::UpdateKpi { section, id, field, value } => editor.update_kpi(section, id, *field, value),
            E::DeleteKpi { section, id } => editor.delete_kpi(section, id),

            E::AddImpactMetric { section } => editor.add_impact_metric(section),
            E::UpdateImpactMetric { section, id, field, value } => {
                editor.update_impact_metric(section, id, *field, value)
            }
            E::DeleteImpactMetric { section, id } => editor.delete_impact_metric(section, id),
        }
    }
}

/// Result of an edit or a direct progress report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditResponse {
    pub success: bool,
    /// False when the edit was a no-op (locked phase, unknown id or section).
    pub applied: bool,
    /// Id of a record created by an add.
    pub item: Option<ItemId>,
    pub report: Option<PhaseReport>,
    pub error: Option<String>,
}

impl EditResponse {
    pub fn success(edit: Edit, report: PhaseReport) -> Self {
        Self {
            success: true,
            applied: edit.applied,
            item: edit.item,
            report: Some(report),
            error: None,
        }
    }

    pub fn reported(report: PhaseReport) -> Self {
        Self {
            success: true,
            applied: true,
            item: None,
            report: Some(report),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            applied: false,
            item: None,
            report: None,
            error: Some(msg.into()),
        }
    }
}

/// Direct progress report request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRequest {
    /// Percentage; values above 100 are clamped.
    pub progress: u32,
}

// =============================================================================
// SUGGESTIONS
// =============================================================================

/// A suggested task with its due date resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionJson {
    /// Position to pass as `suggestion` in an `add_suggested_task` edit.
    pub index: usize,
    pub title: String,
    pub due_date: NaiveDate,
    pub assignee: String,
}

/// A phase's suggested tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub success: bool,
    pub phase: Option<PhaseKind>,
    pub suggestions: Vec<SuggestionJson>,
    pub error: Option<String>,
}

impl SuggestionsResponse {
    pub fn success(kind: PhaseKind, today: NaiveDate) -> Self {
        let suggestions = PhaseSchema::of(kind)
            .suggestions
            .iter()
            .enumerate()
            .map(|(index, s)| SuggestionJson {
                index,
                title: s.title.to_string(),
                due_date: s.due_date(today),
                assignee: s.assignee.to_string(),
            })
            .collect();
        Self {
            success: true,
            phase: Some(kind),
            suggestions,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            phase: None,
            suggestions: Vec::new(),
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// CONCEPT NOTE
// =============================================================================

/// Concept Note download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptNoteResponse {
    pub success: bool,
    pub file_name: Option<String>,
    /// Base64-encoded UTF-8 text.
    pub data: Option<String>,
    pub error: Option<String>,
}

impl ConceptNoteResponse {
    pub fn success(note: ConceptNote) -> Self {
        Self {
            success: true,
            file_name: Some(note.file_name),
            data: Some(BASE64.encode(note.body.as_bytes())),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            file_name: None,
            data: None,
            error: Some(msg.into()),
        }
    }

    /// Decode `data` back into text.
    pub fn body(&self) -> Option<String> {
        let bytes = BASE64.decode(self.data.as_deref()?).ok()?;
        String::from_utf8(bytes).ok()
    }
}

// =============================================================================
// STRATEGY
// =============================================================================

/// `?q=` for plan search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Strategic plan search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub term: String,
    pub hits: Vec<SearchHit>,
}

/// Planning insights response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub success: bool,
    pub insights: Vec<String>,
    pub error: Option<String>,
}

impl InsightsResponse {
    pub fn success(insights: Vec<String>) -> Self {
        Self {
            success: true,
            insights,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            insights: Vec::new(),
            error: Some(msg.into()),
        }
    }
}
