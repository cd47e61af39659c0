//! # Strategic Plan
//!
//! Read-only organisational context: vision, mission, values, strategic
//! objectives and the plan's own project list.
//!
//! Consumers take a `&dyn StrategicPlanSource` instead of reaching for a
//! global, so tests and the CLI can hand in any plan they like.

use crate::{PhasewiseError, ProjectId};
use serde::{Deserialize, Serialize};

// =============================================================================
// PLAN DATA
// =============================================================================

/// A strategic objective and its planned activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StrategicObjective {
    pub objective: String,
    pub activities: Vec<String>,
}

/// A project as listed in the strategic plan document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlanProject {
    pub name: String,
    pub description: String,
    pub timeline: String,
    pub responsible: String,
    pub budget: String,
    pub status: String,
}

/// A free-text block of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlanText {
    pub description: String,
}

/// The organisation's strategic plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StrategicPlan {
    pub title: String,
    pub vision: String,
    pub mission: String,
    pub values: Vec<String>,
    pub strategic_objectives: Vec<StrategicObjective>,
    pub projects: Vec<PlanProject>,
    pub implementation_framework: PlanText,
    pub monitoring_evaluation: PlanText,
}

/// One search match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub section: String,
    pub content: String,
}

impl SearchHit {
    fn new(section: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            content: content.into(),
        }
    }
}

impl StrategicPlan {
    /// Objective titles, in plan order.
    pub fn objective_titles(&self) -> impl Iterator<Item = &str> {
        self.strategic_objectives.iter().map(|o| o.objective.as_str())
    }

    /// Case-insensitive search across the plan.
    ///
    /// Hits come back in a fixed order: vision, mission, values,
    /// objectives (each followed by its matching activities), projects,
    /// implementation framework, monitoring and evaluation. A blank term
    /// matches nothing.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<SearchHit> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let matches = |text: &str| text.to_lowercase().contains(&needle);
        let mut hits = Vec::new();

        if matches(&self.vision) {
            hits.push(SearchHit::new("Vision", &self.vision));
        }
        if matches(&self.mission) {
            hits.push(SearchHit::new("Mission", &self.mission));
        }
        for value in self.values.iter().filter(|v| matches(v)) {
            hits.push(SearchHit::new("Values", value));
        }
        for objective in &self.strategic_objectives {
            if matches(&objective.objective) {
                hits.push(SearchHit::new("Strategic Objectives", &objective.objective));
            }
            for activity in objective.activities.iter().filter(|a| matches(a)) {
                hits.push(SearchHit::new(
                    format!("Strategic Objective: {}", objective.objective),
                    activity,
                ));
            }
        }
        for project in &self.projects {
            if matches(&project.name) || matches(&project.description) {
                hits.push(SearchHit::new(
                    "Projects",
                    format!("{}: {}", project.name, project.description),
                ));
            }
        }
        if matches(&self.implementation_framework.description) {
            hits.push(SearchHit::new(
                "Implementation Framework",
                &self.implementation_framework.description,
            ));
        }
        if matches(&self.monitoring_evaluation.description) {
            hits.push(SearchHit::new(
                "Monitoring and Evaluation",
                &self.monitoring_evaluation.description,
            ));
        }

        tracing::debug!(term, hits = hits.len(), "strategic plan search");
        hits
    }

    /// First plan project whose name contains `name`, ignoring case.
    #[must_use]
    pub fn project_by_name(&self, name: &str) -> Option<&PlanProject> {
        let needle = name.to_lowercase();
        self.projects
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
    }

    /// Planning insights, general first, then any for the given project.
    #[must_use]
    pub fn insights(&self, project: Option<ProjectId>) -> Vec<String> {
        let mut insights: Vec<String> = GENERAL_INSIGHTS.iter().map(|s| s.to_string()).collect();
        let specific: &[&str] = match project.map(|p| p.0) {
            Some(1) => &[
                "Arundel Sabbath aligns with the strategic objective of spiritual care in institutions.",
                "Consider measuring spiritual engagement metrics for this project.",
            ],
            Some(4) => &[
                "The church building project supports community spiritual infrastructure.",
                "Regular progress tracking against the implementation framework is recommended.",
            ],
            Some(5) => &[
                "The radio station extends spiritual care reach beyond physical presence.",
                "Consider how this project can support multiple strategic objectives simultaneously.",
            ],
            _ => &[],
        };
        insights.extend(specific.iter().map(|s| s.to_string()));
        insights
    }

    /// Parse a plan from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, PhasewiseError> {
        Ok(serde_json::from_str(json)?)
    }
}

const GENERAL_INSIGHTS: [&str; 4] = [
    "The strategic plan emphasizes spiritual care and wholistic wellness in the workplace.",
    "Projects should align with the mission of being a beacon of spiritual care.",
    "Regular monitoring and evaluation is key to successful implementation.",
    "Consider how each project contributes to the overall vision.",
];

// =============================================================================
// SOURCE
// =============================================================================

/// Anything that can hand out the strategic plan.
pub trait StrategicPlanSource: Send + Sync {
    fn plan(&self) -> &StrategicPlan;
}

/// A plan held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticPlan {
    plan: StrategicPlan,
}

impl StaticPlan {
    #[must_use]
    pub fn new(plan: StrategicPlan) -> Self {
        Self { plan }
    }

    /// The organisation's published vision, mission and values.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(StrategicPlan {
            title: "Chaplaincy Services Strategic Plan".to_string(),
            vision: "To champion and become a beacon of spiritual care and wholistic wellness in the workplace, institutions, sport and beyond.".to_string(),
            mission: "To provide care, counsel, and crisis management services to employees, business leaders, students, team members and their families. Through a wholistic and all inclusive approach.".to_string(),
            values: ["INCLUSIVITY", "CONFIDENTIALITY", "DIVERSITY", "INTEGRITY", "INCARNATIONAL"]
                .iter()
                .map(|v| v.to_string())
                .collect(),
            ..StrategicPlan::default()
        })
    }
}

impl StrategicPlanSource for StaticPlan {
    fn plan(&self) -> &StrategicPlan {
        &self.plan
    }
}

// =============================================================================
// TESTS
// =============================================================================
