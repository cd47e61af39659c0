//! # Content Module
//!
//! The editable state of one phase: its sections and every record they hold.
//!
//! `PhaseContent` serializes as a JSON object keyed by section key, in
//! section order, so content saved by the dashboard rehydrates unchanged:
//!
//! ```json
//! { "problem": { "title": "Problem Statement", "content": "...", "tasks": [] } }
//! ```

mod records;

pub use records::*;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// =============================================================================
// RECORD KINDS AND EXTRAS
// =============================================================================

/// Auxiliary lists a section may be granted by its phase schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extra {
    Goals,
    Risks,
    Budget,
    Kpis,
    ImpactMetrics,
}

/// The kinds of record a section can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Task,
    Goal,
    Risk,
    BudgetItem,
    Kpi,
    ImpactMetric,
}

impl RecordKind {
    /// Prefix of generated ids.
    #[must_use]
    pub fn id_prefix(&self) -> &'static str {
        match self {
            RecordKind::Task => "task",
            RecordKind::Goal => "goal",
            RecordKind::Risk => "risk",
            RecordKind::BudgetItem => "budget",
            RecordKind::Kpi => "kpi",
            RecordKind::ImpactMetric => "im",
        }
    }

    /// The extra a section needs to hold this kind. Tasks need none.
    #[must_use]
    pub fn required_extra(&self) -> Option<Extra> {
        match self {
            RecordKind::Task => None,
            RecordKind::Goal => Some(Extra::Goals),
            RecordKind::Risk => Some(Extra::Risks),
            RecordKind::BudgetItem => Some(Extra::Budget),
            RecordKind::Kpi => Some(Extra::Kpis),
            RecordKind::ImpactMetric => Some(Extra::ImpactMetrics),
        }
    }
}

// =============================================================================
// SECTION
// =============================================================================

/// A named sub-area of a phase: free text plus its record lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    /// Carried as the map key of [`PhaseContent`].
    #[serde(skip)]
    pub key: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub tasks: Vec<Task>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<SmartGoal>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub risks: Vec<Risk>,
    #[serde(skip_serializing_if = "Budget::is_empty")]
    pub budget: Budget,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kpis: Vec<Kpi>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub impact_metrics: Vec<ImpactMetric>,
}

impl Section {
    /// An empty section.
    #[must_use]
    pub fn new(key: &str, title: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            ..Self::default()
        }
    }

    /// `(completed, total)` task counts.
    #[must_use]
    pub fn task_counts(&self) -> (usize, usize) {
        let done = self.tasks.iter().filter(|t| t.is_completed).count();
        (done, self.tasks.len())
    }
}

// =============================================================================
// PHASE CONTENT
// =============================================================================

/// All sections of one phase, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhaseContent {
    sections: Vec<Section>,
}

impl PhaseContent {
    #[must_use]
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Sections in order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a section by key.
    #[must_use]
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// Text content of a section, or `""` if absent.
    #[must_use]
    pub fn text(&self, key: &str) -> &str {
        self.section(key).map_or("", |s| s.content.as_str())
    }

    /// Whether a section with this key exists.
    #[must_use]
    pub fn has_section(&self, key: &str) -> bool {
        self.section(key).is_some()
    }

    /// Swap in a rebuilt section. Returns false if no section has its key.
    pub fn replace_section(&mut self, section: Section) -> bool {
        match self.sections.iter_mut().find(|s| s.key == section.key) {
            Some(slot) => {
                *slot = section;
                true
            }
            None => false,
        }
    }

    /// Append a section (used when filling gaps on rehydration).
    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Recompute every section's budget total from its items.
    pub fn recalculate_budgets(&mut self) {
        for section in &mut self.sections {
            section.budget.recalculate();
        }
    }

    /// Every task in every section.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.sections.iter().flat_map(|s| s.tasks.iter())
    }

    /// Every SMART goal in every section.
    pub fn goals(&self) -> impl Iterator<Item = &SmartGoal> {
        self.sections.iter().flat_map(|s| s.goals.iter())
    }

    /// Section keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.key.as_str())
    }
}

impl Serialize for PhaseContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.key, section)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PhaseContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ContentVisitor)
    }
}

struct ContentVisitor;

impl<'de> Visitor<'de> for ContentVisitor {
    type Value = PhaseContent;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of sections keyed by section key")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PhaseContent, A::Error> {
        let mut sections = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, mut section)) = access.next_entry::<String, Section>()? {
            section.key = key;
            sections.push(section);
        }
        Ok(PhaseContent { sections })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PhaseContent {
        let mut problem = Section::new("problem", "Problem Statement", "");
        problem.content = "Chaplains are overstretched".to_string();
        problem.tasks.push(Task::new("t1", "Interview staff"));
        PhaseContent::new(vec![problem, Section::new("idea", "Solution Concept", "")])
    }

    #[test]
    fn serializes_as_keyed_object_in_order() {
        let json = serde_json::to_value(sample()).expect("serialize");
        let keys: Vec<&String> = json.as_object().expect("object").keys().collect();
        assert_eq!(keys, vec!["problem", "idea"]);
        assert_eq!(json["problem"]["tasks"][0]["isCompleted"], false);
        assert!(json["problem"].get("goals").is_none());
    }

    #[test]
    fn deserialize_restores_keys() {
        let json = serde_json::to_string(&sample()).expect("serialize");
        let back: PhaseContent = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, sample());
        assert_eq!(back.text("problem"), "Chaplains are overstretched");
    }

    #[test]
    fn partial_sections_take_defaults() {
        let content: PhaseContent =
            serde_json::from_str(r#"{"idea": {"content": "A helpline"}}"#).expect("parse");
        let idea = content.section("idea").expect("idea");
        assert_eq!(idea.key, "idea");
        assert!(idea.tasks.is_empty());
        assert_eq!(content.text("problem"), "");
    }

    #[test]
    fn replace_section_requires_known_key() {
        let mut content = sample();
        assert!(!content.replace_section(Section::new("unknown", "", "")));
        let mut idea = Section::new("idea", "Solution Concept", "");
        idea.content = "Updated".to_string();
        assert!(content.replace_section(idea));
        assert_eq!(content.text("idea"), "Updated");
    }

    #[test]
    fn record_kind_prefixes() {
        assert_eq!(RecordKind::BudgetItem.id_prefix(), "budget");
        assert_eq!(RecordKind::ImpactMetric.id_prefix(), "im");
        assert_eq!(RecordKind::Task.required_extra(), None);
        assert_eq!(RecordKind::Kpi.required_extra(), Some(Extra::Kpis));
    }
}
