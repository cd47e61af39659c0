//! # Section Records
//!
//! Every list a section can hold: tasks, SMART goals, risks, budget items,
//! KPIs and impact metrics. Each implements [`Record`] so one generic editor
//! can add, update, delete and toggle all of them.

use super::{RecordKind, Section};
use crate::primitives::{
    NEW_BUDGET_ITEM_DESCRIPTION, NEW_GOAL_TITLE, NEW_IMPACT_METRIC_DESCRIPTION,
    NEW_IMPACT_METRIC_NAME, NEW_KPI_NAME, NEW_KPI_UNIT, NEW_RISK_TITLE, NEW_TASK_TITLE,
};
use crate::{Amount, ItemId, Percent};
use serde::{Deserialize, Serialize};

// =============================================================================
// RECORD TRAIT
// =============================================================================

/// A record kept in one of a section's lists.
pub trait Record: Clone + std::fmt::Debug {
    /// The editable fields of this record.
    type Field: Copy + std::fmt::Debug;

    /// Which kind of record this is.
    const KIND: RecordKind;

    /// The record's id.
    fn id(&self) -> &ItemId;

    /// A new record with placeholder values.
    fn placeholder(id: ItemId) -> Self;

    /// Replace one field. Numeric fields parse leniently.
    fn apply(&mut self, field: Self::Field, value: &str);

    /// Flip the completion flag. Returns false for records without one.
    fn toggle(&mut self) -> bool {
        false
    }

    /// The list of this kind inside a section.
    fn list_mut(section: &mut Section) -> &mut Vec<Self>;
}

// =============================================================================
// TASK
// =============================================================================

/// A checklist task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: ItemId,
    pub title: String,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl Task {
    /// An open task with a title.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Attach a due date and assignee.
    #[must_use]
    pub fn scheduled(mut self, due_date: &str, assignee: &str) -> Self {
        self.due_date = Some(due_date.to_string());
        self.assignee = Some(assignee.to_string());
        self
    }
}

/// Editable task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskField {
    Title,
    DueDate,
    Assignee,
}

fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl Record for Task {
    type Field = TaskField;
    const KIND: RecordKind = RecordKind::Task;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn placeholder(id: ItemId) -> Self {
        Self::new(id, NEW_TASK_TITLE)
    }

    fn apply(&mut self, field: TaskField, value: &str) {
        match field {
            TaskField::Title => self.title = value.to_string(),
            TaskField::DueDate => self.due_date = optional(value),
            TaskField::Assignee => self.assignee = optional(value),
        }
    }

    fn toggle(&mut self) -> bool {
        self.is_completed = !self.is_completed;
        true
    }

    fn list_mut(section: &mut Section) -> &mut Vec<Self> {
        &mut section.tasks
    }
}

// =============================================================================
// SMART GOAL
// =============================================================================

/// The five SMART criteria, in the order they are filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SmartCriterion {
    Specific,
    Measurable,
    Achievable,
    Relevant,
    TimeBound,
}

impl SmartCriterion {
    pub const ALL: [SmartCriterion; 5] = [
        SmartCriterion::Specific,
        SmartCriterion::Measurable,
        SmartCriterion::Achievable,
        SmartCriterion::Relevant,
        SmartCriterion::TimeBound,
    ];

    /// Label used in reports.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SmartCriterion::Specific => "Specific",
            SmartCriterion::Measurable => "Measurable",
            SmartCriterion::Achievable => "Achievable",
            SmartCriterion::Relevant => "Relevant",
            SmartCriterion::TimeBound => "Time-bound",
        }
    }
}

/// A SMART goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SmartGoal {
    pub id: ItemId,
    pub title: String,
    pub specific: String,
    pub measurable: String,
    pub achievable: String,
    pub relevant: String,
    pub time_bound: String,
    pub is_completed: bool,
}

impl SmartGoal {
    /// The text of one criterion.
    #[must_use]
    pub fn criterion(&self, criterion: SmartCriterion) -> &str {
        match criterion {
            SmartCriterion::Specific => &self.specific,
            SmartCriterion::Measurable => &self.measurable,
            SmartCriterion::Achievable => &self.achievable,
            SmartCriterion::Relevant => &self.relevant,
            SmartCriterion::TimeBound => &self.time_bound,
        }
    }

    /// Share of the five criteria that are filled in.
    #[must_use]
    pub fn completeness(&self) -> Percent {
        let filled = SmartCriterion::ALL
            .iter()
            .filter(|c| !self.criterion(**c).is_empty())
            .count();
        Percent::ratio(filled, SmartCriterion::ALL.len())
    }

    /// The first criterion still empty, if any.
    #[must_use]
    pub fn next_incomplete_field(&self) -> Option<SmartCriterion> {
        SmartCriterion::ALL
            .into_iter()
            .find(|c| self.criterion(*c).is_empty())
    }
}

/// Editable goal fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalField {
    Title,
    Specific,
    Measurable,
    Achievable,
    Relevant,
    TimeBound,
}

impl Record for SmartGoal {
    type Field = GoalField;
    const KIND: RecordKind = RecordKind::Goal;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn placeholder(id: ItemId) -> Self {
        Self {
            id,
            title: NEW_GOAL_TITLE.to_string(),
            ..Self::default()
        }
    }

    fn apply(&mut self, field: GoalField, value: &str) {
        let slot = match field {
            GoalField::Title => &mut self.title,
            GoalField::Specific => &mut self.specific,
            GoalField::Measurable => &mut self.measurable,
            GoalField::Achievable => &mut self.achievable,
            GoalField::Relevant => &mut self.relevant,
            GoalField::TimeBound => &mut self.time_bound,
        };
        *slot = value.to_string();
    }

    fn toggle(&mut self) -> bool {
        self.is_completed = !self.is_completed;
        true
    }

    fn list_mut(section: &mut Section) -> &mut Vec<Self> {
        &mut section.goals
    }
}

// =============================================================================
// RISK
// =============================================================================

/// Impact or probability level of a risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
}

impl Level {
    /// Parse "low", "medium" or "high" (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Level> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Level::Low),
            "medium" => Some(Level::Medium),
            "high" => Some(Level::High),
            _ => None,
        }
    }
}

/// A risk with its assessment and mitigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Risk {
    pub id: ItemId,
    pub title: String,
    pub impact: Level,
    pub probability: Level,
    pub mitigation: String,
}

/// Editable risk fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskField {
    Title,
    Impact,
    Probability,
    Mitigation,
}

impl Record for Risk {
    type Field = RiskField;
    const KIND: RecordKind = RecordKind::Risk;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn placeholder(id: ItemId) -> Self {
        Self {
            id,
            title: NEW_RISK_TITLE.to_string(),
            ..Self::default()
        }
    }

    fn apply(&mut self, field: RiskField, value: &str) {
        match field {
            RiskField::Title => self.title = value.to_string(),
            RiskField::Mitigation => self.mitigation = value.to_string(),
            RiskField::Impact => {
                if let Some(level) = Level::parse(value) {
                    self.impact = level;
                }
            }
            RiskField::Probability => {
                if let Some(level) = Level::parse(value) {
                    self.probability = level;
                }
            }
        }
    }

    fn list_mut(section: &mut Section) -> &mut Vec<Self> {
        &mut section.risks
    }
}

// =============================================================================
// BUDGET
// =============================================================================

/// One line of a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetItem {
    pub id: ItemId,
    pub description: String,
    pub amount: Amount,
}

/// A budget: its lines and their running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Budget {
    pub total: Amount,
    pub items: Vec<BudgetItem>,
}

impl Budget {
    /// Sum of all item amounts.
    #[must_use]
    pub fn compute_total(&self) -> Amount {
        self.items.iter().map(|i| i.amount).sum()
    }

    /// Recompute the stored total.
    pub fn recalculate(&mut self) {
        self.total = self.compute_total();
    }

    /// Whether there are no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Editable budget item fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BudgetField {
    Description,
    Amount,
}

impl Record for BudgetItem {
    type Field = BudgetField;
    const KIND: RecordKind = RecordKind::BudgetItem;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn placeholder(id: ItemId) -> Self {
        Self {
            id,
            description: NEW_BUDGET_ITEM_DESCRIPTION.to_string(),
            amount: Amount::ZERO,
        }
    }

    fn apply(&mut self, field: BudgetField, value: &str) {
        match field {
            BudgetField::Description => self.description = value.to_string(),
            BudgetField::Amount => self.amount = Amount::parse_lenient(value),
        }
    }

    fn list_mut(section: &mut Section) -> &mut Vec<Self> {
        &mut section.budget.items
    }
}

// =============================================================================
// KPI
// =============================================================================

/// A key performance indicator tracked during monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Kpi {
    pub id: ItemId,
    pub name: String,
    pub target: Amount,
    pub actual: Amount,
    pub unit: String,
}

impl Kpi {
    /// A KPI with whole-number target and actual values.
    #[must_use]
    pub fn new(id: &str, name: &str, target: i64, actual: i64, unit: &str) -> Self {
        Self {
            id: ItemId::from(id),
            name: name.to_string(),
            target: Amount::from_units(target),
            actual: Amount::from_units(actual),
            unit: unit.to_string(),
        }
    }

    /// Actual as a share of target, clamped to 0..=100; 0 without a target.
    #[must_use]
    pub fn attainment(&self) -> Percent {
        let target = self.target.hundredths();
        let actual = self.actual.hundredths();
        if target <= 0 || actual <= 0 {
            return Percent::ZERO;
        }
        let (actual, target) = (actual as u128, target as u128);
        let rounded = (actual * 200 + target) / (target * 2);
        Percent::new(rounded.min(100) as u8)
    }
}

/// Editable KPI fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiField {
    Name,
    Target,
    Actual,
    Unit,
}

impl Record for Kpi {
    type Field = KpiField;
    const KIND: RecordKind = RecordKind::Kpi;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn placeholder(id: ItemId) -> Self {
        Self {
            id,
            name: NEW_KPI_NAME.to_string(),
            target: Amount::ZERO,
            actual: Amount::ZERO,
            unit: NEW_KPI_UNIT.to_string(),
        }
    }

    fn apply(&mut self, field: KpiField, value: &str) {
        match field {
            KpiField::Name => self.name = value.to_string(),
            KpiField::Target => self.target = Amount::parse_lenient(value),
            KpiField::Actual => self.actual = Amount::parse_lenient(value),
            KpiField::Unit => self.unit = value.to_string(),
        }
    }

    fn list_mut(section: &mut Section) -> &mut Vec<Self> {
        &mut section.kpis
    }
}

// =============================================================================
// IMPACT METRIC
// =============================================================================

/// A headline figure in the impact assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ImpactMetric {
    pub id: ItemId,
    pub name: String,
    pub value: Amount,
    pub description: String,
}

impl ImpactMetric {
    #[must_use]
    pub fn new(id: &str, name: &str, value: i64, description: &str) -> Self {
        Self {
            id: ItemId::from(id),
            name: name.to_string(),
            value: Amount::from_units(value),
            description: description.to_string(),
        }
    }
}

/// Editable impact metric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImpactMetricField {
    Name,
    Value,
    Description,
}

impl Record for ImpactMetric {
    type Field = ImpactMetricField;
    const KIND: RecordKind = RecordKind::ImpactMetric;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn placeholder(id: ItemId) -> Self {
        Self {
            id,
            name: NEW_IMPACT_METRIC_NAME.to_string(),
            value: Amount::ZERO,
            description: NEW_IMPACT_METRIC_DESCRIPTION.to_string(),
        }
    }

    fn apply(&mut self, field: ImpactMetricField, value: &str) {
        match field {
            ImpactMetricField::Name => self.name = value.to_string(),
            ImpactMetricField::Value => self.value = Amount::parse_lenient(value),
            ImpactMetricField::Description => self.description = value.to_string(),
        }
    }

    fn list_mut(section: &mut Section) -> &mut Vec<Self> {
        &mut section.impact_metrics
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_completeness_counts_filled_criteria() {
        let mut goal = SmartGoal::placeholder(ItemId::from("g1"));
        assert_eq!(goal.completeness(), Percent::ZERO);
        assert_eq!(goal.next_incomplete_field(), Some(SmartCriterion::Specific));

        goal.apply(GoalField::Specific, "Reach 200 patients");
        goal.apply(GoalField::Measurable, "Attendance register");
        assert_eq!(goal.completeness().value(), 40);
        assert_eq!(goal.next_incomplete_field(), Some(SmartCriterion::Achievable));

        goal.apply(GoalField::Achievable, "yes");
        goal.apply(GoalField::Relevant, "yes");
        goal.apply(GoalField::TimeBound, "By June");
        assert_eq!(goal.completeness(), Percent::FULL);
        assert_eq!(goal.next_incomplete_field(), None);
    }

    #[test]
    fn risk_ignores_unknown_levels() {
        let mut risk = Risk::placeholder(ItemId::from("r"));
        risk.apply(RiskField::Impact, "HIGH");
        risk.apply(RiskField::Probability, "sometimes");
        assert_eq!(risk.impact, Level::High);
        assert_eq!(risk.probability, Level::Medium);
        assert!(!risk.toggle());
    }

    #[test]
    fn budget_amounts_fall_back_to_zero() {
        let mut item = BudgetItem::placeholder(ItemId::from("b"));
        item.apply(BudgetField::Amount, "not a number");
        assert_eq!(item.amount, Amount::ZERO);
        item.apply(BudgetField::Amount, "1250.5");
        assert_eq!(item.amount, Amount::from_hundredths(125_050));
    }

    #[test]
    fn kpi_attainment() {
        let kpi = Kpi::new("k", "Beneficiaries Reached", 1000, 850, "people");
        assert_eq!(kpi.attainment().value(), 85);

        let over = Kpi::new("k", "Over", 10, 25, "x");
        assert_eq!(over.attainment(), Percent::FULL);

        let untargeted = Kpi::placeholder(ItemId::from("k"));
        assert_eq!(untargeted.attainment(), Percent::ZERO);
    }

    #[test]
    fn task_deserializes_camel_case() {
        let task: Task =
            serde_json::from_str(r#"{"id":"t1","title":"Call donors","isCompleted":true}"#)
                .expect("parse");
        assert!(task.is_completed);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn clearing_an_optional_field() {
        let mut task = Task::new("t", "x").scheduled("2025-03-01", "PM");
        task.apply(TaskField::Assignee, "");
        assert_eq!(task.assignee, None);
    }
}
