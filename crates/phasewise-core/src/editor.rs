//! # Phase Editor
//!
//! One editor type for all six phases. The phase's [`PhaseSchema`] decides
//! which sections exist, which record kinds each accepts and how progress
//! is computed; the editor itself only knows the uniform
//! add / update / delete / toggle contract.
//!
//! ## Contract
//!
//! - Every operation returns an [`Edit`]. Unknown sections or item ids are
//!   not errors: the edit comes back with `applied == false` and the content
//!   is untouched.
//! - A locked editor rejects every mutation and reports 0% progress.
//! - Each applied mutation rebuilds the touched section and swaps it in,
//!   then notifies every [`PhaseListener`] with the new content and
//!   progress.

use crate::content::{
    BudgetField, BudgetItem, GoalField, ImpactMetric, ImpactMetricField, Kpi, KpiField,
    PhaseContent, Record, Risk, RiskField, Section, SmartGoal, Task, TaskField,
};
use crate::export::ConceptNote;
use crate::lifecycle::PhaseKind;
use crate::primitives::CompletionPolicy;
use crate::progress::{compute_progress, concept_is_complete};
use crate::schema::PhaseSchema;
use crate::strategy::StrategicPlanSource;
use crate::{ItemId, Percent, PhasewiseError, ProjectId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

// =============================================================================
// IDS
// =============================================================================

/// Source of ids for new records.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self, prefix: &str) -> ItemId;
}

/// `"{prefix}-{unix_millis}"`, bumped by a millisecond whenever the clock
/// has not moved since the last id.
#[derive(Debug, Default)]
pub struct TimestampIds {
    last: AtomicI64,
}

impl TimestampIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimestampIds {
    fn next_id(&self, prefix: &str) -> ItemId {
        let now = chrono::Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        let millis = now.max(previous.saturating_add(1));
        ItemId::new(format!("{prefix}-{millis}"))
    }
}

/// `"{prefix}-1"`, `"{prefix}-2"`, ... Deterministic, for tests and replays.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, prefix: &str) -> ItemId {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        ItemId::new(format!("{prefix}-{n}"))
    }
}

// =============================================================================
// LISTENER AND EDIT
// =============================================================================

/// Receives the editor's outputs after every applied mutation.
pub trait PhaseListener: Send + Sync {
    fn on_content_change(&self, content: &PhaseContent);
    fn on_progress(&self, progress: Percent);
}

/// Result of an editor operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// Whether the content changed.
    pub applied: bool,
    /// Progress after the operation.
    pub progress: Percent,
    /// Id of the record created by an add.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemId>,
}

// =============================================================================
// EDITOR
// =============================================================================

/// Editor for one phase of one project.
pub struct PhaseEditor {
    kind: PhaseKind,
    project_id: ProjectId,
    project_name: String,
    schema: &'static PhaseSchema,
    content: PhaseContent,
    locked: bool,
    policy: CompletionPolicy,
    ids: Arc<dyn IdGenerator>,
    listeners: Vec<Arc<dyn PhaseListener>>,
}

impl std::fmt::Debug for PhaseEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseEditor")
            .field("kind", &self.kind)
            .field("project_id", &self.project_id)
            .field("locked", &self.locked)
            .field("sections", &self.content.sections().len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PhaseEditor {
    /// Editor over the phase's seeded content. Every phase but the first
    /// starts locked.
    #[must_use]
    pub fn new(kind: PhaseKind, project_id: ProjectId, project_name: impl Into<String>) -> Self {
        let schema = PhaseSchema::of(kind);
        Self {
            kind,
            project_id,
            project_name: project_name.into(),
            schema,
            content: schema.seed_content(),
            locked: kind.previous().is_some(),
            policy: CompletionPolicy::default(),
            ids: Arc::new(TimestampIds::new()),
            listeners: Vec::new(),
        }
    }

    /// Editor over previously saved content. Sections the schema expects
    /// but the saved content lacks are seeded.
    #[must_use]
    pub fn rehydrate(
        kind: PhaseKind,
        project_id: ProjectId,
        project_name: impl Into<String>,
        content: PhaseContent,
    ) -> Self {
        let mut editor = Self::new(kind, project_id, project_name);
        editor.content = editor.schema.complete(content);
        editor
    }

    /// Use a different completion policy.
    #[must_use]
    pub fn with_policy(mut self, policy: CompletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use a different id source.
    #[must_use]
    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Register a listener.
    pub fn subscribe(&mut self, listener: Arc<dyn PhaseListener>) {
        self.listeners.push(listener);
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn kind(&self) -> PhaseKind {
        self.kind
    }

    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    #[must_use]
    pub fn schema(&self) -> &'static PhaseSchema {
        self.schema
    }

    #[must_use]
    pub fn policy(&self) -> &CompletionPolicy {
        &self.policy
    }

    /// Borrow the current content.
    #[must_use]
    pub fn content(&self) -> &PhaseContent {
        &self.content
    }

    /// An owned copy of the current content.
    #[must_use]
    pub fn snapshot(&self) -> PhaseContent {
        self.content.clone()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock or unlock the editor. Returns the progress afterwards.
    pub fn set_locked(&mut self, locked: bool) -> Percent {
        self.locked = locked;
        self.progress()
    }

    /// Current progress; 0 while locked.
    #[must_use]
    pub fn progress(&self) -> Percent {
        if self.locked {
            return Percent::ZERO;
        }
        compute_progress(self.schema.rule, &self.content, &self.policy)
    }

    /// Replace the whole content, e.g. when the parent restores saved state.
    pub fn replace_content(&mut self, content: PhaseContent) -> Edit {
        self.content = self.schema.complete(content);
        self.commit(None)
    }

    // -------------------------------------------------------------------------
    // Generic record operations
    // -------------------------------------------------------------------------

    /// Append a placeholder record of kind `R` to a section.
    pub fn add_record<R: Record>(&mut self, section: &str) -> Edit {
        self.insert_record(section, R::placeholder)
    }

    /// Add the phase's `index`-th suggested task to a section's checklist,
    /// due relative to `today`.
    pub fn add_suggested_task(&mut self, section: &str, index: usize, today: NaiveDate) -> Edit {
        let Some(suggestion) = self.schema.suggestion(index) else {
            return self.ignored("add_suggested", section);
        };
        self.insert_record(section, |id| suggestion.task(id, today))
    }

    fn insert_record<R: Record>(&mut self, section: &str, build: impl FnOnce(ItemId) -> R) -> Edit {
        if self.locked {
            return self.ignored("add", section);
        }
        let granted = self
            .schema
            .section(section)
            .is_some_and(|def| def.grants(R::KIND));
        if !granted {
            return self.ignored("add", section);
        }

        let id = self.ids.next_id(R::KIND.id_prefix());
        let record = build(id.clone());
        self.mutate("add", section, Some(id), move |s| {
            R::list_mut(s).push(record);
            true
        })
    }

    /// Set one field of a record of kind `R`.
    pub fn update_record<R: Record>(
        &mut self,
        section: &str,
        id: &ItemId,
        field: R::Field,
        value: &str,
    ) -> Edit {
        self.mutate("update", section, None, |s| {
            match R::list_mut(s).iter_mut().find(|r| r.id() == id) {
                Some(record) => {
                    record.apply(field, value);
                    true
                }
                None => false,
            }
        })
    }

    /// Remove a record of kind `R`.
    pub fn delete_record<R: Record>(&mut self, section: &str, id: &ItemId) -> Edit {
        self.mutate("delete", section, None, |s| {
            let list = R::list_mut(s);
            let before = list.len();
            list.retain(|r| r.id() != id);
            list.len() != before
        })
    }

    /// Flip the completion flag of a record of kind `R`.
    pub fn toggle_record<R: Record>(&mut self, section: &str, id: &ItemId) -> Edit {
        self.mutate("toggle", section, None, |s| {
            R::list_mut(s)
                .iter_mut()
                .find(|r| r.id() == id)
                .is_some_and(|r| r.toggle())
        })
    }

    /// Replace a section's free text.
    pub fn set_section_content(&mut self, section: &str, text: &str) -> Edit {
        self.mutate("content", section, None, |s| {
            s.content = text.to_string();
            true
        })
    }

    fn mutate<F>(&mut self, op: &str, key: &str, item: Option<ItemId>, f: F) -> Edit
    where
        F: FnOnce(&mut Section) -> bool,
    {
        if self.locked {
            return self.ignored(op, key);
        }
        let Some(current) = self.content.section(key) else {
            return self.ignored(op, key);
        };

        let mut rebuilt = current.clone();
        if !f(&mut rebuilt) {
            return self.ignored(op, key);
        }
        // Budget totals are derived; keep them current on every change.
        rebuilt.budget.recalculate();
        self.content.replace_section(rebuilt);
        self.commit(item)
    }

    fn commit(&self, item: Option<ItemId>) -> Edit {
        let progress = self.progress();
        for listener in &self.listeners {
            listener.on_content_change(&self.content);
            listener.on_progress(progress);
        }
        Edit {
            applied: true,
            progress,
            item,
        }
    }

    fn ignored(&self, op: &str, section: &str) -> Edit {
        tracing::debug!(
            phase = self.kind.id(),
            op,
            section,
            locked = self.locked,
            "edit ignored"
        );
        Edit {
            applied: false,
            progress: self.progress(),
            item: None,
        }
    }

    // -------------------------------------------------------------------------
    // Named operations
    // -------------------------------------------------------------------------

    pub fn add_task(&mut self, section: &str) -> Edit {
        self.add_record::<Task>(section)
    }

    pub fn update_task(&mut self, section: &str, id: &ItemId, field: TaskField, value: &str) -> Edit {
        self.update_record::<Task>(section, id, field, value)
    }

    pub fn delete_task(&mut self, section: &str, id: &ItemId) -> Edit {
        self.delete_record::<Task>(section, id)
    }

    pub fn toggle_task(&mut self, section: &str, id: &ItemId) -> Edit {
        self.toggle_record::<Task>(section, id)
    }

    pub fn add_goal(&mut self, section: &str) -> Edit {
        self.add_record::<SmartGoal>(section)
    }

    pub fn update_goal(&mut self, section: &str, id: &ItemId, field: GoalField, value: &str) -> Edit {
        self.update_record::<SmartGoal>(section, id, field, value)
    }

    pub fn delete_goal(&mut self, section: &str, id: &ItemId) -> Edit {
        self.delete_record::<SmartGoal>(section, id)
    }

    pub fn toggle_goal(&mut self, section: &str, id: &ItemId) -> Edit {
        self.toggle_record::<SmartGoal>(section, id)
    }

    pub fn add_risk(&mut self, section: &str) -> Edit {
        self.add_record::<Risk>(section)
    }

    pub fn update_risk(&mut self, section: &str, id: &ItemId, field: RiskField, value: &str) -> Edit {
        self.update_record::<Risk>(section, id, field, value)
    }

    pub fn delete_risk(&mut self, section: &str, id: &ItemId) -> Edit {
        self.delete_record::<Risk>(section, id)
    }

    pub fn add_budget_item(&mut self, section: &str) -> Edit {
        self.add_record::<BudgetItem>(section)
    }

    pub fn update_budget_item(
        &mut self,
        section: &str,
        id: &ItemId,
        field: BudgetField,
        value: &str,
    ) -> Edit {
        self.update_record::<BudgetItem>(section, id, field, value)
    }

    pub fn delete_budget_item(&mut self, section: &str, id: &ItemId) -> Edit {
        self.delete_record::<BudgetItem>(section, id)
    }

    pub fn add_kpi(&mut self, section: &str) -> Edit {
        self.add_record::<Kpi>(section)
    }

    pub fn update_kpi(&mut self, section: &str, id: &ItemId, field: KpiField, value: &str) -> Edit {
        self.update_record::<Kpi>(section, id, field, value)
    }

    pub fn delete_kpi(&mut self, section: &str, id: &ItemId) -> Edit {
        self.delete_record::<Kpi>(section, id)
    }

    pub fn add_impact_metric(&mut self, section: &str) -> Edit {
        self.add_record::<ImpactMetric>(section)
    }

    pub fn update_impact_metric(
        &mut self,
        section: &str,
        id: &ItemId,
        field: ImpactMetricField,
        value: &str,
    ) -> Edit {
        self.update_record::<ImpactMetric>(section, id, field, value)
    }

    pub fn delete_impact_metric(&mut self, section: &str, id: &ItemId) -> Edit {
        self.delete_record::<ImpactMetric>(section, id)
    }

    // -------------------------------------------------------------------------
    // Concept only
    // -------------------------------------------------------------------------

    /// Whether this is an unlocked Concept editor whose content is ready
    /// for a Concept Note.
    #[must_use]
    pub fn is_concept_complete(&self) -> bool {
        self.kind == PhaseKind::Concept
            && !self.locked
            && concept_is_complete(&self.content, self.progress(), &self.policy)
    }

    /// Render the Concept Note. Only the Concept editor can do this.
    pub fn export_concept_note(
        &self,
        plan: &dyn StrategicPlanSource,
        date: NaiveDate,
    ) -> Result<ConceptNote, PhasewiseError> {
        if self.kind != PhaseKind::Concept {
            return Err(PhasewiseError::ExportFailed(format!(
                "{} has no concept note",
                self.kind
            )));
        }
        ConceptNote::generate(&self.project_name, &self.content, plan.plan(), date)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::StaticPlan;
    use crate::Amount;
    use std::sync::Mutex;

    fn editor(kind: PhaseKind) -> PhaseEditor {
        let mut editor = PhaseEditor::new(kind, ProjectId(1), "Arundel Sabbath")
            .with_ids(Arc::new(SequentialIds::new()));
        editor.set_locked(false);
        editor
    }

    #[derive(Default)]
    struct Recorder {
        progress: Mutex<Vec<u8>>,
        contents: Mutex<usize>,
    }

    impl PhaseListener for Recorder {
        fn on_content_change(&self, _content: &PhaseContent) {
            *self.contents.lock().expect("lock") += 1;
        }

        fn on_progress(&self, progress: Percent) {
            self.progress.lock().expect("lock").push(progress.value());
        }
    }

    #[test]
    fn timestamp_ids_never_repeat() {
        let ids = TimestampIds::new();
        let a = ids.next_id("task");
        let b = ids.next_id("task");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("task-"));
    }

    #[test]
    fn new_editors_lock_all_but_concept() {
        assert!(!PhaseEditor::new(PhaseKind::Concept, ProjectId(1), "P").is_locked());
        assert!(PhaseEditor::new(PhaseKind::Planning, ProjectId(1), "P").is_locked());
    }

    #[test]
    fn add_then_toggle_task() {
        let mut editor = editor(PhaseKind::Planning);
        let added = editor.add_task("proposal");
        assert!(added.applied);
        let id = added.item.expect("new id");
        assert_eq!(id.as_str(), "task-1");

        let toggled = editor.toggle_task("proposal", &id);
        assert!(toggled.applied);
        // 1 of 17 tasks
        assert_eq!(toggled.progress, Percent::ratio(1, 17));
    }

    #[test]
    fn suggested_task_joins_the_checklist() {
        let mut editor = editor(PhaseKind::Planning);
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).expect("date");

        let added = editor.add_suggested_task("proposal", 0, today);
        assert!(added.applied);
        let id = added.item.expect("new id");
        let proposal = editor.content().section("proposal").expect("proposal");
        let task = proposal.tasks.iter().find(|t| t.id == id).expect("task");
        assert_eq!(task.title, "Create project timeline");
        assert_eq!(task.due_date.as_deref(), Some("2025-03-08"));
        assert_eq!(task.assignee.as_deref(), Some("Project Manager"));
        assert!(!task.is_completed);
        // 0 of 17 tasks
        assert_eq!(added.progress, Percent::ZERO);

        assert!(!editor.add_suggested_task("proposal", 3, today).applied);
        assert!(!editor.add_suggested_task("no-such-section", 0, today).applied);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let mut editor = editor(PhaseKind::Planning);
        let before = editor.snapshot();
        let ghost = ItemId::from("ghost");

        assert!(!editor.delete_task("proposal", &ghost).applied);
        assert!(!editor.toggle_task("proposal", &ghost).applied);
        assert!(!editor.update_task("proposal", &ghost, TaskField::Title, "x").applied);
        assert!(!editor.add_task("no-such-section").applied);
        assert_eq!(editor.snapshot(), before);
    }

    #[test]
    fn locked_editor_rejects_everything() {
        let mut editor = PhaseEditor::new(PhaseKind::Feasibility, ProjectId(1), "P");
        let edit = editor.toggle_task("market", &ItemId::from("m1"));
        assert!(!edit.applied);
        assert_eq!(edit.progress, Percent::ZERO);
        assert!(!editor.set_section_content("market", "text").applied);
        assert!(editor.content().section("market").expect("market").content.is_empty());
    }

    #[test]
    fn extras_only_where_granted() {
        let mut editor = editor(PhaseKind::Feasibility);
        assert!(!editor.add_budget_item("market").applied);
        assert!(!editor.add_risk("financial").applied);
        assert!(editor.add_budget_item("financial").applied);
        assert!(editor.add_risk("risk").applied);
    }

    #[test]
    fn budget_total_follows_items() {
        let mut editor = editor(PhaseKind::Feasibility);
        let a = editor.add_budget_item("financial").item.expect("id");
        let b = editor.add_budget_item("financial").item.expect("id");
        editor.update_budget_item("financial", &a, BudgetField::Amount, "100");
        editor.update_budget_item("financial", &b, BudgetField::Amount, "abc");

        let total = |e: &PhaseEditor| e.content().section("financial").expect("financial").budget.total;
        assert_eq!(total(&editor), Amount::from_units(100));

        editor.update_budget_item("financial", &b, BudgetField::Amount, "50.25");
        assert_eq!(total(&editor), Amount::from_hundredths(15_025));

        editor.delete_budget_item("financial", &a);
        assert_eq!(total(&editor), Amount::from_hundredths(5_025));
    }

    #[test]
    fn risks_kpis_and_metrics_are_editable() {
        let mut feasibility = editor(PhaseKind::Feasibility);
        let risk = feasibility.add_risk("risk").item.expect("id");
        feasibility.update_risk("risk", &risk, RiskField::Impact, "high");
        let stored = &feasibility.content().section("risk").expect("risk").risks[0];
        assert_eq!(stored.title, "New risk");
        assert_eq!(stored.impact, crate::content::Level::High);
        assert!(feasibility.delete_risk("risk", &risk).applied);

        let mut monitoring = editor(PhaseKind::Monitoring);
        let kpi1 = ItemId::from("kpi1");
        monitoring.update_kpi("monitoring", &kpi1, KpiField::Actual, "1000");
        let kpi = &monitoring.content().section("monitoring").expect("monitoring").kpis[0];
        assert_eq!(kpi.attainment(), Percent::FULL);
        assert!(monitoring.add_kpi("monitoring").applied);
        assert!(monitoring.delete_kpi("monitoring", &kpi1).applied);

        let mut reporting = editor(PhaseKind::Reporting);
        let im = reporting.add_impact_metric("report").item.expect("id");
        reporting.update_impact_metric("report", &im, ImpactMetricField::Value, "12");
        let metrics = &reporting.content().section("report").expect("report").impact_metrics;
        assert_eq!(metrics.len(), 5);
        assert_eq!(metrics[4].value, Amount::from_units(12));
        assert!(reporting.delete_impact_metric("report", &im).applied);
    }

    #[test]
    fn risks_do_not_toggle() {
        let mut editor = editor(PhaseKind::Feasibility);
        let risk = editor.add_risk("risk").item.expect("id");
        assert!(!editor.toggle_record::<Risk>("risk", &risk).applied);
    }

    #[test]
    fn concept_goals_and_content() {
        let mut editor = editor(PhaseKind::Concept);
        assert!(!editor.add_task("objectives").applied);

        let goal = editor.add_goal("objectives").item.expect("id");
        editor.update_goal("objectives", &goal, GoalField::Specific, "Visit every ward");
        let edit = editor.set_section_content("problem", "Patients need weekly pastoral visits");
        // content unit done, goal not done
        assert_eq!(edit.progress.value(), 50);

        let edit = editor.toggle_goal("objectives", &goal);
        assert_eq!(edit.progress, Percent::FULL);
        assert!(!editor.is_concept_complete());
        assert!(editor.delete_goal("objectives", &goal).applied);
    }

    #[test]
    fn listeners_see_every_applied_edit() {
        let recorder = Arc::new(Recorder::default());
        let mut editor = editor(PhaseKind::Implementation);
        editor.subscribe(recorder.clone());

        editor.toggle_task("mobilization", &ItemId::from("m1"));
        editor.toggle_task("mobilization", &ItemId::from("missing"));
        editor.toggle_task("execution", &ItemId::from("e1"));

        assert_eq!(*recorder.contents.lock().expect("lock"), 2);
        assert_eq!(*recorder.progress.lock().expect("lock"), vec![8, 17]);
    }

    #[test]
    fn rehydrate_keeps_saved_state() {
        let saved: PhaseContent = serde_json::from_str(
            r#"{"market": {"tasks": [{"id": "m1", "title": "Only task", "isCompleted": true}]}}"#,
        )
        .expect("parse");
        let mut editor = PhaseEditor::rehydrate(PhaseKind::Feasibility, ProjectId(2), "P", saved);
        editor.set_locked(false);

        let market = editor.content().section("market").expect("market");
        assert_eq!(market.title, "Market Research");
        assert_eq!(market.tasks.len(), 1);
        // 1 done of 1 + 12 seeded
        assert_eq!(editor.progress(), Percent::ratio(1, 13));
    }

    #[test]
    fn rehydrate_recomputes_budget_total() {
        let saved: PhaseContent = serde_json::from_str(
            r#"{"financial": {"budget": {"items": [{"id": "b1", "amount": 100}, {"id": "b2", "amount": "abc"}], "total": 0}}}"#,
        )
        .expect("parse");
        let editor = PhaseEditor::rehydrate(PhaseKind::Feasibility, ProjectId(2), "P", saved);

        let financial = editor.content().section("financial").expect("financial");
        assert_eq!(financial.budget.items.len(), 2);
        assert_eq!(financial.budget.total, Amount::from_units(100));
    }

    #[test]
    fn only_concept_exports() {
        let plan = StaticPlan::builtin();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).expect("date");
        assert!(editor(PhaseKind::Concept).export_concept_note(&plan, date).is_ok());
        assert!(matches!(
            editor(PhaseKind::Planning).export_concept_note(&plan, date),
            Err(PhasewiseError::ExportFailed(_))
        ));
    }
}
