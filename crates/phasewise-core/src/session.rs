//! # Project Session
//!
//! The coordinator for one project: it owns the [`PhaseBoard`] and the six
//! [`PhaseEditor`]s and is the only code that writes to the board.
//!
//! ```text
//! caller ── edit(kind, op) ──▶ PhaseEditor ── progress ──▶ PhaseBoard
//!                                   ▲                          │
//!                                   └──── unlock next phase ◀──┘
//! ```
//!
//! When a report unlocks the next phase, that editor is unlocked and its
//! own progress is reported in turn, so a chain of already-complete phases
//! opens in one step.

use crate::catalog::{self, ProjectHealth};
use crate::content::PhaseContent;
use crate::editor::{IdGenerator, PhaseEditor, PhaseListener};
use crate::export::{ConceptNote, Exporter};
use crate::lifecycle::{BoardListener, Phase, PhaseBoard, PhaseKind, PhaseReport};
use crate::primitives::CompletionPolicy;
use crate::strategy::StrategicPlanSource;
use crate::{Percent, PhasewiseError, ProjectId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Serializable view of a whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub project_id: ProjectId,
    pub project_name: String,
    pub phases: Vec<Phase>,
    pub aggregate: Percent,
    pub overall: Percent,
    pub health: ProjectHealth,
    pub concept_complete: bool,
    pub contents: BTreeMap<PhaseKind, PhaseContent>,
}

/// One project's board and editors.
#[derive(Debug)]
pub struct ProjectSession {
    project_id: ProjectId,
    project_name: String,
    /// Progress recorded for the project outside the board, if any.
    seeded_progress: Option<Percent>,
    board: PhaseBoard,
    editors: Vec<PhaseEditor>,
    exporter: Exporter,
}

impl ProjectSession {
    /// A fresh session: seeded content, only the Concept phase open.
    #[must_use]
    pub fn new(project_id: ProjectId, project_name: impl Into<String>) -> Self {
        let project_name = project_name.into();
        let editors = PhaseKind::ALL
            .into_iter()
            .map(|kind| PhaseEditor::new(kind, project_id, project_name.clone()))
            .collect();
        Self {
            project_id,
            project_name,
            seeded_progress: None,
            board: PhaseBoard::new(),
            editors,
            exporter: Exporter::new(),
        }
    }

    /// A session for a catalog project, carrying its recorded progress.
    pub fn from_catalog(id: ProjectId) -> Result<Self, PhasewiseError> {
        let project = catalog::project(id)?;
        let mut session = Self::new(project.id, project.name);
        session.seeded_progress = project.progress;
        Ok(session)
    }

    /// Use a completion policy for every editor.
    #[must_use]
    pub fn with_policy(mut self, policy: CompletionPolicy) -> Self {
        self.editors = std::mem::take(&mut self.editors)
            .into_iter()
            .map(|e| e.with_policy(policy))
            .collect();
        self
    }

    /// Use one id source for every editor.
    #[must_use]
    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.editors = std::mem::take(&mut self.editors)
            .into_iter()
            .map(|e| e.with_ids(ids.clone()))
            .collect();
        self
    }

    /// Register a board listener.
    pub fn subscribe_board(&mut self, listener: Arc<dyn BoardListener>) {
        self.board.subscribe(listener);
    }

    /// Register a listener on one phase's editor.
    pub fn subscribe_phase(&mut self, kind: PhaseKind, listener: Arc<dyn PhaseListener>) {
        self.editors[kind.index()].subscribe(listener);
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    #[must_use]
    pub fn board(&self) -> &PhaseBoard {
        &self.board
    }

    #[must_use]
    pub fn editor(&self, kind: PhaseKind) -> &PhaseEditor {
        &self.editors[kind.index()]
    }

    /// The pure board mean.
    #[must_use]
    pub fn aggregate_progress(&self) -> Percent {
        self.board.aggregate_progress()
    }

    /// Recorded progress if the project has one, else the board mean.
    #[must_use]
    pub fn overall_progress(&self) -> Percent {
        self.seeded_progress
            .unwrap_or_else(|| self.board.aggregate_progress())
    }

    #[must_use]
    pub fn health(&self) -> ProjectHealth {
        ProjectHealth::from_progress(self.overall_progress())
    }

    #[must_use]
    pub fn is_concept_complete(&self) -> bool {
        self.editor(PhaseKind::Concept).is_concept_complete()
    }

    #[must_use]
    pub fn is_exporting(&self) -> bool {
        self.exporter.is_in_progress()
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Run an editor operation and report the editor's progress.
    pub fn edit<T, F>(&mut self, kind: PhaseKind, op: F) -> (T, PhaseReport)
    where
        F: FnOnce(&mut PhaseEditor) -> T,
    {
        let output = op(&mut self.editors[kind.index()]);
        let progress = self.editors[kind.index()].progress();
        (output, self.report_phase_progress(kind, progress))
    }

    /// Report a phase's progress and open any phases that unlocks.
    pub fn report_phase_progress(&mut self, kind: PhaseKind, progress: Percent) -> PhaseReport {
        let report = self.board.report_phase_progress(kind, progress);

        let mut next = report.unlocked;
        while let Some(unlocked) = next {
            let progress = self.editors[unlocked.index()].set_locked(false);
            next = self.board.report_phase_progress(unlocked, progress).unlocked;
        }

        report
    }

    /// Replace a phase's content with previously saved content.
    pub fn rehydrate(&mut self, kind: PhaseKind, content: PhaseContent) -> PhaseReport {
        self.edit(kind, |editor| editor.replace_content(content)).1
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            project_id: self.project_id,
            project_name: self.project_name.clone(),
            phases: self.board.snapshot(),
            aggregate: self.aggregate_progress(),
            overall: self.overall_progress(),
            health: self.health(),
            concept_complete: self.is_concept_complete(),
            contents: self
                .editors
                .iter()
                .map(|e| (e.kind(), e.snapshot()))
                .collect(),
        }
    }

    /// Render the Concept Note. Failures are logged and give `None`.
    pub fn concept_note(&self, plan: &dyn StrategicPlanSource, date: NaiveDate) -> Option<ConceptNote> {
        let concept = self.editor(PhaseKind::Concept);
        self.exporter
            .run(|| concept.export_concept_note(plan, date))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::SequentialIds;
    use crate::strategy::StaticPlan;
    use crate::{ItemId, PhaseStatus};
    use std::sync::Mutex;

    fn session() -> ProjectSession {
        ProjectSession::new(ProjectId(42), "Hospital Visits").with_ids(Arc::new(SequentialIds::new()))
    }

    fn complete_all_tasks(session: &mut ProjectSession, kind: PhaseKind) {
        let ids: Vec<(String, ItemId)> = session
            .editor(kind)
            .content()
            .sections()
            .iter()
            .flat_map(|s| s.tasks.iter().map(move |t| (s.key.clone(), t.id.clone())))
            .collect();
        for (section, id) in ids {
            session.edit(kind, |e| e.toggle_task(&section, &id));
        }
    }

    #[test]
    fn edits_flow_into_the_board() {
        let mut session = session();
        let (edit, report) = session.edit(PhaseKind::Concept, |e| {
            e.set_section_content("problem", "Patients lack pastoral care")
        });
        assert!(edit.applied);
        assert_eq!(report.phase.progress, Percent::FULL);
        assert_eq!(report.unlocked, Some(PhaseKind::Feasibility));
        assert!(!session.editor(PhaseKind::Feasibility).is_locked());
    }

    #[test]
    fn locked_phase_edits_report_zero() {
        let mut session = session();
        let (edit, report) = session.edit(PhaseKind::Planning, |e| e.add_task("proposal"));
        assert!(!edit.applied);
        assert_eq!(report.phase.progress, Percent::ZERO);
        assert!(report.phase.locked);
    }

    #[test]
    fn completing_feasibility_opens_planning() {
        let mut session = session();
        session.edit(PhaseKind::Concept, |e| e.set_section_content("problem", "Too short"));
        assert!(session.editor(PhaseKind::Feasibility).is_locked());

        session.report_phase_progress(PhaseKind::Concept, Percent::FULL);
        complete_all_tasks(&mut session, PhaseKind::Feasibility);
        assert!(!session.board().is_locked(PhaseKind::Planning));
        assert_eq!(
            session.board().phase(PhaseKind::Feasibility).status,
            PhaseStatus::Completed
        );
    }

    #[test]
    fn unlocks_cascade_through_complete_phases() {
        let mut session = session();
        let done: PhaseContent = serde_json::from_str(
            r#"{"market": {"tasks": [{"id": "m1", "title": "Done", "isCompleted": true}]},
                "technical": {"tasks": []}, "financial": {"tasks": []}, "risk": {"tasks": []}}"#,
        )
        .expect("parse");
        // Saved content is accepted while locked but reads 0%.
        let report = session.rehydrate(PhaseKind::Feasibility, done);
        assert_eq!(report.phase.progress, Percent::ZERO);

        let (_, report) = session.edit(PhaseKind::Concept, |e| {
            e.set_section_content("idea", "Weekly ward rounds")
        });
        assert_eq!(report.unlocked, Some(PhaseKind::Feasibility));
        assert_eq!(session.board().phase(PhaseKind::Feasibility).progress, Percent::FULL);
        assert!(!session.editor(PhaseKind::Planning).is_locked());
        assert!(session.editor(PhaseKind::Implementation).is_locked());
    }

    #[test]
    fn unlock_survives_regression() {
        let mut session = session();
        session.edit(PhaseKind::Concept, |e| {
            e.set_section_content("problem", "A long enough statement")
        });
        let (_, report) = session.edit(PhaseKind::Concept, |e| e.set_section_content("problem", "short"));

        assert_eq!(report.phase.progress, Percent::ZERO);
        assert_eq!(report.phase.status, PhaseStatus::NotStarted);
        assert!(!session.board().is_locked(PhaseKind::Feasibility));
        assert!(!session.editor(PhaseKind::Feasibility).is_locked());
    }

    #[test]
    fn rehydrate_reports_progress() {
        let mut session = session();
        let saved: PhaseContent =
            serde_json::from_str(r#"{"idea": {"content": "A chaplain hotline"}}"#).expect("parse");
        let report = session.rehydrate(PhaseKind::Concept, saved);
        assert_eq!(report.phase.progress, Percent::FULL);
    }

    #[test]
    fn overall_prefers_catalog_progress() {
        let session = ProjectSession::from_catalog(ProjectId(1)).expect("project 1");
        assert_eq!(session.project_name(), "Arundel Sabbath");
        assert_eq!(session.aggregate_progress(), Percent::ZERO);
        assert_eq!(session.overall_progress().value(), 45);
        assert_eq!(session.health(), ProjectHealth::NeedsAttention);

        assert!(ProjectSession::from_catalog(ProjectId(0)).is_err());
        assert_eq!(self::session().overall_progress(), Percent::ZERO);
    }

    #[derive(Default)]
    struct BoardLog {
        phases: Mutex<Vec<(PhaseKind, u8)>>,
        aggregates: Mutex<Vec<u8>>,
    }

    impl BoardListener for BoardLog {
        fn on_phase_progress(&self, phase: &Phase) {
            self.phases
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push((phase.kind, phase.progress.value()));
        }

        fn on_aggregate(&self, aggregate: Percent) {
            self.aggregates
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(aggregate.value());
        }
    }

    #[test]
    fn board_listeners_see_cascaded_unlocks() {
        let mut session = session();
        let log = Arc::new(BoardLog::default());
        session.subscribe_board(log.clone());

        session.report_phase_progress(PhaseKind::Concept, Percent::FULL);

        let phases = log.phases.lock().expect("lock").clone();
        assert_eq!(phases, vec![(PhaseKind::Concept, 100), (PhaseKind::Feasibility, 0)]);
        assert_eq!(log.aggregates.lock().expect("lock").len(), 2);
    }

    #[test]
    fn snapshot_serializes_with_phase_keys() {
        let snapshot = session().snapshot();
        assert_eq!(snapshot.phases.len(), 6);
        assert_eq!(snapshot.contents.len(), 6);

        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert!(json["contents"]["feasibility"]["market"].is_object());
        assert_eq!(json["phases"][1]["status"], "not-started");
    }

    #[test]
    fn concept_note_uses_project_name() {
        let session = session();
        let note = session
            .concept_note(&StaticPlan::builtin(), NaiveDate::from_ymd_opt(2025, 2, 1).expect("date"))
            .expect("note");
        assert_eq!(note.file_name, "Hospital_Visits_Concept_Note.txt");
        assert!(!session.is_exporting());
    }
}
