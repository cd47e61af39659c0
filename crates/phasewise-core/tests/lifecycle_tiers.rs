//! # Lifecycle Tier Tests (T0-T4)
//!
//! Behaviour a project relies on end to end. If ANY tier fails, the
//! lifecycle engine is INVALID.
//!
//! ## Tiers
//! - T0: Sequential Unlock
//! - T1: Status and Aggregate
//! - T2: Editing and Progress
//! - T3: Concept Completion
//! - T4: Export

use chrono::NaiveDate;
use phasewise_core::content::{BudgetField, GoalField, TaskField};
use phasewise_core::{
    Amount, ItemId, Percent, PhaseContent, PhaseEditor, PhaseKind, PhaseStatus, ProjectId,
    ProjectSession, Section, SequentialIds, SmartGoal, StaticPlan, Task,
};
use std::sync::Arc;

fn session() -> ProjectSession {
    ProjectSession::new(ProjectId(1), "Arundel Sabbath").with_ids(Arc::new(SequentialIds::new()))
}

fn unlocked(kind: PhaseKind) -> PhaseEditor {
    let mut editor =
        PhaseEditor::new(kind, ProjectId(1), "Arundel Sabbath").with_ids(Arc::new(SequentialIds::new()));
    editor.set_locked(false);
    editor
}

fn tasks(prefix: &str, total: usize, done: usize) -> Vec<Task> {
    (0..total)
        .map(|i| Task {
            is_completed: i < done,
            ..Task::new(format!("{prefix}{i}").as_str(), format!("Task {i}"))
        })
        .collect()
}

fn section(key: &str, content: &str, tasks: Vec<Task>) -> Section {
    Section {
        content: content.to_string(),
        tasks,
        ..Section::new(key, "", "")
    }
}

// =============================================================================
// TIER T0: SEQUENTIAL UNLOCK
// =============================================================================

mod t0_sequential_unlock {
    use super::*;

    /// T0.1: Only the first phase starts open.
    #[test]
    fn only_concept_starts_unlocked() {
        let session = session();
        for kind in PhaseKind::ALL {
            assert_eq!(
                session.board().is_locked(kind),
                kind != PhaseKind::Concept,
                "{kind:?}"
            );
            assert_eq!(session.editor(kind).is_locked(), kind != PhaseKind::Concept);
        }
    }

    /// T0.2: Each phase opens exactly when its predecessor reaches 100%.
    #[test]
    fn each_phase_opens_after_its_predecessor() {
        let mut session = session();
        for kind in PhaseKind::ALL {
            let Some(next) = kind.next() else {
                continue;
            };
            session.report_phase_progress(kind, Percent::new(99));
            assert!(session.board().is_locked(next), "{next:?} opened at 99%");

            let report = session.report_phase_progress(kind, Percent::FULL);
            assert_eq!(report.unlocked, Some(next));
            assert!(!session.board().is_locked(next));
            assert!(!session.editor(next).is_locked());
        }
    }

    /// T0.3: A phase stays open after its predecessor regresses.
    #[test]
    fn unlock_is_a_high_water_mark() {
        let mut session = session();
        session.report_phase_progress(PhaseKind::Concept, Percent::FULL);
        session.report_phase_progress(PhaseKind::Concept, Percent::new(40));

        assert!(!session.board().is_locked(PhaseKind::Feasibility));
        assert_eq!(
            session.board().phase(PhaseKind::Concept).status,
            PhaseStatus::InProgress
        );
    }

    /// T0.4: Reporting 100% again does not unlock anything twice.
    #[test]
    fn repeated_full_report_unlocks_once() {
        let mut session = session();
        let first = session.report_phase_progress(PhaseKind::Concept, Percent::FULL);
        let second = session.report_phase_progress(PhaseKind::Concept, Percent::FULL);

        assert_eq!(first.unlocked, Some(PhaseKind::Feasibility));
        assert_eq!(second.unlocked, None);
    }
}

// =============================================================================
// TIER T1: STATUS AND AGGREGATE
// =============================================================================

mod t1_status_and_aggregate {
    use super::*;

    /// T1.1: Completed if and only if progress is 100.
    #[test]
    fn status_completed_iff_full() {
        let mut session = session();
        for value in [0u8, 1, 50, 99, 100] {
            session.report_phase_progress(PhaseKind::Concept, Percent::new(value));
            let phase = session.board().phase(PhaseKind::Concept);
            assert_eq!(phase.status == PhaseStatus::Completed, value == 100, "{value}");
        }
    }

    /// T1.2: Status is derived from progress.
    #[test]
    fn status_tracks_progress() {
        assert_eq!(PhaseStatus::from_progress(Percent::ZERO), PhaseStatus::NotStarted);
        assert_eq!(PhaseStatus::from_progress(Percent::new(1)), PhaseStatus::InProgress);
        assert_eq!(PhaseStatus::from_progress(Percent::FULL), PhaseStatus::Completed);
    }

    /// T1.3: [100, 50, 0, 0, 0, 0] aggregates to 25.
    #[test]
    fn aggregate_is_rounded_mean() {
        let mut session = session();
        session.report_phase_progress(PhaseKind::Concept, Percent::FULL);
        session.report_phase_progress(PhaseKind::Feasibility, Percent::new(50));

        assert_eq!(session.aggregate_progress(), Percent::new(25));
    }

    /// T1.4: A fresh project aggregates to zero.
    #[test]
    fn fresh_project_aggregates_to_zero() {
        assert_eq!(session().aggregate_progress(), Percent::ZERO);
    }
}

// =============================================================================
// TIER T2: EDITING AND PROGRESS
// =============================================================================

mod t2_editing_and_progress {
    use super::*;

    /// T2.1: 0/2 plus one new completed task gives 1/3 = 33%.
    #[test]
    fn added_task_changes_ratio() {
        let mut editor = unlocked(PhaseKind::Feasibility);
        let content = PhaseContent::new(vec![
            section("market", "", tasks("m", 2, 0)),
            section("technical", "", Vec::new()),
            section("financial", "", Vec::new()),
            section("risk", "", Vec::new()),
        ]);
        assert_eq!(editor.replace_content(content).progress, Percent::ZERO);

        let added = editor.add_task("market");
        let id = added.item.expect("new task id");
        assert_eq!(added.progress, Percent::ZERO);

        let toggled = editor.toggle_task("market", &id);
        assert!(toggled.applied);
        assert_eq!(toggled.progress, Percent::new(33));
    }

    /// T2.2: Budget totals follow add, edit and delete; bad amounts count as 0.
    #[test]
    fn budget_total_recomputes() {
        let mut editor = unlocked(PhaseKind::Feasibility);
        let first = editor.add_budget_item("financial").item.expect("first id");
        let second = editor.add_budget_item("financial").item.expect("second id");

        editor.update_budget_item("financial", &first, BudgetField::Amount, "100");
        editor.update_budget_item("financial", &second, BudgetField::Amount, "abc");
        let total = |e: &PhaseEditor| e.content().section("financial").map(|s| s.budget.total);
        assert_eq!(total(&editor), Some(Amount::from_units(100)));

        editor.update_budget_item("financial", &second, BudgetField::Amount, "25.50");
        assert_eq!(total(&editor), Some(Amount::from_hundredths(12_550)));

        editor.delete_budget_item("financial", &first);
        assert_eq!(total(&editor), Some(Amount::from_hundredths(2_550)));
    }

    /// T2.3: Deleting an unknown task is a no-op, not an error.
    #[test]
    fn delete_unknown_task_is_noop() {
        let mut editor = unlocked(PhaseKind::Planning);
        let before = editor.snapshot();

        let edit = editor.delete_task("proposal", &ItemId::new("missing"));

        assert!(!edit.applied);
        assert_eq!(editor.snapshot(), before);
    }

    /// T2.4: Unknown sections are ignored the same way.
    #[test]
    fn unknown_section_is_noop() {
        let mut editor = unlocked(PhaseKind::Planning);
        let before = editor.snapshot();

        assert!(!editor.add_task("catering").applied);
        assert!(!editor.set_section_content("catering", "Order lunch").applied);
        assert_eq!(editor.snapshot(), before);
    }

    /// T2.5: Edits through the session land on the board.
    #[test]
    fn session_edits_reach_the_board() {
        let mut session = session();
        let (edit, report) = session.edit(PhaseKind::Concept, |e| {
            e.set_section_content("problem", "Patients wait days for a chaplain visit")
        });

        assert!(edit.applied);
        assert_eq!(report.phase.progress, Percent::FULL);
        assert_eq!(report.unlocked, Some(PhaseKind::Feasibility));
    }

    /// T2.6: Restored budgets get their total from their items.
    #[test]
    fn rehydrated_budget_total_is_recomputed() {
        let saved: PhaseContent = serde_json::from_str(
            r#"{"financial":{"budget":{"items":[{"id":"b1","amount":100},{"id":"b2","amount":"abc"}]}}}"#,
        )
        .expect("saved content");

        let editor = PhaseEditor::rehydrate(PhaseKind::Feasibility, ProjectId(1), "Arundel Sabbath", saved);

        let budget = &editor.content().section("financial").expect("financial").budget;
        assert_eq!(budget.items.len(), 2);
        assert_eq!(budget.total, Amount::from_units(100));
    }

    /// T2.7: A suggested task lands in the checklist with its owner and due date.
    #[test]
    fn suggested_task_is_scheduled_from_today() {
        let mut session = session();
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");

        let (locked, _) = session.edit(PhaseKind::Feasibility, |e| e.add_suggested_task("market", 0, today));
        assert!(!locked.applied);

        session.report_phase_progress(PhaseKind::Concept, Percent::FULL);
        let (edit, report) =
            session.edit(PhaseKind::Feasibility, |e| e.add_suggested_task("market", 0, today));
        assert!(edit.applied);
        // 0 of 17 tasks done
        assert_eq!(report.phase.progress, Percent::ZERO);

        let id = edit.item.expect("new task id");
        let market = session.editor(PhaseKind::Feasibility).content().section("market").cloned().expect("market");
        let task = market.tasks.iter().find(|t| t.id == id).expect("suggested task");
        assert_eq!(task.title, "Conduct market analysis");
        assert_eq!(task.due_date.as_deref(), Some("2025-03-08"));
        assert_eq!(task.assignee.as_deref(), Some("Market Analyst"));

        let (bad, _) = session.edit(PhaseKind::Feasibility, |e| e.add_suggested_task("market", 7, today));
        assert!(!bad.applied);
    }
}

// =============================================================================
// TIER T3: CONCEPT COMPLETION
// =============================================================================

mod t3_concept_completion {
    use super::*;

    const PROBLEM: &str = "Night shift staff have no access to pastoral care";
    const IDEA: &str = "A rota of on-call chaplains reachable by phone";
    const OBJECTIVES: &str = "Cover every night shift within six months";

    /// Three written sections, one completed goal and the given tasks.
    fn concept(total_tasks: usize, done_tasks: usize) -> PhaseEditor {
        let goal = SmartGoal {
            id: ItemId::new("goal-1"),
            title: "Night cover".to_string(),
            is_completed: true,
            ..SmartGoal::default()
        };
        let objectives = Section {
            goals: vec![goal],
            ..section("objectives", OBJECTIVES, Vec::new())
        };
        let content = PhaseContent::new(vec![
            section("problem", PROBLEM, tasks("p", total_tasks, done_tasks)),
            section("idea", IDEA, Vec::new()),
            objectives,
        ]);
        PhaseEditor::rehydrate(PhaseKind::Concept, ProjectId(1), "Night Cover", content)
    }

    /// T3.1: 9/13 rounds to 69%, one short of complete.
    #[test]
    fn sixty_nine_percent_is_not_complete() {
        let editor = concept(9, 5);
        assert_eq!(editor.progress(), Percent::new(69));
        assert!(!editor.is_concept_complete());
    }

    /// T3.2: 7/10 is exactly 70% and complete.
    #[test]
    fn seventy_percent_is_complete() {
        let editor = concept(6, 3);
        assert_eq!(editor.progress(), Percent::new(70));
        assert!(editor.is_concept_complete());
    }

    /// T3.3: Short text does not count as written.
    #[test]
    fn short_text_blocks_completion() {
        let mut editor = concept(0, 0);
        assert!(editor.is_concept_complete());

        editor.set_section_content("idea", "Phones");
        assert!(!editor.is_concept_complete());
    }

    /// T3.4: No goals, no completion.
    #[test]
    fn goals_are_required() {
        let mut editor = concept(0, 0);
        editor.delete_goal("objectives", &ItemId::new("goal-1"));
        assert!(!editor.is_concept_complete());
    }

    /// T3.5: Goals filed outside the objectives section do not count.
    #[test]
    fn stray_goals_do_not_count() {
        let mut editor = concept(0, 0);
        let problem = Section {
            goals: vec![SmartGoal::default()],
            ..section("problem", PROBLEM, Vec::new())
        };
        let mut content = editor.content().clone();
        content.replace_section(problem);
        editor.replace_content(content);

        assert_eq!(editor.progress(), Percent::FULL);
        assert!(editor.is_concept_complete());
    }

    /// T3.6: Goal fields can be filled in through the editor.
    #[test]
    fn goal_fields_update() {
        let mut editor = concept(0, 0);
        let id = ItemId::new("goal-1");
        editor.update_goal("objectives", &id, GoalField::Measurable, "30 nights covered");

        let goal = editor
            .content()
            .goals()
            .next()
            .expect("goal")
            .clone();
        assert_eq!(goal.measurable, "30 nights covered");
    }
}

// =============================================================================
// TIER T4: EXPORT
// =============================================================================

mod t4_export {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")
    }

    /// T4.1: Empty content still exports, with placeholders.
    #[test]
    fn empty_concept_exports_placeholders() {
        let session = session();
        let note = session
            .concept_note(&StaticPlan::builtin(), date())
            .expect("export");

        assert_eq!(note.file_name, "Arundel_Sabbath_Concept_Note.txt");
        assert!(note.body.starts_with("# Arundel Sabbath - Concept Note\nDate: 2025-03-01\n"));
        assert!(note.body.contains("No problem statement provided yet"));
        assert!(note.body.contains("No solution concept provided yet"));
        assert!(note.body.contains("No SMART goals defined yet"));
        assert!(note.body.contains("## 7. Next Steps"));
        assert!(!session.is_exporting());
    }

    /// T4.2: Written content and tasks appear in the note.
    #[test]
    fn written_concept_appears_in_note() {
        let mut session = session();
        session.edit(PhaseKind::Concept, |e| {
            e.set_section_content("problem", "Families lack bereavement support");
            let id = e.add_task("problem").item.expect("task id");
            e.update_task("problem", &id, TaskField::Title, "Survey families")
        });

        let note = session
            .concept_note(&StaticPlan::builtin(), date())
            .expect("export");
        assert!(note.body.contains("addresses Families lack bereavement support..."));
        assert!(note.body.contains("- Survey families (Not completed)"));
    }

    /// T4.3: Only the Concept phase exports a note.
    #[test]
    fn other_phases_refuse_export() {
        let editor = unlocked(PhaseKind::Planning);
        assert!(
            editor
                .export_concept_note(&StaticPlan::builtin(), date())
                .is_err()
        );
    }
}
