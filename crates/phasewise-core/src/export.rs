//! # Concept Note Export
//!
//! Renders the Concept phase as a plain-text Concept Note. The note
//! combines the three concept sections with the strategic plan's vision,
//! mission and objectives.
//!
//! Empty sections never fail the export; each has its own placeholder line.
//!
//! ## Layout
//!
//! ```text
//! # {project} - Concept Note
//! Date: {date}
//!
//! ## 1. Executive Summary
//! ## 2. Project Background
//! ## 3. Proposed Solution
//! ## 4. Strategic Alignment
//! ## 5. Project Objectives and Goals
//! ## 6. Implementation Considerations
//! ## 7. Next Steps
//! ```

use crate::content::{PhaseContent, SmartCriterion, SmartGoal, Task};
use crate::strategy::StrategicPlan;
use crate::PhasewiseError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, Ordering};

/// Characters of the problem statement quoted in the executive summary.
const SUMMARY_EXCERPT_CHARS: usize = 100;

const NO_PROBLEM: &str = "No problem statement provided yet";
const NO_PROBLEM_TASKS: &str = "No problem-related tasks defined yet";
const NO_IDEA: &str = "No solution concept provided yet";
const NO_IDEA_TASKS: &str = "No solution-related tasks defined yet";
const NO_OBJECTIVES: &str = "No objectives overview provided yet";
const NO_GOALS: &str = "No SMART goals defined yet";
const NOT_SPECIFIED: &str = "Not specified";

// =============================================================================
// CONCEPT NOTE
// =============================================================================

/// A rendered Concept Note, ready to be saved or downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptNote {
    pub file_name: String,
    pub body: String,
}

impl ConceptNote {
    /// `{project name with whitespace runs as "_"}_Concept_Note.txt`
    #[must_use]
    pub fn file_name_for(project_name: &str) -> String {
        let mut name = String::with_capacity(project_name.len() + 17);
        let mut in_space = false;
        for c in project_name.chars() {
            if c.is_whitespace() {
                if !in_space {
                    name.push('_');
                }
                in_space = true;
            } else {
                name.push(c);
                in_space = false;
            }
        }
        name.push_str("_Concept_Note.txt");
        name
    }

    /// Render the note for a project.
    pub fn generate(
        project_name: &str,
        content: &PhaseContent,
        plan: &StrategicPlan,
        date: NaiveDate,
    ) -> Result<Self, PhasewiseError> {
        let body = render(project_name, content, plan, date)
            .map_err(|e| PhasewiseError::ExportFailed(e.to_string()))?;
        Ok(Self {
            file_name: Self::file_name_for(project_name),
            body,
        })
    }
}

fn or_placeholder<'a>(text: &'a str, placeholder: &'a str) -> &'a str {
    if text.is_empty() { placeholder } else { text }
}

fn write_tasks(out: &mut String, tasks: &[Task], placeholder: &str) -> std::fmt::Result {
    if tasks.is_empty() {
        return writeln!(out, "{placeholder}");
    }
    for task in tasks {
        let state = if task.is_completed {
            "Completed"
        } else {
            "Not completed"
        };
        writeln!(out, "- {} ({})", task.title, state)?;
    }
    Ok(())
}

fn write_goals(out: &mut String, goals: &[SmartGoal]) -> std::fmt::Result {
    if goals.is_empty() {
        return writeln!(out, "{NO_GOALS}");
    }
    for (i, goal) in goals.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "#### {}", goal.title)?;
        for criterion in SmartCriterion::ALL {
            writeln!(
                out,
                "- {}: {}",
                criterion.label(),
                or_placeholder(goal.criterion(criterion), NOT_SPECIFIED)
            )?;
        }
    }
    Ok(())
}

fn render(
    project_name: &str,
    content: &PhaseContent,
    plan: &StrategicPlan,
    date: NaiveDate,
) -> Result<String, std::fmt::Error> {
    let problem = content.section("problem");
    let idea = content.section("idea");
    let objectives = content.section("objectives");
    let problem_text = content.text("problem");

    let mut out = String::new();
    writeln!(out, "# {project_name} - Concept Note")?;
    writeln!(out, "Date: {}", date.format("%Y-%m-%d"))?;
    writeln!(out)?;

    writeln!(out, "## 1. Executive Summary")?;
    let excerpt: String = or_placeholder(problem_text, NO_PROBLEM)
        .chars()
        .take(SUMMARY_EXCERPT_CHARS)
        .collect();
    writeln!(
        out,
        "This concept note outlines the project \"{project_name}\" which addresses {excerpt}..."
    )?;
    writeln!(out)?;

    writeln!(out, "## 2. Project Background")?;
    writeln!(out, "### Problem Statement")?;
    writeln!(out, "{}", or_placeholder(problem_text, NO_PROBLEM))?;
    writeln!(out)?;
    writeln!(out, "### Problem-Related Tasks")?;
    write_tasks(&mut out, problem.map(|s| s.tasks.as_slice()).unwrap_or_default(), NO_PROBLEM_TASKS)?;
    writeln!(out)?;

    writeln!(out, "## 3. Proposed Solution")?;
    writeln!(out, "### Solution Concept")?;
    writeln!(out, "{}", or_placeholder(content.text("idea"), NO_IDEA))?;
    writeln!(out)?;
    writeln!(out, "### Solution-Related Tasks")?;
    write_tasks(&mut out, idea.map(|s| s.tasks.as_slice()).unwrap_or_default(), NO_IDEA_TASKS)?;
    writeln!(out)?;

    writeln!(out, "## 4. Strategic Alignment")?;
    writeln!(out, "This project aligns with the following organizational objectives:")?;
    writeln!(out, "- Vision: {}", plan.vision)?;
    writeln!(out, "- Mission: {}", plan.mission)?;
    let objective_list: Vec<&str> = plan.objective_titles().collect();
    writeln!(out, "- Strategic Objectives: {}", objective_list.join(", "))?;
    writeln!(out)?;

    writeln!(out, "## 5. Project Objectives and Goals")?;
    writeln!(out, "### Objectives Overview")?;
    writeln!(out, "{}", or_placeholder(content.text("objectives"), NO_OBJECTIVES))?;
    writeln!(out)?;
    writeln!(out, "### SMART Goals")?;
    write_goals(&mut out, objectives.map(|s| s.goals.as_slice()).unwrap_or_default())?;
    writeln!(out)?;

    writeln!(out, "## 6. Implementation Considerations")?;
    writeln!(
        out,
        "Based on the tasks identified, the following implementation considerations should be addressed:"
    )?;
    writeln!(
        out,
        "- Ensure all problem-related tasks are completed before moving to solution implementation"
    )?;
    writeln!(out, "- Validate the solution concept against the problem statement")?;
    writeln!(out, "- Establish metrics for measuring progress against SMART goals")?;
    writeln!(out)?;

    writeln!(out, "## 7. Next Steps")?;
    writeln!(out, "- Complete any remaining tasks in the concept development phase")?;
    writeln!(out, "- Move to feasibility study phase")?;
    writeln!(out, "- Develop detailed implementation plan")?;

    Ok(out)
}

// =============================================================================
// EXPORTER
// =============================================================================

/// Runs exports, tracking whether one is underway.
///
/// A failed export is logged and yields `None`; the in-progress flag is
/// cleared on every exit path.
#[derive(Debug, Default)]
pub struct Exporter {
    in_progress: AtomicBool,
}

struct InProgress<'a>(&'a AtomicBool);

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Exporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an export is running right now.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Run `generate`, logging and swallowing any failure.
    pub fn run<F>(&self, generate: F) -> Option<ConceptNote>
    where
        F: FnOnce() -> Result<ConceptNote, PhasewiseError>,
    {
        self.in_progress.store(true, Ordering::SeqCst);
        let _guard = InProgress(&self.in_progress);

        match generate() {
            Ok(note) => {
                tracing::info!(file = %note.file_name, bytes = note.body.len(), "concept note exported");
                Some(note)
            }
            Err(e) => {
                tracing::error!(error = %e, "error exporting concept note");
                None
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
