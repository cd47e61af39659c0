//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::Config;
use chrono::NaiveDate;
use phasewise_core::{
    Percent, PhaseContent, PhaseKind, PhasewiseError, ProjectId, ProjectSession, StrategicPlanSource,
    catalog,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a saved phase content file (2 MB, as the API body limit).
const MAX_CONTENT_FILE_SIZE: u64 = 2 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), PhasewiseError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| PhasewiseError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(PhasewiseError::Serialization(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Read saved phase content.
fn read_content(path: &Path) -> Result<PhaseContent, PhasewiseError> {
    validate_file_size(path, MAX_CONTENT_FILE_SIZE)?;
    let data = std::fs::read(path)
        .map_err(|e| PhasewiseError::Io(format!("Read '{}': {}", path.display(), e)))?;
    Ok(serde_json::from_slice(&data)?)
}

/// Resolve an output directory, following symlinks and `..`.
fn validate_output_dir(dir: &Path) -> Result<PathBuf, PhasewiseError> {
    let canonical = dir.canonicalize().map_err(|e| {
        PhasewiseError::Io(format!("Invalid output directory '{}': {}", dir.display(), e))
    })?;
    if !canonical.is_dir() {
        return Err(PhasewiseError::Io(format!(
            "Output path '{}' is not a directory",
            dir.display()
        )));
    }
    Ok(canonical)
}

fn open_session(config: &Config, project: u32) -> Result<ProjectSession, PhasewiseError> {
    Ok(ProjectSession::from_catalog(ProjectId(project))?.with_policy(config.policy))
}

/// Replay every `<phase>.json` found in `dir`, first phase first.
///
/// Phases without a file keep their seeded content.
pub fn replay_content_dir(session: &mut ProjectSession, dir: &Path) -> Result<usize, PhasewiseError> {
    let mut replayed = 0;
    for kind in PhaseKind::ALL {
        let path = dir.join(format!("{}.json", kind.slug()));
        if !path.is_file() {
            continue;
        }
        let report = session.rehydrate(kind, read_content(&path)?);
        tracing::debug!(
            phase = kind.id(),
            progress = report.phase.progress.value(),
            "replayed saved content"
        );
        replayed += 1;
    }
    Ok(replayed)
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), PhasewiseError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    println!("Phasewise Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.server.host);
    println!("  Port:       {}", config.server.port);
    println!("  Rate limit: {} req/s", config.server.rate_limit);
    println!(
        "  Plan:       {}",
        config
            .strategy
            .plan_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string())
    );
    println!();
    println!("Endpoints:");
    println!("  GET  /projects                          - List projects");
    println!("  GET  /projects/{{id}}                     - Phase board");
    println!("  GET  /projects/{{id}}/phases/{{phase}}      - Phase content");
    println!("  POST /projects/{{id}}/phases/{{phase}}/edits - Edit a phase");
    println!("  GET  /projects/{{id}}/concept-note        - Concept Note");
    println!("  GET  /phases/{{phase}}/suggestions        - Suggested tasks");
    println!("  GET  /strategy/search?q=                - Plan search");
    println!("  GET  /health                            - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config).await
}

// =============================================================================
// PROJECTS COMMAND
// =============================================================================

/// List catalog projects with their recorded progress.
pub fn cmd_projects(json_mode: bool) -> Result<(), PhasewiseError> {
    let rows: Vec<(ProjectId, &str, u8, &str)> = catalog::projects()
        .iter()
        .map(|p| {
            // No board yet: a fresh project aggregates to zero.
            let progress = p.overall_progress(Percent::ZERO);
            (p.id, p.name, progress.value(), p.health(Percent::ZERO).label())
        })
        .collect();
    let summary = catalog::portfolio_summary();

    if json_mode {
        let projects: Vec<serde_json::Value> = rows
            .iter()
            .map(|(id, name, progress, health)| {
                serde_json::json!({
                    "id": id.0,
                    "name": name,
                    "progress": progress,
                    "health": health,
                })
            })
            .collect();
        print_json(&serde_json::json!({ "projects": projects, "summary": summary }));
        return Ok(());
    }

    println!("Projects");
    println!("========");
    for (id, name, progress, health) in rows {
        println!("{:>3}  {:<45} {:>3}%  {}", id.0, name, progress, health);
    }
    println!();
    println!(
        "On track: {}  Needs action: {}  At risk: {}",
        summary.on_track, summary.needs_action, summary.at_risk
    );
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show a project's phase board, optionally after replaying saved content.
pub fn cmd_status(
    config: &Config,
    project: u32,
    content_dir: Option<&Path>,
    json_mode: bool,
    verbose: bool,
) -> Result<(), PhasewiseError> {
    let mut session = open_session(config, project)?;
    if let Some(dir) = content_dir {
        let replayed = replay_content_dir(&mut session, dir)?;
        tracing::info!(project, replayed, "content replayed");
    }
    let board = session.board();

    if json_mode {
        print_json(&serde_json::json!({
            "project_id": project,
            "project_name": session.project_name(),
            "phases": board.phases(),
            "aggregate": session.aggregate_progress(),
            "overall": session.overall_progress(),
            "health": session.health(),
            "concept_complete": session.is_concept_complete(),
        }));
        return Ok(());
    }

    println!("{}", session.project_name());
    println!("{}", "=".repeat(session.project_name().chars().count()));
    for phase in board.phases() {
        let lock = if phase.locked { "locked" } else { "open" };
        println!(
            "{}. {:<25} {:>4}  {:<12} {}",
            phase.kind.id(),
            phase.kind.name(),
            phase.progress.to_string(),
            phase.status.label(),
            lock
        );
        if verbose {
            for section in session.editor(phase.kind).content().sections() {
                let (done, total) = section.task_counts();
                println!("     {:<28} {}/{} tasks", section.title, done, total);
            }
        }
    }
    println!();
    println!("Aggregate:        {}", session.aggregate_progress());
    println!(
        "Overall:          {} ({})",
        session.overall_progress(),
        session.health().label()
    );
    println!(
        "Concept complete: {}",
        if session.is_concept_complete() { "yes" } else { "no" }
    );

    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Write a project's Concept Note into `output_dir`. Returns the file path.
pub fn cmd_export_concept(
    config: &Config,
    project: u32,
    content: Option<&Path>,
    output_dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, PhasewiseError> {
    let dir = validate_output_dir(output_dir)?;
    let plan = config.plan()?;

    let mut session = open_session(config, project)?;
    if let Some(path) = content {
        session.rehydrate(PhaseKind::Concept, read_content(path)?);
    }

    let note = session.concept_note(&plan, date).ok_or_else(|| {
        PhasewiseError::ExportFailed(format!("Concept Note for project {}", project))
    })?;

    let path = dir.join(&note.file_name);
    std::fs::write(&path, note.body.as_bytes())
        .map_err(|e| PhasewiseError::Io(format!("Write '{}': {}", path.display(), e)))?;
    tracing::info!(project, path = %path.display(), "concept note written");

    Ok(path)
}

// =============================================================================
// STRATEGY COMMANDS
// =============================================================================

/// Search the strategic plan.
pub fn cmd_search(config: &Config, term: &str, json_mode: bool) -> Result<(), PhasewiseError> {
    let plan = config.plan()?;
    let hits = plan.plan().search(term);

    if json_mode {
        print_json(&serde_json::json!({ "term": term, "hits": hits }));
        return Ok(());
    }

    if hits.is_empty() {
        println!("No matches for \"{}\"", term);
        return Ok(());
    }
    println!("{} match(es) for \"{}\":", hits.len(), term);
    for hit in &hits {
        println!();
        println!("[{}]", hit.section);
        println!("  {}", hit.content);
    }
    Ok(())
}

/// Show planning insights for a project.
pub fn cmd_insights(config: &Config, project: u32, json_mode: bool) -> Result<(), PhasewiseError> {
    let id = ProjectId(project);
    let entry = catalog::project(id)?;
    let plan = config.plan()?;
    let insights = plan.plan().insights(Some(id));

    if json_mode {
        print_json(&serde_json::json!({ "project_id": project, "insights": insights }));
        return Ok(());
    }

    println!("Insights for {}", entry.name);
    for insight in insights {
        println!("- {}", insight);
    }
    Ok(())
}
