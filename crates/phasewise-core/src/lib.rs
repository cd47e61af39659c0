//! # phasewise-core
//!
//! The project lifecycle engine for Phasewise: THE LOGIC.
//!
//! A project moves through six ordered phases (Concept, Feasibility,
//! Planning, Implementation, Monitoring, Reporting). Each phase is edited
//! through a generic section editor, reports a completion percentage, and
//! unlocks its successor once it reaches 100%.
//!
//! ## Layout
//!
//! - `lifecycle`: phase kinds, statuses and the unlock board
//! - `content` / `schema`: per-phase sections, records and seed data
//! - `progress`: completion rules
//! - `editor` / `session`: the write path, one session per project
//! - `export`: Concept Note text export
//! - `catalog` / `strategy`: read-only reference data
//!
//! ## Constraints
//!
//! - No async, no network, no floating point
//! - Editors never write the board; the session forwards their reports
//! - Unlocking is one-way: a phase, once open, stays open

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod content;
pub mod editor;
pub mod export;
pub mod lifecycle;
pub mod primitives;
pub mod progress;
pub mod schema;
pub mod session;
pub mod strategy;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Amount, ItemId, Percent, PhasewiseError, ProjectId};

// =============================================================================
// RE-EXPORTS: Lifecycle
// =============================================================================

pub use lifecycle::{BoardListener, Phase, PhaseBoard, PhaseKind, PhaseReport, PhaseStatus};

// =============================================================================
// RE-EXPORTS: Content and Editing
// =============================================================================

pub use content::{
    Budget, BudgetItem, ImpactMetric, Kpi, Level, PhaseContent, Record, RecordKind, Risk, Section,
    SmartGoal, Task,
};
pub use editor::{Edit, IdGenerator, PhaseEditor, PhaseListener, SequentialIds, TimestampIds};
pub use primitives::CompletionPolicy;
pub use progress::{compute_progress, concept_is_complete};
pub use schema::{DueIn, PhaseSchema, ProgressRule, Suggestion};
pub use session::{ProjectSession, SessionSnapshot};

// =============================================================================
// RE-EXPORTS: Reference Data and Export
// =============================================================================

pub use catalog::{Plan, PortfolioSummary, Project, ProjectHealth};
pub use export::{ConceptNote, Exporter};
pub use strategy::{SearchHit, StaticPlan, StrategicPlan, StrategicPlanSource};
