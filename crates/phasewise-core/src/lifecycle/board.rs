//! # Phase Board
//!
//! The ordered list of six phases for one project, with the unlock rule
//! and the aggregate progress figure.
//!
//! ## Unlock Rule
//!
//! A phase unlocks the first time its predecessor reaches 100%. Unlocking is
//! a high-water mark: if the predecessor later drops below 100 (a task is
//! un-ticked), the successor stays unlocked for the rest of the session.
//! Status, by contrast, always follows the current progress.

use super::phase::{Phase, PhaseKind};
use crate::{Percent, PhasewiseError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// LISTENER
// =============================================================================

/// Receives notifications whenever a phase reports progress.
pub trait BoardListener: Send + Sync {
    /// Called after the phase has been updated (and any unlock applied).
    fn on_phase_progress(&self, phase: &Phase);

    /// Called with the new aggregate after every report.
    fn on_aggregate(&self, aggregate: Percent);
}

// =============================================================================
// REPORT
// =============================================================================

/// The outcome of a progress report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseReport {
    pub phase: Phase,
    /// The phase unlocked by this report, if it was locked before.
    pub unlocked: Option<PhaseKind>,
    pub aggregate: Percent,
}

// =============================================================================
// BOARD
// =============================================================================

/// The phase progression engine for one project.
pub struct PhaseBoard {
    phases: Vec<Phase>,
    listeners: Vec<Arc<dyn BoardListener>>,
}

impl std::fmt::Debug for PhaseBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseBoard")
            .field("phases", &self.phases)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for PhaseBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseBoard {
    /// Create a board with all six phases at 0%, only the first unlocked.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phases: PhaseKind::ALL.into_iter().map(Phase::initial).collect(),
            listeners: Vec::new(),
        }
    }

    /// Register a listener.
    pub fn subscribe(&mut self, listener: Arc<dyn BoardListener>) {
        self.listeners.push(listener);
    }

    /// Record a phase's progress.
    ///
    /// Recomputes the status, unlocks the next phase on 100%, and notifies
    /// listeners.
    pub fn report_phase_progress(&mut self, kind: PhaseKind, progress: Percent) -> PhaseReport {
        let index = kind.index();
        self.phases[index].set_progress(progress);

        let mut unlocked = None;
        if progress.is_full() {
            if let Some(next) = self.phases.get_mut(index + 1) {
                if next.locked {
                    next.locked = false;
                    unlocked = Some(next.kind);
                    tracing::info!(phase = next.kind.id(), "phase unlocked");
                }
            }
        }

        let phase = self.phases[index].clone();
        let aggregate = self.aggregate_progress();

        for listener in &self.listeners {
            listener.on_phase_progress(&phase);
            listener.on_aggregate(aggregate);
        }

        PhaseReport {
            phase,
            unlocked,
            aggregate,
        }
    }

    /// Record progress for a phase given by numeric id.
    pub fn report_by_id(&mut self, id: u8, progress: Percent) -> Result<PhaseReport, PhasewiseError> {
        let kind = PhaseKind::from_id(id).ok_or(PhasewiseError::PhaseNotFound(id))?;
        Ok(self.report_phase_progress(kind, progress))
    }

    /// Unweighted, rounded mean of every phase's progress.
    #[must_use]
    pub fn aggregate_progress(&self) -> Percent {
        Percent::mean(self.phases.iter().map(|p| p.progress))
    }

    /// Whether a phase is currently locked.
    #[must_use]
    pub fn is_locked(&self, kind: PhaseKind) -> bool {
        self.phases[kind.index()].locked
    }

    /// Get a phase.
    #[must_use]
    pub fn phase(&self, kind: PhaseKind) -> &Phase {
        &self.phases[kind.index()]
    }

    /// All phases in order.
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// An owned copy of the phase list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Phase> {
        self.phases.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================
