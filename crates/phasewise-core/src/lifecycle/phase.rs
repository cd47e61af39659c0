//! # Phases
//!
//! The six fixed stages of a project lifecycle and their status rule.
//!
//! | Id | Phase | Summary |
//! |----|-------|---------|
//! | 1 | Concept Development | Problem, idea, objectives |
//! | 2 | Feasibility Study | Market, technical, financial, risk |
//! | 3 | Planning Phase | Proposal, work plan, budget, funding |
//! | 4 | Implementation Phase | Mobilization, execution, documentation |
//! | 5 | Monitoring & Evaluation | Track, evaluate, adjust |
//! | 6 | Reporting & Impact Assessment | Final report, impact, presentation |

use crate::Percent;
use serde::{Deserialize, Serialize};

// =============================================================================
// PHASE KIND
// =============================================================================

/// One of the six lifecycle phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Concept,
    Feasibility,
    Planning,
    Implementation,
    Monitoring,
    Reporting,
}

impl PhaseKind {
    /// All phases in lifecycle order.
    pub const ALL: [PhaseKind; 6] = [
        PhaseKind::Concept,
        PhaseKind::Feasibility,
        PhaseKind::Planning,
        PhaseKind::Implementation,
        PhaseKind::Monitoring,
        PhaseKind::Reporting,
    ];

    /// Numeric id, 1 through 6.
    #[must_use]
    pub fn id(&self) -> u8 {
        match self {
            PhaseKind::Concept => 1,
            PhaseKind::Feasibility => 2,
            PhaseKind::Planning => 3,
            PhaseKind::Implementation => 4,
            PhaseKind::Monitoring => 5,
            PhaseKind::Reporting => 6,
        }
    }

    /// Look up a phase by numeric id.
    #[must_use]
    pub fn from_id(id: u8) -> Option<PhaseKind> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    /// Parse either a numeric id ("2") or a snake_case name ("feasibility").
    #[must_use]
    pub fn parse(s: &str) -> Option<PhaseKind> {
        if let Ok(id) = s.parse::<u8>() {
            return Self::from_id(id);
        }
        Self::ALL.into_iter().find(|k| k.slug() == s)
    }

    /// Get the display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PhaseKind::Concept => "Concept Development",
            PhaseKind::Feasibility => "Feasibility Study",
            PhaseKind::Planning => "Planning Phase",
            PhaseKind::Implementation => "Implementation Phase",
            PhaseKind::Monitoring => "Monitoring & Evaluation",
            PhaseKind::Reporting => "Reporting & Impact Assessment",
        }
    }

    /// Short lowercase name, as used in URLs and file names.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            PhaseKind::Concept => "concept",
            PhaseKind::Feasibility => "feasibility",
            PhaseKind::Planning => "planning",
            PhaseKind::Implementation => "implementation",
            PhaseKind::Monitoring => "monitoring",
            PhaseKind::Reporting => "reporting",
        }
    }

    /// Get a one-line description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            PhaseKind::Concept => "Define the problem, develop the idea, and set objectives",
            PhaseKind::Feasibility => {
                "Market research, technical feasibility, financial analysis, risk assessment"
            }
            PhaseKind::Planning => "Project proposal, work plan, budgeting, securing resources",
            PhaseKind::Implementation => "Mobilization, execution, documentation",
            PhaseKind::Monitoring => "Track progress, evaluate outcomes, make adjustments",
            PhaseKind::Reporting => {
                "Final report, impact assessment, stakeholder presentation"
            }
        }
    }

    /// Get the next phase, if any.
    #[must_use]
    pub fn next(&self) -> Option<PhaseKind> {
        Self::from_id(self.id() + 1)
    }

    /// Get the previous phase, if any.
    #[must_use]
    pub fn previous(&self) -> Option<PhaseKind> {
        self.id().checked_sub(1).and_then(Self::from_id)
    }

    /// Zero-based position in [`PhaseKind::ALL`].
    #[must_use]
    pub(crate) fn index(&self) -> usize {
        (self.id() - 1) as usize
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Phase {}: {}", self.id(), self.name())
    }
}

// =============================================================================
// PHASE STATUS
// =============================================================================

/// Status of a phase, derived purely from its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl PhaseStatus {
    /// `Completed` at 100, `NotStarted` at 0, otherwise `InProgress`.
    #[must_use]
    pub fn from_progress(progress: Percent) -> Self {
        match progress.value() {
            0 => PhaseStatus::NotStarted,
            100 => PhaseStatus::Completed,
            _ => PhaseStatus::InProgress,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            PhaseStatus::NotStarted => "Not started",
            PhaseStatus::InProgress => "In progress",
            PhaseStatus::Completed => "Completed",
        }
    }
}

// =============================================================================
// PHASE
// =============================================================================

/// A phase as tracked on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub kind: PhaseKind,
    pub progress: Percent,
    pub status: PhaseStatus,
    pub locked: bool,
}

impl Phase {
    /// A fresh phase. Only the first phase starts unlocked.
    #[must_use]
    pub fn initial(kind: PhaseKind) -> Self {
        Self {
            kind,
            progress: Percent::ZERO,
            status: PhaseStatus::NotStarted,
            locked: kind.previous().is_some(),
        }
    }

    /// Set progress and recompute the status.
    pub(crate) fn set_progress(&mut self, progress: Percent) {
        self.progress = progress;
        self.status = PhaseStatus::from_progress(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_ordering() {
        assert!(PhaseKind::Concept < PhaseKind::Feasibility);
        assert!(PhaseKind::Monitoring < PhaseKind::Reporting);
    }

    #[test]
    fn ids_round_trip() {
        for kind in PhaseKind::ALL {
            assert_eq!(PhaseKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(PhaseKind::from_id(0), None);
        assert_eq!(PhaseKind::from_id(7), None);
    }

    #[test]
    fn next_and_previous() {
        assert_eq!(PhaseKind::Concept.previous(), None);
        assert_eq!(PhaseKind::Concept.next(), Some(PhaseKind::Feasibility));
        assert_eq!(PhaseKind::Reporting.next(), None);
    }

    #[test]
    fn parse_accepts_ids_and_slugs() {
        assert_eq!(PhaseKind::parse("3"), Some(PhaseKind::Planning));
        assert_eq!(PhaseKind::parse("monitoring"), Some(PhaseKind::Monitoring));
        assert_eq!(PhaseKind::parse("launch"), None);
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(PhaseStatus::from_progress(Percent::ZERO), PhaseStatus::NotStarted);
        assert_eq!(PhaseStatus::from_progress(Percent::new(1)), PhaseStatus::InProgress);
        assert_eq!(PhaseStatus::from_progress(Percent::new(99)), PhaseStatus::InProgress);
        assert_eq!(PhaseStatus::from_progress(Percent::FULL), PhaseStatus::Completed);
    }

    #[test]
    fn only_first_phase_starts_unlocked() {
        assert!(!Phase::initial(PhaseKind::Concept).locked);
        assert!(Phase::initial(PhaseKind::Feasibility).locked);
    }

    #[test]
    fn phase_display() {
        assert_eq!(
            format!("{}", PhaseKind::Concept),
            "Phase 1: Concept Development"
        );
    }
}
