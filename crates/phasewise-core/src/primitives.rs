//! # Primitives
//!
//! Hardcoded constants for the Phasewise engine.
//!
//! The two completion thresholds (`CONTENT_SIGNAL_MIN_CHARS` and
//! `CONCEPT_COMPLETE_THRESHOLD`) are product decisions carried over from the
//! dashboard, not derived requirements. They are gathered into
//! [`CompletionPolicy`] so the application can override them.

use serde::{Deserialize, Serialize};

/// Number of phases in every project lifecycle.
pub const PHASE_COUNT: usize = 6;

/// Section content counts as a completed unit when its character count is
/// strictly greater than this.
pub const CONTENT_SIGNAL_MIN_CHARS: usize = 10;

/// Minimum Concept progress for the concept to be considered complete.
pub const CONCEPT_COMPLETE_THRESHOLD: u8 = 70;

/// Projects below this overall progress are at risk.
pub const AT_RISK_BELOW: u8 = 20;

/// Projects below this overall progress need attention.
pub const NEEDS_ATTENTION_BELOW: u8 = 50;

/// Portfolio summary: recorded progress from which a project is on track.
/// Between [`AT_RISK_BELOW`] and this it needs action.
pub const PORTFOLIO_ON_TRACK_FROM: u8 = 30;

// =============================================================================
// PLACEHOLDER TITLES
// =============================================================================

pub const NEW_TASK_TITLE: &str = "New task";
pub const NEW_GOAL_TITLE: &str = "New Goal";
pub const NEW_RISK_TITLE: &str = "New risk";
pub const NEW_BUDGET_ITEM_DESCRIPTION: &str = "New budget item";
pub const NEW_KPI_NAME: &str = "New KPI";
pub const NEW_KPI_UNIT: &str = "units";
pub const NEW_IMPACT_METRIC_NAME: &str = "New Impact Metric";
pub const NEW_IMPACT_METRIC_DESCRIPTION: &str = "Description of this impact metric";

// =============================================================================
// COMPLETION POLICY
// =============================================================================

/// Thresholds used by the Concept progress rule and completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionPolicy {
    /// See [`CONTENT_SIGNAL_MIN_CHARS`].
    pub content_min_chars: usize,
    /// See [`CONCEPT_COMPLETE_THRESHOLD`].
    pub concept_complete_threshold: u8,
}

impl Default for CompletionPolicy {
    fn default() -> Self {
        Self {
            content_min_chars: CONTENT_SIGNAL_MIN_CHARS,
            concept_complete_threshold: CONCEPT_COMPLETE_THRESHOLD,
        }
    }
}

impl CompletionPolicy {
    /// Whether a piece of free text is substantial enough to count.
    #[must_use]
    pub fn has_content(&self, text: &str) -> bool {
        text.chars().count() > self.content_min_chars
    }
}
