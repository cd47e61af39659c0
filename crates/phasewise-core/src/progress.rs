//! # Progress
//!
//! Turns a phase's content into a percentage, per the phase's
//! [`ProgressRule`].
//!
//! ```text
//! TaskRatio   done tasks / all tasks
//! ConceptMix  (done tasks + done goals + written sections)
//!             / (all tasks + all goals + non-empty sections)
//! ```
//!
//! Only goals in the `objectives` section count.
//!
//! A section whose content is empty does not count at all. A section with
//! some content counts as one unit, completed once the text is longer than
//! [`CompletionPolicy::content_min_chars`].

use crate::content::PhaseContent;
use crate::primitives::CompletionPolicy;
use crate::schema::ProgressRule;
use crate::Percent;

/// Completion percentage of a phase's content.
#[must_use]
pub fn compute_progress(rule: ProgressRule, content: &PhaseContent, policy: &CompletionPolicy) -> Percent {
    let (done, total) = match rule {
        ProgressRule::TaskRatio => task_counts(content),
        ProgressRule::ConceptMix => concept_counts(content, policy),
    };
    Percent::ratio(done, total)
}

fn task_counts(content: &PhaseContent) -> (usize, usize) {
    content
        .sections()
        .iter()
        .map(|s| s.task_counts())
        .fold((0, 0), |(d, t), (sd, st)| (d + sd, t + st))
}

fn concept_counts(content: &PhaseContent, policy: &CompletionPolicy) -> (usize, usize) {
    let (mut done, mut total) = task_counts(content);

    let goals = content.section("objectives").map(|s| s.goals.as_slice()).unwrap_or_default();
    for goal in goals {
        total += 1;
        if goal.is_completed {
            done += 1;
        }
    }

    for section in content.sections() {
        if section.content.is_empty() {
            continue;
        }
        total += 1;
        if policy.has_content(&section.content) {
            done += 1;
        }
    }

    (done, total)
}

/// Whether the concept is ready for a Concept Note.
///
/// Requires substantial problem, idea and objectives text, at least one
/// SMART goal, and progress at or above the policy threshold.
#[must_use]
pub fn concept_is_complete(content: &PhaseContent, progress: Percent, policy: &CompletionPolicy) -> bool {
    let written = ["problem", "idea", "objectives"]
        .iter()
        .all(|key| policy.has_content(content.text(key)));
    let has_goal = content
        .section("objectives")
        .is_some_and(|s| !s.goals.is_empty());

    written && has_goal && progress.value() >= policy.concept_complete_threshold
}
