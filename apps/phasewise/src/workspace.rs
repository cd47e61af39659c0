//! # Workspace
//!
//! The in-memory set of open project sessions, keyed by catalog id.
//!
//! Sessions are created on first write. Reads of a project nobody has
//! written to yet see a fresh session without storing it.

use phasewise_core::{CompletionPolicy, PhasewiseError, ProjectId, ProjectSession};
use std::collections::BTreeMap;

/// All open sessions.
#[derive(Debug, Default)]
pub struct Workspace {
    policy: CompletionPolicy,
    sessions: BTreeMap<ProjectId, ProjectSession>,
}

impl Workspace {
    /// An empty workspace whose sessions use the given policy.
    #[must_use]
    pub fn new(policy: CompletionPolicy) -> Self {
        Self {
            policy,
            sessions: BTreeMap::new(),
        }
    }

    /// Number of sessions opened so far.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.sessions.len()
    }

    /// Read a project's session, fresh if it was never written.
    pub fn view<T>(
        &self,
        id: ProjectId,
        f: impl FnOnce(&ProjectSession) -> T,
    ) -> Result<T, PhasewiseError> {
        match self.sessions.get(&id) {
            Some(session) => Ok(f(session)),
            None => Ok(f(&self.fresh(id)?)),
        }
    }

    /// A project's session, opening it if needed.
    pub fn open(&mut self, id: ProjectId) -> Result<&mut ProjectSession, PhasewiseError> {
        if !self.sessions.contains_key(&id) {
            let session = self.fresh(id)?;
            tracing::info!(project = id.0, name = session.project_name(), "session opened");
            self.sessions.insert(id, session);
        }
        self.sessions
            .get_mut(&id)
            .ok_or(PhasewiseError::ProjectNotFound(id.0))
    }

    fn fresh(&self, id: ProjectId) -> Result<ProjectSession, PhasewiseError> {
        Ok(ProjectSession::from_catalog(id)?.with_policy(self.policy))
    }
}

// =============================================================================
// TESTS
// =============================================================================
