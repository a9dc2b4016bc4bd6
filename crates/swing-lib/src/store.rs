//! Storage seam for sessions and reports
//!
//! Persistence is owned by the surrounding system. The engine only needs to
//! read sessions, move them through their lifecycle and upsert reports keyed
//! by session id. Session content is write-once: a second insert under the
//! same id fails with [`SessionExists`].

use crate::models::{AssessmentSession, SessionStatus};
use crate::report::AssessmentReport;
use anyhow::{bail, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use tracing::debug;

/// Returned (inside `anyhow::Error`) when a session id is already taken
#[derive(Debug, Error)]
#[error("session {0} already exists")]
pub struct SessionExists(pub String);

/// Session and report persistence
pub trait AssessmentStore: Send + Sync {
    /// Insert a new session; fails with [`SessionExists`] if the id is taken
    fn insert_session(&self, session: AssessmentSession) -> Result<()>;

    fn session(&self, session_id: &str) -> Result<Option<AssessmentSession>>;

    /// All sessions of an athlete, oldest first
    fn sessions_for_athlete(&self, athlete_id: &str) -> Result<Vec<AssessmentSession>>;

    fn set_status(&self, session_id: &str, status: SessionStatus) -> Result<()>;

    fn report(&self, session_id: &str) -> Result<Option<AssessmentReport>>;

    /// Create or replace the report of `report.session_id`
    fn upsert_report(&self, report: AssessmentReport) -> Result<()>;
}

/// Process-local store
#[derive(Default)]
pub struct InMemoryStore {
    sessions: DashMap<String, AssessmentSession>,
    reports: DashMap<String, AssessmentReport>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn report_count(&self) -> usize {
        self.reports.len()
    }
}

impl AssessmentStore for InMemoryStore {
    fn insert_session(&self, session: AssessmentSession) -> Result<()> {
        match self.sessions.entry(session.id.clone()) {
            Entry::Occupied(_) => Err(SessionExists(session.id).into()),
            Entry::Vacant(slot) => {
                debug!(session_id = %session.id, athlete_id = %session.athlete_id, "Storing session");
                slot.insert(session);
                Ok(())
            }
        }
    }

    fn session(&self, session_id: &str) -> Result<Option<AssessmentSession>> {
        Ok(self.sessions.get(session_id).map(|r| r.clone()))
    }

    fn sessions_for_athlete(&self, athlete_id: &str) -> Result<Vec<AssessmentSession>> {
        let mut sessions: Vec<AssessmentSession> = self
            .sessions
            .iter()
            .filter(|r| r.value().athlete_id == athlete_id)
            .map(|r| r.value().clone())
            .collect();
        sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(sessions)
    }

    fn set_status(&self, session_id: &str, status: SessionStatus) -> Result<()> {
        match self.sessions.get_mut(session_id) {
            Some(mut entry) => {
                entry.status = status;
                Ok(())
            }
            None => bail!("session {} not found", session_id),
        }
    }

    fn report(&self, session_id: &str) -> Result<Option<AssessmentReport>> {
        Ok(self.reports.get(session_id).map(|r| r.clone()))
    }

    fn upsert_report(&self, report: AssessmentReport) -> Result<()> {
        debug!(session_id = %report.session_id, "Upserting report");
        self.reports.insert(report.session_id.clone(), report);
        Ok(())
    }
}
