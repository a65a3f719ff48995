//! Scheduling backend seam.
//!
//! The backend hands back response bodies as untyped JSON; the planner runs
//! them through [`crate::records`] before anything reaches the matcher.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SlotError};
use crate::session::Session;

/// Source of availability and meetings.
pub trait SchedulingBackend: Send + Sync {
    /// Availability days declared by `user_id`.
    fn availability(&self, session: &Session, user_id: &str) -> Result<Value>;

    /// Meetings the session user takes part in.
    fn meetings(&self, session: &Session) -> Result<Value>;
}

/// In-memory backend over a captured snapshot of backend responses.
///
/// ```json
/// {
///   "user": "me",
///   "token": "optional; when set, sessions must present it",
///   "availability": { "me": [ {"date": "2024-06-01", "slots": [...]} ] },
///   "meetings": [ {"_id": "m1", "start": "...", "end": "..."} ]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotBackend {
    pub user: Option<String>,
    pub token: Option<String>,
    #[serde(default)]
    pub availability: HashMap<String, Value>,
    #[serde(default)]
    pub meetings: Value,
}

impl SnapshotBackend {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Session for the snapshot's user, if it names one.
    pub fn session(&self) -> Option<Session> {
        self.user
            .as_ref()
            .map(|user| Session::new(user.clone(), self.token.clone().unwrap_or_default()))
    }

    fn authorize(&self, session: &Session) -> Result<()> {
        match &self.token {
            Some(token) if token != session.token() => {
                Err(SlotError::Backend("unauthorized".to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl SchedulingBackend for SnapshotBackend {
    fn availability(&self, session: &Session, user_id: &str) -> Result<Value> {
        self.authorize(session)?;
        Ok(self
            .availability
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())))
    }

    fn meetings(&self, session: &Session) -> Result<Value> {
        self.authorize(session)?;
        Ok(self.meetings.clone())
    }
}
