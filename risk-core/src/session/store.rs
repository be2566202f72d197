//! Session Store - live dashboard sessions by id
//!
//! Each session is behind its own mutex, so two sessions never contend.
//! The store lock is held only to look up, insert or remove.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use super::history::SessionLog;

/// State owned by one interactive session
#[derive(Debug)]
pub struct DashboardSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub log: SessionLog,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            log: SessionLog::new(),
        }
    }
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}

pub type SessionHandle = Arc<Mutex<DashboardSession>>;

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> (Uuid, SessionHandle) {
        let session = DashboardSession::new();
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().insert(id, handle.clone());
        log::debug!("Dashboard session {} created", id);
        (id, handle)
    }

    pub fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        self.sessions.read().get(id).cloned()
    }

    /// End a session; its history goes with it
    pub fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().remove(id).is_some();
        if removed {
            log::debug!("Dashboard session {} ended", id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
