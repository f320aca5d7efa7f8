//! In-process session storage.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Session, SessionStore, SessionToken};
use crate::constants::SESSION_TTL_MILLIS;
use crate::user::Identity;
use crate::{Clock, Result};

/// In-memory session store
///
/// Maps session tokens (random UUIDs) to identity snapshots.
/// Sessions are ephemeral and lost on server restart.
#[derive(Clone)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, Session>>>,
    clock: Arc<dyn Clock>,
    ttl_millis: i64,
}

impl MemorySessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(clock, SESSION_TTL_MILLIS)
    }

    /// Store with a non-default session lifetime.
    pub fn with_ttl(clock: Arc<dyn Clock>, ttl_millis: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            clock,
            ttl_millis,
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, identity: Identity) -> Result<Session> {
        let created_at = self.clock.now_millis();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            identity,
            created_at,
            expires_at: created_at + self.ttl_millis,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(session.token.clone(), session.clone());
        Ok(session)
    }

    async fn resolve(&self, token: &str) -> Result<Option<Identity>> {
        let now = self.clock.now_millis();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return Ok(None),
                Some(session) if !session.is_expired(now) => {
                    return Ok(Some(session.identity.clone()));
                }
                Some(_) => {}
            }
        }

        // Expired: drop it so the map does not grow with dead sessions
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
        Ok(None)
    }

    async fn destroy(&self, token: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        let now = self.clock.now_millis();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        Ok(before - sessions.len())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.sessions.read().await.len())
    }
}
