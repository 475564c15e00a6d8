//! Session State: one slot of working state per interactive session.
//!
//! Handlers load the session, compute a complete new value, and store it only
//! after the action succeeded. A failed action never touches the slot.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::negotiation::NegotiationOutcome;

const REDIS_KEY_PREFIX: &str = "clausewright:session";

/// Inputs and output of the latest SoW generation.
///
/// `source_text` and `clauses` are fixed once the first draft exists;
/// refinement only replaces `draft` and bumps `revision`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SowContext {
    pub source_text: String,
    pub user_description: String,
    pub clauses: Vec<String>,
    pub draft: String,
    /// 0 for the initial draft, incremented on every refinement.
    pub revision: u32,
    pub updated_at: DateTime<Utc>,
}

impl SowContext {
    /// Replaces the draft with a refined one, keeping the original inputs.
    pub fn refined(&self, draft: String) -> Self {
        Self {
            draft,
            revision: self.revision + 1,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub sow: Option<SowContext>,
    pub negotiation: Option<NegotiationOutcome>,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Session>, AppError>;

    /// Overwrites the slot for `id`.
    async fn put(&self, id: Uuid, session: Session) -> Result<(), AppError>;
}

/// Process-local store. Sessions live as long as the server process.
#[derive(Default)]
pub struct InMemorySessionStore {
    slots: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: Uuid) -> Result<Option<Session>, AppError> {
        Ok(self.slots.read().await.get(&id).cloned())
    }

    async fn put(&self, id: Uuid, session: Session) -> Result<(), AppError> {
        self.slots.write().await.insert(id, session);
        Ok(())
    }
}

/// Redis-backed store. Each slot is a JSON value that expires `ttl_secs`
/// after its last write, which ends the session.
pub struct RedisSessionStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    fn key(id: Uuid) -> String {
        format!("{REDIS_KEY_PREFIX}:{id}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, id: Uuid) -> Result<Option<Session>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(Self::key(id)).await?;

        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|e| AppError::Session(format!("corrupt session {id}: {e}")))
    }

    async fn put(&self, id: Uuid, session: Session) -> Result<(), AppError> {
        let json = serde_json::to_string(&session)
            .map_err(|e| AppError::Session(format!("failed to serialize session {id}: {e}")))?;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(Self::key(id), json, self.ttl_secs)
            .await?;
        Ok(())
    }
}

/// Resolves the caller's session: existing id → stored slot (or empty), no id → new session.
pub async fn load_or_new(
    store: &dyn SessionStore,
    id: Option<Uuid>,
) -> Result<(Uuid, Session), AppError> {
    match id {
        Some(id) => Ok((id, store.get(id).await?.unwrap_or_default())),
        None => Ok((Uuid::new_v4(), Session::default())),
    }
}
