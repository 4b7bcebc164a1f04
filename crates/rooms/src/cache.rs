//! Shared cache the blended policies are published to.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use tokio::sync::Mutex;

use crate::errors::CacheError;

#[async_trait]
pub trait PolicyCache: Send + Sync {
    /// Unconditional overwrite of `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}

/// Redis-backed cache. Connection upkeep is left to the [`ConnectionManager`].
#[derive(Clone)]
pub struct RedisPolicyCache {
    conn: ConnectionManager,
}

impl RedisPolicyCache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl PolicyCache for RedisPolicyCache {
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.get::<_, Option<String>>(key).await?)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        if reply == "PONG" {
            Ok(())
        } else {
            Err(CacheError::Unavailable(format!("unexpected PING reply: {reply}")))
        }
    }
}

/// Process-local cache with the same last-write-wins semantics.
#[derive(Clone, Default)]
pub struct MemoryPolicyCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryPolicyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl PolicyCache for MemoryPolicyCache {
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
