//! Redis-backed mirror store.

use crate::domain::repositories::{MirrorError, MirrorResult, MirrorStore};
use parking_lot::Mutex;
use redis::{Client, Commands, Connection};
use tracing::{debug, info};

/// Redis mirror using a single synchronous connection.
///
/// Keys are namespaced with a prefix so several registries can share a
/// database.
pub struct RedisStore {
    conn: Mutex<Connection>,
    key_prefix: String,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `key_prefix` - Namespace prepended to every key
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Backend`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub fn connect(redis_url: &str, key_prefix: impl Into<String>) -> MirrorResult<Self> {
        info!("Connecting to Redis mirror");

        let client = Client::open(redis_url)
            .map_err(|e| MirrorError::Backend(format!("Failed to create Redis client: {}", e)))?;

        let mut conn = client
            .get_connection()
            .map_err(|e| MirrorError::Backend(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query::<()>(&mut conn)
            .map_err(|e| MirrorError::Backend(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis mirror");

        Ok(Self {
            conn: Mutex::new(conn),
            key_prefix: key_prefix.into(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

impl MirrorStore for RedisStore {
    fn get(&self, key: &str) -> MirrorResult<Option<String>> {
        let key = self.build_key(key);
        let mut conn = self.conn.lock();

        let value = conn
            .get::<_, Option<String>>(&key)
            .map_err(|e| MirrorError::Backend(format!("Redis GET error for {}: {}", key, e)))?;

        debug!("Mirror GET: {} (present: {})", key, value.is_some());
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> MirrorResult<()> {
        let key = self.build_key(key);
        let mut conn = self.conn.lock();

        conn.set::<_, _, ()>(&key, value)
            .map_err(|e| MirrorError::Backend(format!("Redis SET error for {}: {}", key, e)))?;

        debug!("Mirror SET: {} ({} bytes)", key, value.len());
        Ok(())
    }
}
