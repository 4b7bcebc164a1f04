use std::{sync::Arc, time::Duration};

use anyhow::Result;
use moodmix_agent::{MoodAgent, MoodCatalog};
use moodmix_config::{AppConfig, RedisConfig};
use moodmix_rooms::{EmotionTable, PolicyCache, RedisPolicyCache, RoomBlender, RoomRegistry};
use redis::aio::ConnectionManager;
use tracing::{info, warn};

const REDIS_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::INFO)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub agent: MoodAgent,
    pub blender: RoomBlender,
    pub rooms: RoomRegistry,
    pub redis_conn: Option<ConnectionManager>,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let agent = MoodAgent::new(config.agent.name.clone(), Arc::new(MoodCatalog::default()))
            .with_greeting(config.agent.greeting.clone())
            .with_session_ttl(Duration::from_secs(config.agent.session_ttl_seconds));

        let redis_conn = connect_redis(&config.redis).await;
        let cache = redis_conn
            .clone()
            .map(|conn| Arc::new(RedisPolicyCache::new(conn)) as Arc<dyn PolicyCache>);
        let blender = RoomBlender::new(EmotionTable::default(), cache);

        info!(agent = agent.name(), cache = blender.has_cache(), "backend services ready");

        Ok(Self {
            agent,
            blender,
            rooms: RoomRegistry::new(),
            redis_conn,
        })
    }

    pub fn redis_connected(&self) -> bool {
        self.redis_conn.is_some()
    }
}

/// Connects and pings redis once. Any failure leaves the service running without a cache.
async fn connect_redis(config: &RedisConfig) -> Option<ConnectionManager> {
    if !config.enabled {
        info!("redis disabled by configuration, proceeding without redis");
        return None;
    }

    let client = match redis::Client::open(config.url.as_str()) {
        Ok(client) => client,
        Err(e) => {
            warn!("failed to create redis client, proceeding without redis: {}", e);
            return None;
        }
    };

    let conn = match tokio::time::timeout(REDIS_CONNECT_TIMEOUT, ConnectionManager::new(client)).await {
        Ok(Ok(conn)) => conn,
        Ok(Err(e)) => {
            warn!("failed to connect to redis, proceeding without redis: {}", e);
            return None;
        }
        Err(_) => {
            warn!("timed out connecting to redis, proceeding without redis");
            return None;
        }
    };

    match tokio::time::timeout(REDIS_CONNECT_TIMEOUT, RedisPolicyCache::new(conn.clone()).ping()).await {
        Ok(Ok(())) => {
            info!("redis connection established");
            Some(conn)
        }
        Ok(Err(e)) => {
            warn!("redis ping failed, proceeding without redis: {}", e);
            None
        }
        Err(_) => {
            warn!("redis ping timed out, proceeding without redis");
            None
        }
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
