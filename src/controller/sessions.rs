//! Per-visitor controllers keyed by the session id cookie.
//!
//! Every visitor gets a [`ViewController`] of its own, so the view state, the
//! request sequencers, the debouncer and the admin login never cross visitors.
//! Idle sessions are dropped on the next visit after `idle_timeout`.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::{DataSource, SourceHealth, ViewController};
use crate::client::ApiError;
use crate::config::{Config, DataMode};

/// Builds the data source of a new visitor
pub type SourceFactory = Box<dyn Fn() -> Result<DataSource, ApiError> + Send + Sync>;

struct Session {
    controller: ViewController,
    last_seen: Instant,
}

/// A visitor's controller, and whether this request opened the session
#[derive(Clone)]
pub struct Visit {
    pub id: Uuid,
    pub controller: ViewController,
    pub is_new: bool,
}

pub struct SessionRegistry {
    /// Source used by the health checks only
    health_source: DataSource,
    new_source: SourceFactory,
    search_debounce: Duration,
    recent_limit: usize,
    idle_timeout: Duration,
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionRegistry {
    pub fn new(
        health_source: DataSource,
        new_source: SourceFactory,
        search_debounce: Duration,
        recent_limit: usize,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            health_source,
            new_source,
            search_debounce,
            recent_limit,
            idle_timeout,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Backed visitors get a fresh backend client each, static ones share the file
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let health_source = DataSource::from_config(config)?;
        let new_source: SourceFactory = match &health_source {
            DataSource::Static(loader) => {
                let loader = loader.clone();
                Box::new(move || Ok(DataSource::Static(loader.clone())))
            }
            DataSource::Backed { .. } => {
                let config = config.clone();
                Box::new(move || DataSource::from_config(&config))
            }
        };

        Ok(Self::new(
            health_source,
            new_source,
            config.search_debounce,
            config.recent_jobs_limit,
            config.session_idle_timeout,
        ))
    }

    pub fn mode(&self) -> DataMode {
        self.health_source.mode()
    }

    pub async fn health(&self) -> SourceHealth {
        self.health_source.health().await
    }

    pub async fn active(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Controller of session `id`; unknown or expired ids open a new session
    pub async fn visit(&self, id: Option<Uuid>) -> Result<Visit, ApiError> {
        let now = Instant::now();

        let visit = {
            let mut sessions = self.sessions.lock().await;
            let before = sessions.len();
            sessions.retain(|_, session| now.duration_since(session.last_seen) < self.idle_timeout);
            if sessions.len() < before {
                debug!("Expired {} idle sessions", before - sessions.len());
            }

            if let Some(id) = id {
                if let Some(session) = sessions.get_mut(&id) {
                    session.last_seen = now;
                    return Ok(Visit {
                        id,
                        controller: session.controller.clone(),
                        is_new: false,
                    });
                }
            }

            let controller =
                ViewController::new((self.new_source)()?, self.search_debounce, self.recent_limit);
            let id = Uuid::new_v4();
            sessions.insert(
                id,
                Session {
                    controller: controller.clone(),
                    last_seen: now,
                },
            );
            info!("Opened visitor session ({} active)", sessions.len());

            Visit {
                id,
                controller,
                is_new: true,
            }
        };

        // The id is unknown to the browser until this response, so nothing
        // else can reach the controller while it loads
        visit.controller.initialize().await;
        Ok(visit)
    }
}
