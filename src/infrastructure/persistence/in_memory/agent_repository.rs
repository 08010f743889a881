//! In-memory agent store with compare-and-swap updates.

use crate::domain::entities::Agent;
use crate::domain::services::GeoMatcher;
use crate::domain::value_objects::{AgentId, GeoPoint};
use crate::infrastructure::persistence::traits::{
    AgentRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// HashMap-backed [`AgentRepository`].
///
/// The version check and the write happen under one write-lock acquisition,
/// which is what makes [`AgentRepository::update`] an atomic CAS here.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentRepository {
    store: Arc<RwLock<HashMap<AgentId, Agent>>>,
}

impl InMemoryAgentRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn insert(&self, agent: Agent) -> RepositoryResult<()> {
        let mut store = self.store.write().await;
        if store.contains_key(agent.id()) {
            return Err(RepositoryError::duplicate(format!("agent {}", agent.id())));
        }
        store.insert(agent.id().clone(), agent);
        Ok(())
    }

    async fn find(&self, id: &AgentId) -> RepositoryResult<Agent> {
        self.store
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("agent {id}")))
    }

    async fn find_available(&self) -> RepositoryResult<Vec<Agent>> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .filter(|a| a.status().is_workable())
            .cloned()
            .collect())
    }

    async fn find_within_radius(
        &self,
        origin: GeoPoint,
        radius_meters: f64,
    ) -> RepositoryResult<Vec<Agent>> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .filter(|a| a.status().is_workable())
            .filter(|a| GeoMatcher::distance_meters(origin, a.position()) <= radius_meters)
            .cloned()
            .collect())
    }

    async fn update(&self, agent: Agent, expected_version: u64) -> RepositoryResult<()> {
        let mut store = self.store.write().await;
        let stored = store
            .get(agent.id())
            .ok_or_else(|| RepositoryError::not_found(format!("agent {}", agent.id())))?;
        if stored.version() != expected_version {
            return Err(RepositoryError::VersionConflict {
                expected: expected_version,
                actual: stored.version(),
            });
        }
        store.insert(agent.id().clone(), agent);
        Ok(())
    }
}
