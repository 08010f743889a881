//! In-memory allocation settings source.

use crate::application::settings::AllocationSettings;
use crate::infrastructure::persistence::traits::{RepositoryResult, SettingsRepository};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// [`SettingsRepository`] over a mutable in-memory value, so tests can flip
/// settings between allocation attempts the way an operator console would.
#[derive(Debug, Clone)]
pub struct InMemorySettingsRepository {
    settings: Arc<RwLock<AllocationSettings>>,
}

impl InMemorySettingsRepository {
    /// Creates a repository serving the given settings.
    #[must_use]
    pub fn new(settings: AllocationSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Replaces the served settings.
    pub async fn set(&self, settings: AllocationSettings) {
        *self.settings.write().await = settings;
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn load(&self) -> RepositoryResult<AllocationSettings> {
        Ok(self.settings.read().await.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_reflects_latest_set() {
        let repo = InMemorySettingsRepository::new(AllocationSettings::default());
        let mut updated = AllocationSettings::default();
        updated.auto_allocation_enabled = false;
        repo.set(updated).await;
        assert!(!repo.load().await.unwrap().auto_allocation_enabled);
    }
}
