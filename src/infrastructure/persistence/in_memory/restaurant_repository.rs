//! In-memory restaurant store.

use crate::domain::entities::Restaurant;
use crate::domain::value_objects::RestaurantId;
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, RestaurantRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// HashMap-backed [`RestaurantRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryRestaurantRepository {
    store: Arc<RwLock<HashMap<RestaurantId, Restaurant>>>,
}

impl InMemoryRestaurantRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryRestaurantRepository {
    async fn insert(&self, restaurant: Restaurant) -> RepositoryResult<()> {
        let mut store = self.store.write().await;
        if store.contains_key(restaurant.id()) {
            return Err(RepositoryError::duplicate(format!(
                "restaurant {}",
                restaurant.id()
            )));
        }
        store.insert(restaurant.id().clone(), restaurant);
        Ok(())
    }

    async fn find(&self, id: &RestaurantId) -> RepositoryResult<Restaurant> {
        self.store
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("restaurant {id}")))
    }
}
