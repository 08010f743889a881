//! In-memory order store for tests and local runs.

use crate::domain::entities::Order;
use crate::domain::value_objects::OrderId;
use crate::infrastructure::persistence::traits::{
    OrderRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// HashMap-backed [`OrderRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderRepository {
    store: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: Order) -> RepositoryResult<()> {
        let mut store = self.store.write().await;
        if store.contains_key(&order.id()) {
            return Err(RepositoryError::duplicate(format!("order {}", order.id())));
        }
        store.insert(order.id(), order);
        Ok(())
    }

    async fn find(&self, id: OrderId) -> RepositoryResult<Order> {
        self.store
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("order {id}")))
    }

    async fn update(&self, order: Order) -> RepositoryResult<()> {
        let mut store = self.store.write().await;
        if !store.contains_key(&order.id()) {
            return Err(RepositoryError::not_found(format!("order {}", order.id())));
        }
        store.insert(order.id(), order);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::order::LineItem;
    use crate::domain::value_objects::{CustomerId, GeoPoint, Money, PaymentMethod, RestaurantId};

    fn order() -> Order {
        Order::new(
            CustomerId::new("cust-1"),
            RestaurantId::new("rest-1"),
            vec![LineItem::new("dosa", Money::from_major(90), 1).unwrap()],
            GeoPoint::new(77.6, 12.97).unwrap(),
            PaymentMethod::Card,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_and_find() {
        let repo = InMemoryOrderRepository::new();
        let order = order();
        let id = order.id();
        repo.insert(order).await.unwrap();
        assert_eq!(repo.find(id).await.unwrap().id(), id);
    }

    #[tokio::test]
    async fn duplicate_insert_rejected() {
        let repo = InMemoryOrderRepository::new();
        let order = order();
        repo.insert(order.clone()).await.unwrap();
        assert!(matches!(
            repo.insert(order).await,
            Err(RepositoryError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn update_requires_existing() {
        let repo = InMemoryOrderRepository::new();
        assert!(matches!(
            repo.update(order()).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn find_missing_is_not_found() {
        let repo = InMemoryOrderRepository::new();
        assert!(matches!(
            repo.find(OrderId::new_v4()).await,
            Err(RepositoryError::NotFound(_))
        ));
    }
}
