//! In-memory pricing configuration.

use crate::domain::entities::{Offer, SurgeArea, TaxRule};
use crate::infrastructure::persistence::traits::{PricingCatalog, RepositoryResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct CatalogState {
    offers: Vec<Offer>,
    tax_rules: Vec<TaxRule>,
    surge_areas: Vec<SurgeArea>,
}

/// In-memory [`PricingCatalog`] seeded by tests or a bootstrap step.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPricingCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryPricingCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an offer.
    pub async fn add_offer(&self, offer: Offer) {
        self.state.write().await.offers.push(offer);
    }

    /// Adds a tax rule.
    pub async fn add_tax_rule(&self, rule: TaxRule) {
        self.state.write().await.tax_rules.push(rule);
    }

    /// Adds a surge area.
    pub async fn add_surge_area(&self, area: SurgeArea) {
        self.state.write().await.surge_areas.push(area);
    }
}

#[async_trait]
impl PricingCatalog for InMemoryPricingCatalog {
    async fn offers(&self) -> RepositoryResult<Vec<Offer>> {
        Ok(self.state.read().await.offers.clone())
    }

    async fn tax_rules(&self) -> RepositoryResult<Vec<TaxRule>> {
        Ok(self.state.read().await.tax_rules.clone())
    }

    async fn surge_areas(&self) -> RepositoryResult<Vec<SurgeArea>> {
        Ok(self.state.read().await.surge_areas.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::offer::TaxCategory;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn seeded_rules_come_back() {
        let catalog = InMemoryPricingCatalog::new();
        catalog
            .add_tax_rule(TaxRule {
                name: "GST 5%".to_string(),
                percentage: Decimal::new(5, 0),
                category: TaxCategory::Food,
                active: true,
            })
            .await;
        let rules = catalog.tax_rules().await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "GST 5%");
        assert!(catalog.offers().await.unwrap().is_empty());
    }
}
