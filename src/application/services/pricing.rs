//! # Pricing Engine
//!
//! Computes the full price breakdown for an order in one fixed sequence:
//! cart total, best offer, coupon, taxable amount, taxes, delivery fee,
//! surge, tip, final total, and the informational revenue share.
//!
//! Intermediate math keeps full decimal precision; callers round the
//! returned summary via [`PriceSummary::rounded`] when emitting it.
//!
//! The final amount is deliberately not clamped at zero. Stacked discounts
//! that drive it negative are a configuration problem the breakdown must
//! surface, not hide.

use crate::application::error::AppResult;
use crate::domain::entities::offer::{Offer, TaxCategory};
use crate::domain::entities::order::{Order, PriceSummary, TaxLine};
use crate::domain::entities::Restaurant;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::{GeoMatcher, SurgeEvaluator};
use crate::domain::value_objects::{Money, OfferId, RestaurantId, Timestamp};
use crate::infrastructure::persistence::PricingCatalog;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Coupon codes honored at checkout. Unknown codes contribute zero without
/// failing the order.
const COUPON_WELCOME: &str = "WELCOME50";
const COUPON_FREE_DELIVERY: &str = "FREEDLV";
const WELCOME_FLAT_OFF: i64 = 50;

/// Distance-based delivery fee schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryFeePolicy {
    /// Flat fee covering the first `base_distance_km`.
    pub base_fee: Money,
    /// Distance included in the base fee, kilometers.
    pub base_distance_km: f64,
    /// Fee per kilometer beyond the base distance, billed pro rata.
    pub per_km_fee: Money,
    /// Packaging charge added to every delivery.
    pub packaging_fee: Money,
    /// Cart total at or above which delivery is free, if configured.
    pub free_delivery_above: Option<Money>,
}

impl Default for DeliveryFeePolicy {
    fn default() -> Self {
        Self {
            base_fee: Money::from_major(30),
            base_distance_km: 2.0,
            per_km_fee: Money::from_major(10),
            packaging_fee: Money::ZERO,
            free_delivery_above: None,
        }
    }
}

impl DeliveryFeePolicy {
    /// Quotes the delivery fee for a trip of `distance_meters` carrying a
    /// cart of `cart_total`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow or an unrepresentable
    /// distance.
    pub fn quote(&self, distance_meters: f64, cart_total: Money) -> DomainResult<Money> {
        if let Some(threshold) = self.free_delivery_above {
            if cart_total >= threshold {
                return Ok(Money::ZERO);
            }
        }
        // Distance beyond the base is billed pro rata.
        let extra_km = (distance_meters / 1000.0 - self.base_distance_km).max(0.0);
        let Ok(extra_km) = Decimal::try_from(extra_km) else {
            return Err(DomainError::Arithmetic("distance not representable"));
        };
        let distance_fee = self.per_km_fee.safe_mul(extra_km)?;
        self.base_fee
            .safe_add(distance_fee)?
            .safe_add(self.packaging_fee)
    }
}

/// How the platform's cut is computed. Informational: it never changes what
/// the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueShareRule {
    /// A fixed amount per order.
    Flat(Money),
    /// A percentage of the (floor-zero) final amount.
    Percentage(Decimal),
}

impl RevenueShareRule {
    /// Computes the share for a settled amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn compute(&self, basis: Money) -> DomainResult<Money> {
        match self {
            Self::Flat(amount) => Ok(*amount),
            Self::Percentage(pct) => basis.percentage_of(*pct),
        }
    }
}

/// The pricing use case.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    catalog: Arc<dyn PricingCatalog>,
    delivery_policy: DeliveryFeePolicy,
    revenue_share: RevenueShareRule,
}

impl PricingEngine {
    /// Creates an engine over a pricing catalog.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn PricingCatalog>,
        delivery_policy: DeliveryFeePolicy,
        revenue_share: RevenueShareRule,
    ) -> Self {
        Self {
            catalog,
            delivery_policy,
            revenue_share,
        }
    }

    /// Computes the price summary for an order placed at `now`.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the catalog cannot be read, or a domain
    /// error if any monetary step overflows.
    #[instrument(skip_all, fields(order_id = %order.id()))]
    pub async fn price_order(
        &self,
        order: &Order,
        restaurant: &Restaurant,
        coupon_code: Option<&str>,
        tip: Money,
        now: Timestamp,
    ) -> AppResult<PriceSummary> {
        let cart_total = order.cart_total()?;

        let (applied_offer, offer_discount) = self
            .best_offer(cart_total, restaurant.id(), now)
            .await?;
        let taxable_amount = cart_total.safe_sub(offer_discount)?.clamp_floor_zero();

        let distance_meters =
            GeoMatcher::distance_meters(restaurant.location(), order.drop_point());
        let delivery_fee = self.delivery_policy.quote(distance_meters, cart_total)?;

        let surge_areas = self.catalog.surge_areas().await?;
        let surge_fee =
            SurgeEvaluator::evaluate(&surge_areas, order.drop_point(), cart_total, now)
                .map_or(Money::ZERO, |charge| charge.fee);

        let coupon_discount = coupon_discount(coupon_code, delivery_fee);

        let mut tax_lines = Vec::new();
        let mut total_tax = Money::ZERO;
        for rule in self.catalog.tax_rules().await? {
            if !rule.active {
                continue;
            }
            let base = match rule.category {
                TaxCategory::Food => taxable_amount,
                TaxCategory::Delivery => delivery_fee,
            };
            let amount = rule.apply_to(base)?;
            total_tax = total_tax.safe_add(amount)?;
            tax_lines.push(TaxLine {
                name: rule.name,
                amount,
            });
        }

        let final_amount = taxable_amount
            .safe_add(delivery_fee)?
            .safe_add(tip)?
            .safe_add(total_tax)?
            .safe_add(surge_fee)?
            .safe_sub(coupon_discount)?;

        let revenue_share = self.revenue_share.compute(final_amount.clamp_floor_zero())?;

        debug!(%cart_total, %final_amount, "priced order");

        Ok(PriceSummary {
            cart_total,
            offer_discount,
            applied_offer,
            coupon_discount,
            taxable_amount,
            tax_lines,
            total_tax,
            delivery_fee,
            surge_fee,
            tip,
            final_amount,
            revenue_share,
        })
    }

    /// Picks the applicable offer with the largest computed discount; ties
    /// go to the earliest-listed offer.
    async fn best_offer(
        &self,
        cart_total: Money,
        restaurant_id: &RestaurantId,
        now: Timestamp,
    ) -> AppResult<(Option<OfferId>, Money)> {
        let offers: Vec<Offer> = self.catalog.offers().await?;
        let mut best: Option<(OfferId, Money)> = None;
        for offer in &offers {
            if !offer.is_applicable(cart_total, restaurant_id, now) {
                continue;
            }
            let discount = offer.discount_for(cart_total)?;
            let beats_current = match &best {
                Some((_, current)) => discount > *current,
                None => true,
            };
            if beats_current {
                best = Some((offer.id().clone(), discount));
            }
        }
        Ok(match best {
            Some((id, discount)) => (Some(id), discount),
            None => (None, Money::ZERO),
        })
    }
}

/// Resolves a coupon code against the static table. Unknown codes yield
/// zero, not an error.
fn coupon_discount(code: Option<&str>, delivery_fee: Money) -> Money {
    match code {
        Some(COUPON_WELCOME) => Money::from_major(WELCOME_FLAT_OFF),
        Some(COUPON_FREE_DELIVERY) => delivery_fee,
        _ => Money::ZERO,
    }
}
