//! # Offers and Tax Rules
//!
//! Promotional offers (flat or percentage, optionally capped) and the tax
//! rules applied to the post-discount taxable amount.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Money, OfferId, RestaurantId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How an offer's discount is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// A flat amount off the cart.
    Flat,
    /// A percentage of the cart total.
    Percentage,
}

/// A promotional offer.
///
/// Offers compete: the pricing engine evaluates every applicable offer and
/// keeps only the one with the largest computed discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    id: OfferId,
    kind: DiscountKind,
    /// Flat amount, or percentage points for [`DiscountKind::Percentage`].
    value: Decimal,
    /// Minimum cart total for the offer to apply.
    min_cart_total: Money,
    /// Upper bound on the computed discount, if any.
    max_discount: Option<Money>,
    /// Restaurants the offer is limited to; `None` means marketplace-wide.
    restaurant_scope: Option<Vec<RestaurantId>>,
    valid_from: Timestamp,
    valid_until: Timestamp,
    active: bool,
}

impl Offer {
    /// Creates an offer with a validated validity window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeWindow` if `valid_from` is not before
    /// `valid_until`, and `DomainError::InvalidAmount` for a negative value.
    pub fn new(
        id: OfferId,
        kind: DiscountKind,
        value: Decimal,
        min_cart_total: Money,
        max_discount: Option<Money>,
        valid_from: Timestamp,
        valid_until: Timestamp,
    ) -> DomainResult<Self> {
        if !valid_from.is_before(&valid_until) {
            return Err(DomainError::InvalidTimeWindow(format!(
                "offer valid from {valid_from}, until {valid_until}"
            )));
        }
        if value.is_sign_negative() {
            return Err(DomainError::invalid_amount("offer value must not be negative"));
        }
        Ok(Self {
            id,
            kind,
            value,
            min_cart_total,
            max_discount,
            restaurant_scope: None,
            valid_from,
            valid_until,
            active: true,
        })
    }

    /// Limits the offer to the given restaurants.
    #[must_use]
    pub fn scoped_to(mut self, restaurants: Vec<RestaurantId>) -> Self {
        self.restaurant_scope = Some(restaurants);
        self
    }

    /// Returns the offer id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &OfferId {
        &self.id
    }

    /// Sets the activity flag.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Returns true if the offer applies to a cart of `cart_total` from
    /// `restaurant_id` at `at`.
    #[must_use]
    pub fn is_applicable(&self, cart_total: Money, restaurant_id: &RestaurantId, at: Timestamp) -> bool {
        let in_scope = match &self.restaurant_scope {
            None => true,
            Some(scope) => scope.contains(restaurant_id),
        };
        self.active
            && in_scope
            && !at.is_before(&self.valid_from)
            && at.is_before(&self.valid_until)
            && cart_total >= self.min_cart_total
    }

    /// Computes the discount for a cart, capped by `max_discount` and never
    /// exceeding the cart total itself.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn discount_for(&self, cart_total: Money) -> DomainResult<Money> {
        let raw = match self.kind {
            DiscountKind::Flat => Money::new(self.value),
            DiscountKind::Percentage => cart_total.percentage_of(self.value)?,
        };
        let capped = match self.max_discount {
            Some(cap) => raw.min(cap),
            None => raw,
        };
        Ok(capped.min(cart_total))
    }
}

/// The category a tax rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxCategory {
    /// Applied to the taxable food amount.
    Food,
    /// Applied to the delivery fee.
    Delivery,
}

/// A configured tax rule.
///
/// Rules are independent: each applies its percentage to the same base and
/// the contributions sum, no compounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRule {
    /// Rule name as emitted in the price breakdown, e.g. "CGST 2.5%".
    pub name: String,
    /// Percentage points applied to the base.
    pub percentage: Decimal,
    /// Which base the rule applies to.
    pub category: TaxCategory,
    /// Inactive rules are skipped.
    pub active: bool,
}

impl TaxRule {
    /// Computes this rule's contribution for the given base amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn apply_to(&self, base: Money) -> DomainResult<Money> {
        base.percentage_of(self.percentage)
    }
}
