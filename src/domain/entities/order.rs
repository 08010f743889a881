//! # Order Entity
//!
//! The persisted order record: immutable line items, a price summary written
//! once at creation, and the agent-assignment state machine mutated by the
//! allocation engine afterwards.
//!
//! # Examples
//!
//! ```
//! use order_dispatch::domain::entities::order::{LineItem, Order};
//! use order_dispatch::domain::value_objects::{
//!     CustomerId, GeoPoint, Money, PaymentMethod, RestaurantId,
//! };
//!
//! let line = LineItem::new("margherita", Money::from_major(250), 2).unwrap();
//! let order = Order::new(
//!     CustomerId::new("cust-1"),
//!     RestaurantId::new("rest-1"),
//!     vec![line],
//!     GeoPoint::new(77.6, 12.97).unwrap(),
//!     PaymentMethod::Card,
//! )
//! .unwrap();
//!
//! assert!(order.assigned_agent().is_none());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    AgentId, AssignmentStatus, CustomerId, GeoPoint, Money, OfferId, OrderId, OrderStatus,
    PaymentMethod, RestaurantId, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One priced cart line, frozen at order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Menu product identifier.
    product_id: String,
    /// Unit price at add-to-cart time.
    unit_price: Money,
    /// Units ordered; always >= 1.
    quantity: u32,
    /// `unit_price * quantity`, precomputed.
    line_total: Money,
}

impl LineItem {
    /// Creates a line item, computing its total.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` for a zero quantity and
    /// `DomainError::InvalidAmount` for a negative unit price.
    pub fn new(product_id: impl Into<String>, unit_price: Money, quantity: u32) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity(
                "line quantity must be at least 1".to_string(),
            ));
        }
        if unit_price.is_negative() {
            return Err(DomainError::invalid_amount("unit price must not be negative"));
        }
        let line_total = unit_price.safe_mul(rust_decimal::Decimal::from(quantity))?;
        Ok(Self {
            product_id: product_id.into(),
            unit_price,
            quantity,
            line_total,
        })
    }

    /// Returns the product identifier.
    #[inline]
    #[must_use]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Returns the unit price.
    #[inline]
    #[must_use]
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Returns the quantity.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the precomputed line total.
    #[inline]
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.line_total
    }
}

/// One tax rule's contribution to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLine {
    /// Rule name, e.g. "GST 5%".
    pub name: String,
    /// Amount this rule contributes.
    pub amount: Money,
}

/// The auditable price breakdown computed at order placement.
///
/// Intermediate fields carry full precision; [`PriceSummary::rounded`]
/// produces the externally emitted two-decimal view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSummary {
    /// Sum of line totals.
    pub cart_total: Money,
    /// Discount from the single best applicable offer.
    pub offer_discount: Money,
    /// Which offer produced the discount, if any.
    pub applied_offer: Option<OfferId>,
    /// Discount from the coupon code, zero for unknown codes.
    pub coupon_discount: Money,
    /// `max(cart_total - offer_discount, 0)`.
    pub taxable_amount: Money,
    /// Per-rule tax contributions.
    pub tax_lines: Vec<TaxLine>,
    /// Sum of tax contributions.
    pub total_tax: Money,
    /// Delivery fee after free-delivery threshold.
    pub delivery_fee: Money,
    /// Surge fee, zero when no zone matched.
    pub surge_fee: Money,
    /// Customer tip.
    pub tip: Money,
    /// Customer-facing total. Not clamped: may be negative under aggressive
    /// coupon and offer stacking.
    pub final_amount: Money,
    /// Platform commission for settlement; informational only.
    pub revenue_share: Money,
}

impl PriceSummary {
    /// Returns a copy with every monetary field rounded to two decimals.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            cart_total: self.cart_total.round2(),
            offer_discount: self.offer_discount.round2(),
            applied_offer: self.applied_offer.clone(),
            coupon_discount: self.coupon_discount.round2(),
            taxable_amount: self.taxable_amount.round2(),
            tax_lines: self
                .tax_lines
                .iter()
                .map(|line| TaxLine {
                    name: line.name.clone(),
                    amount: line.amount.round2(),
                })
                .collect(),
            total_tax: self.total_tax.round2(),
            delivery_fee: self.delivery_fee.round2(),
            surge_fee: self.surge_fee.round2(),
            tip: self.tip.round2(),
            final_amount: self.final_amount.round2(),
            revenue_share: self.revenue_share.round2(),
        }
    }

    /// Returns true if stacked discounts drove the total below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.final_amount.is_negative()
    }
}

/// A recorded agent decline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionRecord {
    /// Agent that declined.
    pub agent_id: AgentId,
    /// When the decline happened.
    pub at: Timestamp,
    /// Free-form reason ("declined", "offer expired", ...).
    pub reason: String,
}

/// The order aggregate.
///
/// Created once; line items are immutable afterwards. The price summary is
/// written by the pricing engine at creation. Status fields stay mutable
/// until terminal; the allocation engine drives the assignment sub-status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    restaurant_id: RestaurantId,
    items: Vec<LineItem>,
    drop_point: GeoPoint,
    payment_method: PaymentMethod,
    summary: Option<PriceSummary>,
    status: OrderStatus,
    assignment_status: AssignmentStatus,
    assigned_agent: Option<AgentId>,
    rejection_history: Vec<RejectionRecord>,
}

impl Order {
    /// Creates a new order in `Placed` / `NotAssigned` state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if the cart is empty.
    pub fn new(
        customer_id: CustomerId,
        restaurant_id: RestaurantId,
        items: Vec<LineItem>,
        drop_point: GeoPoint,
        payment_method: PaymentMethod,
    ) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::InvalidQuantity(
                "order must contain at least one line item".to_string(),
            ));
        }
        Ok(Self {
            id: OrderId::new_v4(),
            customer_id,
            restaurant_id,
            items,
            drop_point,
            payment_method,
            summary: None,
            status: OrderStatus::Placed,
            assignment_status: AssignmentStatus::NotAssigned,
            assigned_agent: None,
            rejection_history: Vec::new(),
        })
    }

    /// Returns the order id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Returns the customer id.
    #[inline]
    #[must_use]
    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    /// Returns the restaurant id.
    #[inline]
    #[must_use]
    pub fn restaurant_id(&self) -> &RestaurantId {
        &self.restaurant_id
    }

    /// Returns the immutable line items.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the delivery drop point.
    #[inline]
    #[must_use]
    pub fn drop_point(&self) -> GeoPoint {
        self.drop_point
    }

    /// Returns the payment method.
    #[inline]
    #[must_use]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Returns the price summary, if pricing has run.
    #[inline]
    #[must_use]
    pub fn summary(&self) -> Option<&PriceSummary> {
        self.summary.as_ref()
    }

    /// Returns the coarse order status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the assignment sub-status.
    #[inline]
    #[must_use]
    pub fn assignment_status(&self) -> AssignmentStatus {
        self.assignment_status
    }

    /// Returns the committed agent, if any.
    #[inline]
    #[must_use]
    pub fn assigned_agent(&self) -> Option<&AgentId> {
        self.assigned_agent.as_ref()
    }

    /// Returns the rejection history, oldest first.
    #[inline]
    #[must_use]
    pub fn rejection_history(&self) -> &[RejectionRecord] {
        &self.rejection_history
    }

    /// Sum of line totals; the pricing engine's step-1 input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn cart_total(&self) -> DomainResult<Money> {
        let mut total = Money::ZERO;
        for item in &self.items {
            total = total.safe_add(item.line_total())?;
        }
        Ok(total)
    }

    /// Attaches the computed price summary. Written once at creation time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if a summary is already
    /// present.
    pub fn attach_summary(&mut self, summary: PriceSummary) -> DomainResult<()> {
        if self.summary.is_some() {
            return Err(DomainError::invalid_transition("priced", "priced"));
        }
        self.summary = Some(summary);
        Ok(())
    }

    fn transition(&mut self, next: AssignmentStatus) -> DomainResult<()> {
        if !self.assignment_status.can_transition_to(next) {
            return Err(DomainError::invalid_transition(self.assignment_status, next));
        }
        self.assignment_status = next;
        Ok(())
    }

    /// Marks the order as offered to an agent, pending acceptance.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the state machine
    /// forbids it.
    pub fn begin_acceptance_wait(&mut self) -> DomainResult<()> {
        self.transition(AssignmentStatus::AssignedWaitingAcceptance)
    }

    /// Records that the offered agent accepted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the order was not
    /// waiting on acceptance.
    pub fn mark_accepted(&mut self) -> DomainResult<()> {
        self.transition(AssignmentStatus::Accepted)
    }

    /// Commits an agent to the order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the state machine
    /// forbids committing from the current state.
    pub fn mark_assigned(&mut self, agent_id: AgentId) -> DomainResult<()> {
        self.transition(AssignmentStatus::Assigned)?;
        self.assigned_agent = Some(agent_id);
        Ok(())
    }

    /// Records an agent decline and appends to the rejection history.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the order was not
    /// waiting on acceptance.
    pub fn record_rejection(
        &mut self,
        agent_id: AgentId,
        at: Timestamp,
        reason: impl Into<String>,
    ) -> DomainResult<()> {
        self.transition(AssignmentStatus::Rejected)?;
        self.rejection_history.push(RejectionRecord {
            agent_id,
            at,
            reason: reason.into(),
        });
        Ok(())
    }

    /// Parks the order for a later allocation retry or manual action.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if an agent is already
    /// committed.
    pub fn mark_awaiting_assignment(&mut self) -> DomainResult<()> {
        self.transition(AssignmentStatus::AwaitingAgentAssignment)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order({}, restaurant={}, status={}, assignment={})",
            self.id, self.restaurant_id, self.status, self.assignment_status
        )
    }
}
