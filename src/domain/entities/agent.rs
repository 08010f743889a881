//! # Delivery Agent Entity
//!
//! A delivery agent as the allocation engine sees it: current position,
//! workability status, active load, and a version counter for optimistic
//! concurrency at the repository boundary.
//!
//! # Examples
//!
//! ```
//! use order_dispatch::domain::entities::agent::{Agent, AgentPermissions};
//! use order_dispatch::domain::value_objects::{AgentId, AgentStatus, GeoPoint};
//!
//! let agent = Agent::new(
//!     AgentId::new("agent-1"),
//!     GeoPoint::new(77.6, 12.97).unwrap(),
//!     4.5,
//!     AgentPermissions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(agent.status(), AgentStatus::Offline);
//! assert_eq!(agent.version(), 0);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{AgentId, AgentStatus, GeoPoint, Money, OrderId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-agent operational permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPermissions {
    /// Whether the agent may accept offers without dispatcher approval.
    pub can_self_accept: bool,
    /// Hard cap on concurrent active orders, regardless of settings.
    pub max_concurrent_orders: u32,
    /// Cash-on-delivery float limit; `None` means no COD orders at all.
    pub max_cod_exposure: Option<Money>,
}

impl Default for AgentPermissions {
    fn default() -> Self {
        Self {
            can_self_accept: true,
            max_concurrent_orders: 3,
            max_cod_exposure: Some(Money::from_major(2000)),
        }
    }
}

/// A delivery agent record.
///
/// The `version` field increments on every mutation and backs the
/// repository's compare-and-swap update. Concurrent allocation attempts that
/// race on the same agent will see a version conflict and move on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    position: GeoPoint,
    status: AgentStatus,
    active_orders: Vec<OrderId>,
    rating: f64,
    last_assigned_at: Option<Timestamp>,
    cod_balance: Money,
    permissions: AgentPermissions,
    version: u64,
}

impl Agent {
    /// Creates a new offline agent with no active orders.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRating` if `rating` is outside `0..=5`.
    pub fn new(
        id: AgentId,
        position: GeoPoint,
        rating: f64,
        permissions: AgentPermissions,
    ) -> DomainResult<Self> {
        if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
            return Err(DomainError::InvalidRating(format!(
                "rating {rating} outside 0..=5"
            )));
        }
        Ok(Self {
            id,
            position,
            status: AgentStatus::Offline,
            active_orders: Vec::new(),
            rating,
            last_assigned_at: None,
            cod_balance: Money::ZERO,
            permissions,
            version: 0,
        })
    }

    /// Reconstructs an agent from stored fields, bypassing validation.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_parts(
        id: AgentId,
        position: GeoPoint,
        status: AgentStatus,
        active_orders: Vec<OrderId>,
        rating: f64,
        last_assigned_at: Option<Timestamp>,
        cod_balance: Money,
        permissions: AgentPermissions,
        version: u64,
    ) -> Self {
        Self {
            id,
            position,
            status,
            active_orders,
            rating,
            last_assigned_at,
            cod_balance,
            permissions,
            version,
        }
    }

    /// Returns the agent id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &AgentId {
        &self.id
    }

    /// Returns the last reported position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> GeoPoint {
        self.position
    }

    /// Returns the workability status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> AgentStatus {
        self.status
    }

    /// Returns the currently carried orders.
    #[inline]
    #[must_use]
    pub fn active_orders(&self) -> &[OrderId] {
        &self.active_orders
    }

    /// Returns the rating, 0..=5.
    #[inline]
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Returns when the agent last received an assignment.
    #[inline]
    #[must_use]
    pub fn last_assigned_at(&self) -> Option<Timestamp> {
        self.last_assigned_at
    }

    /// Returns the cash-on-delivery float currently held.
    #[inline]
    #[must_use]
    pub fn cod_balance(&self) -> Money {
        self.cod_balance
    }

    /// Returns the agent's permissions.
    #[inline]
    #[must_use]
    pub fn permissions(&self) -> &AgentPermissions {
        &self.permissions
    }

    /// Returns the optimistic-concurrency version.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    /// Updates the reported position.
    pub fn update_position(&mut self, position: GeoPoint) {
        self.position = position;
        self.bump();
    }

    /// Sets the workability status.
    pub fn set_status(&mut self, status: AgentStatus) {
        self.status = status;
        self.bump();
    }

    /// Returns true if the agent can take one more order under the given
    /// per-strategy task cap.
    ///
    /// Both the strategy's `max_tasks_allowed` and the agent's own
    /// `max_concurrent_orders` must leave headroom, and the status must be
    /// workable.
    #[must_use]
    pub fn can_take_order(&self, max_tasks_allowed: u32) -> bool {
        if !self.status.is_workable() {
            return false;
        }
        let load = self.active_orders.len() as u32;
        load < max_tasks_allowed && load < self.permissions.max_concurrent_orders
    }

    /// Returns true if taking a cash order of `amount` stays within the
    /// agent's COD exposure limit.
    #[must_use]
    pub fn can_carry_cod(&self, amount: Money) -> bool {
        match self.permissions.max_cod_exposure {
            None => false,
            Some(limit) => match self.cod_balance.safe_add(amount) {
                Ok(total) => total <= limit,
                Err(_) => false,
            },
        }
    }

    /// Records an assignment: appends the order, updates the fairness
    /// timestamp, adds any COD amount, and flips status to `OrderAssigned`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the agent is not
    /// workable, and `DomainError::Arithmetic` if the COD balance overflows.
    pub fn mark_assigned(
        &mut self,
        order_id: OrderId,
        at: Timestamp,
        cod_amount: Option<Money>,
    ) -> DomainResult<()> {
        if !self.status.is_workable() {
            return Err(DomainError::invalid_transition(self.status, AgentStatus::OrderAssigned));
        }
        if let Some(amount) = cod_amount {
            self.cod_balance = self.cod_balance.safe_add(amount)?;
        }
        self.active_orders.push(order_id);
        self.last_assigned_at = Some(at);
        self.status = AgentStatus::OrderAssigned;
        self.bump();
        Ok(())
    }

    /// Releases an order (delivery completed or assignment rolled back).
    ///
    /// When the last active order is released the agent returns to
    /// `Available`. Releasing an order the agent does not carry is a no-op
    /// apart from the version bump.
    pub fn release_order(&mut self, order_id: OrderId, cod_amount: Option<Money>) {
        self.active_orders.retain(|id| *id != order_id);
        if let Some(amount) = cod_amount {
            self.cod_balance = self
                .cod_balance
                .safe_sub(amount)
                .unwrap_or(Money::ZERO)
                .clamp_floor_zero();
        }
        if self.active_orders.is_empty() && self.status == AgentStatus::OrderAssigned {
            self.status = AgentStatus::Available;
        }
        self.bump();
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Agent({}, status={}, load={}, v{})",
            self.id,
            self.status,
            self.active_orders.len(),
            self.version
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn available_agent() -> Agent {
        let mut agent = Agent::new(
            AgentId::new("agent-1"),
            GeoPoint::new(77.6, 12.97).unwrap(),
            4.2,
            AgentPermissions::default(),
        )
        .unwrap();
        agent.set_status(AgentStatus::Available);
        agent
    }

    mod construction {
        use super::*;

        #[test]
        fn new_agent_is_offline_at_version_zero() {
            let agent = Agent::new(
                AgentId::new("agent-1"),
                GeoPoint::new(77.6, 12.97).unwrap(),
                4.2,
                AgentPermissions::default(),
            )
            .unwrap();
            assert_eq!(agent.status(), AgentStatus::Offline);
            assert_eq!(agent.version(), 0);
            assert!(agent.active_orders().is_empty());
        }

        #[test]
        fn rating_out_of_range_rejected() {
            let err = Agent::new(
                AgentId::new("agent-1"),
                GeoPoint::new(77.6, 12.97).unwrap(),
                5.1,
                AgentPermissions::default(),
            )
            .unwrap_err();
            assert!(matches!(err, DomainError::InvalidRating(_)));
        }

        #[test]
        fn nan_rating_rejected() {
            assert!(Agent::new(
                AgentId::new("agent-1"),
                GeoPoint::new(77.6, 12.97).unwrap(),
                f64::NAN,
                AgentPermissions::default(),
            )
            .is_err());
        }
    }

    mod capacity {
        use super::*;

        #[test]
        fn offline_agent_cannot_take_orders() {
            let mut agent = available_agent();
            agent.set_status(AgentStatus::Offline);
            assert!(!agent.can_take_order(5));
        }

        #[test]
        fn strategy_cap_applies() {
            let mut agent = available_agent();
            let at = Timestamp::from_secs(1000).unwrap();
            agent.mark_assigned(OrderId::new_v4(), at, None).unwrap();
            assert!(agent.can_take_order(2));
            assert!(!agent.can_take_order(1));
        }

        #[test]
        fn agent_permission_cap_applies() {
            let mut agent = Agent::new(
                AgentId::new("agent-1"),
                GeoPoint::new(77.6, 12.97).unwrap(),
                4.0,
                AgentPermissions {
                    can_self_accept: true,
                    max_concurrent_orders: 1,
                    max_cod_exposure: None,
                },
            )
            .unwrap();
            agent.set_status(AgentStatus::Available);
            let at = Timestamp::from_secs(1000).unwrap();
            agent.mark_assigned(OrderId::new_v4(), at, None).unwrap();
            // Strategy would allow more, but the agent's own cap is 1.
            assert!(!agent.can_take_order(10));
        }
    }

    mod cod {
        use super::*;

        #[test]
        fn exposure_limit_enforced() {
            let agent = available_agent();
            assert!(agent.can_carry_cod(Money::from_major(2000)));
            assert!(!agent.can_carry_cod(Money::from_major(2001)));
        }

        #[test]
        fn no_limit_means_no_cod() {
            let agent = Agent::new(
                AgentId::new("agent-1"),
                GeoPoint::new(77.6, 12.97).unwrap(),
                4.0,
                AgentPermissions {
                    can_self_accept: true,
                    max_concurrent_orders: 3,
                    max_cod_exposure: None,
                },
            )
            .unwrap();
            assert!(!agent.can_carry_cod(Money::from_major(1)));
        }

        #[test]
        fn balance_tracks_assignments_and_releases() {
            let mut agent = available_agent();
            let at = Timestamp::from_secs(1000).unwrap();
            let order = OrderId::new_v4();
            agent
                .mark_assigned(order, at, Some(Money::from_major(500)))
                .unwrap();
            assert_eq!(agent.cod_balance(), Money::from_major(500));
            agent.release_order(order, Some(Money::from_major(500)));
            assert!(agent.cod_balance().is_zero());
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn assignment_bumps_version_and_sets_fairness_timestamp() {
            let mut agent = available_agent();
            let before = agent.version();
            let at = Timestamp::from_secs(5000).unwrap();
            agent.mark_assigned(OrderId::new_v4(), at, None).unwrap();
            assert_eq!(agent.status(), AgentStatus::OrderAssigned);
            assert_eq!(agent.last_assigned_at(), Some(at));
            assert!(agent.version() > before);
        }

        #[test]
        fn assignment_refused_when_not_workable() {
            let mut agent = available_agent();
            agent.set_status(AgentStatus::Suspended);
            let at = Timestamp::from_secs(5000).unwrap();
            let err = agent.mark_assigned(OrderId::new_v4(), at, None).unwrap_err();
            assert!(matches!(err, DomainError::InvalidStateTransition { .. }));
        }

        #[test]
        fn releasing_last_order_returns_to_available() {
            let mut agent = available_agent();
            let at = Timestamp::from_secs(5000).unwrap();
            let order = OrderId::new_v4();
            agent.mark_assigned(order, at, None).unwrap();
            agent.release_order(order, None);
            assert_eq!(agent.status(), AgentStatus::Available);
            assert!(agent.active_orders().is_empty());
        }
    }
}
