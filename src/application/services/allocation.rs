//! # Allocation Engine
//!
//! Drives one allocation attempt for an order: loads settings, gates on
//! manual mode and restaurant availability, asks the configured strategy for
//! ranked candidates, then walks the list committing the first agent that
//! passes eligibility, acceptance (for one-by-one), and the repository's
//! compare-and-swap.
//!
//! Failure never strands an order: every non-assigned path parks it in
//! `awaiting_agent_assignment` so a later retry or a dispatcher can pick it
//! up, and a reserved agent is released if the order write fails after the
//! agent commit.

use crate::application::error::{AppResult, ApplicationError};
use crate::application::services::allocation_strategy::{strategy_for, SelectionContext};
use crate::domain::entities::Order;
use crate::domain::value_objects::{AgentId, AllocationMethod, Money, OrderId, Timestamp};
use crate::infrastructure::notification::{AssignmentEvent, NotificationSink};
use crate::infrastructure::persistence::{
    AgentRepository, OrderRepository, RepositoryError, RestaurantRepository, SettingsRepository,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// How an allocation attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// An agent is committed to the order.
    Assigned {
        /// The committed agent.
        agent_id: AgentId,
    },
    /// No agent could be committed; the order is parked for retry.
    NotAssigned {
        /// Why nobody was committed.
        reason: String,
    },
    /// Auto-allocation is disabled; a dispatcher must assign by hand.
    ManualAssignmentRequired,
    /// The configured method has no implementation.
    Unsupported {
        /// The configured method.
        method: AllocationMethod,
    },
}

/// An agent's answer to an assignment offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptanceReply {
    /// The agent takes the order.
    Accepted,
    /// The agent declines.
    Rejected {
        /// Decline reason as reported by the agent app.
        reason: String,
    },
}

/// Port for asking an agent to accept an offer.
///
/// The engine bounds every call with the configured expiry; implementations
/// may block indefinitely.
#[async_trait]
pub trait AgentResponder: Send + Sync + std::fmt::Debug {
    /// Offers `order_id` to `agent_id` and waits for the answer.
    async fn request_acceptance(&self, agent_id: &AgentId, order_id: OrderId) -> AcceptanceReply;
}

/// Responder that accepts every offer immediately. Used where agent devices
/// auto-accept, and as the default for strategies that skip acceptance.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoAcceptResponder;

#[async_trait]
impl AgentResponder for AutoAcceptResponder {
    async fn request_acceptance(&self, _agent_id: &AgentId, _order_id: OrderId) -> AcceptanceReply {
        AcceptanceReply::Accepted
    }
}

/// The allocation use case.
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    orders: Arc<dyn OrderRepository>,
    agents: Arc<dyn AgentRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    settings: Arc<dyn SettingsRepository>,
    responder: Arc<dyn AgentResponder>,
    sink: Arc<dyn NotificationSink>,
}

impl AllocationEngine {
    /// Creates an engine over its collaborator ports.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        agents: Arc<dyn AgentRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        settings: Arc<dyn SettingsRepository>,
        responder: Arc<dyn AgentResponder>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            orders,
            agents,
            restaurants,
            settings,
            responder,
            sink,
        }
    }

    /// Runs one allocation attempt for `order_id` at the injected instant.
    ///
    /// Re-entrant: an order that already carries a committed agent returns
    /// `Assigned` with that agent and no side effects.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unusable settings, a repository
    /// error when a store fails mid-flight, and
    /// [`ApplicationError::ConcurrencyExhausted`] when every candidate
    /// commit lost its CAS race. Before any error propagates the order is
    /// parked in `awaiting_agent_assignment` (best effort) so the attempt
    /// stays retryable.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn assign(&self, order_id: OrderId, now: Timestamp) -> AppResult<AllocationOutcome> {
        let mut order = self.orders.find(order_id).await?;
        match self.run_attempt(&mut order, order_id, now).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                if let Err(park_err) = self.park(&mut order).await {
                    warn!(error = %park_err, "could not park order after failed attempt");
                }
                Err(err)
            }
        }
    }

    async fn run_attempt(
        &self,
        order: &mut Order,
        order_id: OrderId,
        now: Timestamp,
    ) -> AppResult<AllocationOutcome> {
        if order.assignment_status().is_committed() {
            if let Some(agent_id) = order.assigned_agent() {
                debug!(agent = %agent_id, "order already assigned, re-entry is a no-op");
                return Ok(AllocationOutcome::Assigned {
                    agent_id: agent_id.clone(),
                });
            }
        }

        let settings = self.settings.load().await?;
        settings.validate()?;

        if !settings.auto_allocation_enabled {
            self.park(order).await?;
            info!("auto allocation disabled, order parked for manual assignment");
            return Ok(AllocationOutcome::ManualAssignmentRequired);
        }

        let restaurant = self.restaurants.find(order.restaurant_id()).await?;
        if !restaurant.is_open_at(now) {
            let reason = format!("restaurant {} not accepting orders", restaurant.id());
            self.park_and_notify(order, &reason).await?;
            return Ok(AllocationOutcome::NotAssigned { reason });
        }

        let method = settings.method;
        let Some(strategy) = strategy_for(method) else {
            let reason = format!("allocation method {method} has no implementation");
            self.park_and_notify(order, &reason).await?;
            return Ok(AllocationOutcome::Unsupported { method });
        };

        // Geo strategies narrow the pool at the store; one-by-one rotates
        // over the whole fleet.
        let candidates = match strategy.search_radius_km(&settings) {
            Some(radius_km) => {
                self.agents
                    .find_within_radius(restaurant.location(), radius_km * 1000.0)
                    .await?
            }
            None => self.agents.find_available().await?,
        };
        let ranked = {
            let ctx = SelectionContext {
                order,
                restaurant: &restaurant,
                candidates: &candidates,
                settings: &settings,
                now,
            };
            strategy.rank(&ctx)
        };
        debug!(strategy = strategy.name(), candidates = ranked.len(), "ranked candidates");

        if ranked.is_empty() {
            let reason = "no eligible agents".to_string();
            self.park_and_notify(order, &reason).await?;
            return Ok(AllocationOutcome::NotAssigned { reason });
        }

        let task_cap = strategy.task_cap(&settings);
        let needs_acceptance = method == AllocationMethod::OneByOne;
        let cod_amount = if order.payment_method().is_cash_on_delivery() {
            Some(match order.summary() {
                Some(summary) => summary.final_amount.clamp_floor_zero(),
                None => order.cart_total()?,
            })
        } else {
            None
        };

        let mut commit_attempts = 0u32;
        let mut conflicts = 0u32;
        for agent_id in &ranked {
            let agent = match self.agents.find(agent_id).await {
                Ok(agent) => agent,
                Err(RepositoryError::NotFound(_)) => continue,
                Err(err) => return Err(err.into()),
            };
            if !agent.can_take_order(task_cap) {
                debug!(agent = %agent_id, "candidate at capacity, skipping");
                continue;
            }
            if let Some(amount) = cod_amount {
                if !agent.can_carry_cod(amount) {
                    debug!(agent = %agent_id, "candidate over COD exposure, skipping");
                    continue;
                }
            }
            // Agents without the self-accept permission are committed by
            // dispatch directly, no offer round.
            let awaits_acceptance = needs_acceptance && agent.permissions().can_self_accept;

            if awaits_acceptance {
                order.begin_acceptance_wait()?;
                self.orders.update(order.clone()).await?;
                let expiry = Duration::from_secs(settings.one_by_one.request_expiry_secs);
                let reply =
                    timeout(expiry, self.responder.request_acceptance(agent_id, order_id)).await;
                match reply {
                    Ok(AcceptanceReply::Accepted) => {}
                    Ok(AcceptanceReply::Rejected { reason }) => {
                        debug!(agent = %agent_id, %reason, "offer declined");
                        order.record_rejection(agent_id.clone(), now, reason)?;
                        self.orders.update(order.clone()).await?;
                        continue;
                    }
                    Err(_elapsed) => {
                        debug!(agent = %agent_id, "offer expired");
                        order.record_rejection(agent_id.clone(), now, "offer expired")?;
                        self.orders.update(order.clone()).await?;
                        continue;
                    }
                }
            }

            // Reserve the agent first; the order commit follows only once
            // the CAS has succeeded.
            commit_attempts += 1;
            let expected_version = agent.version();
            let mut claimed = agent;
            if claimed.mark_assigned(order_id, now, cod_amount).is_err() {
                if awaits_acceptance {
                    order.record_rejection(agent_id.clone(), now, "agent no longer available")?;
                    self.orders.update(order.clone()).await?;
                }
                continue;
            }
            match self.agents.update(claimed, expected_version).await {
                Ok(()) => {}
                Err(err) if err.is_version_conflict() => {
                    conflicts += 1;
                    debug!(agent = %agent_id, "lost CAS race, trying next candidate");
                    if awaits_acceptance {
                        order.record_rejection(
                            agent_id.clone(),
                            now,
                            "agent no longer available",
                        )?;
                        self.orders.update(order.clone()).await?;
                    }
                    continue;
                }
                Err(err) => return Err(err.into()),
            }

            if awaits_acceptance {
                order.mark_accepted()?;
            }
            order.mark_assigned(agent_id.clone())?;
            if let Err(err) = self.orders.update(order.clone()).await {
                warn!(agent = %agent_id, error = %err, "order write failed, releasing reservation");
                self.release_reservation(agent_id, order_id, cod_amount).await;
                return Err(err.into());
            }

            info!(agent = %agent_id, strategy = strategy.name(), "order assigned");
            self.sink
                .publish(AssignmentEvent::DeliveryAssigned {
                    order_id,
                    agent_id: agent_id.clone(),
                })
                .await;
            return Ok(AllocationOutcome::Assigned {
                agent_id: agent_id.clone(),
            });
        }

        let reason = "no candidate accepted the order".to_string();
        self.park_and_notify(order, &reason).await?;
        if conflicts > 0 && conflicts == commit_attempts {
            return Err(ApplicationError::ConcurrencyExhausted {
                attempts: conflicts,
            });
        }
        Ok(AllocationOutcome::NotAssigned { reason })
    }

    /// Moves the order to `awaiting_agent_assignment` and persists it.
    async fn park(&self, order: &mut Order) -> AppResult<()> {
        order.mark_awaiting_assignment()?;
        self.orders.update(order.clone()).await?;
        Ok(())
    }

    async fn park_and_notify(&self, order: &mut Order, reason: &str) -> AppResult<()> {
        self.park(order).await?;
        self.sink
            .publish(AssignmentEvent::AssignmentFailed {
                order_id: order.id(),
                reason: reason.to_string(),
            })
            .await;
        Ok(())
    }

    /// Best-effort release of an agent reserved for an order that failed to
    /// persist. Retries the CAS a few times; a lost reservation is logged,
    /// not propagated.
    async fn release_reservation(
        &self,
        agent_id: &AgentId,
        order_id: OrderId,
        cod_amount: Option<Money>,
    ) {
        for _ in 0..3 {
            let Ok(agent) = self.agents.find(agent_id).await else {
                return;
            };
            let expected_version = agent.version();
            let mut released = agent;
            released.release_order(order_id, cod_amount);
            match self.agents.update(released, expected_version).await {
                Ok(()) => return,
                Err(err) if err.is_version_conflict() => continue,
                Err(err) => {
                    warn!(agent = %agent_id, error = %err, "reservation release failed");
                    return;
                }
            }
        }
        warn!(agent = %agent_id, "reservation release kept losing CAS races, giving up");
    }
}
