//! # Allocation Strategies
//!
//! Candidate ranking behind the allocation engine. A strategy looks at the
//! order, the restaurant, and a snapshot of workable agents and returns an
//! ordered list of agent ids to try; the engine owns acceptance waits,
//! commits, and rollback.

use crate::application::settings::AllocationSettings;
use crate::domain::entities::{Agent, Order, Restaurant};
use crate::domain::services::GeoMatcher;
use crate::domain::value_objects::{AgentId, AllocationMethod, Timestamp};
use std::fmt;
use std::sync::Arc;

/// Everything a strategy may consult when ranking candidates.
#[derive(Debug)]
pub struct SelectionContext<'a> {
    /// The order being allocated.
    pub order: &'a Order,
    /// Pickup restaurant, the origin for radius filters.
    pub restaurant: &'a Restaurant,
    /// Snapshot of workable agents.
    pub candidates: &'a [Agent],
    /// Current allocation settings.
    pub settings: &'a AllocationSettings,
    /// Allocation instant, injected by the caller.
    pub now: Timestamp,
}

/// A candidate-ranking strategy.
pub trait AllocationStrategy: Send + Sync + fmt::Debug {
    /// Strategy name for logs and outcomes.
    fn name(&self) -> &'static str;

    /// Per-agent concurrent task cap under this strategy.
    fn task_cap(&self, settings: &AllocationSettings) -> u32;

    /// Radius for the repository's candidate pre-filter, kilometers; `None`
    /// means the strategy considers the whole workable pool.
    fn search_radius_km(&self, settings: &AllocationSettings) -> Option<f64>;

    /// Returns candidate agent ids in the order the engine should try them.
    fn rank(&self, ctx: &SelectionContext<'_>) -> Vec<AgentId>;
}

/// Returns the strategy for a method, or `None` when the method has no
/// implementation.
#[must_use]
pub fn strategy_for(method: AllocationMethod) -> Option<Arc<dyn AllocationStrategy>> {
    match method {
        AllocationMethod::NearestAvailable => Some(Arc::new(NearestAvailableStrategy)),
        AllocationMethod::OneByOne => Some(Arc::new(OneByOneStrategy)),
        AllocationMethod::RoundRobin => Some(Arc::new(RoundRobinStrategy)),
        AllocationMethod::SendToAll
        | AllocationMethod::BatchWise
        | AllocationMethod::Fifo
        | AllocationMethod::Pooling => None,
    }
}

/// Closest eligible agent first, within a radius of the restaurant.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestAvailableStrategy;

impl AllocationStrategy for NearestAvailableStrategy {
    fn name(&self) -> &'static str {
        "nearest_available"
    }

    fn task_cap(&self, settings: &AllocationSettings) -> u32 {
        settings.max_tasks_allowed
    }

    fn search_radius_km(&self, settings: &AllocationSettings) -> Option<f64> {
        Some(settings.nearest_available.maximum_radius_km)
    }

    fn rank(&self, ctx: &SelectionContext<'_>) -> Vec<AgentId> {
        let tuning = &ctx.settings.nearest_available;
        let capable: Vec<&Agent> = ctx
            .candidates
            .iter()
            .filter(|a| a.can_take_order(self.task_cap(ctx.settings)))
            .collect();
        let mut nearest = GeoMatcher::nearest_within_radius(
            ctx.restaurant.location(),
            &capable,
            |a| a.position(),
            tuning.maximum_radius_km * 1000.0,
            tuning.max_candidates,
        );
        if tuning.prefer_higher_rating {
            // Rating leads; distance only resolves equal ratings.
            nearest.sort_by(|a, b| {
                b.0.rating()
                    .total_cmp(&a.0.rating())
                    .then_with(|| a.1.total_cmp(&b.1))
            });
        }
        nearest.into_iter().map(|(a, _)| a.id().clone()).collect()
    }
}

/// Offer to one agent at a time; fairness by least-recently-assigned.
///
/// No geo filter: this method mirrors dispatcher-style rotation across the
/// whole fleet, bounded by `number_of_retries`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneByOneStrategy;

impl AllocationStrategy for OneByOneStrategy {
    fn name(&self) -> &'static str {
        "one_by_one"
    }

    fn task_cap(&self, settings: &AllocationSettings) -> u32 {
        settings.max_tasks_allowed
    }

    fn search_radius_km(&self, _settings: &AllocationSettings) -> Option<f64> {
        None
    }

    fn rank(&self, ctx: &SelectionContext<'_>) -> Vec<AgentId> {
        let mut capable: Vec<&Agent> = ctx
            .candidates
            .iter()
            .filter(|a| a.can_take_order(self.task_cap(ctx.settings)))
            .collect();
        // Agents never assigned sort first.
        capable.sort_by_key(|a| a.last_assigned_at());
        capable.truncate(ctx.settings.one_by_one.number_of_retries as usize);
        capable.into_iter().map(|a| a.id().clone()).collect()
    }
}

/// Geo-filtered fairness rotation: least-recently-assigned first (rating
/// first when configured). Capacity is a filter, never a sort key.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinStrategy;

impl AllocationStrategy for RoundRobinStrategy {
    fn name(&self) -> &'static str {
        "round_robin"
    }

    fn task_cap(&self, settings: &AllocationSettings) -> u32 {
        settings.round_robin.max_tasks_allowed
    }

    fn search_radius_km(&self, settings: &AllocationSettings) -> Option<f64> {
        Some(settings.round_robin.radius_km)
    }

    fn rank(&self, ctx: &SelectionContext<'_>) -> Vec<AgentId> {
        let tuning = &ctx.settings.round_robin;
        let capable: Vec<&Agent> = ctx
            .candidates
            .iter()
            .filter(|a| a.can_take_order(self.task_cap(ctx.settings)))
            .collect();
        let in_radius = GeoMatcher::nearest_within_radius(
            ctx.restaurant.location(),
            &capable,
            |a| a.position(),
            tuning.radius_km * 1000.0,
            usize::MAX,
        );
        let mut agents: Vec<&Agent> = in_radius.into_iter().map(|(a, _)| *a).collect();
        if tuning.prefer_higher_rating {
            agents.sort_by(|a, b| {
                b.rating()
                    .total_cmp(&a.rating())
                    .then_with(|| a.last_assigned_at().cmp(&b.last_assigned_at()))
            });
        } else {
            // Never-assigned agents sort first.
            agents.sort_by_key(|a| a.last_assigned_at());
        }
        agents.into_iter().map(|a| a.id().clone()).collect()
    }
}
