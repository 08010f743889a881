//! # Application Services
//!
//! The use cases: pricing ([`pricing::PricingEngine`]) and agent allocation
//! ([`allocation::AllocationEngine`] over the strategies in
//! [`allocation_strategy`]).

pub mod allocation;
pub mod allocation_strategy;
pub mod pricing;

pub use allocation::{
    AcceptanceReply, AgentResponder, AllocationEngine, AllocationOutcome, AutoAcceptResponder,
};
pub use allocation_strategy::{
    AllocationStrategy, NearestAvailableStrategy, OneByOneStrategy, RoundRobinStrategy,
    SelectionContext,
};
pub use pricing::{DeliveryFeePolicy, PricingEngine, RevenueShareRule};
