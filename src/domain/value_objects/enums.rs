//! # Domain Enums
//!
//! Lifecycle and classification enums shared across the crate.
//!
//! - [`AgentStatus`]: delivery agent availability
//! - [`AssignmentStatus`]: per-order agent-assignment state machine
//! - [`OrderStatus`]: coarse order lifecycle
//! - [`PaymentMethod`]: how the customer pays
//! - [`AllocationMethod`]: configured allocation strategy selector

use serde::{Deserialize, Serialize};
use std::fmt;

/// Availability status of a delivery agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    /// Not logged in; never eligible.
    Offline,
    /// Logged in and free to take work.
    Available,
    /// Currently carrying at least one active order.
    OrderAssigned,
    /// Temporarily blocked by operations.
    Suspended,
}

impl AgentStatus {
    /// Returns true if the agent can be offered new work in this status.
    ///
    /// `OrderAssigned` agents stay reachable for strategies that allow
    /// stacking up to a task cap; capacity is checked separately.
    #[must_use]
    pub fn is_workable(&self) -> bool {
        matches!(self, Self::Available | Self::OrderAssigned)
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Offline => "OFFLINE",
            Self::Available => "AVAILABLE",
            Self::OrderAssigned => "ORDER_ASSIGNED",
            Self::Suspended => "SUSPENDED",
        };
        write!(f, "{s}")
    }
}

/// Agent-assignment sub-status of an order.
///
/// State machine:
///
/// ```text
/// NotAssigned -> AssignedWaitingAcceptance -> {Accepted | Rejected}
///             -> Assigned                     Accepted -> Assigned
///                                             Rejected -> (retry) | Reassigned
/// any non-terminal -> AwaitingAgentAssignment (allocation failed, retryable)
/// Assigned -> Reassigned -> (retry)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// No allocation attempt has claimed the order yet.
    NotAssigned,
    /// Offered to an agent; waiting on accept/decline.
    AssignedWaitingAcceptance,
    /// Agent accepted the offer; final bookkeeping pending.
    Accepted,
    /// Agent declined (or the offer expired).
    Rejected,
    /// An agent is committed to the order.
    Assigned,
    /// A previously assigned order handed to a different agent.
    Reassigned,
    /// Allocation failed; the order waits for a retry or manual action.
    AwaitingAgentAssignment,
}

impl AssignmentStatus {
    /// Returns true if the state machine permits moving to `next`.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        use AssignmentStatus::{
            Accepted, Assigned, AssignedWaitingAcceptance, AwaitingAgentAssignment, NotAssigned,
            Reassigned, Rejected,
        };
        match (self, next) {
            // Retryable states can always fall back to awaiting-assignment.
            (
                NotAssigned | AssignedWaitingAcceptance | Rejected | Reassigned
                | AwaitingAgentAssignment,
                AwaitingAgentAssignment,
            ) => true,
            (NotAssigned, AssignedWaitingAcceptance | Assigned) => true,
            (AssignedWaitingAcceptance, Accepted | Rejected) => true,
            (Accepted, Assigned) => true,
            (Rejected, AssignedWaitingAcceptance | Assigned | Reassigned) => true,
            (AwaitingAgentAssignment, AssignedWaitingAcceptance | Assigned) => true,
            (Assigned, Reassigned) => true,
            (Reassigned, AssignedWaitingAcceptance | Assigned) => true,
            _ => false,
        }
    }

    /// Returns true if an agent is committed in this state.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Assigned | Self::Accepted)
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotAssigned => "not_assigned",
            Self::AssignedWaitingAcceptance => "assigned_waiting_acceptance",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Assigned => "assigned",
            Self::Reassigned => "reassigned",
            Self::AwaitingAgentAssignment => "awaiting_agent_assignment",
        };
        write!(f, "{s}")
    }
}

/// Coarse order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Priced and persisted, awaiting restaurant confirmation.
    Placed,
    /// Restaurant accepted the order.
    Confirmed,
    /// Food being prepared.
    Preparing,
    /// Ready for agent pickup.
    ReadyForPickup,
    /// Agent en route to the customer.
    OutForDelivery,
    /// Delivered; terminal.
    Delivered,
    /// Cancelled; terminal.
    Cancelled,
}

impl OrderStatus {
    /// Returns true if no further mutation is allowed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Placed => "placed",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::ReadyForPickup => "ready_for_pickup",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// How the customer pays for the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery; counts toward the agent's COD exposure.
    Cash,
    /// Prepaid card.
    Card,
    /// Prepaid wallet.
    Wallet,
}

impl PaymentMethod {
    /// Returns true for cash-on-delivery orders.
    #[must_use]
    pub fn is_cash_on_delivery(&self) -> bool {
        matches!(self, Self::Cash)
    }
}

/// Allocation strategy selector carried by the settings record.
///
/// Exactly one method is active at a time. Methods without an implementation
/// yield a structured unsupported outcome from the engine, never a silent
/// no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMethod {
    /// Offer to one agent at a time, oldest-assignment-first.
    OneByOne,
    /// Broadcast to every eligible agent (unimplemented).
    SendToAll,
    /// Batched offers (unimplemented).
    BatchWise,
    /// Geo-filtered fairness rotation with a task cap.
    RoundRobin,
    /// Closest eligible agent wins.
    NearestAvailable,
    /// First-in-first-out queue (unimplemented).
    Fifo,
    /// Pooled multi-order clubbing (unimplemented).
    Pooling,
}

impl AllocationMethod {
    /// Returns true if the engine has a strategy for this method.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            Self::OneByOne | Self::RoundRobin | Self::NearestAvailable
        )
    }
}

impl fmt::Display for AllocationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OneByOne => "one_by_one",
            Self::SendToAll => "send_to_all",
            Self::BatchWise => "batch_wise",
            Self::RoundRobin => "round_robin",
            Self::NearestAvailable => "nearest_available",
            Self::Fifo => "fifo",
            Self::Pooling => "pooling",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod agent_status {
        use super::*;

        #[test]
        fn workable_states() {
            assert!(AgentStatus::Available.is_workable());
            assert!(AgentStatus::OrderAssigned.is_workable());
            assert!(!AgentStatus::Offline.is_workable());
            assert!(!AgentStatus::Suspended.is_workable());
        }

        #[test]
        fn serde_uses_screaming_snake_case() {
            let json = serde_json::to_string(&AgentStatus::OrderAssigned).unwrap();
            assert_eq!(json, "\"ORDER_ASSIGNED\"");
        }
    }

    mod assignment_status {
        use super::*;

        #[test]
        fn happy_path_transitions() {
            use AssignmentStatus::*;
            assert!(NotAssigned.can_transition_to(AssignedWaitingAcceptance));
            assert!(AssignedWaitingAcceptance.can_transition_to(Accepted));
            assert!(Accepted.can_transition_to(Assigned));
        }

        #[test]
        fn direct_assignment_allowed() {
            use AssignmentStatus::*;
            assert!(NotAssigned.can_transition_to(Assigned));
        }

        #[test]
        fn rejection_loops_back() {
            use AssignmentStatus::*;
            assert!(AssignedWaitingAcceptance.can_transition_to(Rejected));
            assert!(Rejected.can_transition_to(AssignedWaitingAcceptance));
            assert!(Rejected.can_transition_to(Assigned));
        }

        #[test]
        fn failure_falls_back_to_awaiting() {
            use AssignmentStatus::*;
            assert!(NotAssigned.can_transition_to(AwaitingAgentAssignment));
            assert!(AssignedWaitingAcceptance.can_transition_to(AwaitingAgentAssignment));
            assert!(AwaitingAgentAssignment.can_transition_to(Assigned));
        }

        #[test]
        fn forbidden_transitions() {
            use AssignmentStatus::*;
            assert!(!Assigned.can_transition_to(NotAssigned));
            assert!(!Accepted.can_transition_to(Rejected));
            assert!(!NotAssigned.can_transition_to(Accepted));
            // A committed order cannot silently fall back to awaiting.
            assert!(!Assigned.can_transition_to(AwaitingAgentAssignment));
        }

        #[test]
        fn committed_states() {
            assert!(AssignmentStatus::Assigned.is_committed());
            assert!(AssignmentStatus::Accepted.is_committed());
            assert!(!AssignmentStatus::NotAssigned.is_committed());
        }

        #[test]
        fn display_matches_wire_names() {
            assert_eq!(
                AssignmentStatus::AwaitingAgentAssignment.to_string(),
                "awaiting_agent_assignment"
            );
        }
    }

    mod order_status {
        use super::*;

        #[test]
        fn terminal_states() {
            assert!(OrderStatus::Delivered.is_terminal());
            assert!(OrderStatus::Cancelled.is_terminal());
            assert!(!OrderStatus::Placed.is_terminal());
        }
    }

    mod allocation_method {
        use super::*;

        #[test]
        fn supported_methods() {
            assert!(AllocationMethod::OneByOne.is_supported());
            assert!(AllocationMethod::RoundRobin.is_supported());
            assert!(AllocationMethod::NearestAvailable.is_supported());
            assert!(!AllocationMethod::SendToAll.is_supported());
            assert!(!AllocationMethod::BatchWise.is_supported());
            assert!(!AllocationMethod::Fifo.is_supported());
            assert!(!AllocationMethod::Pooling.is_supported());
        }

        #[test]
        fn serde_snake_case() {
            let json = serde_json::to_string(&AllocationMethod::NearestAvailable).unwrap();
            assert_eq!(json, "\"nearest_available\"");
            let back: AllocationMethod = serde_json::from_str("\"round_robin\"").unwrap();
            assert_eq!(back, AllocationMethod::RoundRobin);
        }
    }

    mod payment_method {
        use super::*;

        #[test]
        fn cod_detection() {
            assert!(PaymentMethod::Cash.is_cash_on_delivery());
            assert!(!PaymentMethod::Card.is_cash_on_delivery());
        }
    }
}
