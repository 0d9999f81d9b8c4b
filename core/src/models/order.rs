//! Order model
//!
//! Represents a single work item moving through the fulfillment line.
//! Each order has:
//! - A unique, monotonically assigned id (never reused)
//! - A priority class (Normal or Vip) fixed at submission
//! - A status lifecycle (Pending, Processing, Complete)
//! - The tick it was created at
//!
//! Status transitions are driven by the worker holding the order; the
//! engine never mutates order status directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::worker::WorkerId;

/// Unique order identifier, assigned by the engine in submission order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct OrderId(u64);

impl OrderId {
    /// Wrap a raw id value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Priority class of an order
///
/// Determines dispatch precedence among pending orders: every pending
/// Vip order is dispatched before any pending Normal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityClass {
    /// Regular order, dispatched in submission order after all Vip work
    Normal,

    /// Priority order, dispatched ahead of all pending Normal work
    Vip,
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityClass::Normal => write!(f, "NORMAL"),
            PriorityClass::Vip => write!(f, "VIP"),
        }
    }
}

/// Order status
///
/// Tracks the lifecycle of an order through the line. Variants carry
/// their own timestamps, so an order can only hold a processing-start
/// tick while Processing or Complete, and completion data only while
/// Complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order waiting to be assigned to a worker
    Pending,

    /// Order claimed by a worker
    Processing {
        /// Tick when the holding worker claimed the order
        started_tick: usize,
    },

    /// Order fully processed; immutable from here on
    Complete {
        /// Tick when the completing claim started
        started_tick: usize,
        /// Tick when processing finished
        completed_tick: usize,
        /// Worker whose timer fired for this order
        completed_by: WorkerId,
    },
}

/// Errors that can occur during order transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("order is not pending")]
    NotPending,

    #[error("order is not processing")]
    NotProcessing,
}

/// Represents a work item in the fulfillment line
///
/// # Example
/// ```
/// use fulfillment_simulator_core::{Order, OrderId, PriorityClass};
///
/// let order = Order::new(OrderId::new(1), PriorityClass::Vip, 0);
/// assert!(order.is_pending());
/// assert_eq!(order.created_at_tick(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier
    id: OrderId,

    /// Priority class, fixed at submission
    priority_class: PriorityClass,

    /// Current status (carries processing/completion ticks)
    status: OrderStatus,

    /// Tick when the order entered the system
    created_at_tick: usize,
}

impl Order {
    /// Create a new pending order
    ///
    /// # Arguments
    /// * `id` - Engine-assigned unique id
    /// * `priority_class` - Normal or Vip
    /// * `tick` - Current tick, recorded as creation time
    pub fn new(id: OrderId, priority_class: PriorityClass, tick: usize) -> Self {
        Self {
            id,
            priority_class,
            status: OrderStatus::Pending,
            created_at_tick: tick,
        }
    }

    /// Get order id
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Get priority class
    pub fn priority_class(&self) -> PriorityClass {
        self.priority_class
    }

    /// Get current status
    pub fn status(&self) -> &OrderStatus {
        &self.status
    }

    /// Get tick when the order entered the system
    pub fn created_at_tick(&self) -> usize {
        self.created_at_tick
    }

    /// Tick when the current (or completing) claim started, if any
    pub fn processing_started_tick(&self) -> Option<usize> {
        match self.status {
            OrderStatus::Pending => None,
            OrderStatus::Processing { started_tick }
            | OrderStatus::Complete { started_tick, .. } => Some(started_tick),
        }
    }

    /// Tick when processing finished, if complete
    pub fn completed_tick(&self) -> Option<usize> {
        match self.status {
            OrderStatus::Complete { completed_tick, .. } => Some(completed_tick),
            _ => None,
        }
    }

    /// Worker that finished the order, if complete
    pub fn completed_by(&self) -> Option<WorkerId> {
        match self.status {
            OrderStatus::Complete { completed_by, .. } => Some(completed_by),
            _ => None,
        }
    }

    /// Check if the order is waiting for a worker
    pub fn is_pending(&self) -> bool {
        matches!(self.status, OrderStatus::Pending)
    }

    /// Check if the order is held by a worker
    pub fn is_processing(&self) -> bool {
        matches!(self.status, OrderStatus::Processing { .. })
    }

    /// Check if the order is fully processed
    pub fn is_complete(&self) -> bool {
        matches!(self.status, OrderStatus::Complete { .. })
    }

    /// Transition Pending -> Processing
    ///
    /// Called by the worker that has exclusively claimed this order.
    ///
    /// # Arguments
    /// * `tick` - Current tick, recorded as processing start
    ///
    /// # Returns
    /// - Ok(()) if the order was pending
    /// - Err(OrderError::NotPending) otherwise
    pub fn start_processing(&mut self, tick: usize) -> Result<(), OrderError> {
        if !self.is_pending() {
            return Err(OrderError::NotPending);
        }
        self.status = OrderStatus::Processing { started_tick: tick };
        Ok(())
    }

    /// Transition Processing -> Complete
    ///
    /// Records the completing worker and the completion tick; the start
    /// tick of the claim is carried forward into the completed status.
    ///
    /// # Arguments
    /// * `worker_id` - Worker whose timer fired
    /// * `tick` - Current tick, recorded as completion time
    ///
    /// # Returns
    /// - Ok(()) if the order was processing
    /// - Err(OrderError::NotProcessing) otherwise
    pub fn complete(&mut self, worker_id: WorkerId, tick: usize) -> Result<(), OrderError> {
        match self.status {
            OrderStatus::Processing { started_tick } => {
                self.status = OrderStatus::Complete {
                    started_tick,
                    completed_tick: tick,
                    completed_by: worker_id,
                };
                Ok(())
            }
            _ => Err(OrderError::NotProcessing),
        }
    }

    /// Transition Processing -> Pending, discarding progress
    ///
    /// Used when the holding worker is forcibly stopped. The order keeps
    /// its id and creation tick; processing restarts from zero if it is
    /// later reassigned.
    ///
    /// # Returns
    /// - Ok(()) if the order was processing
    /// - Err(OrderError::NotProcessing) otherwise
    pub fn reset_to_pending(&mut self) -> Result<(), OrderError> {
        if !self.is_processing() {
            return Err(OrderError::NotProcessing);
        }
        self.status = OrderStatus::Pending;
        Ok(())
    }
}
