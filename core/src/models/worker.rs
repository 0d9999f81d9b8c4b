//! Worker model
//!
//! A worker is a single-capacity processing unit: it holds at most one
//! order at a time and processes it for a fixed number of ticks before
//! becoming idle again.
//!
//! The processing timer is a scheduled completion tick. The engine's
//! tick loop fires it (`is_due` / `complete_order`); a forced stop
//! clears it (`stop_processing`). Because the timer is plain state
//! examined only by the engine, cancellation and firing are mutually
//! exclusive for a given claim: once cleared, the completion path for
//! that claim can never run.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::order::{Order, OrderError, OrderId};

/// Fixed processing duration for every claim, in ticks
pub const PROCESSING_DURATION_TICKS: usize = 10;

/// Unique worker identifier, assigned by the engine in add order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct WorkerId(u64);

impl WorkerId {
    /// Wrap a raw id value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Worker status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerStatus {
    /// Available for assignment
    Idle,

    /// Holding an order, completion scheduled
    Processing,
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerStatus::Idle => write!(f, "IDLE"),
            WorkerStatus::Processing => write!(f, "PROCESSING"),
        }
    }
}

/// Errors that can occur during worker operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkerError {
    #[error("worker is already processing an order")]
    AlreadyProcessing,

    #[error("worker is not processing an order")]
    NotProcessing,

    #[error(transparent)]
    Order(#[from] OrderError),
}

/// A single-capacity processing unit in the fulfillment line
///
/// # Example
/// ```
/// use fulfillment_simulator_core::{
///     Order, OrderId, PriorityClass, Worker, WorkerId, PROCESSING_DURATION_TICKS,
/// };
///
/// let mut worker = Worker::new(WorkerId::new(1));
/// let mut order = Order::new(OrderId::new(1), PriorityClass::Normal, 0);
///
/// worker.start_processing(&mut order, 0).unwrap();
/// assert!(!worker.is_idle());
/// assert!(worker.is_due(PROCESSING_DURATION_TICKS));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    /// Unique worker identifier
    id: WorkerId,

    /// Current status
    status: WorkerStatus,

    /// Order currently held; Some iff Processing
    current_order: Option<OrderId>,

    /// Scheduled completion tick; Some iff Processing
    ///
    /// This is the cancellable timer handle: the engine fires it when
    /// the tick arrives and clears it on a forced stop.
    completes_at_tick: Option<usize>,
}

impl Worker {
    /// Create a new idle worker
    pub fn new(id: WorkerId) -> Self {
        Self {
            id,
            status: WorkerStatus::Idle,
            current_order: None,
            completes_at_tick: None,
        }
    }

    /// Get worker id
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Get current status
    pub fn status(&self) -> WorkerStatus {
        self.status
    }

    /// Get the id of the held order, if any
    pub fn current_order(&self) -> Option<OrderId> {
        self.current_order
    }

    /// Get the scheduled completion tick, if processing
    pub fn completes_at_tick(&self) -> Option<usize> {
        self.completes_at_tick
    }

    /// Check if the worker can accept new work
    pub fn is_idle(&self) -> bool {
        matches!(self.status, WorkerStatus::Idle)
    }

    /// Check if the scheduled completion has arrived
    pub fn is_due(&self, tick: usize) -> bool {
        matches!(self.completes_at_tick, Some(due) if due <= tick)
    }

    /// Claim a pending order and schedule its completion
    ///
    /// Transitions the worker to Processing, moves the order to
    /// Processing, and schedules completion at
    /// `now + PROCESSING_DURATION_TICKS`.
    ///
    /// # Arguments
    /// * `order` - Pending order the engine selected for this worker
    /// * `now` - Current tick
    ///
    /// # Returns
    /// - Ok(()) on success
    /// - Err(WorkerError::AlreadyProcessing) if the worker is not idle
    /// - Err(WorkerError::Order(_)) if the order is not pending
    pub fn start_processing(&mut self, order: &mut Order, now: usize) -> Result<(), WorkerError> {
        if !self.is_idle() {
            return Err(WorkerError::AlreadyProcessing);
        }
        order.start_processing(now)?;

        self.status = WorkerStatus::Processing;
        self.current_order = Some(order.id());
        self.completes_at_tick = Some(now + PROCESSING_DURATION_TICKS);
        Ok(())
    }

    /// Fire the scheduled completion for the held order
    ///
    /// Marks the order Complete tagged with this worker's id, then
    /// releases it and returns to Idle. The engine calls this from its
    /// tick loop once `is_due` reports true.
    ///
    /// # Returns
    /// - Ok(order id) of the completed order
    /// - Err(WorkerError::NotProcessing) if the worker holds no order
    pub fn complete_order(&mut self, order: &mut Order, now: usize) -> Result<OrderId, WorkerError> {
        if self.current_order.is_none() {
            return Err(WorkerError::NotProcessing);
        }
        debug_assert_eq!(self.current_order, Some(order.id()));

        order.complete(self.id, now)?;
        self.release();
        Ok(order.id())
    }

    /// Cancel the scheduled completion and release the held order
    ///
    /// The order is reset to Pending (losing all progress) and returned
    /// to the caller for re-queueing. After this call the completion for
    /// the cancelled claim can never fire.
    ///
    /// # Returns
    /// - Ok(order id) of the reset order
    /// - Err(WorkerError::NotProcessing) if the worker holds no order
    pub fn stop_processing(&mut self, order: &mut Order) -> Result<OrderId, WorkerError> {
        if self.current_order.is_none() {
            return Err(WorkerError::NotProcessing);
        }
        debug_assert_eq!(self.current_order, Some(order.id()));

        order.reset_to_pending()?;
        self.release();
        Ok(order.id())
    }

    /// Return to Idle, clearing the held order and the timer
    fn release(&mut self) {
        self.status = WorkerStatus::Idle;
        self.current_order = None;
        self.completes_at_tick = None;
    }
}
