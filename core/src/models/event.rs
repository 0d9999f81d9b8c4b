//! Event logging for simulation replay and auditing.
//!
//! Captures every significant state change in the line as a structured
//! event. The log enables:
//! - Deterministic replay (same call sequence, same log)
//! - Debugging (what happened and when)
//! - Analysis (queue behavior, worker utilization)
//!
//! All events include a tick number for temporal ordering; events are
//! logged in the order they occur within a tick.

use crate::models::order::{OrderId, PriorityClass};
use crate::models::worker::WorkerId;

/// Simulation event capturing a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// New order entered the system
    OrderSubmitted {
        tick: usize,
        order_id: OrderId,
        priority_class: PriorityClass,
    },

    /// Pending order claimed by an idle worker
    OrderAssigned {
        tick: usize,
        order_id: OrderId,
        worker_id: WorkerId,
    },

    /// Worker's processing timer fired; order complete
    OrderCompleted {
        tick: usize,
        order_id: OrderId,
        worker_id: WorkerId,
    },

    /// Worker was forcibly stopped; order back to pending
    OrderRequeued {
        tick: usize,
        order_id: OrderId,
        worker_id: WorkerId,
    },

    /// Capacity added to the line
    WorkerAdded { tick: usize, worker_id: WorkerId },

    /// Capacity removed from the line (most recently added worker)
    WorkerRemoved {
        tick: usize,
        worker_id: WorkerId,
        /// Order the worker was holding when removed, if any
        interrupted_order: Option<OrderId>,
    },
}

impl Event {
    /// Get the tick this event occurred at
    pub fn tick(&self) -> usize {
        match self {
            Event::OrderSubmitted { tick, .. }
            | Event::OrderAssigned { tick, .. }
            | Event::OrderCompleted { tick, .. }
            | Event::OrderRequeued { tick, .. }
            | Event::WorkerAdded { tick, .. }
            | Event::WorkerRemoved { tick, .. } => *tick,
        }
    }

    /// Get the event type as a string (for filtering)
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::OrderSubmitted { .. } => "OrderSubmitted",
            Event::OrderAssigned { .. } => "OrderAssigned",
            Event::OrderCompleted { .. } => "OrderCompleted",
            Event::OrderRequeued { .. } => "OrderRequeued",
            Event::WorkerAdded { .. } => "WorkerAdded",
            Event::WorkerRemoved { .. } => "WorkerRemoved",
        }
    }

    /// Get the order id this event refers to, if any
    pub fn order_id(&self) -> Option<OrderId> {
        match self {
            Event::OrderSubmitted { order_id, .. }
            | Event::OrderAssigned { order_id, .. }
            | Event::OrderCompleted { order_id, .. }
            | Event::OrderRequeued { order_id, .. } => Some(*order_id),
            Event::WorkerRemoved {
                interrupted_order, ..
            } => *interrupted_order,
            Event::WorkerAdded { .. } => None,
        }
    }

    /// Get the worker id this event refers to, if any
    pub fn worker_id(&self) -> Option<WorkerId> {
        match self {
            Event::OrderAssigned { worker_id, .. }
            | Event::OrderCompleted { worker_id, .. }
            | Event::OrderRequeued { worker_id, .. }
            | Event::WorkerAdded { worker_id, .. }
            | Event::WorkerRemoved { worker_id, .. } => Some(*worker_id),
            Event::OrderSubmitted { .. } => None,
        }
    }
}

/// Append-only log of simulation events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific tick
    pub fn events_at_tick(&self, tick: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific order
    pub fn events_for_order(&self, order_id: OrderId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.order_id() == Some(order_id))
            .collect()
    }

    /// Get events for a specific worker
    pub fn events_for_worker(&self, worker_id: WorkerId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.worker_id() == Some(worker_id))
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
