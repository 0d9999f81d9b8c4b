//! Scheduling Engine
//!
//! Main controller for the fulfillment line, integrating all components:
//! - Order intake (priority-preserving queueing)
//! - Assignment (pairing idle workers with pending work)
//! - The tick loop (firing scheduled completions)
//! - Capacity changes (adding/removing workers with reconciliation)
//! - Event logging (complete simulation history)
//!
//! # Architecture
//!
//! The engine owns an identity-addressed map of orders and the worker
//! sequence. Dispatch order is computed from the map, not stored: among
//! pending orders, every Vip precedes every Normal, and within a class
//! submission order is preserved. An order that is forcibly reset keeps
//! its id, so it resumes at its original relative position.
//!
//! Each mutating entry point (submit, add, remove, and every completion
//! fired by `tick`) creates at most one new pairing opportunity and is
//! followed by exactly one assignment pass. Cascading completions
//! trigger their own follow-up passes; no pass ever loops.
//!
//! # Determinism
//!
//! All state changes happen in the caller's thread; the only "timer" is
//! the completion tick each processing worker carries. A fixed sequence
//! of calls therefore produces identical state, query output, and event
//! log on every run.
//!
//! # Example
//!
//! ```rust
//! use fulfillment_simulator_core::{PriorityClass, SchedulingEngine};
//!
//! let mut engine = SchedulingEngine::new();
//! engine.add_worker();
//!
//! let order = engine.submit_order(PriorityClass::Vip);
//! assert!(order.is_processing()); // claimed immediately
//!
//! // advance past the fixed processing duration
//! for _ in 0..10 {
//!     engine.tick();
//! }
//! assert_eq!(engine.stats().completed_orders, 1);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::time::TimeManager;
use crate::models::event::{Event, EventLog};
use crate::models::order::{Order, OrderId, PriorityClass};
use crate::models::worker::{Worker, WorkerId, WorkerStatus};

/// Read-only view of a worker for external callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    pub id: WorkerId,
    pub status: WorkerStatus,
    pub current_order_id: Option<OrderId>,
}

impl From<&Worker> for WorkerSnapshot {
    fn from(worker: &Worker) -> Self {
        WorkerSnapshot {
            id: worker.id(),
            status: worker.status(),
            current_order_id: worker.current_order(),
        }
    }
}

/// Aggregate counts over the current state
///
/// `total_orders` is always the exact sum of the three order sub-counts,
/// and `total_workers` of the two worker sub-counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub processing_orders: usize,
    pub completed_orders: usize,
    pub total_workers: usize,
    pub idle_workers: usize,
    pub processing_workers: usize,
}

/// Result of a single tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    /// Tick number after advancement
    pub tick: usize,

    /// Orders whose processing finished this tick, in completion order
    pub completed_orders: Vec<OrderId>,

    /// Number of new pairings made by completion-triggered passes
    pub num_assignments: usize,
}

/// Main controller owning the order queue and the worker pool
pub struct SchedulingEngine {
    /// All orders, indexed by id; ids are monotonic, so map order is
    /// submission order
    orders: BTreeMap<OrderId, Order>,

    /// Workers in add order; removal pops from the back (LIFO)
    workers: Vec<Worker>,

    /// Counter for generating unique order ids (never reused)
    next_order_id: u64,

    /// Counter for generating unique worker ids (never reused)
    next_worker_id: u64,

    /// Simulation clock
    clock: TimeManager,

    /// Event log (all simulation events)
    event_log: EventLog,
}

impl SchedulingEngine {
    /// Create an empty engine at tick 0 with no orders or workers
    pub fn new() -> Self {
        Self {
            orders: BTreeMap::new(),
            workers: Vec::new(),
            next_order_id: 1,
            next_worker_id: 1,
            clock: TimeManager::new(),
            event_log: EventLog::new(),
        }
    }

    // ========================================================================
    // Mutating operations
    // ========================================================================

    /// Submit a new order
    ///
    /// Allocates the next order id, queues the order as pending, and
    /// runs one assignment pass. Always succeeds.
    ///
    /// # Returns
    ///
    /// A snapshot of the created order, taken after the assignment pass
    /// (so it shows Processing if a worker claimed it immediately).
    pub fn submit_order(&mut self, priority_class: PriorityClass) -> Order {
        let id = OrderId::new(self.next_order_id);
        self.next_order_id += 1;

        let now = self.clock.now();
        self.orders.insert(id, Order::new(id, priority_class, now));
        self.event_log.log(Event::OrderSubmitted {
            tick: now,
            order_id: id,
            priority_class,
        });

        self.try_assign();

        self.orders
            .get(&id)
            .expect("just-submitted order missing from order map")
            .clone()
    }

    /// Add a worker to the line
    ///
    /// Allocates the next worker id, appends an idle worker, and runs
    /// one assignment pass. Always succeeds.
    ///
    /// # Returns
    ///
    /// A snapshot of the created worker, taken after the assignment
    /// pass (so it shows Processing if it claimed pending work).
    pub fn add_worker(&mut self) -> WorkerSnapshot {
        let id = WorkerId::new(self.next_worker_id);
        self.next_worker_id += 1;

        let now = self.clock.now();
        self.workers.push(Worker::new(id));
        let index = self.workers.len() - 1;
        self.event_log.log(Event::WorkerAdded {
            tick: now,
            worker_id: id,
        });

        self.try_assign();

        WorkerSnapshot::from(&self.workers[index])
    }

    /// Remove the most recently added worker (LIFO)
    ///
    /// If the worker is mid-claim, its completion timer is cancelled
    /// and the held order returns to pending at its original relative
    /// position; one assignment pass then lets the freed order rebind
    /// to any idle worker immediately.
    ///
    /// # Returns
    ///
    /// - `Some(snapshot)` of the removed worker (idle, holding nothing)
    /// - `None` when no workers exist (expected condition, not an error)
    pub fn remove_worker(&mut self) -> Option<WorkerSnapshot> {
        let mut worker = self.workers.pop()?;
        let now = self.clock.now();

        let mut interrupted = None;
        if let Some(order_id) = worker.current_order() {
            let order = self
                .orders
                .get_mut(&order_id)
                .expect("held order missing from order map");
            worker
                .stop_processing(order)
                .expect("holding worker failed to release its claim");
            self.event_log.log(Event::OrderRequeued {
                tick: now,
                order_id,
                worker_id: worker.id(),
            });
            interrupted = Some(order_id);
        }

        self.event_log.log(Event::WorkerRemoved {
            tick: now,
            worker_id: worker.id(),
            interrupted_order: interrupted,
        });

        self.try_assign();

        Some(WorkerSnapshot::from(&worker))
    }

    /// Advance time by one tick and fire every completion due at it
    ///
    /// Workers are examined in add order. Each firing marks the held
    /// order complete, returns the worker to idle, and runs one
    /// assignment pass — so a worker freed by one completion can claim
    /// the next pending order within the same tick.
    pub fn tick(&mut self) -> TickResult {
        let now = self.clock.advance();
        let mut completed_orders = Vec::new();
        let mut num_assignments = 0;

        for index in 0..self.workers.len() {
            if !self.workers[index].is_due(now) {
                continue;
            }

            let order_id = self.workers[index]
                .current_order()
                .expect("due worker holds no order");
            let order = self
                .orders
                .get_mut(&order_id)
                .expect("held order missing from order map");
            self.workers[index]
                .complete_order(order, now)
                .expect("due worker failed to complete its order");

            let worker_id = self.workers[index].id();
            self.event_log.log(Event::OrderCompleted {
                tick: now,
                order_id,
                worker_id,
            });
            completed_orders.push(order_id);

            if self.try_assign().is_some() {
                num_assignments += 1;
            }
        }

        TickResult {
            tick: now,
            completed_orders,
            num_assignments,
        }
    }

    /// One assignment pass: pair the first idle worker (add order) with
    /// the first pending order (dispatch order). At most one pairing.
    fn try_assign(&mut self) -> Option<(WorkerId, OrderId)> {
        let worker_index = self.workers.iter().position(Worker::is_idle)?;
        let order_id = self.pending_in_dispatch_order().next().map(Order::id)?;

        let now = self.clock.now();
        let order = self
            .orders
            .get_mut(&order_id)
            .expect("pending order missing from order map");
        let worker = &mut self.workers[worker_index];
        worker
            .start_processing(order, now)
            .expect("idle worker rejected a pending order");

        let worker_id = worker.id();
        self.event_log.log(Event::OrderAssigned {
            tick: now,
            order_id,
            worker_id,
        });
        Some((worker_id, order_id))
    }

    /// Pending orders in dispatch order: Vips first, submission order
    /// within each class
    fn pending_in_dispatch_order(&self) -> impl Iterator<Item = &Order> {
        let vips = self
            .orders
            .values()
            .filter(|o| o.is_pending() && o.priority_class() == PriorityClass::Vip);
        let normals = self
            .orders
            .values()
            .filter(|o| o.is_pending() && o.priority_class() == PriorityClass::Normal);
        vips.chain(normals)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get the current tick
    pub fn current_tick(&self) -> usize {
        self.clock.now()
    }

    /// Pending orders in dispatch order
    pub fn pending_orders(&self) -> Vec<Order> {
        self.pending_in_dispatch_order().cloned().collect()
    }

    /// Orders currently held by workers, in submission order
    pub fn processing_orders(&self) -> Vec<Order> {
        self.orders
            .values()
            .filter(|o| o.is_processing())
            .cloned()
            .collect()
    }

    /// Completed orders, in submission order
    pub fn completed_orders(&self) -> Vec<Order> {
        self.orders
            .values()
            .filter(|o| o.is_complete())
            .cloned()
            .collect()
    }

    /// Look up a single order by id
    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.orders.get(&id).cloned()
    }

    /// Worker summaries in add order
    pub fn worker_status(&self) -> Vec<WorkerSnapshot> {
        self.workers.iter().map(WorkerSnapshot::from).collect()
    }

    /// Aggregate counts over orders and workers
    pub fn stats(&self) -> EngineStats {
        let pending_orders = self.orders.values().filter(|o| o.is_pending()).count();
        let processing_orders = self.orders.values().filter(|o| o.is_processing()).count();
        let completed_orders = self.orders.values().filter(|o| o.is_complete()).count();
        let idle_workers = self.workers.iter().filter(|w| w.is_idle()).count();

        EngineStats {
            total_orders: self.orders.len(),
            pending_orders,
            processing_orders,
            completed_orders,
            total_workers: self.workers.len(),
            idle_workers,
            processing_workers: self.workers.len() - idle_workers,
        }
    }

    /// Get total events logged
    pub fn event_count(&self) -> usize {
        self.event_log.len()
    }

    /// Get reference to the event log
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }
}

impl Default for SchedulingEngine {
    fn default() -> Self {
        Self::new()
    }
}
