//! Fulfillment Simulator Core - Scheduling Engine
//!
//! Deterministic simulation of a fixed-capacity order-fulfillment line:
//! orders of two priority classes are queued and matched to a pool of
//! single-capacity workers, each processing one order for a fixed
//! number of ticks.
//!
//! # Architecture
//!
//! - **core**: Time management (discrete ticks)
//! - **models**: Domain types (Order, Worker, Event)
//! - **engine**: The scheduling controller and tick loop
//!
//! # Critical Invariants
//!
//! 1. Every pending Vip order precedes every pending Normal order in
//!    dispatch order; within a class, submission order is preserved
//! 2. A worker holds at most one order; an order is held by at most one
//!    worker
//! 3. Ids are monotonic and never reused, even after removal
//! 4. Cancelling a claim and firing its completion are mutually
//!    exclusive

// Module declarations
pub mod core;
pub mod engine;
pub mod models;

// Re-exports for convenience
pub use crate::core::time::TimeManager;
pub use engine::{EngineStats, SchedulingEngine, TickResult, WorkerSnapshot};
pub use models::{
    event::{Event, EventLog},
    order::{Order, OrderError, OrderId, OrderStatus, PriorityClass},
    worker::{Worker, WorkerError, WorkerId, WorkerStatus, PROCESSING_DURATION_TICKS},
};
