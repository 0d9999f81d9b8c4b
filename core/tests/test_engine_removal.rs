//! Integration tests for capacity removal and reconciliation
//!
//! Removal is LIFO; a removed worker's claim is cancelled before
//! anything else can observe it, the freed order re-enters the queue at
//! its original relative position, and one assignment pass lets it
//! rebind immediately if capacity remains.

use fulfillment_simulator_core::{
    OrderId, PriorityClass, SchedulingEngine, WorkerId, WorkerStatus, PROCESSING_DURATION_TICKS,
};

fn advance(engine: &mut SchedulingEngine, ticks: usize) {
    for _ in 0..ticks {
        engine.tick();
    }
}

#[test]
fn test_removal_is_lifo() {
    let mut engine = SchedulingEngine::new();
    engine.add_worker(); // 1
    engine.add_worker(); // 2
    engine.add_worker(); // 3

    assert_eq!(engine.remove_worker().unwrap().id, WorkerId::new(3));
    assert_eq!(engine.remove_worker().unwrap().id, WorkerId::new(2));
    assert_eq!(engine.stats().total_workers, 1);
}

#[test]
fn test_removing_busy_worker_requeues_its_order_at_the_head() {
    // Worker 1 is processing Vip order 2; removing it puts order 2
    // back ahead of Normal order 1.
    let mut engine = SchedulingEngine::new();
    engine.submit_order(PriorityClass::Normal); // id 1
    engine.submit_order(PriorityClass::Vip); // id 2
    engine.add_worker(); // claims order 2

    let removed = engine.remove_worker().unwrap();
    assert_eq!(removed.id, WorkerId::new(1));
    assert_eq!(removed.status, WorkerStatus::Idle);
    assert_eq!(removed.current_order_id, None);

    let pending: Vec<u64> = engine
        .pending_orders()
        .iter()
        .map(|o| o.id().value())
        .collect();
    assert_eq!(pending, vec![2, 1]);
    assert_eq!(engine.stats().total_workers, 0);

    let requeued = engine.order(OrderId::new(2)).unwrap();
    assert!(requeued.is_pending());
    assert_eq!(requeued.processing_started_tick(), None);
}

#[test]
fn test_cancelled_claim_never_completes() {
    let mut engine = SchedulingEngine::new();
    engine.add_worker();
    engine.submit_order(PriorityClass::Vip);
    engine.remove_worker().unwrap();

    // Run far past the scheduled completion tick
    advance(&mut engine, 3 * PROCESSING_DURATION_TICKS);

    let order = engine.order(OrderId::new(1)).unwrap();
    assert!(order.is_pending());
    assert_eq!(order.completed_by(), None);
    assert!(engine.event_log().events_of_type("OrderCompleted").is_empty());
}

#[test]
fn test_freed_order_rebinds_to_idle_worker_immediately() {
    let mut engine = SchedulingEngine::new();
    engine.add_worker(); // worker 1
    engine.submit_order(PriorityClass::Normal); // id 1 -> worker 1, due at 10

    advance(&mut engine, 5);
    engine.add_worker(); // worker 2
    engine.submit_order(PriorityClass::Normal); // id 2 -> worker 2, due at 15

    // Worker 1 finishes; worker 2 still mid-claim
    advance(&mut engine, 5);
    assert_eq!(
        engine.order(OrderId::new(1)).unwrap().completed_by(),
        Some(WorkerId::new(1))
    );

    // Removing worker 2 frees order 2, which worker 1 picks up at once
    let removed = engine.remove_worker().unwrap();
    assert_eq!(removed.id, WorkerId::new(2));

    let order = engine.order(OrderId::new(2)).unwrap();
    assert!(order.is_processing());
    assert_eq!(order.processing_started_tick(), Some(PROCESSING_DURATION_TICKS));

    let workers = engine.worker_status();
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0].id, WorkerId::new(1));
    assert_eq!(workers[0].current_order_id, Some(OrderId::new(2)));

    // Progress restarted from zero under the new claim
    advance(&mut engine, PROCESSING_DURATION_TICKS);
    let order = engine.order(OrderId::new(2)).unwrap();
    assert_eq!(order.completed_by(), Some(WorkerId::new(1)));
    assert_eq!(order.completed_tick(), Some(2 * PROCESSING_DURATION_TICKS));
}

#[test]
fn test_removing_idle_worker_leaves_claims_untouched() {
    let mut engine = SchedulingEngine::new();
    engine.add_worker(); // worker 1
    engine.submit_order(PriorityClass::Normal); // claimed by worker 1
    engine.add_worker(); // worker 2, idle

    let removed = engine.remove_worker().unwrap();
    assert_eq!(removed.id, WorkerId::new(2));

    let order = engine.order(OrderId::new(1)).unwrap();
    assert!(order.is_processing());
    assert_eq!(engine.worker_status()[0].current_order_id, Some(OrderId::new(1)));
}

#[test]
fn test_removal_event_sequence() {
    let mut engine = SchedulingEngine::new();
    engine.add_worker();
    engine.submit_order(PriorityClass::Vip);
    engine.remove_worker().unwrap();

    let types: Vec<&str> = engine
        .event_log()
        .events()
        .iter()
        .map(|e| e.event_type())
        .collect();
    assert_eq!(
        types,
        vec![
            "WorkerAdded",
            "OrderSubmitted",
            "OrderAssigned",
            "OrderRequeued",
            "WorkerRemoved",
        ]
    );

    // The removal event carries the interrupted order
    let removal = engine.event_log().events_of_type("WorkerRemoved");
    assert_eq!(removal[0].order_id(), Some(OrderId::new(1)));
}
