//! Integration tests for priority-preserving dispatch order
//!
//! Dispatch invariant: every pending Vip order precedes every pending
//! Normal order, and within a class submission order is preserved. A
//! forcibly reset order resumes at its original relative position.

use fulfillment_simulator_core::{OrderId, PriorityClass, SchedulingEngine};
use proptest::prelude::*;

fn pending_ids(engine: &SchedulingEngine) -> Vec<u64> {
    engine
        .pending_orders()
        .iter()
        .map(|o| o.id().value())
        .collect()
}

#[test]
fn test_vip_jumps_ahead_of_pending_normal() {
    let mut engine = SchedulingEngine::new();
    engine.submit_order(PriorityClass::Normal); // id 1
    engine.submit_order(PriorityClass::Vip); // id 2

    assert_eq!(pending_ids(&engine), vec![2, 1]);
}

#[test]
fn test_fifo_within_each_class() {
    let mut engine = SchedulingEngine::new();
    engine.submit_order(PriorityClass::Vip); // 1
    engine.submit_order(PriorityClass::Vip); // 2
    engine.submit_order(PriorityClass::Normal); // 3
    engine.submit_order(PriorityClass::Normal); // 4
    engine.submit_order(PriorityClass::Vip); // 5

    assert_eq!(pending_ids(&engine), vec![1, 2, 5, 3, 4]);
}

#[test]
fn test_worker_added_mid_queue_takes_vip_first() {
    // A Normal order waits; a Vip arrives; the new worker takes the Vip.
    let mut engine = SchedulingEngine::new();
    engine.submit_order(PriorityClass::Normal);
    engine.submit_order(PriorityClass::Vip);

    let worker = engine.add_worker();
    assert_eq!(worker.current_order_id, Some(OrderId::new(2)));

    assert_eq!(pending_ids(&engine), vec![1]);
    let processing: Vec<u64> = engine
        .processing_orders()
        .iter()
        .map(|o| o.id().value())
        .collect();
    assert_eq!(processing, vec![2]);
}

#[test]
fn test_new_vip_queues_behind_processing_vip() {
    // A Vip mid-processing holds no queue position; a newly submitted
    // Vip becomes the pending head without displacing it.
    let mut engine = SchedulingEngine::new();
    engine.add_worker();
    engine.submit_order(PriorityClass::Vip); // id 1, claimed immediately
    engine.submit_order(PriorityClass::Vip); // id 2
    engine.submit_order(PriorityClass::Normal); // id 3

    assert_eq!(pending_ids(&engine), vec![2, 3]);

    // Interrupt the claim: order 1 resumes ahead of order 2 (earlier
    // submission, same class)
    engine.remove_worker().unwrap();
    assert_eq!(pending_ids(&engine), vec![1, 2, 3]);
}

#[test]
fn test_reset_normal_does_not_jump_pending_vip() {
    let mut engine = SchedulingEngine::new();
    engine.add_worker();
    engine.submit_order(PriorityClass::Normal); // id 1, claimed
    engine.submit_order(PriorityClass::Vip); // id 2

    engine.remove_worker().unwrap();
    // Vip still dispatches first even though the Normal was submitted
    // (and partially processed) earlier
    assert_eq!(pending_ids(&engine), vec![2, 1]);
}

// ============================================================================
// Property: the dispatch invariant survives arbitrary interleavings
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    SubmitNormal,
    SubmitVip,
    AddWorker,
    RemoveWorker,
    Tick,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::SubmitNormal),
        Just(Op::SubmitVip),
        Just(Op::AddWorker),
        Just(Op::RemoveWorker),
        Just(Op::Tick),
    ]
}

proptest! {
    #[test]
    fn prop_invariants_hold_under_any_interleaving(
        ops in proptest::collection::vec(op_strategy(), 1..80)
    ) {
        let mut engine = SchedulingEngine::new();

        for op in ops {
            match op {
                Op::SubmitNormal => {
                    engine.submit_order(PriorityClass::Normal);
                }
                Op::SubmitVip => {
                    engine.submit_order(PriorityClass::Vip);
                }
                Op::AddWorker => {
                    engine.add_worker();
                }
                Op::RemoveWorker => {
                    let _ = engine.remove_worker();
                }
                Op::Tick => {
                    engine.tick();
                }
            }

            // Conservation
            let stats = engine.stats();
            prop_assert_eq!(
                stats.total_orders,
                stats.pending_orders + stats.processing_orders + stats.completed_orders
            );
            prop_assert_eq!(
                stats.total_workers,
                stats.idle_workers + stats.processing_workers
            );

            // Every pending Vip precedes every pending Normal
            let pending = engine.pending_orders();
            if let Some(first_normal) = pending
                .iter()
                .position(|o| o.priority_class() == PriorityClass::Normal)
            {
                prop_assert!(pending[first_normal..]
                    .iter()
                    .all(|o| o.priority_class() == PriorityClass::Normal));
            }

            // FIFO within each class
            for class in [PriorityClass::Vip, PriorityClass::Normal] {
                let ids: Vec<u64> = pending
                    .iter()
                    .filter(|o| o.priority_class() == class)
                    .map(|o| o.id().value())
                    .collect();
                let mut sorted = ids.clone();
                sorted.sort_unstable();
                prop_assert_eq!(ids, sorted);
            }

            // At most one claim each way
            let held: Vec<_> = engine
                .worker_status()
                .iter()
                .filter_map(|w| w.current_order_id)
                .collect();
            let mut unique = held.clone();
            unique.sort_unstable();
            unique.dedup();
            prop_assert_eq!(held.len(), unique.len());
            prop_assert_eq!(held.len(), stats.processing_orders);
        }
    }
}
