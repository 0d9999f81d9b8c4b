//! Line-based shell for the fulfillment line simulator
//!
//! A thin presentation layer over the core engine: it parses commands,
//! renders status reports, and drives the clock (one tick per second in
//! monitor mode). All numbers shown here come from the engine's query
//! API; the shell performs no scheduling logic of its own.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use fulfillment_simulator_core::{
    Order, PriorityClass, SchedulingEngine, WorkerStatus, PROCESSING_DURATION_TICKS,
};

fn main() {
    let mut engine = SchedulingEngine::new();

    println!("Fulfillment Line Simulator");
    println!("==========================");
    print_menu();

    let stdin = io::stdin();
    loop {
        print!("\nEnter command: ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break, // EOF: exit cleanly
            Ok(_) => {}
        }

        if !process_command(&mut engine, &line) {
            break;
        }
    }

    println!("Goodbye!");
}

/// Dispatch one input line. Returns false when the shell should exit.
fn process_command(engine: &mut SchedulingEngine, line: &str) -> bool {
    let input = line.trim().to_lowercase();
    let mut parts = input.split_whitespace();
    let command = parts.next().unwrap_or("");
    let arg: Option<usize> = parts.next().and_then(|v| v.parse().ok());

    match command {
        "" => {}
        "1" | "normal" => {
            let order = engine.submit_order(PriorityClass::Normal);
            println!("Created Normal Order #{}", order.id());
            print_quick_status(engine);
        }
        "2" | "vip" => {
            let order = engine.submit_order(PriorityClass::Vip);
            println!("Created VIP Order #{}", order.id());
            print_quick_status(engine);
        }
        "3" | "+worker" => {
            let worker = engine.add_worker();
            println!("Added Worker #{}", worker.id);
            print_quick_status(engine);
        }
        "4" | "-worker" => match engine.remove_worker() {
            Some(worker) => {
                println!("Removed Worker #{}", worker.id);
                print_quick_status(engine);
            }
            None => println!("No workers available to remove"),
        },
        "5" | "status" => print_status(engine),
        "6" | "monitor" => run_monitor(engine, arg.unwrap_or(10)),
        "7" | "help" => print_menu(),
        "tick" => {
            let ticks = arg.unwrap_or(1);
            for _ in 0..ticks {
                let result = engine.tick();
                for order_id in &result.completed_orders {
                    println!("[tick {}] Order #{} completed", result.tick, order_id);
                }
            }
            print_quick_status(engine);
        }
        "events" => print_recent_events(engine),
        "json" => match serde_json::to_string_pretty(&engine.stats()) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Could not render stats: {err}"),
        },
        "0" | "exit" | "quit" => return false,
        _ => println!("Invalid command. Type \"help\" for available commands."),
    }
    true
}

fn print_menu() {
    println!("\nAvailable Commands:");
    println!("1. normal      - Submit Normal Order");
    println!("2. vip         - Submit VIP Order");
    println!("3. +worker     - Add Worker");
    println!("4. -worker     - Remove Worker");
    println!("5. status      - Show Current Status");
    println!("6. monitor [n] - Live view, one tick per second (default 10)");
    println!("7. help        - Show this menu");
    println!("   tick [n]    - Advance the clock instantly (default 1)");
    println!("   events      - Show recent engine events");
    println!("   json        - Dump stats as JSON");
    println!("0. exit        - Exit");
    println!("==========================");
}

fn print_quick_status(engine: &SchedulingEngine) {
    let stats = engine.stats();
    println!(
        "Quick Status - Pending: {}, Processing: {}, Completed: {}, Workers: {}",
        stats.pending_orders, stats.processing_orders, stats.completed_orders, stats.total_workers
    );
}

fn count_by_class(orders: &[Order]) -> (usize, usize) {
    let vip = orders
        .iter()
        .filter(|o| o.priority_class() == PriorityClass::Vip)
        .count();
    (vip, orders.len() - vip)
}

fn print_status(engine: &SchedulingEngine) {
    let now = engine.current_tick();
    let stats = engine.stats();
    let pending = engine.pending_orders();
    let processing = engine.processing_orders();
    let completed = engine.completed_orders();

    let (pending_vip, pending_normal) = count_by_class(&pending);
    let (processing_vip, processing_normal) = count_by_class(&processing);
    let (completed_vip, completed_normal) = count_by_class(&completed);

    println!("\nCurrent System Status (tick {now}):");
    println!("========================");
    println!("Total Orders: {}", stats.total_orders);

    println!("\nPENDING ORDERS:");
    println!("   Total: {}", stats.pending_orders);
    println!("   VIP: {pending_vip} | Normal: {pending_normal}");
    for order in &pending {
        println!("     Order #{} ({})", order.id(), order.priority_class());
    }

    println!("\nPROCESSING ORDERS:");
    println!("   Total: {}", stats.processing_orders);
    println!("   VIP: {processing_vip} | Normal: {processing_normal}");
    for order in &processing {
        let started = order.processing_started_tick().unwrap_or(now);
        let elapsed = now.saturating_sub(started);
        let remaining = PROCESSING_DURATION_TICKS.saturating_sub(elapsed);
        println!(
            "     Order #{} ({}): {elapsed} ticks elapsed, {remaining} remaining",
            order.id(),
            order.priority_class()
        );
    }

    println!("\nCOMPLETED ORDERS:");
    println!("   Total: {}", stats.completed_orders);
    println!("   VIP: {completed_vip} | Normal: {completed_normal}");
    for order in completed.iter().rev().take(5).rev() {
        let (started, finished, worker) = match (
            order.processing_started_tick(),
            order.completed_tick(),
            order.completed_by(),
        ) {
            (Some(s), Some(f), Some(w)) => (s, f, w),
            _ => continue,
        };
        println!(
            "     Order #{} ({}): completed in {} ticks at tick {finished} by Worker #{worker}",
            order.id(),
            order.priority_class(),
            finished - started
        );
    }

    println!("\nWORKER STATUS:");
    println!("   Total Workers: {}", stats.total_workers);
    println!(
        "   Idle: {} | Processing: {}",
        stats.idle_workers, stats.processing_workers
    );
    for worker in engine.worker_status() {
        match (worker.status, worker.current_order_id) {
            (WorkerStatus::Idle, _) => println!("   Worker #{}: IDLE", worker.id),
            (WorkerStatus::Processing, Some(order_id)) => {
                println!("   Worker #{}: PROCESSING Order #{order_id}", worker.id)
            }
            (WorkerStatus::Processing, None) => {
                println!("   Worker #{}: PROCESSING", worker.id)
            }
        }
    }
}

/// Live view: advance one tick per second, redrawing the status report.
fn run_monitor(engine: &mut SchedulingEngine, cycles: usize) {
    println!("Monitoring for {cycles} ticks (1 tick per second)...");
    for _ in 0..cycles {
        thread::sleep(Duration::from_secs(1));
        let result = engine.tick();
        for order_id in &result.completed_orders {
            println!("[tick {}] Order #{} completed", result.tick, order_id);
        }
        print_status(engine);
    }
    println!("\nMonitoring finished. Back to the main menu.");
}

fn print_recent_events(engine: &SchedulingEngine) {
    let events = engine.event_log().events();
    if events.is_empty() {
        println!("No events yet.");
        return;
    }
    println!("Recent events ({} total):", events.len());
    for event in events.iter().rev().take(10).rev() {
        println!("   [tick {}] {:?}", event.tick(), event);
    }
}
