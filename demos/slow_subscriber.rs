//! # Example: slow_subscriber
//!
//! One subscriber never drains its subscription; another keeps up. The fast one
//! is never delayed. With `max_in_flight` set, events for the stalled subscriber
//! beyond the bound are dropped instead of piling up.
//!
//! ## Run
//! ```bash
//! cargo run --example slow_subscriber
//! ```

use tagbus::{Dispatcher, DispatcherConfig, Event};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = DispatcherConfig {
        subscription_capacity: 4,
        max_in_flight: 8,
        ..DispatcherConfig::default()
    };
    let bus: Dispatcher<u64> = Dispatcher::new(cfg);

    let _stalled = bus.subscribe("tick").await;
    let mut fast = bus.subscribe("tick").await;

    for i in 0..100 {
        bus.announce(Event::new("tick", i)).await;
        let _ = fast.recv().await;
    }

    // Let spawned deliveries settle before reading counters.
    tokio::task::yield_now().await;
    let stats = bus.stats();
    println!("announced: {}", stats.announced);
    println!("delivered: {}", stats.delivered);
    println!("dropped:   {}", stats.dropped);
    println!("live subscribers: {}", bus.subscriber_count().await);
    Ok(())
}
