//! # Example: isolated
//!
//! Independent dispatchers never see each other's events, and neither sees the
//! process-wide default. Pass handles (or `&impl Notifier<T>`) explicitly where
//! isolation matters.
//!
//! ## Run
//! ```bash
//! RUST_LOG=tagbus=debug cargo run --example isolated
//! ```

use std::time::Duration;

use tagbus::{Dispatcher, DispatcherConfig, Event, Notifier, Verbosity};
use tracing_subscriber::EnvFilter;

async fn report(bus: &impl Notifier<u32>, name: &str, value: u32) {
    bus.announce(Event::new(format!("metric.{name}"), value)).await;
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = DispatcherConfig::default().with_verbosity(Verbosity::Dispatches);
    let a: Dispatcher<u32> = Dispatcher::new(cfg.clone());
    let b: Dispatcher<u32> = Dispatcher::new(cfg);

    let mut on_a = a.listen("metric.").await;
    let mut on_b = b.listen("metric.").await;

    report(&a, "requests", 10).await;
    report(&b, "errors", 2).await;

    println!("a got: {:?}", on_a.recv().await);
    println!("b got: {:?}", on_b.recv().await);

    let quiet = tokio::time::timeout(Duration::from_millis(50), on_a.recv()).await;
    println!("a got nothing else: {}", quiet.is_err());

    println!("a stats: {:?}", a.stats());
    Ok(())
}
