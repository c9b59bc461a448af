//! # Notifier trait
//!
//! `Notifier` is the seam between code that produces or consumes events and the
//! dispatcher instance behind it. Library code should take `&impl Notifier<T>`
//! (or `Arc<dyn Notifier<T>>`) instead of reaching for the process-wide default.
//!
//! ## Example
//! ```rust
//! use tagbus::{Dispatcher, DispatcherConfig, Notifier};
//!
//! async fn job_finished(bus: &impl Notifier<u64>, id: u64) {
//!     bus.announce(tagbus::Event::new("job.finished", id)).await;
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus: Dispatcher<u64> = Dispatcher::new(DispatcherConfig::default());
//!     let mut done = bus.listen("job.").await;
//!     job_finished(&bus, 9).await;
//!     assert_eq!(done.recv().await.unwrap().data(), Some(&9));
//! }
//! ```

use async_trait::async_trait;

use crate::core::Dispatcher;
use crate::events::{Event, Subscription};

/// Listen for and announce tagged events.
#[async_trait]
pub trait Notifier<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    /// Registers interest in future events whose tag starts with `prefix`.
    ///
    /// To stop listening, close or drop the returned subscription.
    async fn listen(&self, prefix: &str) -> Subscription<T>;

    /// Passes `event` along for dispatch to interested listeners.
    async fn announce(&self, event: Event<T>);

    /// Announces an event with only a tag and no data.
    async fn signal(&self, tag: &str) {
        self.announce(Event::signal(tag)).await;
    }
}

#[async_trait]
impl<T> Notifier<T> for Dispatcher<T>
where
    T: Clone + Send + 'static,
{
    async fn listen(&self, prefix: &str) -> Subscription<T> {
        self.subscribe(prefix).await
    }

    async fn announce(&self, event: Event<T>) {
        Dispatcher::announce(self, event).await;
    }

    async fn signal(&self, tag: &str) {
        Dispatcher::signal(self, tag).await;
    }
}
