//! # Consumer side of a subscription.
//!
//! [`Subscription`] is the receive-only handle returned by
//! [`Dispatcher::subscribe`](crate::Dispatcher::subscribe). The dispatcher keeps the
//! sending half; the consumer owns this half and is the only one who can end it.
//!
//! ## Rules
//! - **Open-ended**: `recv()` yields matching events until the handle is closed
//!   or the dispatcher stops.
//! - **Close to leave**: [`Subscription::close`] (or dropping the handle) is the only
//!   way to unsubscribe. The dispatcher notices lazily, on its next delivery attempt.
//! - **Receive-only**: there is no way to push events through this handle.
//! - **Stream**: implements [`futures::Stream`] for combinator-style consumption.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use super::event::Event;

/// Open-ended sequence of events matching one prefix.
#[derive(Debug)]
pub struct Subscription<T> {
    prefix: Arc<str>,
    rx: mpsc::Receiver<Event<T>>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(prefix: Arc<str>, rx: mpsc::Receiver<Event<T>>) -> Self {
        Self { prefix, rx }
    }

    /// Prefix this subscription was registered with.
    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Waits for the next matching event.
    ///
    /// Returns `None` once the subscription is closed and drained, or the
    /// dispatcher has stopped.
    pub async fn recv(&mut self) -> Option<Event<T>> {
        self.rx.recv().await
    }

    /// Returns the next already-delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<Event<T>> {
        self.rx.try_recv().ok()
    }

    /// Number of events delivered and not yet received.
    #[inline]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Returns `true` if nothing is waiting to be received.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Stops listening.
    ///
    /// Events already buffered can still be drained with `recv`; nothing new
    /// is accepted. Calling it more than once is a no-op.
    pub fn close(&mut self) {
        self.rx.close();
    }

    /// Returns `true` if closed by the consumer or abandoned by the dispatcher.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.rx.is_closed()
    }
}

impl<T> Stream for Subscription<T> {
    type Item = Event<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
