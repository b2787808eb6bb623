//! Hand-off channel between run drivers and the loop that owns the surface.
//!
//! Drivers run on the async runtime and must never touch the drawing surface
//! directly. They post events here and return immediately; the surface loop
//! is the only consumer.

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::trace;

/// Trait implemented by payload types that can be carried on the bus.
pub trait Event: Send + std::fmt::Debug + 'static {}

impl<T> Event for T where T: Send + std::fmt::Debug + 'static {}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("event receiver has been dropped")]
    Closed,
}

/// Posting side of the hand-off. Implementations must not block.
pub trait EventSink<E>: Send + Sync
where
    E: Event,
{
    fn publish(&self, event: E) -> Result<(), BusError>;
}

#[derive(Debug)]
pub struct HandoffSender<E> {
    inner: mpsc::UnboundedSender<E>,
}

impl<E> Clone for HandoffSender<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E> EventSink<E> for HandoffSender<E>
where
    E: Event,
{
    fn publish(&self, event: E) -> Result<(), BusError> {
        trace!(?event, "handing off event");
        self.inner.send(event).map_err(|_| BusError::Closed)
    }
}

impl<E> HandoffSender<E> {
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

#[derive(Debug)]
pub struct HandoffReceiver<E> {
    inner: mpsc::UnboundedReceiver<E>,
}

impl<E> HandoffReceiver<E> {
    /// Wait for the next event. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<E> {
        self.inner.recv().await
    }

    /// Take an already-queued event without waiting.
    pub fn try_recv(&mut self) -> Option<E> {
        self.inner.try_recv().ok()
    }

    /// Take everything queued so far, in posting order.
    pub fn drain(&mut self) -> Vec<E> {
        let mut events = Vec::new();
        while let Ok(event) = self.inner.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Create a connected sender/receiver pair.
pub fn handoff<E>() -> (HandoffSender<E>, HandoffReceiver<E>)
where
    E: Event,
{
    let (tx, rx) = mpsc::unbounded_channel();
    (HandoffSender { inner: tx }, HandoffReceiver { inner: rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_arrive_in_posting_order() {
        let (tx, mut rx) = handoff::<u32>();
        for value in 0..5 {
            tx.publish(value).unwrap();
        }
        assert_eq!(rx.drain(), vec![0, 1, 2, 3, 4]);
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn publish_from_another_task_does_not_wait_for_consumer() {
        let (tx, mut rx) = handoff::<&'static str>();
        let worker = tokio::spawn(async move {
            tx.publish("started").unwrap();
            tx.publish("done").unwrap();
        });
        worker.await.unwrap();

        assert_eq!(rx.recv().await, Some("started"));
        assert_eq!(rx.recv().await, Some("done"));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn publish_fails_once_receiver_is_dropped() {
        let (tx, rx) = handoff::<u8>();
        drop(rx);
        assert!(tx.is_closed());
        assert_eq!(tx.publish(1), Err(BusError::Closed));
    }
}
