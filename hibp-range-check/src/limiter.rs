//! Counting limiter bounding how many checks run at once.

use std::future::Future;

use tokio::sync::{Semaphore, SemaphorePermit};

/// A fixed-capacity limiter. Waiters are admitted in FIFO order.
#[derive(Debug)]
pub struct Limiter {
    semaphore: Semaphore,
    capacity: usize,
}

/// Holds one slot of a [`Limiter`] until dropped.
#[derive(Debug)]
pub struct LimiterPermit<'a> {
    _permit: SemaphorePermit<'a>,
}

impl Limiter {
    /// Creates a limiter with `capacity` slots (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { semaphore: Semaphore::new(capacity), capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn in_flight(&self) -> usize {
        self.capacity - self.available()
    }

    /// Waits for a free slot.
    pub async fn acquire(&self) -> LimiterPermit<'_> {
        // The semaphore is owned here and never closed.
        let permit = self.semaphore.acquire().await.expect("limiter semaphore is never closed");
        LimiterPermit { _permit: permit }
    }

    /// Runs `fut` while holding a slot. The slot is released however `fut` ends.
    pub async fn run<F: Future>(&self, fut: F) -> F::Output {
        let _permit = self.acquire().await;
        fut.await
    }
}
