use std::future::Future;

use futures::{
    FutureExt, StreamExt,
    future::LocalBoxFuture,
    stream::FuturesUnordered,
};

use crate::foundation::error::{PhototagError, PhototagResult};

/// Counted join over a dynamic set of independent loads.
///
/// Each registered slot is either an in-flight future or an already satisfied value. [`wait`]
/// resolves once the pending count reaches zero, or with the first failure, at which point the
/// remaining loads are dropped without being awaited.
///
/// [`wait`]: LoadBarrier::wait
pub struct LoadBarrier<'a, T> {
    in_flight: FuturesUnordered<LocalBoxFuture<'a, (usize, PhototagResult<T>)>>,
    slots: Vec<Option<T>>,
    pending: usize,
}

impl<'a, T: 'a> Default for LoadBarrier<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: 'a> LoadBarrier<'a, T> {
    /// Empty barrier; waiting on it completes immediately.
    pub fn new() -> Self {
        Self {
            in_flight: FuturesUnordered::new(),
            slots: Vec::new(),
            pending: 0,
        }
    }

    /// Register an asynchronous load and return its slot index.
    pub fn push<F>(&mut self, load: F) -> usize
    where
        F: Future<Output = PhototagResult<T>> + 'a,
    {
        let slot = self.slots.len();
        self.slots.push(None);
        self.pending += 1;
        self.in_flight
            .push(async move { (slot, load.await) }.boxed_local());
        slot
    }

    /// Register a slot that is already complete.
    pub fn push_ready(&mut self, value: T) -> usize {
        let slot = self.slots.len();
        self.slots.push(Some(value));
        slot
    }

    /// Loads still outstanding.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Total registered slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no slot has been registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Wait for every slot, failing fast on the first error. Values come back in slot order.
    pub async fn wait(mut self) -> PhototagResult<Vec<T>> {
        while self.pending > 0 {
            let Some((slot, result)) = self.in_flight.next().await else {
                break;
            };
            match result {
                Ok(value) => {
                    self.slots[slot] = Some(value);
                    self.pending -= 1;
                    tracing::debug!(slot, pending = self.pending, "load completed");
                }
                Err(err) => {
                    tracing::debug!(
                        slot,
                        abandoned = self.pending - 1,
                        "load failed; abandoning barrier"
                    );
                    return Err(err);
                }
            }
        }

        self.slots
            .into_iter()
            .enumerate()
            .map(|(slot, v)| {
                v.ok_or_else(|| PhototagError::state(format!("barrier slot {slot} never completed")))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/barrier.rs"]
mod tests;
