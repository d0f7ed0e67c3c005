//! Counting gate that caps how many targets run actions at once.

use std::num::NonZeroUsize;
use std::sync::{Condvar, Mutex, PoisonError};

#[derive(Debug)]
pub(super) struct JobSlots {
    available: Mutex<usize>,
    freed: Condvar,
}

impl JobSlots {
    pub(super) const fn new(limit: NonZeroUsize) -> Self {
        Self {
            available: Mutex::new(limit.get()),
            freed: Condvar::new(),
        }
    }

    /// Block until a slot is free and hold it until the guard drops.
    pub(super) fn acquire(&self) -> SlotGuard<'_> {
        let mut available = self
            .available
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while *available == 0 {
            available = self
                .freed
                .wait(available)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *available -= 1;
        SlotGuard { slots: self }
    }

    fn release(&self) {
        let mut available = self
            .available
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *available += 1;
        self.freed.notify_one();
    }
}

#[derive(Debug)]
pub(super) struct SlotGuard<'a> {
    slots: &'a JobSlots,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.slots.release();
    }
}
