//! Host "next frame" primitive with cancellable handles
//!
//! Every request is delivered at most once, on the next `take_due` call after
//! it was made. Requests issued while processing a batch land in the following
//! batch, which is what makes a self-rescheduling frame loop yield once per tick.

use std::fmt;

/// Opaque handle for one outstanding frame request
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct FrameHandle(u64);

impl fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameHandle({})", self.0)
    }
}

/// Queue of pending frame callbacks, each addressed to a target `T`
pub struct FrameScheduler<T> {
    next_handle: u64,
    pending: Vec<(FrameHandle, T)>,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            pending: Vec::new(),
        }
    }

    /// Ask for `target` to be called back on the next frame
    pub fn request_frame(&mut self, target: T) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push((handle, target));
        handle
    }

    /// Cancel a pending request. Returns false if it was already delivered or cancelled.
    pub fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(h, _)| *h != handle);
        let removed = self.pending.len() != before;
        if !removed {
            tracing::trace!(?handle, "cancel of a frame request that is no longer pending");
        }
        removed
    }

    /// Drain every request that is due this frame, in request order
    pub fn take_due(&mut self) -> Vec<(FrameHandle, T)> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.iter().any(|(h, _)| *h == handle)
    }

    /// Number of outstanding requests across all targets
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T: PartialEq> FrameScheduler<T> {
    /// Number of outstanding requests addressed to `target`
    pub fn pending_for(&self, target: &T) -> usize {
        self.pending.iter().filter(|(_, t)| t == target).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_and_take() {
        let mut scheduler = FrameScheduler::new();
        let a = scheduler.request_frame("a");
        let b = scheduler.request_frame("b");
        assert_ne!(a, b);
        assert_eq!(scheduler.pending_count(), 2);

        let due = scheduler.take_due();
        assert_eq!(due, vec![(a, "a"), (b, "b")]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_cancel_removes_only_that_request() {
        let mut scheduler = FrameScheduler::new();
        let a = scheduler.request_frame(1);
        let b = scheduler.request_frame(2);
        assert!(scheduler.cancel_frame(a));
        assert!(!scheduler.cancel_frame(a));
        assert!(!scheduler.is_pending(a));
        assert!(scheduler.is_pending(b));
        assert_eq!(scheduler.pending_for(&1), 0);
        assert_eq!(scheduler.pending_for(&2), 1);
    }

    #[test]
    fn test_requests_made_during_delivery_wait_for_next_batch() {
        let mut scheduler = FrameScheduler::new();
        scheduler.request_frame(7);
        for (_, target) in scheduler.take_due() {
            scheduler.request_frame(target);
        }
        assert_eq!(scheduler.pending_for(&7), 1);
    }

    #[test]
    fn test_delivered_handle_cannot_be_cancelled() {
        let mut scheduler = FrameScheduler::new();
        let h = scheduler.request_frame(());
        let _ = scheduler.take_due();
        assert!(!scheduler.cancel_frame(h));
    }
}
