use anyhow::Result;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::traits::{FrameCallback, FrameScheduler};

/// Cloneable "run on next frame" queue.
///
/// All clones share one queue, so a host can keep a handle while the
/// controller owns another. Callbacks requested while a frame runs wait for
/// the following frame.
#[derive(Clone, Default)]
pub struct FrameQueue {
    pending: Rc<RefCell<VecDeque<FrameCallback>>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Cross one frame boundary: run every callback queued before it.
    ///
    /// Stops at the first failing callback; the rest stay queued for the
    /// next frame after those requested during this one.
    pub fn run_frame(&self) -> Result<usize> {
        let mut batch = std::mem::take(&mut *self.pending.borrow_mut());
        let mut ran = 0;

        while let Some(callback) = batch.pop_front() {
            if let Err(e) = callback() {
                let mut pending = self.pending.borrow_mut();
                pending.extend(batch);
                return Err(e);
            }
            ran += 1;
        }

        Ok(ran)
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self, callback: FrameCallback) {
        self.pending.borrow_mut().push_back(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_request_is_deferred() {
        let mut queue = FrameQueue::new();
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);
        queue.request_frame(Box::new(move || {
            *flag.borrow_mut() = true;
            Ok(())
        }));

        assert!(!*ran.borrow());
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_frame().unwrap(), 1);
        assert!(*ran.borrow());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_requests_during_frame_wait_for_next() {
        let queue = FrameQueue::new();
        let mut handle = queue.clone();
        let inner = queue.clone();
        handle.request_frame(Box::new(move || {
            let mut inner = inner;
            inner.request_frame(Box::new(|| Ok(())));
            Ok(())
        }));

        assert_eq!(queue.run_frame().unwrap(), 1);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_frame().unwrap(), 1);
        assert_eq!(queue.run_frame().unwrap(), 0);
    }

    #[test]
    fn test_error_propagates_and_keeps_rest() {
        let mut queue = FrameQueue::new();
        queue.request_frame(Box::new(|| Err(anyhow!("draw failed"))));
        queue.request_frame(Box::new(|| Ok(())));

        let err = queue.run_frame().unwrap_err();
        assert_eq!(err.to_string(), "draw failed");
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_frame().unwrap(), 1);
    }
}
