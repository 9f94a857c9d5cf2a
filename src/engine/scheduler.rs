use std::collections::VecDeque;

/// Handle for one requested frame callback. Holding it is what allows the
/// owner to cancel the callback later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(u64);

/// Per-frame callback scheduling supplied by the host (display loop, headless
/// runner, test).
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// FIFO of requested frames. The host pops a due request and then calls the
/// engine's frame handler.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: VecDeque<FrameRequest>,
    cancelled: Vec<FrameRequest>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_due(&mut self) -> Option<FrameRequest> {
        self.pending.pop_front()
    }

    pub fn is_pending(&self, request: FrameRequest) -> bool {
        self.pending.contains(&request)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn cancelled(&self) -> &[FrameRequest] {
        &self.cancelled
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.pending.push_back(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let before = self.pending.len();
        self.pending.retain(|r| *r != request);
        if self.pending.len() != before {
            self.cancelled.push(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_served_in_order() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();

        assert_ne!(a, b);
        assert_eq!(queue.take_due(), Some(a));
        assert_eq!(queue.take_due(), Some(b));
        assert_eq!(queue.take_due(), None);
    }

    #[test]
    fn cancelled_request_never_fires() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        queue.cancel_frame(a);

        assert!(!queue.is_pending(a));
        assert_eq!(queue.cancelled(), &[a]);
        assert_eq!(queue.take_due(), None);
    }

    #[test]
    fn cancelling_a_fired_request_is_a_no_op() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        let _ = queue.take_due();
        queue.cancel_frame(a);

        assert!(queue.cancelled().is_empty());
    }
}
