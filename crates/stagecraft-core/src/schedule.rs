//! Frame coalescing, debouncing and one-shot delays.
//!
//! Nothing here owns a timer. Callers pass the current time in and poll, so
//! the host event loop (requestAnimationFrame, a winit redraw, a test) decides
//! when things fire.

pub use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;

/// Pending-frame token holding the latest input sample.
///
/// Queuing a sample replaces whatever was pending, so at most one write
/// happens per animation frame no matter how many pointer events arrive.
#[derive(Debug, Clone)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
    replaced: usize,
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            replaced: 0,
        }
    }
}

impl<T> FrameCoalescer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a sample, dropping any older one still waiting for a frame.
    pub fn queue(&mut self, sample: T) {
        if self.pending.replace(sample).is_some() {
            self.replaced += 1;
        }
    }

    /// Take the sample for this frame.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Number of samples that were superseded before reaching a frame.
    pub fn replaced_count(&self) -> usize {
        self.replaced
    }
}

/// Defers a value until `delay` has passed without a newer call.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending value and restart the quiet period.
    pub fn call(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Return the value once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if now >= *due => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Return the pending value immediately, skipping the wait.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Cancellable one-shot delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.at = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.at = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.at.is_some()
    }

    /// Fire once when `now` reaches the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.at {
            Some(at) if now >= at => {
                self.at = None;
                true
            }
            _ => false,
        }
    }
}

/// Milliseconds to a `Duration`.
pub fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_coalescer_keeps_latest() {
        let mut frames = FrameCoalescer::new();
        frames.queue(1);
        frames.queue(2);
        frames.queue(3);
        assert_eq!(frames.take(), Some(3));
        assert_eq!(frames.take(), None);
        assert_eq!(frames.replaced_count(), 2);
    }

    #[test]
    fn test_debouncer_waits_for_quiet() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(millis(300));
        debouncer.call("a", start);
        debouncer.call("b", start + millis(200));
        // Restarted by the second call
        assert_eq!(debouncer.poll(start + millis(400)), None);
        assert_eq!(debouncer.poll(start + millis(500)), Some("b"));
        assert_eq!(debouncer.poll(start + millis(900)), None);
    }

    #[test]
    fn test_debouncer_flush_and_cancel() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(millis(300));
        debouncer.call(7, now);
        assert_eq!(debouncer.flush(), Some(7));
        debouncer.call(8, now);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(now + millis(1000)), None);
    }

    #[test]
    fn test_deadline_fires_once() {
        let now = Instant::now();
        let mut deadline = Deadline::new();
        assert!(!deadline.poll(now));
        deadline.schedule(now, millis(2500));
        assert!(!deadline.poll(now + millis(2000)));
        assert!(deadline.poll(now + millis(2500)));
        assert!(!deadline.poll(now + millis(3000)));
    }
}
