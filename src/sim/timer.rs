//! Scheduled tasks on a virtual clock
//!
//! The engine never touches wall-clock timers directly. The host advances
//! the clock (every animation frame in the browser, in one big step in
//! tests) and due tasks come back in firing order.

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    handle: TimerHandle,
    due_ms: f64,
    task: T,
}

/// Pending tasks ordered by due time (ties fire in scheduling order)
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: f64,
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Run `task` after `delay_ms`
    pub fn schedule(&mut self, delay_ms: f64, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let due_ms = self.now_ms + delay_ms.max(0.0);

        // Keep sorted by due time; equal times keep insertion order
        let pos = self.pending.partition_point(|s| s.due_ms <= due_ms);
        self.pending.insert(pos, Scheduled { handle, due_ms, task });
        handle
    }

    /// Cancel a task; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.handle != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|s| s.handle == handle)
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time until the next task is due
    pub fn next_due_in(&self) -> Option<f64> {
        self.pending.first().map(|s| (s.due_ms - self.now_ms).max(0.0))
    }

    /// Pop the next task due at or before `until_ms`, moving the clock to its
    /// due time. Tasks scheduled while handling it are seen by the next call.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<T> {
        if self.pending.first().is_some_and(|s| s.due_ms <= until_ms) {
            let scheduled = self.pending.remove(0);
            self.now_ms = self.now_ms.max(scheduled.due_ms);
            Some(scheduled.task)
        } else {
            None
        }
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>, dt: f64) -> Vec<&'static str> {
        let until = s.now() + dt;
        let mut fired = Vec::new();
        while let Some(task) = s.pop_due(until) {
            fired.push(task);
        }
        s.set_now(until);
        fired
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(300.0, "b");
        s.schedule(100.0, "a");
        s.schedule(300.0, "c");
        assert_eq!(drain(&mut s, 50.0), Vec::<&str>::new());
        assert_eq!(drain(&mut s, 1000.0), vec!["a", "b", "c"]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        let h = s.schedule(10.0, "x");
        assert!(s.is_pending(h));
        assert!(s.cancel(h));
        assert!(!s.cancel(h));
        assert!(drain(&mut s, 100.0).is_empty());
    }

    #[test]
    fn test_clock_lands_on_due_time() {
        let mut s = Scheduler::new();
        s.schedule(250.0, "a");
        assert_eq!(s.pop_due(1000.0), Some("a"));
        assert_eq!(s.now(), 250.0);
        // A follow-up scheduled from the handler is relative to the due time
        s.schedule(500.0, "b");
        assert_eq!(s.next_due_in(), Some(500.0));
        assert_eq!(s.pop_due(1000.0), Some("b"));
        assert_eq!(s.now(), 750.0);
    }
}
