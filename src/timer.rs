//! Repeating timers driven by frame deltas.
//!
//! Nothing here reads a wall clock: the owner calls [`TimerQueue::advance`]
//! with the time elapsed since the previous frame and gets back the handles
//! that fired, in firing order.

use std::time::Duration;

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry {
    handle: TimerHandle,
    period: Duration,
    remaining: Duration,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    entries: Vec<Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a timer that fires every `period` until cancelled.
    /// Periods below one millisecond are rounded up.
    pub fn schedule_repeating(&mut self, period: Duration) -> TimerHandle {
        let period = period.max(MIN_PERIOD);
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { handle, period, remaining: period });
        handle
    }

    /// Returns `false` if the handle was not live.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn live_count(&self) -> usize {
        self.entries.len()
    }

    /// Time left until `handle` next fires.
    pub fn remaining(&self, handle: TimerHandle) -> Option<Duration> {
        self.entries.iter().find(|e| e.handle == handle).map(|e| e.remaining)
    }

    pub fn period(&self, handle: TimerHandle) -> Option<Duration> {
        self.entries.iter().find(|e| e.handle == handle).map(|e| e.period)
    }

    pub fn advance(&mut self, dt: Duration) -> Vec<TimerHandle> {
        // (offset into this frame, handle)
        let mut fired: Vec<(Duration, TimerHandle)> = Vec::new();

        for entry in self.entries.iter_mut() {
            let mut offset = Duration::ZERO;
            let mut left = dt;
            while left >= entry.remaining {
                left -= entry.remaining;
                offset += entry.remaining;
                fired.push((offset, entry.handle));
                entry.remaining = entry.period;
            }
            entry.remaining -= left;
        }

        fired.sort_by_key(|(offset, handle)| (*offset, handle.0));
        fired.into_iter().map(|(_, handle)| handle).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_once_per_period() {
        let mut timers = TimerQueue::new();
        let h = timers.schedule_repeating(ms(100));

        assert!(timers.advance(ms(99)).is_empty());
        assert_eq!(timers.advance(ms(1)), vec![h]);
        assert_eq!(timers.remaining(h), Some(ms(100)));
        assert!(timers.advance(ms(50)).is_empty());
        assert_eq!(timers.remaining(h), Some(ms(50)));
    }

    #[test]
    fn large_step_fires_repeatedly() {
        let mut timers = TimerQueue::new();
        let h = timers.schedule_repeating(ms(100));
        assert_eq!(timers.advance(ms(350)), vec![h, h, h]);
        assert_eq!(timers.remaining(h), Some(ms(50)));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = TimerQueue::new();
        let h = timers.schedule_repeating(ms(10));
        assert!(timers.cancel(h));
        assert!(!timers.cancel(h));
        assert!(!timers.is_live(h));
        assert_eq!(timers.live_count(), 0);
        assert!(timers.advance(ms(1000)).is_empty());
    }

    #[test]
    fn interleaves_fires_by_time() {
        let mut timers = TimerQueue::new();
        let slow = timers.schedule_repeating(ms(30));
        let fast = timers.schedule_repeating(ms(20));
        assert_eq!(timers.advance(ms(60)), vec![fast, slow, fast, slow, fast]);
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut timers = TimerQueue::new();
        let h = timers.schedule_repeating(Duration::ZERO);
        assert_eq!(timers.period(h), Some(MIN_PERIOD));
        assert_eq!(timers.advance(ms(3)).len(), 3);
    }
}
