//! Per-side remaining time.
//!
//! The engine only stores the values. Counting down and declaring a timeout
//! belong to whoever drives the clocks, typically a timer task holding an
//! `Arc<Clocks>` next to the game.

use chess_core::Color;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Two remaining-time counters, in milliseconds.
#[derive(Debug)]
pub struct Clocks {
    remaining_ms: [AtomicU64; 2],
    max_ms: AtomicU64,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Clocks {
    /// Creates clocks with both sides at `max`.
    pub fn new(max: Duration) -> Self {
        let ms = millis(max);
        Clocks {
            remaining_ms: [AtomicU64::new(ms), AtomicU64::new(ms)],
            max_ms: AtomicU64::new(ms),
        }
    }

    /// Time each side started with.
    pub fn max_time(&self) -> Duration {
        Duration::from_millis(self.max_ms.load(Ordering::SeqCst))
    }

    pub fn remaining(&self, color: Color) -> Duration {
        Duration::from_millis(self.remaining_ms(color))
    }

    /// Remaining time in whole milliseconds.
    pub fn remaining_ms(&self, color: Color) -> u64 {
        self.remaining_ms[color.index()].load(Ordering::SeqCst)
    }

    pub fn set_remaining(&self, color: Color, remaining: Duration) {
        self.remaining_ms[color.index()].store(millis(remaining), Ordering::SeqCst);
    }

    /// Resets both sides to a new maximum.
    pub fn reset(&self, max: Duration) {
        let ms = millis(max);
        self.max_ms.store(ms, Ordering::SeqCst);
        for counter in &self.remaining_ms {
            counter.store(ms, Ordering::SeqCst);
        }
    }

    /// Subtracts elapsed time from one side, stopping at zero, and returns
    /// what is left.
    pub fn consume(&self, color: Color, elapsed: Duration) -> Duration {
        let elapsed = millis(elapsed);
        let previous = self.remaining_ms[color.index()]
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |ms| {
                Some(ms.saturating_sub(elapsed))
            })
            .unwrap_or_else(|ms| ms);
        Duration::from_millis(previous.saturating_sub(elapsed))
    }

    /// Returns true once a side has no time left.
    pub fn is_flagged(&self, color: Color) -> bool {
        self.remaining_ms(color) == 0
    }
}

impl Default for Clocks {
    fn default() -> Self {
        Clocks::new(Duration::from_secs(600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_full() {
        let clocks = Clocks::new(Duration::from_secs(300));
        assert_eq!(clocks.max_time(), Duration::from_secs(300));
        assert_eq!(clocks.remaining(Color::White), Duration::from_secs(300));
        assert_eq!(clocks.remaining(Color::Black), Duration::from_secs(300));
        assert!(!clocks.is_flagged(Color::White));
    }

    #[test]
    fn consume_saturates() {
        let clocks = Clocks::new(Duration::from_millis(1500));
        assert_eq!(
            clocks.consume(Color::Black, Duration::from_millis(1000)),
            Duration::from_millis(500)
        );
        assert_eq!(
            clocks.consume(Color::Black, Duration::from_secs(5)),
            Duration::ZERO
        );
        assert!(clocks.is_flagged(Color::Black));
        assert!(!clocks.is_flagged(Color::White));
    }

    #[test]
    fn set_and_reset() {
        let clocks = Clocks::default();
        clocks.set_remaining(Color::White, Duration::from_secs(12));
        assert_eq!(clocks.remaining(Color::White), Duration::from_secs(12));
        assert_eq!(clocks.remaining_ms(Color::White), 12_000);

        clocks.reset(Duration::from_secs(60));
        assert_eq!(clocks.remaining(Color::White), Duration::from_secs(60));
        assert_eq!(clocks.max_time(), Duration::from_secs(60));
    }

    #[test]
    fn shared_between_threads() {
        let clocks = Arc::new(Clocks::new(Duration::from_millis(1000)));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let clocks = Arc::clone(&clocks);
                thread::spawn(move || {
                    for _ in 0..10 {
                        clocks.consume(Color::White, Duration::from_millis(10));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(clocks.remaining(Color::White), Duration::from_millis(600));
    }
}
