//! Send counters.
//!
//! Shared between the send loop and whoever reports on it, so every field is
//! an atomic counter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for thread-safe increment operations.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, val: u64) {
        self.0.fetch_add(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Statistics of one sender.
#[derive(Debug, Default)]
pub struct SendStats {
    /// Segments crafted and packed.
    pub packets_crafted: Counter,
    /// Segments handed to the transport.
    pub packets_sent: Counter,
    /// Bytes handed to the transport.
    pub bytes_sent: Counter,
    /// Transport write failures.
    pub send_errors: Counter,
}

impl SendStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_crafted(&self) {
        self.packets_crafted.inc();
    }

    pub fn record_sent(&self, bytes: usize) {
        self.packets_sent.inc();
        self.bytes_sent.add(bytes as u64);
    }

    pub fn record_send_error(&self) {
        self.send_errors.inc();
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            packets_crafted: self.packets_crafted.get(),
            packets_sent: self.packets_sent.get(),
            bytes_sent: self.bytes_sent.get(),
            send_errors: self.send_errors.get(),
        }
    }
}

/// Plain copy of [`SendStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub packets_crafted: u64,
    pub packets_sent: u64,
    pub bytes_sent: u64,
    pub send_errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counter_basic() {
        let counter = Counter::new();
        assert_eq!(counter.get(), 0);

        counter.inc();
        counter.add(4);
        assert_eq!(counter.get(), 5);
    }

    #[test]
    fn test_counter_concurrent() {
        let counter = Arc::new(Counter::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let c = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..250 {
                        c.inc();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(counter.get(), 1000);
    }

    #[test]
    fn test_send_stats_snapshot() {
        let stats = SendStats::new();
        stats.record_crafted();
        stats.record_crafted();
        stats.record_sent(20);
        stats.record_send_error();

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                packets_crafted: 2,
                packets_sent: 1,
                bytes_sent: 20,
                send_errors: 1,
            }
        );
    }
}
