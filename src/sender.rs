//! Periodic SYN sender
//!
//! Every interval: craft a SYN, pack it and hand it to the sink. Runs until
//! the shutdown future resolves or the packet budget is spent.

use crate::crafter::Crafter;
use crate::telemetry::{SendStats, StatsSnapshot};
use crate::transport::PacketSink;
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

pub struct Sender<S, R = StdRng> {
    sink: S,
    crafter: Crafter<R>,
    dst_port: u16,
    interval: Duration,
    count: Option<u64>,
    stats: Arc<SendStats>,
}

impl<S: PacketSink, R: Rng> Sender<S, R> {
    pub fn new(sink: S, crafter: Crafter<R>, dst_port: u16, interval: Duration) -> Self {
        Self {
            sink,
            crafter,
            dst_port,
            interval,
            count: None,
            stats: Arc::new(SendStats::new()),
        }
    }

    /// Stop after `count` packets (`None`: run until shutdown)
    pub fn with_count(mut self, count: Option<u64>) -> Self {
        self.count = count;
        self
    }

    pub fn stats(&self) -> Arc<SendStats> {
        Arc::clone(&self.stats)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run the send loop.
    ///
    /// The first packet goes out one interval after the start. A packing
    /// failure ends the loop with that error; transport failures are logged
    /// and counted.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<StatsSnapshot>
    where
        F: Future<Output = ()>,
    {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            "sending SYN to port {} every {:?}",
            self.dst_port, self.interval
        );

        let mut attempts: u64 = 0;
        loop {
            if self.count.is_some_and(|limit| attempts >= limit) {
                info!("sent {} packets, stopping", attempts);
                break;
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("shutdown requested, stopping");
                    break;
                }
                _ = ticker.tick() => {
                    self.send_one().await?;
                    attempts += 1;
                }
            }
        }

        let snapshot = self.stats.snapshot();
        debug!(?snapshot, "sender finished");
        Ok(snapshot)
    }

    async fn send_one(&mut self) -> Result<()> {
        let header = self.crafter.craft_syn(self.dst_port);
        let bytes = header.pack()?;
        self.stats.record_crafted();

        match self.sink.send(&bytes).await {
            Ok(len) => {
                self.stats.record_sent(len);
                info!(
                    src_port = header.src_port,
                    dst_port = header.dst_port,
                    seq = header.seq_num,
                    flags = %header.flags,
                    len,
                    "sent packet"
                );
            }
            Err(e) => {
                self.stats.record_send_error();
                warn!("failed to send packet: {}", e);
            }
        }
        Ok(())
    }
}

/// Future resolving on the first SIGINT or SIGTERM.
///
/// Handlers are installed immediately, so this must be called from inside a
/// tokio runtime.
pub fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    let mut sigint = signal(SignalKind::interrupt()).map_err(Error::Io)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(Error::Io)?;

    Ok(async move {
        tokio::select! {
            _ = sigint.recv() => info!("received signal SIGINT, exiting"),
            _ = sigterm.recv() => info!("received signal SIGTERM, exiting"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::tcp::HEADER_SIZE;
    use std::future::pending;
    use std::io;

    #[derive(Default)]
    struct MemorySink {
        frames: Vec<Vec<u8>>,
        fail: bool,
    }

    impl PacketSink for MemorySink {
        async fn send(&mut self, buf: &[u8]) -> Result<usize> {
            if self.fail {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "raw socket not permitted",
                )));
            }
            self.frames.push(buf.to_vec());
            Ok(buf.len())
        }
    }

    fn sender(sink: MemorySink) -> Sender<MemorySink> {
        Sender::new(
            sink,
            Crafter::with_seed(9),
            80,
            Duration::from_millis(1000),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_sends_count_packets() {
        let mut sender = sender(MemorySink::default()).with_count(Some(3));
        let start = Instant::now();

        let snapshot = sender.run(pending()).await.unwrap();

        assert_eq!(snapshot.packets_sent, 3);
        assert_eq!(snapshot.bytes_sent, 3 * HEADER_SIZE as u64);
        assert!(start.elapsed() >= Duration::from_millis(3000));

        for frame in &sender.sink().frames {
            assert_eq!(frame.len(), HEADER_SIZE);
            assert_eq!(&frame[2..4], &80u16.to_be_bytes());
            assert_eq!(frame[13], 0x02);
            assert_eq!(&frame[14..16], &[0xFF, 0xFF]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_on_shutdown() {
        let mut sender = sender(MemorySink::default());

        let snapshot = sender
            .run(time::sleep(Duration::from_millis(3500)))
            .await
            .unwrap();

        assert_eq!(snapshot.packets_sent, 3);
        assert_eq!(sender.sink().frames.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_before_first_tick() {
        let mut sender = sender(MemorySink::default());

        let snapshot = sender.run(async {}).await.unwrap();

        assert_eq!(snapshot, StatsSnapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_errors_are_counted() {
        let sink = MemorySink {
            fail: true,
            ..Default::default()
        };
        let mut sender = sender(sink).with_count(Some(2));

        let snapshot = sender.run(pending()).await.unwrap();

        assert_eq!(snapshot.packets_crafted, 2);
        assert_eq!(snapshot.packets_sent, 0);
        assert_eq!(snapshot.send_errors, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_count_sends_nothing() {
        let mut sender = sender(MemorySink::default()).with_count(Some(0));
        let snapshot = sender.run(pending()).await.unwrap();
        assert_eq!(snapshot.packets_crafted, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stats_shared() {
        let mut sender = sender(MemorySink::default()).with_count(Some(1));
        let stats = sender.stats();
        sender.run(pending()).await.unwrap();
        assert_eq!(stats.packets_sent.get(), 1);
    }
}
