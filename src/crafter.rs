//! SYN segment factory
//!
//! Builds ready-to-pack TCP headers announcing a connection attempt, with a
//! random ephemeral source port and initial sequence number.

use crate::protocol::tcp::{TcpFlags, TcpHeader, DEFAULT_HEADER_LEN};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

/// Ephemeral source ports (upper bound excluded)
pub const SRC_PORT_RANGE: Range<u16> = 32768..61000;

/// Initial sequence numbers. `u32::MAX` itself is never chosen.
pub const SEQ_NUM_RANGE: Range<u32> = 0..u32::MAX;

/// Advertised window for crafted SYNs
pub const SYN_WINDOW: u16 = 65535;

/// Packet crafter
///
/// Owns its random source, so every crafter needs `&mut` access. Give each
/// thread its own crafter rather than sharing one.
#[derive(Debug)]
pub struct Crafter<R = StdRng> {
    rng: R,
}

impl Crafter<StdRng> {
    /// Crafter seeded once from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Crafter with a fixed seed, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Crafter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Craft a SYN header towards `dst_port`.
    pub fn craft_syn(&mut self, dst_port: u16) -> TcpHeader {
        TcpHeader {
            src_port: self.rng.gen_range(SRC_PORT_RANGE),
            dst_port,
            seq_num: self.rng.gen_range(SEQ_NUM_RANGE),
            ack_num: 0,
            header_len: DEFAULT_HEADER_LEN,
            flags: TcpFlags::SYN,
            window: SYN_WINDOW,
            checksum: 0,
            urgent_ptr: 0,
            options: 0,
            payload: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_craft_syn_fields() {
        let mut crafter = Crafter::with_seed(7);

        for _ in 0..1000 {
            let hdr = crafter.craft_syn(80);
            assert!((32768..=60999).contains(&hdr.src_port));
            assert!(hdr.seq_num <= 4_294_967_294);
            assert_eq!(hdr.dst_port, 80);
            assert_eq!(hdr.flags, TcpFlags::SYN);
            assert_eq!(hdr.ack_num, 0);
            assert_eq!(hdr.header_len, 5);
            assert_eq!(hdr.window, 65535);
            assert_eq!(hdr.checksum, 0);
            assert_eq!(hdr.urgent_ptr, 0);
            assert_eq!(hdr.options, 0);
            assert!(hdr.payload.is_empty());
        }
    }

    #[test]
    fn test_craft_syn_same_seed_same_headers() {
        let mut a = Crafter::with_seed(42);
        let mut b = Crafter::with_seed(42);

        for _ in 0..10 {
            assert_eq!(a.craft_syn(443), b.craft_syn(443));
        }
    }

    #[test]
    fn test_craft_syn_varies() {
        let mut crafter = Crafter::with_seed(1);
        let first = crafter.craft_syn(22);
        let differs = (0..32).any(|_| crafter.craft_syn(22) != first);
        assert!(differs);
    }

    #[test]
    fn test_craft_syn_packs_to_syn_segment() {
        let bytes = Crafter::with_seed(3).craft_syn(80).pack().unwrap();
        assert_eq!(bytes.len(), 20);
        assert_eq!(&bytes[2..4], &[0x00, 0x50]);
        assert_eq!(&bytes[12..16], &[0x50, 0x02, 0xFF, 0xFF]);
    }
}
