//! TCP protocol - RFC 793
//!
//! Header model and wire encoding for outgoing segments.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          Source Port          |       Destination Port        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                        Sequence Number                        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                    Acknowledgment Number                      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |  Data |       |               |                               |
//! | Offset| Rsrvd |     Flags     |            Window             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           Checksum            |         Urgent Pointer        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             data                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Field values are never validated. A value wider than its wire slot is
//! truncated by the encoding (a data offset of 0x15 goes out as 5), so
//! keeping fields in range is the caller's job.

use crate::{Error, Result};
use std::fmt;
use std::io::{self, Write};
use std::ops::{BitOr, BitOrAssign};

/// Fixed TCP header size (without options)
pub const HEADER_SIZE: usize = 20;

/// Data offset of a header without options, in 32-bit words
pub const DEFAULT_HEADER_LEN: u8 = 5;

/// TCP control flags (byte 13 of the header)
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TcpFlags(pub u8);

impl TcpFlags {
    pub const NONE: TcpFlags = TcpFlags(0);
    pub const FIN: TcpFlags = TcpFlags(0x01);
    pub const SYN: TcpFlags = TcpFlags(0x02);
    pub const RST: TcpFlags = TcpFlags(0x04);
    pub const PSH: TcpFlags = TcpFlags(0x08);
    pub const ACK: TcpFlags = TcpFlags(0x10);
    pub const URG: TcpFlags = TcpFlags(0x20);

    const NAMES: [(TcpFlags, &'static str); 6] = [
        (Self::FIN, "FIN"),
        (Self::SYN, "SYN"),
        (Self::RST, "RST"),
        (Self::PSH, "PSH"),
        (Self::ACK, "ACK"),
        (Self::URG, "URG"),
    ];

    /// Raw bitmask
    pub fn bits(self) -> u8 {
        self.0
    }

    /// True if every bit of `other` is set
    pub fn contains(self, other: TcpFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Connection attempt: SYN without ACK
    pub fn is_syn_only(self) -> bool {
        self.contains(Self::SYN) && !self.contains(Self::ACK)
    }
}

impl BitOr for TcpFlags {
    type Output = TcpFlags;

    fn bitor(self, rhs: TcpFlags) -> TcpFlags {
        TcpFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for TcpFlags {
    fn bitor_assign(&mut self, rhs: TcpFlags) {
        self.0 |= rhs.0;
    }
}

impl From<u8> for TcpFlags {
    fn from(bits: u8) -> Self {
        TcpFlags(bits)
    }
}

impl fmt::Debug for TcpFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for TcpFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut rest = self.0;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
                rest &= !flag.0;
            }
        }
        if rest != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{:#04x}", rest)?;
            first = false;
        }
        if first {
            f.write_str("-")?;
        }
        Ok(())
    }
}

/// TCP header plus payload, ready to be packed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpHeader {
    pub src_port: u16,
    pub dst_port: u16,
    pub seq_num: u32,
    pub ack_num: u32,
    /// Data offset in 32-bit words. Only the low 4 bits reach the wire.
    pub header_len: u8,
    pub flags: TcpFlags,
    pub window: u16,
    /// Sent as given, never computed here
    pub checksum: u16,
    pub urgent_ptr: u16,
    /// Zero placeholder, not emitted (see `pack_into`)
    pub options: u32,
    pub payload: Vec<u8>,
}

impl Default for TcpHeader {
    fn default() -> Self {
        Self {
            src_port: 0,
            dst_port: 0,
            seq_num: 0,
            ack_num: 0,
            header_len: DEFAULT_HEADER_LEN,
            flags: TcpFlags::NONE,
            window: 0,
            checksum: 0,
            urgent_ptr: 0,
            options: 0,
            payload: Vec::new(),
        }
    }
}

impl TcpHeader {
    /// Number of bytes `pack` produces
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Encode the header and payload into a fresh buffer.
    ///
    /// Either every byte is produced or nothing is: the buffer is reserved
    /// up front, and an allocation failure surfaces as [`Error::SinkWrite`].
    pub fn pack(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(self.encoded_len())
            .map_err(|e| Error::SinkWrite(io::Error::new(io::ErrorKind::OutOfMemory, e)))?;
        self.pack_into(&mut buf)?;
        Ok(buf)
    }

    /// Encode the header and payload into `sink`.
    ///
    /// The options word is not written: the data offset is fixed at 5 words,
    /// so the payload starts right after the 20-byte fixed header.
    pub fn pack_into<W: Write>(&self, sink: &mut W) -> Result<()> {
        let mut fixed = [0u8; HEADER_SIZE];
        fixed[0..2].copy_from_slice(&self.src_port.to_be_bytes());
        fixed[2..4].copy_from_slice(&self.dst_port.to_be_bytes());
        fixed[4..8].copy_from_slice(&self.seq_num.to_be_bytes());
        fixed[8..12].copy_from_slice(&self.ack_num.to_be_bytes());
        let word = fuse_offset_flags_window(self.header_len, self.flags.bits(), self.window);
        fixed[12..16].copy_from_slice(&word.to_be_bytes());
        fixed[16..18].copy_from_slice(&self.checksum.to_be_bytes());
        fixed[18..20].copy_from_slice(&self.urgent_ptr.to_be_bytes());

        sink.write_all(&fixed).map_err(Error::SinkWrite)?;
        sink.write_all(&self.payload).map_err(Error::SinkWrite)?;
        Ok(())
    }
}

/// Build the 32-bit word at offset 12.
///
/// `window + (flags << 16) + (header_len << 28)`: data offset in bits 31..28,
/// reserved bits 27..24 zero, flags in bits 23..16, window in bits 15..0.
/// Bits of `header_len` above the low nibble are shifted out.
pub fn fuse_offset_flags_window(header_len: u8, flags: u8, window: u16) -> u32 {
    (window as u32)
        .wrapping_add((flags as u32) << 16)
        .wrapping_add((header_len as u32) << 28)
}
