//! pktcrafter - TCP SYN packet crafter
//!
//! Builds TCP headers, packs them into their exact wire format and emits
//! them over a raw IPv4 socket at a fixed interval.

pub mod config;
pub mod crafter;
pub mod error;
pub mod protocol;
pub mod sender;
pub mod telemetry;
pub mod transport;

pub use crafter::Crafter;
pub use error::{Error, Result};
pub use protocol::tcp::{TcpFlags, TcpHeader};
