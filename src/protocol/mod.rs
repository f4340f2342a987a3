//! Wire formats
//!
//! Only the encoding direction exists: headers are built in memory and
//! packed into bytes, never parsed back.

pub mod tcp;
