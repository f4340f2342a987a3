//! Raw IPv4 socket carrying TCP segments
//!
//! `socket(AF_INET, SOCK_RAW, IPPROTO_TCP)`: the kernel builds the IP header,
//! we supply everything from the TCP header on. Needs CAP_NET_RAW.

use super::PacketSink;
use crate::{Error, Result};
use std::net::Ipv4Addr;
use std::os::unix::io::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use tokio::io::unix::AsyncFd;

/// Raw socket connected to a single destination
pub struct RawSocket {
    async_fd: AsyncFd<OwnedFd>,
    peer: Ipv4Addr,
}

impl RawSocket {
    /// Open a raw TCP socket and connect it to `peer`
    pub fn connect(peer: Ipv4Addr) -> Result<Self> {
        let fd = unsafe {
            libc::socket(
                libc::AF_INET,
                libc::SOCK_RAW | libc::SOCK_NONBLOCK | libc::SOCK_CLOEXEC,
                libc::IPPROTO_TCP,
            )
        };

        if fd < 0 {
            return Err(Error::Io(std::io::Error::last_os_error()));
        }

        // Owned from here on, closed on every error path
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };

        let mut sockaddr: libc::sockaddr_in = unsafe { std::mem::zeroed() };
        sockaddr.sin_family = libc::AF_INET as libc::sa_family_t;
        sockaddr.sin_addr = libc::in_addr {
            s_addr: u32::from(peer).to_be(),
        };

        let ret = unsafe {
            libc::connect(
                fd.as_raw_fd(),
                &sockaddr as *const _ as *const libc::sockaddr,
                std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
            )
        };

        if ret < 0 {
            return Err(Error::Io(std::io::Error::last_os_error()));
        }

        let async_fd = AsyncFd::new(fd).map_err(Error::Io)?;

        Ok(Self { async_fd, peer })
    }

    /// Send one segment (async)
    pub async fn send(&mut self, buf: &[u8]) -> Result<usize> {
        loop {
            let mut guard = self.async_fd.writable_mut().await.map_err(Error::Io)?;

            match guard.try_io(|inner| {
                let fd = inner.get_ref().as_raw_fd();
                let n = unsafe { libc::send(fd, buf.as_ptr() as *const _, buf.len(), 0) };
                if n < 0 {
                    Err(std::io::Error::last_os_error())
                } else {
                    Ok(n as usize)
                }
            }) {
                Ok(Ok(len)) => return Ok(len),
                Ok(Err(e)) => return Err(Error::Io(e)),
                Err(_would_block) => continue,
            }
        }
    }

    pub fn peer(&self) -> Ipv4Addr {
        self.peer
    }
}

impl AsRawFd for RawSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.async_fd.get_ref().as_raw_fd()
    }
}

impl PacketSink for RawSocket {
    async fn send(&mut self, buf: &[u8]) -> Result<usize> {
        RawSocket::send(self, buf).await
    }
}
