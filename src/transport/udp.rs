use super::traits::Transport;
use std::io::Result;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    pub fn new(bind_addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(bind_addr)?;
        Ok(UdpTransport { socket })
    }

    /// Bind with SO_REUSEADDR (and SO_REUSEPORT on unix) so several SSDP
    /// listeners on the host can share the well-known discovery port.
    pub fn new_reusable(bind_addr: SocketAddr) -> Result<Self> {
        let socket = socket2::Socket::new(
            socket2::Domain::IPV4,
            socket2::Type::DGRAM,
            Some(socket2::Protocol::UDP),
        )?;
        socket.set_reuse_address(true)?;
        #[cfg(unix)]
        socket.set_reuse_port(true)?;
        socket.bind(&bind_addr.into())?;
        Ok(UdpTransport {
            socket: socket.into(),
        })
    }

    pub fn try_clone(&self) -> Result<Self> {
        Ok(UdpTransport {
            socket: self.socket.try_clone()?,
        })
    }

    pub fn set_nonblocking(&self, nonblocking: bool) -> Result<()> {
        self.socket.set_nonblocking(nonblocking)
    }

    pub fn set_read_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        self.socket.set_read_timeout(timeout)
    }

    pub fn join_multicast_v4(&self, multiaddr: &Ipv4Addr, interface: &Ipv4Addr) -> Result<()> {
        self.socket.join_multicast_v4(multiaddr, interface)
    }
}

impl Transport for UdpTransport {
    fn send(&self, data: &[u8], destination: Option<SocketAddr>) -> Result<usize> {
        if let Some(dest) = destination {
            self.socket.send_to(data, dest)
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "UDP requires a destination address",
            ))
        }
    }

    fn receive(&self, buffer: &mut [u8]) -> Result<(usize, SocketAddr)> {
        self.socket.recv_from(buffer)
    }

    fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr()
    }
}
