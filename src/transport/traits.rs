use std::io::Result;
use std::net::SocketAddr;

/// Datagram-style transport seam. Object-safe so tests and alternative
/// backends can stand in for a real socket.
pub trait Transport: Send + Sync {
    /// Send data to the given destination. UDP transports require one.
    fn send(&self, data: &[u8], destination: Option<SocketAddr>) -> Result<usize>;

    /// Receive data, returning the number of bytes read and the source.
    fn receive(&self, buffer: &mut [u8]) -> Result<(usize, SocketAddr)>;

    fn local_addr(&self) -> Result<SocketAddr>;
}
