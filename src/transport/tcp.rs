use std::io::{ErrorKind, Result};
use std::net::{SocketAddr, TcpListener, TcpStream};

/// Thin wrapper around the ECP listener socket. Connections are handed to
/// the caller as they arrive; no connection registry is kept because every
/// exchange is answered and closed.
pub struct TcpServer {
    listener: TcpListener,
}

impl TcpServer {
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(TcpServer { listener })
    }

    pub fn set_nonblocking(&self, nonblocking: bool) -> Result<()> {
        self.listener.set_nonblocking(nonblocking)
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept one pending connection. Returns `None` when the listener is
    /// non-blocking and nothing is queued.
    pub fn accept(&self) -> Result<Option<(TcpStream, SocketAddr)>> {
        match self.listener.accept() {
            Ok((stream, addr)) => Ok(Some((stream, addr))),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::thread;

    #[test]
    fn test_bind_ephemeral() {
        let server = TcpServer::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        assert!(server.local_addr().unwrap().port() > 0);
    }

    #[test]
    fn test_nonblocking_accept_returns_none() {
        let server = TcpServer::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        server.set_nonblocking(true).unwrap();
        assert!(server.accept().unwrap().is_none());
    }

    #[test]
    fn test_accept_and_echo() {
        let server = TcpServer::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = server.local_addr().unwrap();

        let client = thread::spawn(move || {
            let mut stream = TcpStream::connect(addr).unwrap();
            stream.write_all(b"ping").unwrap();
            let mut buf = [0u8; 4];
            stream.read_exact(&mut buf).unwrap();
            buf
        });

        let (mut stream, peer) = server.accept().unwrap().expect("connection expected");
        assert!(peer.port() > 0);
        let mut buf = [0u8; 4];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");
        stream.write_all(b"pong").unwrap();

        assert_eq!(&client.join().unwrap(), b"pong");
    }
}
