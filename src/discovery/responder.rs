use super::headers::SsdpMessage;
use crate::config::DeviceConfig;
use crate::error::DeviceError;
use crate::logging::{DeviceLogger, LogLevel};
use crate::profile::DeviceProfile;
use crate::transport::{Transport, UdpTransport};
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

pub const SSDP_PORT: u16 = 1900;

const COMPONENT: &str = "Discovery";

/// Answers SSDP M-SEARCH probes with a unicast copy of the profile's
/// precomputed response buffer. Everything else arriving on the socket is
/// dropped without comment; port 1900 sees plenty of unrelated traffic.
pub struct DiscoveryResponder {
    transport: UdpTransport,
    profile: Arc<DeviceProfile>,
    logger: Arc<dyn DeviceLogger>,
}

impl DiscoveryResponder {
    /// Bind the shared SSDP port on all interfaces and join the configured
    /// multicast group. A failed join degrades discovery to unicast-only and
    /// is reported, not fatal; the socket stays bound.
    pub fn bind(
        config: &DeviceConfig,
        profile: Arc<DeviceProfile>,
        logger: Arc<dyn DeviceLogger>,
    ) -> Result<Self, DeviceError> {
        let bind_addr: SocketAddr = SocketAddr::from(([0, 0, 0, 0], SSDP_PORT));
        let transport = UdpTransport::new_reusable(bind_addr)?;
        transport.set_nonblocking(true)?;

        let group = config.parsed_multicast_group()?;
        if let Err(e) = transport.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED) {
            logger.log(
                LogLevel::Error,
                COMPONENT,
                &format!("failed to join multicast group {}: {}", group, e),
            );
        }

        logger.log(
            LogLevel::Debug,
            COMPONENT,
            &format!("SSDP socket bound on port {}", SSDP_PORT),
        );

        Ok(Self::with_transport(transport, profile, logger))
    }

    /// Build a responder around an already-bound socket. Tests use this to
    /// run the responder on an ephemeral loopback port.
    pub fn with_transport(
        transport: UdpTransport,
        profile: Arc<DeviceProfile>,
        logger: Arc<dyn DeviceLogger>,
    ) -> Self {
        DiscoveryResponder {
            transport,
            profile,
            logger,
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Drain the socket, answering any discovery probes found. Socket-level
    /// errors propagate so the owning loop can stop the responder.
    pub fn poll(&mut self) -> std::io::Result<()> {
        let mut buf = [0u8; 2048];
        loop {
            match self.transport.receive(&mut buf) {
                Ok((len, src)) => self.handle_datagram(&buf[..len], src)?,
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }

    fn handle_datagram(&self, datagram: &[u8], src: SocketAddr) -> std::io::Result<()> {
        let message = SsdpMessage::parse(datagram);
        if !message.is_search() {
            return Ok(());
        }
        self.logger.log(
            LogLevel::Debug,
            COMPONENT,
            &format!("M-SEARCH from {}", src),
        );
        if message.is_discover_probe() {
            // SSDP replies are unicast to the probe's source, never to the
            // multicast group.
            self.transport.send(&self.profile.ssdp_response, Some(src))?;
        }
        Ok(())
    }
}
