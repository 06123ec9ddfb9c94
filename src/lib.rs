pub mod config;
pub mod discovery;
pub mod ecp;
pub mod error;
pub mod logging;
pub mod profile;
pub mod runtime;
pub mod transport;

pub use config::DeviceConfig;
pub use discovery::DiscoveryResponder;
pub use ecp::command::{CommandKind, CommandSink, ControlCommand};
pub use ecp::server::ControlServer;
pub use error::DeviceError;
pub use logging::{ConsoleLogger, DeviceLogger, LogBridge, LogLevel};
pub use profile::DeviceProfile;
pub use runtime::{DeviceHandle, start};
pub use transport::{TcpServer, Transport, UdpTransport};
