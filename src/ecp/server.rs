use super::command::{CommandRoute, CommandSink, route_command};
use super::http::{self, HttpRequest, XML_CONTENT_TYPE};
use crate::error::DeviceError;
use crate::logging::{DeviceLogger, LogLevel};
use crate::profile::DeviceProfile;
use crate::runtime::threadpool::ThreadPool;
use crate::transport::TcpServer;
use std::io::BufReader;
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;

const COMPONENT: &str = "ControlServer";

/// Serves the ECP surface: device description, query endpoints and command
/// requests. One request per connection; every response closes it.
pub struct ControlServer {
    listener: TcpServer,
    profile: Arc<DeviceProfile>,
    sink: Arc<dyn CommandSink>,
    logger: Arc<dyn DeviceLogger>,
    pool: ThreadPool,
}

impl ControlServer {
    /// Bind the configured ECP address. Bind errors (port in use, permission
    /// denied) surface to the caller; there is no retry.
    pub fn bind(
        addr: SocketAddr,
        profile: Arc<DeviceProfile>,
        sink: Arc<dyn CommandSink>,
        logger: Arc<dyn DeviceLogger>,
    ) -> Result<Self, DeviceError> {
        let listener = TcpServer::bind(addr)?;
        listener.set_nonblocking(true)?;
        logger.log(
            LogLevel::Debug,
            COMPONENT,
            &format!("listening on {}", listener.local_addr()?),
        );
        Ok(ControlServer {
            listener,
            profile,
            sink,
            logger,
            pool: ThreadPool::new(4),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept all pending connections and hand each to the worker pool,
    /// keyed by peer IP so one slow client cannot reorder its own requests.
    pub fn poll_accept(&self) -> std::io::Result<()> {
        while let Some((stream, peer)) = self.listener.accept()? {
            let profile = Arc::clone(&self.profile);
            let sink = Arc::clone(&self.sink);
            let logger = Arc::clone(&self.logger);
            self.pool.execute(
                move || {
                    if let Err(e) = handle_connection(&stream, &profile, sink.as_ref(), logger.as_ref())
                    {
                        logger.log(
                            LogLevel::Error,
                            COMPONENT,
                            &format!("connection {}: {}", peer, e),
                        );
                    }
                },
                Some(peer.ip()),
            );
        }
        Ok(())
    }
}

fn handle_connection(
    stream: &TcpStream,
    profile: &DeviceProfile,
    sink: &dyn CommandSink,
    logger: &dyn DeviceLogger,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);
    let request = http::read_request(&mut reader)?;
    let (content_type, body) = dispatch(profile, &request, sink, logger);
    http::write_ok(&mut &*stream, content_type, body)
    // stream drops here, closing the connection.
}

/// Routing contract, in priority order: description, known queries, the
/// permissive empty-200 for unknown GETs, and command handling for any
/// other method. Always status 200.
fn dispatch<'a>(
    profile: &'a DeviceProfile,
    request: &HttpRequest,
    sink: &dyn CommandSink,
    logger: &dyn DeviceLogger,
) -> (Option<&'static str>, &'a [u8]) {
    if request.is_get() {
        let body: &[u8] = match request.target.as_str() {
            "/" => profile.description_xml.as_bytes(),
            "/query/apps" => profile.apps_xml.as_bytes(),
            "/query/device-info" => profile.device_info_xml.as_bytes(),
            // Unknown queries answer an empty success, mirroring real-device
            // permissiveness.
            _ => b"",
        };
        return (Some(XML_CONTENT_TYPE), body);
    }

    match route_command(&request.target) {
        CommandRoute::Emit(command) => {
            logger.log(
                LogLevel::Debug,
                COMPONENT,
                &format!("{} {}", command.kind, command.payload),
            );
            sink.deliver(command);
        }
        CommandRoute::Diagnostic { action, payload } => {
            logger.log(
                LogLevel::Debug,
                COMPONENT,
                &format!("{} {} (not implemented)", action, payload),
            );
        }
        CommandRoute::Unrecognized | CommandRoute::NoMatch => {}
    }
    (None, b"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;
    use crate::ecp::command::ControlCommand;
    use crate::logging::ConsoleLogger;
    use std::collections::HashMap;
    use std::sync::mpsc;

    fn test_profile() -> Arc<DeviceProfile> {
        let config = DeviceConfig {
            bind_address: "127.0.0.1".to_string(),
            http_port: 8060,
            multicast_group: "239.255.255.250".to_string(),
            uuid: "test-uuid".to_string(),
            description_xml: Some("<desc/>".to_string()),
            device_info_xml: Some("<info/>".to_string()),
            apps_xml: Some("<apps/>".to_string()),
        };
        DeviceProfile::from_config(&config).unwrap()
    }

    fn request(method: &str, target: &str) -> HttpRequest {
        HttpRequest {
            method: method.to_string(),
            target: target.to_string(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    fn run(method: &str, target: &str) -> (Option<&'static str>, Vec<u8>, Vec<ControlCommand>) {
        let profile = test_profile();
        let (tx, rx) = mpsc::channel::<ControlCommand>();
        let logger = ConsoleLogger::new();
        let (content_type, body) =
            dispatch(&profile, &request(method, target), &tx, logger.as_ref());
        (content_type, body.to_vec(), rx.try_iter().collect())
    }

    #[test]
    fn test_get_root_serves_description() {
        let (content_type, body, commands) = run("GET", "/");
        assert_eq!(content_type, Some(XML_CONTENT_TYPE));
        assert_eq!(body, b"<desc/>");
        assert!(commands.is_empty());
    }

    #[test]
    fn test_get_known_queries() {
        let (_, body, _) = run("GET", "/query/apps");
        assert_eq!(body, b"<apps/>");
        let (_, body, _) = run("GET", "/query/device-info");
        assert_eq!(body, b"<info/>");
    }

    #[test]
    fn test_unknown_get_is_empty_200() {
        let (content_type, body, commands) = run("GET", "/query/active-app");
        assert_eq!(content_type, Some(XML_CONTENT_TYPE));
        assert!(body.is_empty());
        assert!(commands.is_empty());
    }

    #[test]
    fn test_post_keydown_emits_command() {
        let (content_type, body, commands) = run("POST", "/keydown/Home");
        assert_eq!(content_type, None);
        assert!(body.is_empty());
        assert_eq!(
            commands,
            vec![ControlCommand {
                kind: crate::ecp::command::CommandKind::KeyDown,
                payload: "Home".to_string()
            }]
        );
    }

    #[test]
    fn test_post_empty_argument_emits_nothing() {
        let (_, _, commands) = run("POST", "/keydown/");
        assert!(commands.is_empty());
    }

    #[test]
    fn test_post_launch_is_diagnostic_only() {
        let (content_type, body, commands) = run("POST", "/launch/12");
        assert_eq!(content_type, None);
        assert!(body.is_empty());
        assert!(commands.is_empty());
    }
}
