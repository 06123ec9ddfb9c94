//! Device lifecycle: [`start`] validates configuration, builds the
//! [`DeviceProfile`](crate::profile::DeviceProfile), binds both listeners
//! and runs each on its own polling thread. The returned [`DeviceHandle`]
//! stops them together.
//!
//! The two listeners are deliberately independent: a discovery socket error
//! stops only the discovery thread, and the control listener keeps serving
//! (and vice versa). The owning process decides whether to restart.

pub mod threadpool;

pub use threadpool::ThreadPool;

use crate::config::DeviceConfig;
use crate::discovery::DiscoveryResponder;
use crate::ecp::command::CommandSink;
use crate::ecp::server::ControlServer;
use crate::error::DeviceError;
use crate::logging::{DeviceLogger, LogLevel};
use crate::profile::DeviceProfile;
use std::io::ErrorKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

const COMPONENT: &str = "Runtime";

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Handle to a running emulated device. Dropping it stops both listeners.
pub struct DeviceHandle {
    running: Arc<AtomicBool>,
    discovery_thread: Option<thread::JoinHandle<()>>,
    control_thread: Option<thread::JoinHandle<()>>,
}

impl DeviceHandle {
    /// Stop accepting new work and tear both listeners down. In-flight HTTP
    /// responses finish on the worker pool before its threads join.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.discovery_thread.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.control_thread.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Bring one emulated device up. Configuration errors and listener bind
/// errors surface here, before any thread is spawned; after that, failures
/// are local to the affected listener and reported through the logger.
pub fn start(
    config: DeviceConfig,
    sink: Arc<dyn CommandSink>,
    logger: Arc<dyn DeviceLogger>,
) -> Result<DeviceHandle, DeviceError> {
    config.validate()?;
    let profile = DeviceProfile::from_config(&config)?;

    let control = ControlServer::bind(
        profile.http_addr(),
        Arc::clone(&profile),
        sink,
        Arc::clone(&logger),
    )?;
    let discovery = DiscoveryResponder::bind(&config, Arc::clone(&profile), Arc::clone(&logger))?;

    logger.log(
        LogLevel::Info,
        COMPONENT,
        &format!(
            "device {} up, ecp on {}, ssdp on port {}",
            profile.uuid,
            profile.http_addr(),
            crate::discovery::SSDP_PORT
        ),
    );

    let running = Arc::new(AtomicBool::new(true));

    let discovery_thread = {
        let running = Arc::clone(&running);
        let logger = Arc::clone(&logger);
        thread::Builder::new()
            .name("ssdp-discovery".to_string())
            .spawn(move || run_discovery(discovery, running, logger))?
    };

    let control_thread = {
        let running = Arc::clone(&running);
        let logger = Arc::clone(&logger);
        thread::Builder::new()
            .name("ecp-control".to_string())
            .spawn(move || run_control(control, running, logger))?
    };

    Ok(DeviceHandle {
        running,
        discovery_thread: Some(discovery_thread),
        control_thread: Some(control_thread),
    })
}

fn run_discovery(
    mut responder: DiscoveryResponder,
    running: Arc<AtomicBool>,
    logger: Arc<dyn DeviceLogger>,
) {
    while running.load(Ordering::Relaxed) {
        if let Err(e) = responder.poll() {
            // Socket-level failure stops the responder; no automatic retry.
            logger.log(
                LogLevel::Error,
                COMPONENT,
                &format!("discovery responder stopped: {}", e),
            );
            return;
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn run_control(server: ControlServer, running: Arc<AtomicBool>, logger: Arc<dyn DeviceLogger>) {
    while running.load(Ordering::Relaxed) {
        match server.poll_accept() {
            Ok(()) => {}
            Err(ref e) if e.kind() == ErrorKind::ConnectionAborted => {
                // A peer vanished between accept and handshake; not our
                // listener's problem.
            }
            Err(e) => {
                logger.log(LogLevel::Error, COMPONENT, &format!("accept failed: {}", e));
            }
        }
        thread::sleep(POLL_INTERVAL);
    }
    // ControlServer drops here; its worker pool drains in-flight
    // connections before the thread exits.
}
