use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Status/logging collaborator injected by the owning process. The emulator
/// reports bind results, multicast-join failures and per-connection errors
/// through this trait instead of terminating on them.
pub trait DeviceLogger: Send + Sync {
    fn log(&self, level: LogLevel, component: &str, msg: &str);
}

pub struct ConsoleLogger;

impl ConsoleLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl DeviceLogger for ConsoleLogger {
    fn log(&self, level: LogLevel, component: &str, msg: &str) {
        let level_str = match level {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO ",
            LogLevel::Warn => "WARN ",
            LogLevel::Error => "ERROR",
        };
        println!("[{}] [{}] {}", level_str, component, msg);
    }
}

/// Forwards to the `log` crate facade so hosts that already run a `log`
/// backend (e.g. env_logger) see the emulator's status messages there.
pub struct LogBridge;

impl LogBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl DeviceLogger for LogBridge {
    fn log(&self, level: LogLevel, component: &str, msg: &str) {
        let level = match level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        };
        log::log!(target: "fakeroku", level, "[{}] {}", component, msg);
    }
}
