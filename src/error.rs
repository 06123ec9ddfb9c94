use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("invalid multicast group '{0}'")]
    InvalidMulticastGroup(String),

    #[error("http port must be non-zero")]
    InvalidHttpPort,

    #[error("device uuid must not be empty")]
    EmptyUuid,

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
}
