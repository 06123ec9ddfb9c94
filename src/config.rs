use crate::error::DeviceError;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

pub const DEFAULT_MULTICAST_GROUP: &str = "239.255.255.250";

/// Configuration for one emulated device. The surrounding application
/// supplies this already mostly validated; `validate` only performs the
/// basic type/range checks the emulator owns itself.
#[derive(Debug, Deserialize, Clone)]
pub struct DeviceConfig {
    /// IP the ECP server binds to, also embedded in the SSDP LOCATION header.
    pub bind_address: String,
    pub http_port: u16,
    #[serde(default = "default_multicast_group")]
    pub multicast_group: String,
    pub uuid: String,

    /// Optional overrides for the XML payloads. The emulator treats these as
    /// opaque blobs; defaults are used when absent.
    #[serde(default)]
    pub description_xml: Option<String>,
    #[serde(default)]
    pub device_info_xml: Option<String>,
    #[serde(default)]
    pub apps_xml: Option<String>,
}

fn default_multicast_group() -> String {
    DEFAULT_MULTICAST_GROUP.to_string()
}

impl DeviceConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DeviceError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: DeviceConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DeviceError> {
        self.parsed_bind_address()?;
        self.parsed_multicast_group()?;
        if self.http_port == 0 {
            return Err(DeviceError::InvalidHttpPort);
        }
        if self.uuid.trim().is_empty() {
            return Err(DeviceError::EmptyUuid);
        }
        Ok(())
    }

    pub fn parsed_bind_address(&self) -> Result<IpAddr, DeviceError> {
        self.bind_address
            .parse()
            .map_err(|_| DeviceError::InvalidBindAddress(self.bind_address.clone()))
    }

    pub fn parsed_multicast_group(&self) -> Result<Ipv4Addr, DeviceError> {
        let group: Ipv4Addr = self
            .multicast_group
            .parse()
            .map_err(|_| DeviceError::InvalidMulticastGroup(self.multicast_group.clone()))?;
        if !group.is_multicast() {
            return Err(DeviceError::InvalidMulticastGroup(self.multicast_group.clone()));
        }
        Ok(group)
    }
}
