use crate::config::DeviceConfig;
use crate::error::DeviceError;
use std::net::IpAddr;
use std::sync::Arc;

/// Default UPnP device description served on `GET /`.
pub const DEFAULT_DESCRIPTION_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
<specVersion>
<major>1</major>
<minor>0</minor>
</specVersion>
<device>
<deviceType>urn:roku-com:device:player:1-0</deviceType>
<friendlyName>50" TCL Roku TV</friendlyName>
<manufacturer>TCL</manufacturer>
<manufacturerURL>support.tcl.com/us</manufacturerURL>
<modelDescription>Roku Streaming Player Network Media</modelDescription>
<modelName>7104X</modelName>
<modelNumber>7104X</modelNumber>
<modelURL>http://www.roku.com/</modelURL>
<serialNumber>YN00RF206994</serialNumber>
<UDN>uuid:29780022-5803-1028-8092-2cd97406a5ec</UDN>
<iconList>
<icon>
<mimetype>image/png</mimetype>
<width>360</width>
<height>219</height>
<depth>8</depth>
<url>device-image.png</url>
</icon>
</iconList>
<serviceList>
<service>
<serviceType>urn:roku-com:service:ecp:1</serviceType>
<serviceId>urn:roku-com:serviceId:ecp1-0</serviceId>
<controlURL/>
<eventSubURL/>
<SCPDURL>ecp_SCPD.xml</SCPDURL>
</service>
<service>
<serviceType>urn:dial-multiscreen-org:service:dial:1</serviceType>
<serviceId>urn:dial-multiscreen-org:serviceId:dial1-0</serviceId>
<controlURL/>
<eventSubURL/>
<SCPDURL>dial_SCPD.xml</SCPDURL>
</service>
</serviceList>
</device>
</root>"#;

/// Default app list served on `GET /query/apps`.
pub const DEFAULT_APPS_XML: &str = r#"<apps>
<app id="11">Roku Channel Store</app>
<app id="12">Netflix</app>
<app id="13">Amazon Video on Demand</app>
<app id="837">YouTube</app>
<app id="2016">Crackle</app>
<app id="3423">Rdio</app>
<app id="21952">Blockbuster</app>
<app id="31012">MGO</app>
<app id="43594">CinemaNow</app>
<app id="46041">Sling TV</app>
<app id="50025">GooglePlay</app>
</apps>"#;

/// Default device info served on `GET /query/device-info`.
pub const DEFAULT_DEVICE_INFO_XML: &str = r#"<device-info>
<udn>29780022-5803-1028-8092-2cd97406a5ec</udn>
<serial-number>YN00RF206994</serial-number>
<device-id>9S67DR206994</device-id>
<advertising-id>ffd2e4e1-033b-5652-a7c7-6dc8f8786300</advertising-id>
<vendor-name>TCL</vendor-name>
<model-name>49S403</model-name>
<model-number>7104X</model-number>
<model-region>US</model-region>
<is-tv>true</is-tv>
<is-stick>false</is-stick>
<screen-size>50</screen-size>
<ui-resolution>1080p</ui-resolution>
<supports-ethernet>true</supports-ethernet>
<wifi-mac>2c:d9:74:06:a5:ec</wifi-mac>
<ethernet-mac>5c:ad:76:54:0f:33</ethernet-mac>
<network-type>wifi</network-type>
<friendly-device-name>50" TCL Roku TV</friendly-device-name>
<friendly-model-name>TCL-Roku TV</friendly-model-name>
<default-device-name>TCL-Roku TV - YN00RF206994</default-device-name>
<build-number>30C.00E04193A</build-number>
<software-version>11.0.0</software-version>
<software-build>4193</software-build>
<secure-device>true</secure-device>
<language>en</language>
<country>US</country>
<locale>en_US</locale>
<time-zone>US/Eastern</time-zone>
<time-zone-offset>-240</time-zone-offset>
<power-mode>PowerOn</power-mode>
<supports-suspend>true</supports-suspend>
<supports-find-remote>false</supports-find-remote>
<developer-enabled>false</developer-enabled>
<search-enabled>true</search-enabled>
<voice-search-enabled>true</voice-search-enabled>
<notifications-enabled>true</notifications-enabled>
<supports-private-listening>true</supports-private-listening>
<headphones-connected>false</headphones-connected>
<supports-ecs-textedit>true</supports-ecs-textedit>
<supports-ecs-microphone>true</supports-ecs-microphone>
<supports-wake-on-wlan>true</supports-wake-on-wlan>
<supports-airplay>true</supports-airplay>
<has-play-on-roku>true</has-play-on-roku>
<support-url>support.tcl.com/us</support-url>
</device-info>"#;

/// Immutable identity bundle for one emulated device. Built once from
/// configuration, then shared read-only between the discovery responder and
/// the control server.
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    pub uuid: String,
    pub http_port: u16,
    pub bind_address: IpAddr,
    /// Complete HTTP-over-UDP response sent as the unicast reply to every
    /// matching M-SEARCH probe.
    pub ssdp_response: Vec<u8>,
    pub description_xml: String,
    pub device_info_xml: String,
    pub apps_xml: String,
}

impl DeviceProfile {
    /// Pure data assembly, no network I/O. Identical configuration yields a
    /// byte-identical SSDP response buffer.
    pub fn from_config(config: &DeviceConfig) -> Result<Arc<Self>, DeviceError> {
        let bind_address = config.parsed_bind_address()?;

        let ssdp_response = format!(
            "HTTP/1.1 200 OK\r\n\
             Cache-Control: max-age=300\r\n\
             ST: roku:ecp\r\n\
             USN: uuid:roku:ecp:{}\r\n\
             Ext: \r\n\
             Server: Roku UPnP/1.0 MiniUPnPd/1.4\r\n\
             LOCATION: http://{}:{}/\r\n\r\n",
            config.uuid, bind_address, config.http_port
        )
        .into_bytes();

        Ok(Arc::new(DeviceProfile {
            uuid: config.uuid.clone(),
            http_port: config.http_port,
            bind_address,
            ssdp_response,
            description_xml: config
                .description_xml
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION_XML.to_string()),
            device_info_xml: config
                .device_info_xml
                .clone()
                .unwrap_or_else(|| DEFAULT_DEVICE_INFO_XML.to_string()),
            apps_xml: config
                .apps_xml
                .clone()
                .unwrap_or_else(|| DEFAULT_APPS_XML.to_string()),
        }))
    }

    pub fn http_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::new(self.bind_address, self.http_port)
    }
}
