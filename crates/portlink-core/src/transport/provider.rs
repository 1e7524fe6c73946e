//! Port discovery and opening
//!
//! [`ConnectionProvider`] turns a [`ConnectionConfig`] into a live
//! [`ByteChannel`]; [`PortEnumerator`] lists the identifiers a config can
//! name. [`SerialProvider`] and [`SystemPorts`] back both with the
//! `serialport` crate. Tests and alternative backends supply their own.

use serialport::{SerialPortInfo, SerialPortType};
use std::fmt;
#[cfg(target_os = "linux")]
use std::fs;
use std::path::Path;

use super::{
    ByteChannel, ConnectionConfig, DataBits, Parity, SerialChannel, StopBits, TransportError,
};

/// Opens duplex byte channels for a configuration
pub trait ConnectionProvider: Send {
    /// Acquire a channel for `config`, or report why not
    fn open_connection(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn ByteChannel>, TransportError>;
}

impl<F> ConnectionProvider for F
where
    F: Fn(&ConnectionConfig) -> Result<Box<dyn ByteChannel>, TransportError> + Send,
{
    fn open_connection(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn ByteChannel>, TransportError> {
        self(config)
    }
}

/// Lists available port identifiers
pub trait PortEnumerator {
    /// Identifiers of every port currently present
    fn list_port_identifiers(&self) -> Vec<String>;

    /// Whether `identifier` names a present port
    fn has_port(&self, identifier: &str) -> bool {
        self.list_port_identifiers()
            .iter()
            .any(|name| name == identifier)
    }
}

/// Information about an available serial port
#[derive(Debug, Clone)]
pub struct PortInfo {
    /// Port name (e.g., "/dev/ttyUSB0" or "COM3")
    pub name: String,

    /// USB vendor ID (if USB device)
    pub vid: Option<u16>,

    /// USB product ID (if USB device)
    pub pid: Option<u16>,

    /// Manufacturer name (if available)
    pub manufacturer: Option<String>,

    /// Product name (if available)
    pub product: Option<String>,
}

impl PortInfo {
    fn bare(name: String) -> Self {
        Self {
            name,
            vid: None,
            pid: None,
            manufacturer: None,
            product: None,
        }
    }
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        match info.port_type {
            SerialPortType::UsbPort(usb_info) => Self {
                name: info.port_name,
                vid: Some(usb_info.vid),
                pid: Some(usb_info.pid),
                manufacturer: usb_info.manufacturer,
                product: usb_info.product,
            },
            _ => Self::bare(info.port_name),
        }
    }
}

impl fmt::Display for PortInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let (Some(vid), Some(pid)) = (self.vid, self.pid) {
            write!(f, " [{:04x}:{:04x}]", vid, pid)?;
        }
        if let Some(product) = &self.product {
            write!(f, " {}", product)?;
        }
        Ok(())
    }
}

/// Ordering rank of a port name: CDC-ACM adapters first, then USB-serial
/// adapters, each by device number, then everything else by name
fn port_rank(name: &str) -> (u8, u32, &str) {
    let base = Path::new(name)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(name);
    let number = |prefix: &str| {
        base.strip_prefix(prefix)
            .map(|n| n.parse::<u32>().unwrap_or(u32::MAX))
    };
    match (number("ttyACM"), number("ttyUSB")) {
        (Some(n), _) => (0, n, base),
        (_, Some(n)) => (1, n, base),
        _ => (2, 0, base),
    }
}

/// USB serial device nodes present under `/dev`
#[cfg(target_os = "linux")]
fn usb_device_nodes() -> Vec<String> {
    let Ok(entries) = fs::read_dir("/dev") else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok()?.file_name().into_string().ok())
        .filter(|name| name.starts_with("ttyACM") || name.starts_with("ttyUSB"))
        .map(|name| format!("/dev/{}", name))
        .collect()
}

#[cfg(not(target_os = "linux"))]
fn usb_device_nodes() -> Vec<String> {
    Vec::new()
}

fn sort_ports(ports: &mut Vec<PortInfo>) {
    ports.sort_by(|a, b| port_rank(&a.name).cmp(&port_rank(&b.name)));
    ports.dedup_by(|a, b| a.name == b.name);
}

/// Serial ports of this machine, USB adapters first.
///
/// Device nodes the OS enumeration missed are added without metadata.
pub fn list_ports() -> Vec<PortInfo> {
    let mut ports: Vec<PortInfo> = match serialport::available_ports() {
        Ok(found) => found.into_iter().map(PortInfo::from).collect(),
        Err(e) => {
            tracing::warn!("serial port enumeration failed: {}", e);
            Vec::new()
        }
    };
    for node in usb_device_nodes() {
        if !ports.iter().any(|p| p.name == node) {
            ports.push(PortInfo::bare(node));
        }
    }
    sort_ports(&mut ports);
    ports
}

/// Enumerates the ports of this machine
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPorts;

impl PortEnumerator for SystemPorts {
    fn list_port_identifiers(&self) -> Vec<String> {
        list_ports().into_iter().map(|p| p.name).collect()
    }
}

/// Opens real serial ports
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialProvider;

impl SerialProvider {
    fn parity(parity: Parity) -> Result<serialport::Parity, TransportError> {
        match parity {
            Parity::None => Ok(serialport::Parity::None),
            Parity::Odd => Ok(serialport::Parity::Odd),
            Parity::Even => Ok(serialport::Parity::Even),
            Parity::Mark | Parity::Space => Err(TransportError::Unsupported(format!(
                "parity {:?} is not available on this backend",
                parity
            ))),
        }
    }

    fn data_bits(bits: DataBits) -> serialport::DataBits {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }

    fn stop_bits(bits: StopBits) -> Result<serialport::StopBits, TransportError> {
        match bits {
            StopBits::One => Ok(serialport::StopBits::One),
            StopBits::Two => Ok(serialport::StopBits::Two),
            StopBits::OnePointFive => Err(TransportError::Unsupported(
                "1.5 stop bits are not available on this backend".to_string(),
            )),
        }
    }
}

impl ConnectionProvider for SerialProvider {
    fn open_connection(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn ByteChannel>, TransportError> {
        config.validate()?;

        let port = serialport::new(&config.port_name, config.baud_rate)
            .data_bits(Self::data_bits(config.data_bits))
            .parity(Self::parity(config.parity)?)
            .stop_bits(Self::stop_bits(config.stop_bits)?)
            .flow_control(serialport::FlowControl::None)
            .timeout(config.connect_timeout())
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice
                | serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => {
                    TransportError::PortNotFound(config.port_name.clone())
                }
                serialport::ErrorKind::InvalidInput => TransportError::Unsupported(e.to_string()),
                _ => TransportError::Open(e.to_string()),
            })?;

        Ok(Box::new(SerialChannel::new(port)))
    }
}
