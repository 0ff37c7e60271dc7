use serde::{Deserialize, Serialize};
use serialport::{SerialPortInfo, SerialPortType};
use std::fmt;
use std::time::Duration;

use crate::config::*;
use crate::error::UartError;

/// A serial port as shown in the port selector
#[derive(Debug, Clone, PartialEq)]
pub struct PortInfo {
    pub name: String,
    pub description: String,
    pub is_ch341: bool,
}

impl PortInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>, vid: Option<u16>) -> Self {
        let description = description.into();
        let is_ch341 = is_ch341_device(vid, &description);
        Self {
            name: name.into(),
            description,
            is_ch341,
        }
    }
}

impl From<&SerialPortInfo> for PortInfo {
    fn from(info: &SerialPortInfo) -> Self {
        match &info.port_type {
            SerialPortType::UsbPort(usb) => {
                let product = usb
                    .product
                    .clone()
                    .or_else(|| usb.manufacturer.clone())
                    .unwrap_or_else(|| "USB Serial".to_string());
                let description = format!("{} ({:04X}:{:04X})", product, usb.vid, usb.pid);
                PortInfo::new(&info.port_name, description, Some(usb.vid))
            }
            SerialPortType::PciPort => PortInfo::new(&info.port_name, "PCI Serial", None),
            SerialPortType::BluetoothPort => PortInfo::new(&info.port_name, "Bluetooth", None),
            SerialPortType::Unknown => PortInfo::new(&info.port_name, "Serial Port", None),
        }
    }
}

impl fmt::Display for PortInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.description)?;
        if self.is_ch341 {
            write!(f, " [CH341]")?;
        }
        Ok(())
    }
}

/// CH340 and CH341 share a vendor id and show up under either name.
pub fn is_ch341_device(vid: Option<u16>, description: &str) -> bool {
    vid == Some(WCH_VENDOR_ID) || description.contains("CH340") || description.contains("CH341")
}

pub fn available_ports() -> Result<Vec<PortInfo>, UartError> {
    let ports = serialport::available_ports().map_err(UartError::Enumerate)?;
    Ok(ports.iter().map(PortInfo::from).collect())
}

pub fn ch341_ports(ports: &[PortInfo]) -> Vec<PortInfo> {
    ports.iter().filter(|p| p.is_ch341).cloned().collect()
}

/// First CH341 port if any, otherwise the first port listed.
pub fn preferred_port(ports: &[PortInfo]) -> Option<&PortInfo> {
    ports.iter().find(|p| p.is_ch341).or_else(|| ports.first())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Parity {
    #[default]
    None,
    Even,
    Odd,
}

impl Parity {
    pub const ALL: [Parity; 3] = [Parity::None, Parity::Even, Parity::Odd];

    /// Mark and Space have no serial backend support and fall back to None.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "Even" => Parity::Even,
            "Odd" => Parity::Odd,
            _ => Parity::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Parity::None => "None",
            Parity::Even => "Even",
            Parity::Odd => "Odd",
        }
    }
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Even => serialport::Parity::Even,
            Parity::Odd => serialport::Parity::Odd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StopBits {
    #[default]
    One,
    Two,
}

impl StopBits {
    pub const ALL: [StopBits; 2] = [StopBits::One, StopBits::Two];

    /// "1.5" is not available on the serial backend and maps to one stop bit.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "2" => StopBits::Two,
            _ => StopBits::One,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StopBits::One => "1",
            StopBits::Two => "2",
        }
    }
}

impl From<StopBits> for serialport::StopBits {
    fn from(stop_bits: StopBits) -> Self {
        match stop_bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
        }
    }
}

/// UART framing and timing used when opening a port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSettings {
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_data_bits")]
    pub data_bits: u8,
    #[serde(default)]
    pub parity: Parity,
    #[serde(default)]
    pub stop_bits: StopBits,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_data_bits() -> u8 {
    DEFAULT_DATA_BITS
}

fn default_timeout_ms() -> u64 {
    SERIAL_TIMEOUT_MS
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DEFAULT_DATA_BITS,
            parity: Parity::None,
            stop_bits: StopBits::One,
            timeout_ms: SERIAL_TIMEOUT_MS,
        }
    }
}

impl LineSettings {
    /// Pull hand-edited values back into the range the port and UI support.
    pub fn normalize(&mut self) {
        let (min, max) = (*DATA_BITS.start(), *DATA_BITS.end());
        self.data_bits = self.data_bits.clamp(min, max);
        self.timeout_ms = self.timeout_ms.max(MIN_SERIAL_TIMEOUT_MS);
        if self.baud_rate == 0 {
            self.baud_rate = DEFAULT_BAUD_RATE;
        }
    }

    pub fn data_bits(&self) -> serialport::DataBits {
        match self.data_bits {
            5 => serialport::DataBits::Five,
            6 => serialport::DataBits::Six,
            7 => serialport::DataBits::Seven,
            _ => serialport::DataBits::Eight,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn builder(&self, port: &str) -> serialport::SerialPortBuilder {
        serialport::new(port, self.baud_rate)
            .data_bits(self.data_bits())
            .parity(self.parity.into())
            .stop_bits(self.stop_bits.into())
            .flow_control(serialport::FlowControl::None)
            .timeout(self.timeout())
    }
}

impl fmt::Display for LineSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        };
        write!(
            f,
            "{} {}{}{}",
            self.baud_rate,
            self.data_bits,
            parity,
            self.stop_bits.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_ch341_by_vendor_or_name() {
        assert!(is_ch341_device(Some(0x1A86), "USB Serial"));
        assert!(is_ch341_device(None, "USB-SERIAL CH340 (COM4)"));
        assert!(is_ch341_device(Some(0x0403), "CH341 adapter"));
        assert!(!is_ch341_device(Some(0x0403), "FT232R USB UART"));
    }

    #[test]
    fn preferred_port_favours_ch341() {
        let ports = vec![
            PortInfo::new("/dev/ttyS0", "Serial Port", None),
            PortInfo::new("/dev/ttyUSB0", "USB Serial", Some(WCH_VENDOR_ID)),
        ];
        assert_eq!(preferred_port(&ports).unwrap().name, "/dev/ttyUSB0");
        assert_eq!(ch341_ports(&ports).len(), 1);

        let plain = vec![PortInfo::new("COM1", "Serial Port", None)];
        assert_eq!(preferred_port(&plain).unwrap().name, "COM1");
        assert!(preferred_port(&[]).is_none());
    }

    #[test]
    fn port_display_marks_ch341() {
        let port = PortInfo::new("COM3", "USB-SERIAL CH340", None);
        assert_eq!(port.to_string(), "COM3 - USB-SERIAL CH340 [CH341]");
        let other = PortInfo::new("COM1", "Communications Port", None);
        assert_eq!(other.to_string(), "COM1 - Communications Port");
    }

    #[test]
    fn unsupported_framing_falls_back() {
        assert_eq!(Parity::parse("Mark"), Parity::None);
        assert_eq!(Parity::parse("Space"), Parity::None);
        assert_eq!(Parity::parse("Odd"), Parity::Odd);
        assert_eq!(StopBits::parse("1.5"), StopBits::One);
        assert_eq!(StopBits::parse("2"), StopBits::Two);
    }

    #[test]
    fn settings_fill_missing_fields_from_defaults() {
        let settings: LineSettings = serde_json::from_str(r#"{"baud_rate": 9600}"#).unwrap();
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.data_bits, 8);
        assert_eq!(settings.timeout_ms, SERIAL_TIMEOUT_MS);
        assert_eq!(settings.to_string(), "9600 8N1");
    }

    #[test]
    fn normalize_clamps_out_of_range_values() {
        let mut settings: LineSettings =
            serde_json::from_str(r#"{"baud_rate": 0, "data_bits": 9, "timeout_ms": 0}"#).unwrap();
        settings.normalize();
        assert_eq!(settings.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(settings.data_bits, 8);
        assert_eq!(settings.timeout_ms, MIN_SERIAL_TIMEOUT_MS);

        settings.data_bits = 3;
        settings.timeout_ms = 250;
        settings.normalize();
        assert_eq!(settings.data_bits, 5);
        assert_eq!(settings.timeout_ms, 250);
    }
}
