//! USB/IP discovery wire records
//!
//! Fixed-layout records exchanged during a device-list query. The layouts
//! match the USB/IP userspace tools: all integers are big-endian (network
//! byte order), strings live in fixed-width NUL-padded fields, and every
//! record has a known `SIZE` so the peer can be read in exact chunks.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Read, Write};

use crate::error::{ProtocolError, Result};
use crate::version::USBIP_VERSION;

/// Operation codes for the discovery exchange
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    /// Request the list of exportable devices
    ReqDevlist = 0x8005,
    /// Reply carrying the device list
    RepDevlist = 0x0005,
}

impl OpCode {
    /// Decode a known operation code; unknown values stay raw with the caller
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x8005 => Some(Self::ReqDevlist),
            0x0005 => Some(Self::RepDevlist),
            _ => None,
        }
    }
}

/// Operation header preceding every discovery message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpCommon {
    /// Protocol version word
    pub version: u16,
    /// Operation code
    pub code: u16,
    /// Status, 0 on success
    pub status: u16,
}

impl OpCommon {
    /// Size of the header in bytes
    pub const SIZE: usize = 6;

    /// Build a request header for the given operation
    pub fn request(code: OpCode) -> Self {
        Self {
            version: USBIP_VERSION,
            code: code as u16,
            status: 0,
        }
    }

    /// Encode into exactly `SIZE` bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        buf.extend_from_slice(&self.version.to_be_bytes());
        buf.extend_from_slice(&self.code.to_be_bytes());
        buf.extend_from_slice(&self.status.to_be_bytes());
        buf
    }

    /// Decode from a buffer holding at least `SIZE` bytes
    pub fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf, Self::SIZE)?;
        let mut cursor = Cursor::new(&buf[..Self::SIZE]);
        Ok(Self {
            version: cursor.read_u16::<BigEndian>()?,
            code: cursor.read_u16::<BigEndian>()?,
            status: cursor.read_u16::<BigEndian>()?,
        })
    }

    /// Read exactly one header from a reader
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        reader.read_exact(&mut buf)?;
        Self::decode(&buf)
    }

    /// Write the header to a writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.encode())?;
        Ok(())
    }
}

/// Reply header carrying the number of device records that follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevlistReplyHeader {
    /// Number of exported devices in the reply
    pub device_count: u32,
}

impl DevlistReplyHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = 4;

    /// Encode into exactly `SIZE` bytes
    pub fn encode(&self) -> Vec<u8> {
        self.device_count.to_be_bytes().to_vec()
    }

    /// Decode from a buffer holding at least `SIZE` bytes
    pub fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf, Self::SIZE)?;
        let mut cursor = Cursor::new(&buf[..Self::SIZE]);
        Ok(Self {
            device_count: cursor.read_u32::<BigEndian>()?,
        })
    }

    /// Read exactly one header from a reader
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        reader.read_exact(&mut buf)?;
        Self::decode(&buf)
    }

    /// Write the header to a writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.encode())?;
        Ok(())
    }
}

/// Exported-device record (312 bytes)
///
/// Followed on the wire by `num_interfaces` interface records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Device path on the exporting host (256-byte field)
    pub path: String,
    /// Bus identifier, e.g. `1-2.3` (32-byte field)
    pub bus_id: String,
    /// Bus number
    pub bus_number: u32,
    /// Device number on the bus
    pub device_number: u32,
    /// Connection speed code
    pub speed: u32,
    /// USB vendor id
    pub vendor_id: u16,
    /// USB product id
    pub product_id: u16,
    /// Device release number
    pub bcd_device: u16,
    /// Device class
    pub device_class: u8,
    /// Device subclass
    pub device_subclass: u8,
    /// Device protocol
    pub device_protocol: u8,
    /// Active configuration value
    pub configuration_value: u8,
    /// Number of configurations
    pub num_configurations: u8,
    /// Number of interface records that follow
    pub num_interfaces: u8,
}

impl DeviceRecord {
    /// Size of the record in bytes
    pub const SIZE: usize = 312;

    /// Width of the `path` field
    pub const PATH_LEN: usize = 256;

    /// Width of the `bus_id` field
    pub const BUS_ID_LEN: usize = 32;

    /// Encode into exactly `SIZE` bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        put_fixed_str(&mut buf, &self.path, Self::PATH_LEN);
        put_fixed_str(&mut buf, &self.bus_id, Self::BUS_ID_LEN);
        buf.extend_from_slice(&self.bus_number.to_be_bytes());
        buf.extend_from_slice(&self.device_number.to_be_bytes());
        buf.extend_from_slice(&self.speed.to_be_bytes());
        buf.extend_from_slice(&self.vendor_id.to_be_bytes());
        buf.extend_from_slice(&self.product_id.to_be_bytes());
        buf.extend_from_slice(&self.bcd_device.to_be_bytes());
        buf.push(self.device_class);
        buf.push(self.device_subclass);
        buf.push(self.device_protocol);
        buf.push(self.configuration_value);
        buf.push(self.num_configurations);
        buf.push(self.num_interfaces);
        buf
    }

    /// Decode from a buffer holding at least `SIZE` bytes
    pub fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf, Self::SIZE)?;
        let path = get_fixed_str(&buf[..Self::PATH_LEN]);
        let bus_id = get_fixed_str(&buf[Self::PATH_LEN..Self::PATH_LEN + Self::BUS_ID_LEN]);
        let mut cursor = Cursor::new(&buf[Self::PATH_LEN + Self::BUS_ID_LEN..Self::SIZE]);
        Ok(Self {
            path,
            bus_id,
            bus_number: cursor.read_u32::<BigEndian>()?,
            device_number: cursor.read_u32::<BigEndian>()?,
            speed: cursor.read_u32::<BigEndian>()?,
            vendor_id: cursor.read_u16::<BigEndian>()?,
            product_id: cursor.read_u16::<BigEndian>()?,
            bcd_device: cursor.read_u16::<BigEndian>()?,
            device_class: cursor.read_u8()?,
            device_subclass: cursor.read_u8()?,
            device_protocol: cursor.read_u8()?,
            configuration_value: cursor.read_u8()?,
            num_configurations: cursor.read_u8()?,
            num_interfaces: cursor.read_u8()?,
        })
    }

    /// Read exactly one record from a reader
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        reader.read_exact(&mut buf)?;
        Self::decode(&buf)
    }

    /// Write the record to a writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.encode())?;
        Ok(())
    }
}

/// Interface record (4 bytes, last byte is padding)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceRecord {
    /// Interface class
    pub interface_class: u8,
    /// Interface subclass
    pub interface_subclass: u8,
    /// Interface protocol
    pub interface_protocol: u8,
}

impl InterfaceRecord {
    /// Size of the record in bytes, padding included
    pub const SIZE: usize = 4;

    /// Encode into exactly `SIZE` bytes
    pub fn encode(&self) -> Vec<u8> {
        vec![
            self.interface_class,
            self.interface_subclass,
            self.interface_protocol,
            0,
        ]
    }

    /// Decode from a buffer holding at least `SIZE` bytes
    pub fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf, Self::SIZE)?;
        Ok(Self {
            interface_class: buf[0],
            interface_subclass: buf[1],
            interface_protocol: buf[2],
        })
    }

    /// Read exactly one record from a reader
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        reader.read_exact(&mut buf)?;
        Self::decode(&buf)
    }

    /// Write the record to a writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.encode())?;
        Ok(())
    }
}

fn check_len(buf: &[u8], expected: usize) -> Result<()> {
    if buf.len() < expected {
        return Err(ProtocolError::MalformedHeader {
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// Copy a string into a fixed-width NUL-padded field, truncating at the width
fn put_fixed_str(buf: &mut Vec<u8>, value: &str, width: usize) {
    let bytes = value.as_bytes();
    let len = bytes.len().min(width);
    buf.extend_from_slice(&bytes[..len]);
    buf.resize(buf.len() + (width - len), 0);
}

/// Read a NUL-terminated string out of a fixed-width field
fn get_fixed_str(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}
