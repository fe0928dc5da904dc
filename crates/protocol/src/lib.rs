//! Wire codec for usbip-discover
//!
//! This crate defines the fixed-layout records of the USB/IP device-discovery
//! exchange. All integers are big-endian (network byte order), strings sit in
//! fixed-width NUL-padded fields, and every record exposes a `SIZE` constant
//! so transports can be read in exact chunks.
//!
//! # Example
//!
//! ```
//! use protocol::{OpCode, OpCommon, USBIP_VERSION};
//!
//! // Build and encode a device-list request
//! let request = OpCommon::request(OpCode::ReqDevlist);
//! let bytes = request.encode();
//! assert_eq!(bytes.len(), OpCommon::SIZE);
//!
//! // Decode it back
//! let decoded = OpCommon::decode(&bytes).unwrap();
//! assert_eq!(decoded.version, USBIP_VERSION);
//! assert_eq!(decoded.code, OpCode::ReqDevlist as u16);
//! ```

pub mod error;
pub mod version;
pub mod wire;

pub use error::{ProtocolError, Result};
pub use version::{USBIP_PORT, USBIP_VERSION, version_string};
pub use wire::{DeviceRecord, DevlistReplyHeader, InterfaceRecord, OpCode, OpCommon};
