//! Device discovery for usbip-discover
//!
//! Library side of the `usbip-discover` binary: configuration, the remote
//! query exchange, the local sysfs walk, and the listing presenter. Kept as a
//! library so the integration tests drive the same code the binary runs.

pub mod config;
pub mod local;
pub mod output;
pub mod remote;
pub mod sysfs;

pub use config::Config;
pub use output::{OutputMode, Presenter};
