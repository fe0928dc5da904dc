//! Common utilities for usbip-discover
//!
//! This crate provides the plumbing shared by the discovery binary: the
//! discovery error types, tracing setup, and the `usb.ids` name resolver.

pub mod error;
pub mod logging;
pub mod names;

pub use error::{DiscoveryFailure, Error, Result};
pub use logging::setup_logging;
pub use names::NameDb;
