//! Local device-tree walk
//!
//! Enumerates USB devices on the local system the way the listing has always
//! worked: entries of the usb bus filtered down to actual devices, sorted by
//! bus id, four required attributes each, one synthesized interface node per
//! configured interface.

use crate::output::Presenter;
use crate::sysfs::{DeviceNode, UsbBus};
use common::{DiscoveryFailure, Error};
use std::io::Write;
use tracing::debug;

/// List local USB devices, returning the number of devices rendered
pub fn list_local_devices<W: Write>(
    bus: &UsbBus,
    presenter: &mut Presenter<W>,
) -> std::result::Result<usize, DiscoveryFailure> {
    let mut emitted = 0;
    match walk_bus(bus, presenter, &mut emitted) {
        Ok(()) => Ok(emitted),
        Err(error) => Err(DiscoveryFailure { emitted, error }),
    }
}

fn walk_bus<W: Write>(
    bus: &UsbBus,
    presenter: &mut Presenter<W>,
    emitted: &mut usize,
) -> common::Result<()> {
    // Root hubs carry devpath "0"; interfaces carry no devpath at all.
    let mut devices: Vec<DeviceNode> = bus
        .devices()?
        .into_iter()
        .filter(|node| node.attribute("devpath").is_some_and(|v| v != "0"))
        .collect();
    devices.sort_by(|a, b| a.bus_id().cmp(b.bus_id()));
    debug!("{} local devices after filtering", devices.len());

    presenter.local_preamble()?;

    for device in &devices {
        let vendor = required_attribute(device, "idVendor")?;
        let product = required_attribute(device, "idProduct")?;
        let config_value = required_attribute(device, "bConfigurationValue")?;
        let num_interfaces = required_attribute(device, "bNumInterfaces")?;

        presenter.local_device(device.bus_id(), &vendor, &product)?;
        *emitted += 1;

        for index in 0..leading_int(&num_interfaces) {
            let if_bus_id = interface_bus_id(device.bus_id(), &config_value, index);
            let interface = bus.open_device(&if_bus_id)?;
            let driver = interface.driver().unwrap_or_else(|| "none".to_string());
            presenter.local_interface(&if_bus_id, &driver)?;
        }
        presenter.end_device()?;
    }

    Ok(())
}

fn required_attribute(device: &DeviceNode, name: &str) -> common::Result<String> {
    device.attribute(name).ok_or_else(|| {
        Error::LocalEnumeration(format!(
            "device {}: missing attribute {}",
            device.bus_id(),
            name
        ))
    })
}

/// Bus id of interface `index` of a device: the device bus id, a colon, the
/// first character of the configuration value, a dot, and the interface index
pub fn interface_bus_id(bus_id: &str, config_value: &str, index: usize) -> String {
    let mut id = String::with_capacity(bus_id.len() + 6);
    id.push_str(bus_id);
    id.push(':');
    if let Some(c) = config_value.chars().next() {
        id.push(c);
    }
    id.push('.');
    id.push_str(&index.to_string());
    id
}

/// Leading decimal digits of an attribute value; anything else counts as 0
fn leading_int(value: &str) -> usize {
    let digits: &str = value
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or("");
    digits.parse().unwrap_or(0)
}
