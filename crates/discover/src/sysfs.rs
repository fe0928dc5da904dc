//! sysfs USB device-tree backend
//!
//! Thin facade over `/sys/bus/usb`. The bus root is injectable so tests can
//! point it at a fixture tree on disk.

use common::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

const SYSFS_USB_BUS: &str = "/sys/bus/usb";

/// Handle on the USB bus directory
#[derive(Debug)]
pub struct UsbBus {
    root: PathBuf,
}

impl UsbBus {
    /// Open the system USB bus
    pub fn open() -> Result<Self> {
        Self::open_at(SYSFS_USB_BUS)
    }

    /// Open a USB bus rooted at an arbitrary directory
    pub fn open_at<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        if !root.join("devices").is_dir() {
            return Err(Error::LocalEnumeration(format!(
                "no USB bus at {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// All entries on the bus: devices, root hubs, and interfaces alike
    pub fn devices(&self) -> Result<Vec<DeviceNode>> {
        let dir = self.root.join("devices");
        let entries = fs::read_dir(&dir).map_err(|e| {
            Error::LocalEnumeration(format!("cannot read {}: {}", dir.display(), e))
        })?;

        let mut nodes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::LocalEnumeration(format!("cannot read {}: {}", dir.display(), e))
            })?;
            nodes.push(DeviceNode::new(entry.path()));
        }
        Ok(nodes)
    }

    /// Look up one entry by bus id
    pub fn open_device(&self, bus_id: &str) -> Result<DeviceNode> {
        let path = self.root.join("devices").join(bus_id);
        if !path.exists() {
            return Err(Error::LocalEnumeration(format!(
                "no such device: {bus_id}"
            )));
        }
        Ok(DeviceNode::new(path))
    }
}

/// One entry under the bus `devices` directory
pub struct DeviceNode {
    bus_id: String,
    path: PathBuf,
}

impl DeviceNode {
    fn new(path: PathBuf) -> Self {
        let bus_id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { bus_id, path }
    }

    pub fn bus_id(&self) -> &str {
        &self.bus_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read an attribute file, trimmed; `None` when absent or unreadable
    pub fn attribute(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.path.join(name))
            .ok()
            .map(|v| v.trim().to_string())
    }

    /// Name of the bound driver, from the `driver` symlink; `None` when unbound
    pub fn driver(&self) -> Option<String> {
        fs::read_link(self.path.join("driver"))
            .ok()
            .and_then(|target| {
                target
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
    }
}
