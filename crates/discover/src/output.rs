//! Listing output rendering
//!
//! One `Presenter` renders the whole listing. The mode is chosen once at
//! startup; parsable mode keeps stdout machine-readable, one line per device,
//! and suppresses banners and preambles.

use protocol::DeviceRecord;
use std::io::{self, Write};

/// Output format for the device listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Multi-line blocks for people
    Human,
    /// `key=value#` single-line records for scripts
    Parsable,
}

/// Renders device listings to a sink in the selected mode
pub struct Presenter<W: Write> {
    mode: OutputMode,
    out: W,
}

impl<W: Write> Presenter<W> {
    pub fn new(mode: OutputMode, out: W) -> Self {
        Self { mode, out }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Banner naming the queried host; human mode only
    pub fn remote_host(&mut self, host: &str) -> io::Result<()> {
        match self.mode {
            OutputMode::Human => writeln!(self.out, "- {host}"),
            OutputMode::Parsable => Ok(()),
        }
    }

    /// Device block for an exported device
    pub fn remote_device(
        &mut self,
        device: &DeviceRecord,
        product: &str,
        class: &str,
    ) -> io::Result<()> {
        match self.mode {
            OutputMode::Human => {
                writeln!(self.out, "{:>8}: {}", device.bus_id, product)?;
                writeln!(self.out, "{:>8}: {}", " ", device.path)?;
                writeln!(self.out, "{:>8}: {}", " ", class)
            }
            OutputMode::Parsable => {
                // Remote records carry no driver bindings, so no interface tags.
                write!(
                    self.out,
                    "busid={}#usbid={:04x}:{:04x}#",
                    device.bus_id, device.vendor_id, device.product_id
                )
            }
        }
    }

    /// Interface line within a remote device block
    pub fn remote_interface(&mut self, index: usize, class: &str) -> io::Result<()> {
        match self.mode {
            OutputMode::Human => writeln!(self.out, "{:>8}: {:2} - {}", " ", index, class),
            OutputMode::Parsable => Ok(()),
        }
    }

    /// Heading before the first local device; human mode only
    pub fn local_preamble(&mut self) -> io::Result<()> {
        match self.mode {
            OutputMode::Human => {
                writeln!(self.out, "Local USB devices")?;
                writeln!(self.out, "=================")
            }
            OutputMode::Parsable => Ok(()),
        }
    }

    /// Device line for a local device; vendor/product are the raw sysfs
    /// attribute strings, truncated to their 4 hex digits
    pub fn local_device(&mut self, bus_id: &str, vendor: &str, product: &str) -> io::Result<()> {
        match self.mode {
            OutputMode::Human => {
                writeln!(self.out, " - busid {} ({:.4}:{:.4})", bus_id, vendor, product)
            }
            OutputMode::Parsable => {
                write!(self.out, "busid={}#usbid={:.4}:{:.4}#", bus_id, vendor, product)
            }
        }
    }

    /// Interface line for a local device
    pub fn local_interface(&mut self, interface_bus_id: &str, driver: &str) -> io::Result<()> {
        match self.mode {
            OutputMode::Human => {
                writeln!(self.out, "{:>9}{} -> {}", "", interface_bus_id, driver)
            }
            OutputMode::Parsable => write!(self.out, "{}={}#", interface_bus_id, driver),
        }
    }

    /// Terminate a device's output: the blank separator line in human mode,
    /// the record's single newline in parsable mode
    pub fn end_device(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_device() -> DeviceRecord {
        DeviceRecord {
            path: "/sys/devices/pci0000:00/0000:00:14.0/usb1/1-2".to_string(),
            bus_id: "1-2".to_string(),
            bus_number: 1,
            device_number: 3,
            speed: 3,
            vendor_id: 0x0951,
            product_id: 0x1666,
            bcd_device: 0x0110,
            device_class: 0,
            device_subclass: 0,
            device_protocol: 0,
            configuration_value: 1,
            num_configurations: 1,
            num_interfaces: 1,
        }
    }

    fn render<F>(mode: OutputMode, f: F) -> String
    where
        F: FnOnce(&mut Presenter<&mut Vec<u8>>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        let mut presenter = Presenter::new(mode, &mut buf);
        f(&mut presenter).expect("render failed");
        String::from_utf8(buf).expect("non-utf8 output")
    }

    #[test]
    fn test_remote_human_block() {
        let out = render(OutputMode::Human, |p| {
            p.remote_host("fileserver")?;
            p.remote_device(&sample_device(), "Kingston : DT (0951:1666)", "(Defined at Interface level) (00/00/00)")?;
            p.remote_interface(0, "Mass Storage / SCSI / Bulk-Only (08/06/50)")?;
            p.end_device()
        });
        assert_eq!(
            out,
            "- fileserver\n\
             \x20    1-2: Kingston : DT (0951:1666)\n\
             \x20       : /sys/devices/pci0000:00/0000:00:14.0/usb1/1-2\n\
             \x20       : (Defined at Interface level) (00/00/00)\n\
             \x20       :  0 - Mass Storage / SCSI / Bulk-Only (08/06/50)\n\
             \n"
        );
    }

    #[test]
    fn test_remote_parsable_single_line() {
        let out = render(OutputMode::Parsable, |p| {
            p.remote_host("fileserver")?;
            p.remote_device(&sample_device(), "ignored", "ignored")?;
            p.remote_interface(0, "ignored")?;
            p.end_device()
        });
        assert_eq!(out, "busid=1-2#usbid=0951:1666#\n");
    }

    #[test]
    fn test_local_human_block() {
        let out = render(OutputMode::Human, |p| {
            p.local_preamble()?;
            p.local_device("3-1", "0951", "1666")?;
            p.local_interface("3-1:1.0", "usb-storage")?;
            p.end_device()
        });
        assert_eq!(
            out,
            "Local USB devices\n\
             =================\n\
             \x20- busid 3-1 (0951:1666)\n\
             \x20        3-1:1.0 -> usb-storage\n\
             \n"
        );
    }

    #[test]
    fn test_local_parsable_single_line() {
        let out = render(OutputMode::Parsable, |p| {
            p.local_preamble()?;
            p.local_device("3-1", "0951", "1666")?;
            p.local_interface("3-1:1.0", "usb-storage")?;
            p.local_interface("3-1:1.1", "none")?;
            p.end_device()
        });
        assert_eq!(out, "busid=3-1#usbid=0951:1666#3-1:1.0=usb-storage#3-1:1.1=none#\n");
    }

    #[test]
    fn test_local_device_truncates_attribute_strings() {
        let out = render(OutputMode::Human, |p| p.local_device("1-1", "0951abcd", "1666xyz"));
        assert_eq!(out, " - busid 1-1 (0951:1666)\n");
    }
}
