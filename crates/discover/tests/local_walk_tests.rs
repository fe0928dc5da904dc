//! Local walk integration tests
//!
//! Each test builds a fake sysfs bus in a temp directory and runs the real
//! walk against it.

use common::Error;
use discover::local::list_local_devices;
use discover::output::{OutputMode, Presenter};
use discover::sysfs::UsbBus;
use std::fs;
use std::path::{Path, PathBuf};

struct FakeBus {
    _dir: tempfile::TempDir,
    root: PathBuf,
}

impl FakeBus {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = dir.path().to_path_buf();
        fs::create_dir_all(root.join("devices")).expect("Failed to create devices dir");
        Self { _dir: dir, root }
    }

    fn add_node(&self, bus_id: &str, attrs: &[(&str, &str)]) -> PathBuf {
        let dir = self.root.join("devices").join(bus_id);
        fs::create_dir_all(&dir).expect("Failed to create device dir");
        for (name, value) in attrs {
            fs::write(dir.join(name), format!("{value}\n")).expect("Failed to write attribute");
        }
        dir
    }

    fn add_device(&self, bus_id: &str, devpath: &str, vendor: &str, product: &str, num_interfaces: &str) {
        self.add_node(
            bus_id,
            &[
                ("devpath", devpath),
                ("idVendor", vendor),
                ("idProduct", product),
                ("bConfigurationValue", "1"),
                ("bNumInterfaces", num_interfaces),
            ],
        );
    }

    fn bind_driver(&self, node_dir: &Path, driver: &str) {
        std::os::unix::fs::symlink(
            format!("../../drivers/{driver}"),
            node_dir.join("driver"),
        )
        .expect("Failed to create driver symlink");
    }

    fn open(&self) -> UsbBus {
        UsbBus::open_at(&self.root).expect("Failed to open fake bus")
    }
}

fn run_walk(bus: &UsbBus, mode: OutputMode) -> (Result<usize, common::DiscoveryFailure>, String) {
    let mut out = Vec::new();
    let mut presenter = Presenter::new(mode, &mut out);
    let result = list_local_devices(bus, &mut presenter);
    (result, String::from_utf8(out).expect("non-utf8 output"))
}

#[test]
fn test_human_listing() {
    let fake = FakeBus::new();
    fake.add_device("3-1", "1", "0951", "1666", " 1");
    let intf = fake.add_node("3-1:1.0", &[]);
    fake.bind_driver(&intf, "usb-storage");

    let (result, text) = run_walk(&fake.open(), OutputMode::Human);
    assert_eq!(result.expect("walk"), 1);
    assert_eq!(
        text,
        "Local USB devices\n\
         =================\n\
         \x20- busid 3-1 (0951:1666)\n\
         \x20        3-1:1.0 -> usb-storage\n\
         \n"
    );
}

#[test]
fn test_root_hubs_and_interfaces_are_filtered() {
    let fake = FakeBus::new();
    // Root hub: devpath "0".
    fake.add_device("usb3", "0", "1d6b", "0002", " 1");
    // Interface node: no devpath attribute at all.
    fake.add_node("3-1:1.0", &[("idVendor", "dead")]);
    fake.add_device("3-1", "1", "0951", "1666", " 0");

    let (result, text) = run_walk(&fake.open(), OutputMode::Human);
    assert_eq!(result.expect("walk"), 1);
    assert!(text.contains("busid 3-1"));
    assert!(!text.contains("usb3"));
    assert!(!text.contains("dead"));
}

#[test]
fn test_devices_are_sorted_by_bus_id() {
    let fake = FakeBus::new();
    fake.add_device("1-2", "2", "0001", "0002", " 0");
    fake.add_device("1-10", "10", "0003", "0004", " 0");
    fake.add_device("1-1", "1", "0005", "0006", " 0");

    let (result, text) = run_walk(&fake.open(), OutputMode::Human);
    assert_eq!(result.expect("walk"), 3);

    // Lexicographic order: "1-1" < "1-10" < "1-2".
    let pos = |needle: &str| text.find(needle).expect("device missing from output");
    assert!(pos("busid 1-1 ") < pos("busid 1-10 "));
    assert!(pos("busid 1-10 ") < pos("busid 1-2 "));
}

#[test]
fn test_unbound_interface_prints_none() {
    let fake = FakeBus::new();
    fake.add_device("3-1", "1", "0951", "1666", " 2");
    let bound = fake.add_node("3-1:1.0", &[]);
    fake.bind_driver(&bound, "usb-storage");
    fake.add_node("3-1:1.1", &[]);

    let (result, text) = run_walk(&fake.open(), OutputMode::Human);
    assert_eq!(result.expect("walk"), 1);
    assert!(text.contains("3-1:1.0 -> usb-storage"));
    assert!(text.contains("3-1:1.1 -> none"));
}

#[test]
fn test_parsable_is_one_line_per_device() {
    let fake = FakeBus::new();
    fake.add_device("3-1", "1", "0951", "1666", " 1");
    let intf = fake.add_node("3-1:1.0", &[]);
    fake.bind_driver(&intf, "usb-storage");
    fake.add_device("3-2", "2", "046d", "c52b", " 0");

    let (result, text) = run_walk(&fake.open(), OutputMode::Parsable);
    assert_eq!(result.expect("walk"), 2);
    assert_eq!(
        text,
        "busid=3-1#usbid=0951:1666#3-1:1.0=usb-storage#\n\
         busid=3-2#usbid=046d:c52b#\n"
    );
}

#[test]
fn test_missing_required_attribute_is_fatal() {
    let fake = FakeBus::new();
    fake.add_device("3-1", "1", "0951", "1666", " 0");
    // Second device in sort order lacks idProduct.
    fake.add_node(
        "3-2",
        &[
            ("devpath", "2"),
            ("idVendor", "046d"),
            ("bConfigurationValue", "1"),
            ("bNumInterfaces", " 0"),
        ],
    );

    let (result, text) = run_walk(&fake.open(), OutputMode::Human);
    let failure = result.expect_err("missing attribute must abort the walk");
    assert_eq!(failure.emitted, 1);
    match &failure.error {
        Error::LocalEnumeration(msg) => {
            assert!(msg.contains("3-2"));
            assert!(msg.contains("idProduct"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // The first device was already rendered.
    assert!(text.contains("busid 3-1"));
}

#[test]
fn test_missing_interface_node_is_fatal() {
    let fake = FakeBus::new();
    fake.add_device("3-1", "1", "0951", "1666", " 1");
    // No 3-1:1.0 node exists.

    let (result, _text) = run_walk(&fake.open(), OutputMode::Human);
    let failure = result.expect_err("missing interface node must abort the walk");
    assert_eq!(failure.emitted, 1);
    assert!(matches!(failure.error, Error::LocalEnumeration(_)));
}

#[test]
fn test_unparsable_interface_count_means_zero() {
    let fake = FakeBus::new();
    fake.add_device("3-1", "1", "0951", "1666", "garbage");

    let (result, text) = run_walk(&fake.open(), OutputMode::Human);
    assert_eq!(result.expect("walk"), 1);
    assert!(text.contains("busid 3-1"));
    assert!(!text.contains("->"));
}
