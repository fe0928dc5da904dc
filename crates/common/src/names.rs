//! USB id name resolution
//!
//! Loads a `usb.ids`-format database and resolves vendor/product pairs and
//! class/subclass/protocol triples into the display strings the listing
//! prints. Lookups never fail; unknown ids fall back to `unknown ...`
//! placeholders so discovery keeps going without the database.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

/// In-memory `usb.ids` database
#[derive(Debug, Default)]
pub struct NameDb {
    vendors: HashMap<u16, String>,
    products: HashMap<(u16, u16), String>,
    classes: HashMap<u8, String>,
    subclasses: HashMap<(u8, u8), String>,
    protocols: HashMap<(u8, u8, u8), String>,
}

enum Section {
    None,
    Vendor(u16),
    Class { class: u8, subclass: Option<u8> },
}

impl NameDb {
    /// Resolver with no entries; every lookup falls back
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a `usb.ids`-format database from disk
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let db = Self::parse(&text);
        debug!(
            vendors = db.vendors.len(),
            products = db.products.len(),
            classes = db.classes.len(),
            "loaded USB id database"
        );
        Ok(db)
    }

    /// Load the database, degrading to an empty resolver on failure
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(db) => db,
            Err(e) => {
                warn!(
                    "Failed to load USB id database {}: {}",
                    path.as_ref().display(),
                    e
                );
                Self::empty()
            }
        }
    }

    fn parse(text: &str) -> Self {
        let mut db = Self::empty();
        let mut section = Section::None;

        for line in text.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix("\t\t") {
                // Protocol line, scoped to the current class and subclass.
                if let Section::Class {
                    class,
                    subclass: Some(subclass),
                } = section
                    && let Some((id, name)) = split_entry(rest)
                    && let Ok(protocol) = u8::from_str_radix(id, 16)
                {
                    db.protocols.insert((class, subclass, protocol), name.to_string());
                }
            } else if let Some(rest) = line.strip_prefix('\t') {
                match section {
                    Section::Vendor(vendor) => {
                        if let Some((id, name)) = split_entry(rest)
                            && let Ok(product) = u16::from_str_radix(id, 16)
                        {
                            db.products.insert((vendor, product), name.to_string());
                        }
                    }
                    Section::Class { class, .. } => {
                        if let Some((id, name)) = split_entry(rest)
                            && let Ok(subclass) = u8::from_str_radix(id, 16)
                        {
                            db.subclasses.insert((class, subclass), name.to_string());
                            section = Section::Class {
                                class,
                                subclass: Some(subclass),
                            };
                        }
                    }
                    Section::None => {}
                }
            } else if let Some(rest) = line.strip_prefix("C ") {
                section = Section::None;
                if let Some((id, name)) = split_entry(rest)
                    && id.len() == 2
                    && let Ok(class) = u8::from_str_radix(id, 16)
                {
                    db.classes.insert(class, name.to_string());
                    section = Section::Class {
                        class,
                        subclass: None,
                    };
                }
            } else if let Some((id, name)) = split_entry(line)
                && id.len() == 4
                && let Ok(vendor) = u16::from_str_radix(id, 16)
            {
                db.vendors.insert(vendor, name.to_string());
                section = Section::Vendor(vendor);
            } else {
                // Some other section (HID usages, languages, ...); skip it.
                section = Section::None;
            }
        }

        db
    }

    /// Display string for a vendor/product pair
    pub fn product(&self, vendor_id: u16, product_id: u16) -> String {
        let vendor = self
            .vendors
            .get(&vendor_id)
            .map(String::as_str)
            .unwrap_or("unknown vendor");
        let product = self
            .products
            .get(&(vendor_id, product_id))
            .map(String::as_str)
            .unwrap_or("unknown product");
        format!("{vendor} : {product} ({vendor_id:04x}:{product_id:04x})")
    }

    /// Display string for a class/subclass/protocol triple
    pub fn class(&self, class: u8, subclass: u8, protocol: u8) -> String {
        if class == 0 && subclass == 0 && protocol == 0 {
            return "(Defined at Interface level) (00/00/00)".to_string();
        }
        let c = self
            .classes
            .get(&class)
            .map(String::as_str)
            .unwrap_or("unknown class");
        let s = self
            .subclasses
            .get(&(class, subclass))
            .map(String::as_str)
            .unwrap_or("unknown subclass");
        let p = self
            .protocols
            .get(&(class, subclass, protocol))
            .map(String::as_str)
            .unwrap_or("unknown protocol");
        format!("{c} / {s} / {p} ({class:02x}/{subclass:02x}/{protocol:02x})")
    }
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let id = parts.next()?;
    let name = parts.next()?.trim();
    if name.is_empty() {
        return None;
    }
    Some((id, name))
}
