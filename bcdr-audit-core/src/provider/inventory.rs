//! Device inventory index.
//!
//! Built from the provider's device listing pages; resolves appliance
//! display names to serial numbers by exact name match.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ProviderPayloadError;
use crate::pipeline::collaborators::InventoryLookup;

#[derive(Debug, Deserialize)]
struct DeviceListing {
    #[serde(default)]
    items: Vec<ListedDevice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedDevice {
    name: String,
    serial_number: Option<String>,
}

/// Name -> serial index over one or more listing pages.
#[derive(Debug, Clone, Default)]
pub struct InventoryIndex {
    serials: HashMap<String, String>,
}

impl InventoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_listing(payload: &str) -> Result<Self, ProviderPayloadError> {
        let mut index = Self::new();
        index.add_listing_page(payload)?;
        Ok(index)
    }

    /// Merge one listing page. Returns the number of devices indexed from it.
    ///
    /// Devices without a serial are ignored. A name listed twice keeps the
    /// serial seen last.
    pub fn add_listing_page(&mut self, payload: &str) -> Result<usize, ProviderPayloadError> {
        let listing: DeviceListing = serde_json::from_str(payload)?;
        let mut added = 0;

        for device in listing.items {
            let Some(serial) = device.serial_number else {
                log::debug!("INVENTORY_NO_SERIAL name={}", device.name);
                continue;
            };
            if let Some(previous) = self.serials.insert(device.name.clone(), serial.clone()) {
                log::warn!(
                    "INVENTORY_DUPLICATE_NAME name={} previous={} serial={}",
                    device.name,
                    previous,
                    serial
                );
            }
            added += 1;
        }

        Ok(added)
    }

    pub fn insert(&mut self, name: &str, serial: &str) {
        self.serials.insert(name.to_string(), serial.to_string());
    }

    pub fn len(&self) -> usize {
        self.serials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serials.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.serials.get(name).map(String::as_str)
    }
}

impl InventoryLookup for InventoryIndex {
    fn resolve_serial(&self, appliance: &str) -> anyhow::Result<Option<String>> {
        Ok(self.get(appliance).map(str::to_string))
    }
}
