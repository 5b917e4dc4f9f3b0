//! Baseline discovery.
//!
//! Discovery runs once per device, operator-driven, and freezes the values
//! of every attribute flagged for capture. Later checks compare against this
//! snapshot rather than against absolute limits, since vendors disagree on
//! what a "bad" raw value is.

mod store;

pub use store::BaselineStore;

use serde::{Deserialize, Serialize};
use smartwatch_types::{Baseline, Section};
use tracing::{debug, info};

/// A monitoring item produced by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredItem {
    /// Device identifier.
    pub item: String,
    /// Attribute values frozen at discovery time.
    pub parameters: Baseline,
}

/// Discover one monitoring item per device that has at least one captured
/// attribute.
///
/// Items are returned ordered by device identifier; the result only depends
/// on the attribute values present, never on input order.
pub fn discover(section: &Section) -> Vec<DiscoveredItem> {
    section
        .iter()
        .filter_map(|(device, reading)| {
            let parameters = Baseline::capture(reading);
            if parameters.is_empty() {
                debug!(device = %device, "nothing to capture, skipping device");
                return None;
            }

            info!(
                device = %device,
                attributes = parameters.len(),
                "discovered device"
            );
            Some(DiscoveredItem {
                item: device.clone(),
                parameters,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartwatch_types::DiskAttribute;

    fn section() -> Section {
        Section::builder()
            .disk("/dev/sda", |d| {
                d.attribute(DiskAttribute::ReallocatedSectors, 0)
                    .attribute(DiskAttribute::PowerOnHours, 1408)
                    .attribute(DiskAttribute::PowerCycles, 523)
                    .attribute(DiskAttribute::CommandTimeoutCounter, 0)
                    .attribute(DiskAttribute::Temperature, 40)
                    .attribute(DiskAttribute::ReallocatedEvents, 0)
                    .attribute(DiskAttribute::UdmaCrcErrors, 0)
                    .raw("Unknown_SSD_Attribute", 77)
            })
            .disk("/dev/nvme0n1", |d| {
                d.attribute(DiskAttribute::CriticalWarning, 0)
                    .attribute(DiskAttribute::MediaAndDataIntegrityErrors, 0)
                    .attribute(DiskAttribute::AvailableSpare, 100)
                    .attribute(DiskAttribute::PercentageUsed, 3)
                    .raw("Available_Spare_Threshold", 10)
            })
            .disk("/dev/sdb", |d| {
                d.attribute(DiskAttribute::PowerOnHours, 10)
                    .attribute(DiskAttribute::Temperature, 30)
            })
            .build()
    }

    #[test]
    fn test_captures_flagged_attributes_only() {
        let items = discover(&section());
        assert_eq!(items.len(), 2);

        let sda = items.iter().find(|i| i.item == "/dev/sda").unwrap();
        let keys: Vec<&str> = sda.parameters.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "Command_Timeout_Counter",
                "Reallocated_Events",
                "Reallocated_Sectors",
                "UDMA_CRC_Errors",
            ]
        );

        let nvme = items.iter().find(|i| i.item == "/dev/nvme0n1").unwrap();
        assert_eq!(nvme.parameters.value(DiskAttribute::CriticalWarning), Some(0));
        assert_eq!(
            nvme.parameters.value(DiskAttribute::MediaAndDataIntegrityErrors),
            Some(0)
        );
        assert_eq!(nvme.parameters.len(), 2);
    }

    #[test]
    fn test_device_without_captured_attributes_yields_no_item() {
        let items = discover(&section());
        assert!(items.iter().all(|i| i.item != "/dev/sdb"));
    }

    #[test]
    fn test_discovery_is_idempotent() {
        assert_eq!(discover(&section()), discover(&section()));
    }

    #[test]
    fn test_empty_section() {
        assert!(discover(&Section::new()).is_empty());
    }

    #[test]
    fn test_empty_device_record() {
        let section = Section::builder().disk("/dev/sdc", |d| d).build();
        assert!(discover(&section).is_empty());
    }
}
