//! Ethernet-mode InfiniBand device discovery
//!
//! Walks /sys/class/infiniband, keeps devices whose ports report an
//! "ethernet" link layer, and resolves each one to its backing netdev
//! name. Devices with unreadable attributes or no backing netdev are
//! silently skipped.

use std::fs;
use std::path::Path;

/// sysfs root for InfiniBand device nodes
pub const SYSFS_INFINIBAND: &str = "/sys/class/infiniband";

/// List netdev names for all Ethernet-mode InfiniBand devices.
///
/// Returns an empty list when the sysfs root is missing or no device
/// qualifies; the caller decides whether that is fatal.
pub fn ethernet_ifnames() -> Vec<String> {
    ethernet_ifnames_in(Path::new(SYSFS_INFINIBAND))
}

/// Device order determines address assignment, so entries are sorted
/// by device node name for a stable result.
pub(crate) fn ethernet_ifnames_in(root: &Path) -> Vec<String> {
    let mut names = Vec::new();
    let Ok(entries) = fs::read_dir(root) else {
        return names;
    };

    let mut devices: Vec<_> = entries.flatten().map(|e| e.path()).collect();
    devices.sort();

    for device in devices {
        if is_ethernet(&device) {
            if let Some(ifname) = netdev_name(&device) {
                names.push(ifname);
            }
        }
    }
    names
}

/// True if any port of the device reports an "ethernet" link layer
fn is_ethernet(device: &Path) -> bool {
    let Ok(ports) = fs::read_dir(device.join("ports")) else {
        return false;
    };
    for port in ports.flatten() {
        if let Ok(link) = fs::read_to_string(port.path().join("link_layer")) {
            if link.to_lowercase().contains("ethernet") {
                return true;
            }
        }
    }
    false
}

/// Name of the first netdev backing the device, if any
fn netdev_name(device: &Path) -> Option<String> {
    let mut netdevs: Vec<_> = fs::read_dir(device.join("device/net"))
        .ok()?
        .flatten()
        .map(|e| e.file_name())
        .collect();
    netdevs.sort();
    netdevs.into_iter().next()?.into_string().ok()
}
