//! Address and routing-table planning
//!
//! Turns one base CIDR plus an ordered device list into per-device host
//! addresses, a shared gateway, and per-device routing table ids. The
//! plan is the single input for both the live configurator and the
//! persistent config emitters.

use crate::error::{Error, Result};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// First routing table id; device i gets BASE_TABLE_ID + i
pub const BASE_TABLE_ID: u32 = 101;

/// Priority of the per-device source routing rule
pub const RULE_PRIORITY: u32 = 32761;

/// Addressing parameters for a single device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePlan {
    /// Network interface name (e.g. "enp225s0f0")
    pub device: String,
    /// Host address assigned to the interface
    pub address: IpAddr,
    /// Private routing table id for this device
    pub table_id: u32,
}

/// Full addressing plan for an ordered set of devices
#[derive(Debug, Clone)]
pub struct Plan {
    /// Base network with host bits cleared
    pub network: IpNet,
    /// Shared gateway: the network's broadcast/last address minus one
    pub gateway: IpAddr,
    /// One entry per device, in device-list order
    pub devices: Vec<DevicePlan>,
}

impl Plan {
    /// Build a plan from a base address with prefix and an ordered device list.
    ///
    /// Device i receives base + i and table id 101 + i; prefix length,
    /// network, netmask, and gateway are shared. Assignment is rejected
    /// (rather than wrapped) when an address would overflow the address
    /// family or leave the base network, and when the device list
    /// contains duplicates.
    pub fn new(base: &str, devices: &[String]) -> Result<Self> {
        let iface: IpNet = base.parse().map_err(|e: ipnet::AddrParseError| {
            Error::InvalidAddress {
                addr: base.to_string(),
                message: e.to_string(),
            }
        })?;
        let network = iface.trunc();
        let gateway = ip_sub(network.broadcast(), 1)
            .filter(|gw| network.contains(gw))
            .ok_or(Error::NetworkTooSmall(network))?;

        let mut seen = HashSet::new();
        let mut plans = Vec::with_capacity(devices.len());
        for (i, dev) in devices.iter().enumerate() {
            if !seen.insert(dev.as_str()) {
                return Err(Error::DuplicateDevice(dev.clone()));
            }
            let address = ip_add(iface.addr(), i as u32)
                .ok_or_else(|| Error::AddressExhausted(dev.clone()))?;
            if !network.contains(&address) {
                return Err(Error::AddressOutOfNetwork {
                    device: dev.clone(),
                    address,
                    network,
                });
            }
            plans.push(DevicePlan {
                device: dev.clone(),
                address,
                table_id: BASE_TABLE_ID + i as u32,
            });
        }

        Ok(Self {
            network,
            gateway,
            devices: plans,
        })
    }

    /// Shared prefix length
    pub fn prefix_len(&self) -> u8 {
        self.network.prefix_len()
    }

    /// Shared netmask
    pub fn netmask(&self) -> IpAddr {
        self.network.netmask()
    }

    /// Network (subnet) address
    pub fn subnet(&self) -> IpAddr {
        self.network.network()
    }

    /// "address/prefix" form used by `ip addr add` and netplan
    pub fn host_prefix(&self, dev: &DevicePlan) -> String {
        format!("{}/{}", dev.address, self.network.prefix_len())
    }

    /// The two halves of the address space, routed via the gateway in
    /// place of a single default route so they take precedence over any
    /// pre-existing default.
    pub fn half_ranges(&self) -> [IpNet; 2] {
        match self.network {
            IpNet::V4(_) => [
                IpNet::V4(Ipv4Net::new_assert(Ipv4Addr::new(0, 0, 0, 0), 1)),
                IpNet::V4(Ipv4Net::new_assert(Ipv4Addr::new(128, 0, 0, 0), 1)),
            ],
            IpNet::V6(_) => [
                IpNet::V6(Ipv6Net::new_assert(Ipv6Addr::UNSPECIFIED, 1)),
                IpNet::V6(Ipv6Net::new_assert(
                    Ipv6Addr::new(0x8000, 0, 0, 0, 0, 0, 0, 0),
                    1,
                )),
            ],
        }
    }
}

/// Numeric address addition, carrying across octet/hextet boundaries
fn ip_add(addr: IpAddr, offset: u32) -> Option<IpAddr> {
    match addr {
        IpAddr::V4(a) => u32::from(a)
            .checked_add(offset)
            .map(|n| IpAddr::V4(Ipv4Addr::from(n))),
        IpAddr::V6(a) => u128::from(a)
            .checked_add(u128::from(offset))
            .map(|n| IpAddr::V6(Ipv6Addr::from(n))),
    }
}

/// Numeric address subtraction
fn ip_sub(addr: IpAddr, offset: u32) -> Option<IpAddr> {
    match addr {
        IpAddr::V4(a) => u32::from(a)
            .checked_sub(offset)
            .map(|n| IpAddr::V4(Ipv4Addr::from(n))),
        IpAddr::V6(a) => u128::from(a)
            .checked_sub(u128::from(offset))
            .map(|n| IpAddr::V6(Ipv6Addr::from(n))),
    }
}
