//! Unified error types for mlnxipcfg

use ipnet::IpNet;
use std::io;
use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mlnxipcfg operations
#[derive(Error, Debug)]
pub enum Error {
    // Address plan errors
    #[error("Invalid base address '{addr}': {message}")]
    InvalidAddress { addr: String, message: String },

    #[error("Address {address} for device '{device}' falls outside network {network}")]
    AddressOutOfNetwork {
        device: String,
        address: IpAddr,
        network: IpNet,
    },

    #[error("Address space exhausted while assigning device '{0}'")]
    AddressExhausted(String),

    #[error("Network {0} is too small to hold a gateway")]
    NetworkTooSmall(IpNet),

    #[error("Duplicate device '{0}' in device list")]
    DuplicateDevice(String),

    // Device errors
    #[error(
        "No network devices to configure: no Ethernet-mode devices were found and none were specified with -d"
    )]
    NoDevices,

    // Persistent config errors
    #[error("Failed to write '{path}': {source}")]
    WriteFailed { path: PathBuf, source: io::Error },

    #[error("Failed to serialize netplan config: {0}")]
    NetplanSerialize(#[from] serde_yaml_ng::Error),
}

/// Result type alias for mlnxipcfg operations
pub type Result<T> = std::result::Result<T, Error>;
