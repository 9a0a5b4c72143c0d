//! OS family detection from /etc/os-release

use std::fmt;
use std::fs;

const OS_RELEASE: &str = "/etc/os-release";

/// Recognized OS families for persistent network configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    /// Ubuntu and derivatives: boot config via netplan
    Ubuntu,
    /// RHEL and CentOS: boot config via network-scripts
    Rhel,
    /// Anything else: live configuration only
    Unknown,
}

impl OsFamily {
    /// Detect the OS family from /etc/os-release.
    ///
    /// An unreadable file is treated as an unrecognized family, not an
    /// error: live configuration still proceeds without boot persistence.
    pub fn detect() -> Self {
        match fs::read_to_string(OS_RELEASE) {
            Ok(content) => Self::from_os_release(&content),
            Err(_) => OsFamily::Unknown,
        }
    }

    /// Match the ID= line of an os-release document, quoted or not
    pub(crate) fn from_os_release(content: &str) -> Self {
        for line in content.lines() {
            if let Some(value) = line.strip_prefix("ID=") {
                return Self::from_id(value.trim().trim_matches('"'));
            }
        }
        OsFamily::Unknown
    }

    fn from_id(id: &str) -> Self {
        match id {
            "ubuntu" => OsFamily::Ubuntu,
            "rhel" | "centos" => OsFamily::Rhel,
            _ => OsFamily::Unknown,
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::Ubuntu => write!(f, "ubuntu"),
            OsFamily::Rhel => write!(f, "rhel"),
            OsFamily::Unknown => write!(f, "unknown"),
        }
    }
}
