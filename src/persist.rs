//! Boot-persistent network configuration
//!
//! Renders the addressing plan into the boot config format of the
//! detected OS family plus a shared sysctl ARP-tuning file. Rendering
//! is pure and happens from the finished plan in one pass; writing is a
//! whole-file overwrite per target path. A failed write is reported and
//! the remaining files are still written.

pub mod netplan;
pub mod networkscripts;
pub mod sysctl;

use crate::error::{Error, Result};
use crate::os::OsFamily;
use crate::plan::Plan;
use crate::report::{Outcome, RunReport};
use std::fs;
use std::path::PathBuf;

/// A rendered config file ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Boot-persistence backend for one recognized OS family
trait Backend {
    /// Render all family-specific config files for the plan
    fn render(&self, plan: &Plan) -> Result<Vec<ConfigFile>>;
}

fn backend(family: OsFamily) -> Option<Box<dyn Backend>> {
    match family {
        OsFamily::Ubuntu => Some(Box::new(netplan::NetplanBackend)),
        OsFamily::Rhel => Some(Box::new(networkscripts::NetworkScriptsBackend)),
        OsFamily::Unknown => None,
    }
}

/// Render every persistent config file for the plan: the family-specific
/// files (none for an unrecognized family) plus the sysctl ARP file,
/// which is emitted regardless of family.
pub fn render_all(plan: &Plan, family: OsFamily) -> Result<Vec<ConfigFile>> {
    let mut files = Vec::new();
    if let Some(backend) = backend(family) {
        files.extend(backend.render(plan)?);
    }
    files.push(ConfigFile {
        path: PathBuf::from(sysctl::SYSCTL_PATH),
        contents: sysctl::render(plan),
    });
    Ok(files)
}

/// Render and write all persistent config, recording one step per file.
///
/// In dry-run mode the rendered contents are printed and recorded as
/// skipped but nothing is written.
pub fn write_all(plan: &Plan, family: OsFamily, dry_run: bool, verbose: bool, report: &mut RunReport) {
    let files = match render_all(plan, family) {
        Ok(files) => files,
        Err(e) => {
            println!("Error: could not render persistent config: {}", e);
            report.record(
                "render persistent config",
                Outcome::WriteError {
                    message: e.to_string(),
                },
            );
            return;
        }
    };

    for file in files {
        if verbose || dry_run {
            println!("{}\n-----------\n{}", file.path.display(), file.contents);
        }
        let action = format!("write {}", file.path.display());
        if dry_run {
            report.record(action, Outcome::Skipped);
            continue;
        }
        match write_file(&file) {
            Ok(()) => {
                println!("wrote: {}", file.path.display());
                report.record(action, Outcome::Success);
            }
            Err(e) => {
                println!("Error: could not write {}", file.path.display());
                report.record(
                    action,
                    Outcome::WriteError {
                        message: e.to_string(),
                    },
                );
            }
        }
    }
}

fn write_file(file: &ConfigFile) -> Result<()> {
    fs::write(&file.path, &file.contents).map_err(|source| Error::WriteFailed {
        path: file.path.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> Plan {
        Plan::new("192.168.1.1/24", &["eth0".to_string(), "eth1".to_string()]).unwrap()
    }

    #[test]
    fn ubuntu_renders_netplan_and_sysctl() {
        let files = render_all(&sample_plan(), OsFamily::Ubuntu).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.display().to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "/etc/netplan/55-nvidia-autoconfig.yaml",
                "/etc/sysctl.d/55-nvidia-arpdefaults.conf",
            ]
        );
    }

    #[test]
    fn rhel_renders_two_files_per_device_plus_sysctl() {
        let files = render_all(&sample_plan(), OsFamily::Rhel).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.display().to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "/etc/sysconfig/network-scripts/ifcfg-eth0",
                "/etc/sysconfig/network-scripts/route-eth0",
                "/etc/sysconfig/network-scripts/ifcfg-eth1",
                "/etc/sysconfig/network-scripts/route-eth1",
                "/etc/sysctl.d/55-nvidia-arpdefaults.conf",
            ]
        );
    }

    #[test]
    fn unknown_family_renders_only_sysctl() {
        let files = render_all(&sample_plan(), OsFamily::Unknown).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(
            files[0].path.display().to_string(),
            "/etc/sysctl.d/55-nvidia-arpdefaults.conf"
        );
    }

    #[test]
    fn dry_run_writes_nothing_and_records_skips() {
        let mut report = RunReport::new();
        write_all(&sample_plan(), OsFamily::Ubuntu, true, false, &mut report);
        assert_eq!(report.steps.len(), 2);
        assert!(report.steps.iter().all(|s| s.outcome == Outcome::Skipped));
    }

    #[test]
    fn write_file_overwrites_target() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("55-nvidia-arpdefaults.conf");
        fs::write(&path, "stale contents").unwrap();

        let file = ConfigFile {
            path: path.clone(),
            contents: sysctl::render(&sample_plan()),
        };
        write_file(&file).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), file.contents);
    }

    #[test]
    fn write_file_failure_is_an_error() {
        let file = ConfigFile {
            path: PathBuf::from("/nonexistent-dir/out.conf"),
            contents: String::new(),
        };
        assert!(matches!(
            write_file(&file),
            Err(Error::WriteFailed { .. })
        ));
    }
}
