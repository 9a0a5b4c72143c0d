//! mlnxipcfg - sequential IP and policy-routing auto-configuration
//!
//! Assigns one sequential host address and one private routing table to
//! each Ethernet-mode Mellanox NIC, applies the configuration live via
//! `ip` and `sysctl`, and persists it into OS-specific boot config
//! (netplan on Ubuntu, network-scripts on RHEL/CentOS, plus a sysctl
//! ARP-tuning file).

mod apply;
mod cli;
mod discover;
mod error;
mod os;
mod persist;
mod plan;
mod report;

use cli::Cli;
use error::{Error, Result};
use os::OsFamily;
use plan::Plan;
use report::RunReport;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();

    if let Some(shell) = cli.completion {
        Cli::generate_completion(shell);
        return Ok(());
    }
    // clap enforces -i whenever --completion is absent
    let Some(ipaddr) = cli.ipaddr else {
        unreachable!()
    };

    let devices = match cli.devices {
        Some(devices) => devices,
        None => discover::ethernet_ifnames(),
    };
    if cli.verbose {
        println!("devices are: {:?}", devices);
    }
    if devices.is_empty() {
        return Err(Error::NoDevices);
    }

    // Fatal conditions end here: the plan is complete before any
    // command runs or file is touched.
    let plan = Plan::new(&ipaddr, &devices)?;
    let family = OsFamily::detect();
    if cli.verbose {
        println!(
            "network: {}  gateway: {}  os family: {}",
            plan.network, plan.gateway, family
        );
    }
    if cli.dry_run {
        println!("=== DRY RUN - no commands will be run, no files written ===");
    }

    let mut report = RunReport::new();
    apply::apply(&plan, cli.flush, cli.dry_run, cli.verbose, &mut report);
    persist::write_all(&plan, family, cli.dry_run, cli.verbose, &mut report);

    if cli.json {
        println!("{}", report.to_json());
    } else {
        report.print_summary();
    }

    Ok(())
}
