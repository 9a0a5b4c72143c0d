//! Live network configuration via external commands
//!
//! Builds the `ip` and `sysctl` command lines for a plan and runs them
//! synchronously. Each command is independent: a failure is recorded in
//! the run report and execution continues with the remaining commands
//! and devices. No rollback.

use crate::plan::{DevicePlan, Plan, RULE_PRIORITY};
use crate::report::{Outcome, RunReport};
use std::fmt;
use std::process::Command;

pub const IP_BIN: &str = "/usr/sbin/ip";
pub const SYSCTL_BIN: &str = "/usr/sbin/sysctl";

/// ARP hygiene knobs applied per device, in order. Together these make
/// each interface answer and announce ARP for its own address only,
/// despite sharing an L2 segment with its siblings.
pub const ARP_SYSCTLS: [(&str, &str); 5] = [
    ("arp_accept", "1"),
    ("arp_announce", "1"),
    ("arp_filter", "0"),
    ("rp_filter", "2"),
    ("arp_ignore", "1"),
];

/// A fully resolved external command, ready to run or print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCommand {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl PlannedCommand {
    fn new(program: &'static str, args: &[&str]) -> Self {
        Self {
            program,
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl fmt::Display for PlannedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// All commands needed to configure one device: optional address flush,
/// address add, the three table routes, the source rule, and the ARP
/// sysctl knobs.
pub fn device_commands(plan: &Plan, dev: &DevicePlan, flush: bool) -> Vec<PlannedCommand> {
    let table = dev.table_id.to_string();
    let address = dev.address.to_string();
    let gateway = plan.gateway.to_string();
    let host_prefix = plan.host_prefix(dev);
    let network = plan.network.to_string();
    let [low, high] = plan.half_ranges();

    let mut commands = Vec::new();
    if flush {
        commands.push(PlannedCommand::new(
            IP_BIN,
            &["addr", "flush", "dev", &dev.device],
        ));
    }
    commands.push(PlannedCommand::new(
        IP_BIN,
        &["addr", "add", &host_prefix, "dev", &dev.device],
    ));
    commands.push(PlannedCommand::new(
        IP_BIN,
        &[
            "route",
            "add",
            &low.to_string(),
            "via",
            &gateway,
            "dev",
            &dev.device,
            "table",
            &table,
            "proto",
            "static",
            "metric",
            &table,
        ],
    ));
    commands.push(PlannedCommand::new(
        IP_BIN,
        &[
            "route",
            "add",
            &network,
            "dev",
            &dev.device,
            "table",
            &table,
            "proto",
            "static",
            "scope",
            "link",
            "src",
            &address,
            "metric",
            &table,
        ],
    ));
    commands.push(PlannedCommand::new(
        IP_BIN,
        &[
            "route",
            "add",
            &high.to_string(),
            "via",
            &gateway,
            "dev",
            &dev.device,
            "table",
            &table,
            "proto",
            "static",
            "metric",
            &table,
        ],
    ));
    commands.push(PlannedCommand::new(
        IP_BIN,
        &[
            "rule",
            "add",
            "from",
            &address,
            "table",
            &table,
            "priority",
            &RULE_PRIORITY.to_string(),
        ],
    ));
    for (knob, value) in ARP_SYSCTLS {
        commands.push(PlannedCommand::new(
            SYSCTL_BIN,
            &[
                "-w",
                &format!("net.ipv4.conf.{}.{}={}", dev.device, knob, value),
            ],
        ));
    }
    commands
}

/// Apply the plan to the running system, device by device.
///
/// In dry-run mode every command is printed and recorded as skipped
/// but nothing is executed.
pub fn apply(plan: &Plan, flush: bool, dry_run: bool, verbose: bool, report: &mut RunReport) {
    for dev in &plan.devices {
        for command in device_commands(plan, dev, flush) {
            if verbose || dry_run {
                println!("{}", command);
            }
            if dry_run {
                report.record(command.to_string(), Outcome::Skipped);
                continue;
            }
            report.record(command.to_string(), run(&command));
        }
        println!(
            "Configured ip addr, ip route, ip rule, and ARP settings for {}",
            dev.device
        );
    }
}

fn run(command: &PlannedCommand) -> Outcome {
    match Command::new(command.program).args(&command.args).output() {
        Ok(output) if output.status.success() => Outcome::Success,
        Ok(output) => {
            println!("Error: could not run command {}", command);
            println!("       Continuing.");
            Outcome::CommandError {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
        }
        Err(e) => {
            println!("Error: could not run command {}", command);
            println!("       Continuing.");
            Outcome::CommandError {
                code: None,
                stderr: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Plan;

    fn sample_plan() -> Plan {
        Plan::new("192.168.1.1/24", &["eth0".to_string()]).unwrap()
    }

    #[test]
    fn commands_for_one_device() {
        let plan = sample_plan();
        let commands = device_commands(&plan, &plan.devices[0], false);
        let rendered: Vec<String> = commands.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "/usr/sbin/ip addr add 192.168.1.1/24 dev eth0",
                "/usr/sbin/ip route add 0.0.0.0/1 via 192.168.1.254 dev eth0 table 101 proto static metric 101",
                "/usr/sbin/ip route add 192.168.1.0/24 dev eth0 table 101 proto static scope link src 192.168.1.1 metric 101",
                "/usr/sbin/ip route add 128.0.0.0/1 via 192.168.1.254 dev eth0 table 101 proto static metric 101",
                "/usr/sbin/ip rule add from 192.168.1.1 table 101 priority 32761",
                "/usr/sbin/sysctl -w net.ipv4.conf.eth0.arp_accept=1",
                "/usr/sbin/sysctl -w net.ipv4.conf.eth0.arp_announce=1",
                "/usr/sbin/sysctl -w net.ipv4.conf.eth0.arp_filter=0",
                "/usr/sbin/sysctl -w net.ipv4.conf.eth0.rp_filter=2",
                "/usr/sbin/sysctl -w net.ipv4.conf.eth0.arp_ignore=1",
            ]
        );
    }

    #[test]
    fn flush_prepends_addr_flush() {
        let plan = sample_plan();
        let commands = device_commands(&plan, &plan.devices[0], true);
        assert_eq!(commands.len(), 11);
        assert_eq!(commands[0].to_string(), "/usr/sbin/ip addr flush dev eth0");
    }

    #[test]
    fn ipv6_uses_ipv6_half_ranges() {
        let plan = Plan::new("2001:db8::1/64", &["eth0".to_string()]).unwrap();
        let commands = device_commands(&plan, &plan.devices[0], false);
        assert!(commands[1].to_string().contains("route add ::/1 via"));
        assert!(commands[3].to_string().contains("route add 8000::/1 via"));
    }

    #[test]
    fn dry_run_records_skipped_steps() {
        let plan = sample_plan();
        let mut report = RunReport::new();
        apply(&plan, false, true, false, &mut report);
        assert_eq!(report.steps.len(), 10);
        assert!(report.steps.iter().all(|s| s.outcome == Outcome::Skipped));
        assert_eq!(report.failures(), 0);
    }
}
