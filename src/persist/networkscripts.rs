//! ifcfg/route network-scripts emitter for RHEL-family systems
//!
//! Two files per device under /etc/sysconfig/network-scripts: an ifcfg
//! file with the static address, gateway, and routing-rule annotation,
//! and a route file with the two half-range routes plus the local
//! subnet route in the device's table.

use super::{Backend, ConfigFile};
use crate::error::Result;
use crate::plan::{DevicePlan, Plan, RULE_PRIORITY};
use std::path::Path;

pub const NETWORK_SCRIPTS_DIR: &str = "/etc/sysconfig/network-scripts";

pub(super) struct NetworkScriptsBackend;

impl Backend for NetworkScriptsBackend {
    fn render(&self, plan: &Plan) -> Result<Vec<ConfigFile>> {
        let dir = Path::new(NETWORK_SCRIPTS_DIR);
        let mut files = Vec::with_capacity(plan.devices.len() * 2);
        for dev in &plan.devices {
            files.push(ConfigFile {
                path: dir.join(format!("ifcfg-{}", dev.device)),
                contents: render_ifcfg(plan, dev),
            });
            files.push(ConfigFile {
                path: dir.join(format!("route-{}", dev.device)),
                contents: render_route(plan, dev),
            });
        }
        Ok(files)
    }
}

fn render_ifcfg(plan: &Plan, dev: &DevicePlan) -> String {
    format!(
        "BOOTPROTO=none\n\
         NAME={device}\n\
         DEVICE={device}\n\
         ONBOOT=yes\n\
         IPADDR={address}\n\
         PREFIX={prefix}\n\
         DEFROUTE=yes\n\
         GATEWAY={gateway}\n\
         ROUTING_RULE=\"priority {priority} from {address} table {table}\"\n\
         IPV4_FAILURE_FATAL=no\n\
         IPV6INIT=yes\n\
         IPV6_AUTOCONF=yes\n\
         IPV6_DEFROUTE=yes\n\
         IPV6_FAILURE_FATAL=no\n",
        device = dev.device,
        address = dev.address,
        prefix = plan.prefix_len(),
        gateway = plan.gateway,
        priority = RULE_PRIORITY,
        table = dev.table_id,
    )
}

fn render_route(plan: &Plan, dev: &DevicePlan) -> String {
    let mut out = String::new();
    for (i, half) in plan.half_ranges().into_iter().enumerate() {
        out.push_str(&format!(
            "ADDRESS{i}={address}\n\
             NETMASK{i}={netmask}\n\
             GATEWAY{i}={gateway}\n\
             METRIC{i}={table}\n\
             OPTIONS{i}=\"table {table}\"\n",
            address = half.network(),
            netmask = half.netmask(),
            gateway = plan.gateway,
            table = dev.table_id,
        ));
    }
    out.push_str(&format!(
        "ADDRESS2={subnet}\n\
         NETMASK2={netmask}\n\
         METRIC2={table}\n\
         OPTIONS2=\"onlink src {address} table {table}\"\n",
        subnet = plan.subnet(),
        netmask = plan.netmask(),
        address = dev.address,
        table = dev.table_id,
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> Plan {
        Plan::new("192.168.1.1/24", &["eth0".to_string()]).unwrap()
    }

    #[test]
    fn ifcfg_contents() {
        let plan = sample_plan();
        assert_eq!(
            render_ifcfg(&plan, &plan.devices[0]),
            "BOOTPROTO=none\n\
             NAME=eth0\n\
             DEVICE=eth0\n\
             ONBOOT=yes\n\
             IPADDR=192.168.1.1\n\
             PREFIX=24\n\
             DEFROUTE=yes\n\
             GATEWAY=192.168.1.254\n\
             ROUTING_RULE=\"priority 32761 from 192.168.1.1 table 101\"\n\
             IPV4_FAILURE_FATAL=no\n\
             IPV6INIT=yes\n\
             IPV6_AUTOCONF=yes\n\
             IPV6_DEFROUTE=yes\n\
             IPV6_FAILURE_FATAL=no\n"
        );
    }

    #[test]
    fn route_contents() {
        let plan = sample_plan();
        assert_eq!(
            render_route(&plan, &plan.devices[0]),
            "ADDRESS0=0.0.0.0\n\
             NETMASK0=128.0.0.0\n\
             GATEWAY0=192.168.1.254\n\
             METRIC0=101\n\
             OPTIONS0=\"table 101\"\n\
             ADDRESS1=128.0.0.0\n\
             NETMASK1=128.0.0.0\n\
             GATEWAY1=192.168.1.254\n\
             METRIC1=101\n\
             OPTIONS1=\"table 101\"\n\
             ADDRESS2=192.168.1.0\n\
             NETMASK2=255.255.255.0\n\
             METRIC2=101\n\
             OPTIONS2=\"onlink src 192.168.1.1 table 101\"\n"
        );
    }

    #[test]
    fn per_device_table_ids() {
        let plan = Plan::new("192.168.1.1/24", &["eth0".to_string(), "eth1".to_string()]).unwrap();
        let route = render_route(&plan, &plan.devices[1]);
        assert!(route.contains("OPTIONS0=\"table 102\""));
        assert!(route.contains("OPTIONS2=\"onlink src 192.168.1.2 table 102\""));
    }
}
