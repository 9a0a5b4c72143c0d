//! Sysctl ARP-tuning file shared by all OS families

use crate::apply::ARP_SYSCTLS;
use crate::plan::Plan;

/// sysctl.d drop-in overwritten on every run
pub const SYSCTL_PATH: &str = "/etc/sysctl.d/55-nvidia-arpdefaults.conf";

/// Render the ARP knobs for every device, concatenated in device order.
pub fn render(plan: &Plan) -> String {
    let mut out = String::new();
    for dev in &plan.devices {
        out.push('\n');
        for (knob, value) in ARP_SYSCTLS {
            out.push_str(&format!(
                "net.ipv4.conf.{}.{} = {}\n",
                dev.device, knob, value
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knobs_in_device_order() {
        let plan = Plan::new("192.168.1.1/24", &["eth0".to_string(), "eth1".to_string()]).unwrap();
        assert_eq!(
            render(&plan),
            "\n\
             net.ipv4.conf.eth0.arp_accept = 1\n\
             net.ipv4.conf.eth0.arp_announce = 1\n\
             net.ipv4.conf.eth0.arp_filter = 0\n\
             net.ipv4.conf.eth0.rp_filter = 2\n\
             net.ipv4.conf.eth0.arp_ignore = 1\n\
             \n\
             net.ipv4.conf.eth1.arp_accept = 1\n\
             net.ipv4.conf.eth1.arp_announce = 1\n\
             net.ipv4.conf.eth1.arp_filter = 0\n\
             net.ipv4.conf.eth1.rp_filter = 2\n\
             net.ipv4.conf.eth1.arp_ignore = 1\n"
        );
    }

    #[test]
    fn empty_plan_renders_empty() {
        let plan = Plan::new("192.168.1.1/24", &[]).unwrap();
        assert_eq!(render(&plan), "");
    }
}
