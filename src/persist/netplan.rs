//! Netplan YAML emitter for Ubuntu-family systems
//!
//! One document covering every device: addresses, the same three routes
//! applied live, and the source routing-policy rule, rendered with
//! serde_yaml_ng and written to a single drop-in file.

use super::{Backend, ConfigFile};
use crate::error::Result;
use crate::plan::{DevicePlan, Plan, RULE_PRIORITY};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Netplan drop-in overwritten on every run
pub const NETPLAN_PATH: &str = "/etc/netplan/55-nvidia-autoconfig.yaml";

#[derive(Debug, Serialize)]
struct Document {
    network: Network,
}

#[derive(Debug, Serialize)]
struct Network {
    version: u8,
    renderer: &'static str,
    ethernets: BTreeMap<String, Ethernet>,
}

#[derive(Debug, Serialize)]
struct Ethernet {
    addresses: Vec<String>,
    routes: Vec<Route>,
    #[serde(rename = "routing-policy")]
    routing_policy: Vec<Policy>,
}

#[derive(Debug, Serialize)]
struct Route {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    metric: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'static str>,
    table: u32,
    to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    via: Option<String>,
}

#[derive(Debug, Serialize)]
struct Policy {
    from: String,
    priority: u32,
    table: u32,
}

pub(super) struct NetplanBackend;

impl Backend for NetplanBackend {
    fn render(&self, plan: &Plan) -> Result<Vec<ConfigFile>> {
        let mut ethernets = BTreeMap::new();
        for dev in &plan.devices {
            ethernets.insert(dev.device.clone(), ethernet_entry(plan, dev));
        }
        let doc = Document {
            network: Network {
                version: 2,
                renderer: "networkd",
                ethernets,
            },
        };
        Ok(vec![ConfigFile {
            path: PathBuf::from(NETPLAN_PATH),
            contents: serde_yaml_ng::to_string(&doc)?,
        }])
    }
}

fn ethernet_entry(plan: &Plan, dev: &DevicePlan) -> Ethernet {
    let [low, high] = plan.half_ranges();
    let via_gateway = |to: String| Route {
        from: None,
        metric: dev.table_id,
        scope: None,
        table: dev.table_id,
        to,
        via: Some(plan.gateway.to_string()),
    };
    Ethernet {
        addresses: vec![plan.host_prefix(dev)],
        routes: vec![
            via_gateway(low.to_string()),
            via_gateway(high.to_string()),
            Route {
                from: Some(dev.address.to_string()),
                metric: dev.table_id,
                scope: Some("link"),
                table: dev.table_id,
                to: plan.network.to_string(),
                via: None,
            },
        ],
        routing_policy: vec![Policy {
            from: dev.address.to_string(),
            priority: RULE_PRIORITY,
            table: dev.table_id,
        }],
    }
}
