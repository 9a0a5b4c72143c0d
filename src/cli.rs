//! Command-line interface for mlnxipcfg
//!
//! Uses clap with derive for type-safe CLI parsing

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

/// mlnxipcfg - sequential IP and policy-routing configuration for Mellanox Ethernet NICs
#[derive(Parser)]
#[command(name = "mlnxipcfg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Starting IP address with prefix length (for example: 192.168.1.1/24 or 2001::66/64)
    #[arg(short, long, required_unless_present = "completion")]
    pub ipaddr: Option<String>,

    /// Comma separated device list (for example: enp225s0f0,enp225s0f1).
    /// If not provided, all found Ethernet-mode InfiniBand devices are configured
    #[arg(short, long, value_delimiter = ',')]
    pub devices: Option<Vec<String>>,

    /// Flush IP addresses from each device before adding new ones
    #[arg(short, long)]
    pub flush: bool,

    /// Dry run. Plan and print all actions without running commands or writing files
    #[arg(short = 'r', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the run report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Generate shell completion scripts and exit
    #[arg(long, value_enum)]
    pub completion: Option<Shell>,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Generate shell completion scripts
    pub fn generate_completion(shell: Shell) {
        let mut cmd = Self::command();
        clap_complete::generate(shell, &mut cmd, "mlnxipcfg", &mut std::io::stdout());
    }
}
