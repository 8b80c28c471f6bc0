//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::application::SearchStrategy;
use crate::config::OutputFormat;
use crate::domain::Ipv4Range;

/// Plan non-overlapping VNet and subnet CIDR ranges against already-used address space
#[derive(Parser, Debug)]
#[command(name = "ipplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding a local .ipplan.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find a free VNet range and allocate both subnets inside it
    Plan(PlanArgs),

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options for `ipplan plan`; unset options fall back to settings.
#[derive(Args, Debug, Default, Clone)]
pub struct PlanArgs {
    /// Base CIDR to search within (octets strategy: a /16 start, e.g. 172.16.0.0/16)
    #[arg(long)]
    pub base: Option<Ipv4Range>,

    /// Search strategy
    #[arg(long, value_enum)]
    pub search_strategy: Option<SearchStrategy>,

    /// First third octet tried by the octets strategy (default: 1)
    #[arg(long)]
    pub start_third_octet: Option<u8>,

    /// VNet prefix length (default: 24)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=32))]
    pub vnet_prefix: Option<u8>,

    /// Total addresses for the VNet, rounded up to a power of two (overrides --vnet-prefix)
    #[arg(long)]
    pub vnet_ips: Option<u64>,

    /// Primary (web app) subnet prefix length (default: 27)
    #[arg(
        long,
        alias = "webapp-subnet-prefix",
        value_parser = clap::value_parser!(u8).range(0..=32)
    )]
    pub primary_prefix: Option<u8>,

    /// Usable IPs needed in the primary subnet, 5 reserved on top (overrides --primary-prefix)
    #[arg(long, alias = "webapp-ips")]
    pub primary_ips: Option<u64>,

    /// Secondary (private endpoint) subnet prefix length (default: 27)
    #[arg(
        long,
        alias = "private-endpoint-subnet-prefix",
        value_parser = clap::value_parser!(u8).range(0..=32)
    )]
    pub secondary_prefix: Option<u8>,

    /// Usable IPs needed in the secondary subnet, 5 reserved on top (overrides --secondary-prefix)
    #[arg(long, visible_alias = "private-endpoint-ips")]
    pub secondary_ips: Option<u64>,

    /// Same as --secondary-ips, for a subnet hosting Cosmos DB endpoints; --secondary-ips wins
    #[arg(long)]
    pub cosmos_ips: Option<u64>,

    /// JSON file with an array of used CIDRs (az is not called)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub existing: Option<PathBuf>,

    /// Azure subscription id or name for az queries
    #[arg(long)]
    pub subscription: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
