//! 命令行参数定义

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Provision and maintain Cloudflare sites
#[derive(Parser, Debug)]
#[command(name = "edge-provisioner", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a zone and apply the initial configuration
    Create(CreateArgs),

    /// Re-point a site's DNS records and forwarding rules
    Update(UpdateArgs),

    /// Ask Cloudflare to re-check the nameserver delegation
    CheckNs {
        /// Site (zone) ID
        site_id: String,
    },

    /// List locally registered sites
    List,

    /// Show one site
    Show {
        /// Site (zone) ID
        site_id: String,
    },

    /// Refresh a site's status and nameservers from Cloudflare
    Refresh {
        /// Site (zone) ID
        site_id: String,
    },

    /// List zones visible to the API token
    Zones {
        /// Page number (1-indexed)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size (max 50)
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Domain to register (e.g. example.com)
    pub name: String,
    /// Target of the root (@) record: IPv4, IPv6 or hostname
    #[arg(long)]
    pub root_target: String,
    /// Target of the www record (defaults to the root target)
    #[arg(long)]
    pub sub_target: Option<String>,
    /// Redirect destination for both forwarding rules
    #[arg(long)]
    pub forwarding_url: String,
    /// URL pattern of the bare-domain rule (defaults to `<name>/*`)
    #[arg(long)]
    pub pagerule_url: Option<String>,
    /// URL pattern of the www rule (defaults to `www.<name>/*`)
    #[arg(long)]
    pub pagerule_full_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Site (zone) ID
    pub site_id: String,
    /// New target of the root record
    #[arg(long)]
    pub root_target: String,
    /// New target of the www record (defaults to the root target)
    #[arg(long)]
    pub sub_target: Option<String>,
    /// New redirect destination for every forwarding rule
    #[arg(long)]
    pub forwarding_url: Option<String>,
}
