pub mod interfaces;
pub mod scan;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "scoutr",
    about = "Zero-config SSH host discovery for the local network",
    version
)]
pub struct CommandLine {
    /// Verbose engine logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the local segment for SSH endpoints.
    Scan(scan::ScanArgs),
    /// Show which interfaces qualify for scanning and why the rest do not.
    Interfaces,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
