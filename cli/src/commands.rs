pub mod probe;
pub mod run;
pub mod sources;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use pingr_common::config::RunConfig;

#[derive(Parser)]
#[command(name = "pingr")]
#[command(about = "Collects CDN endpoint candidates and ranks them by round-trip latency.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect candidates from every source, probe and rank them
    #[command(alias = "r")]
    Run {
        #[command(flatten)]
        probe_args: ProbeArgs,

        /// Where the ranked shortlist is written
        #[arg(short, long, default_value = "ip.txt")]
        output: PathBuf,
    },
    /// Probe an explicit endpoint list, skipping collection
    #[command(alias = "p")]
    Probe {
        /// Endpoints like `1.2.3.4` or `1.2.3.4:443`
        #[arg(required = true)]
        endpoints: Vec<String>,

        #[command(flatten)]
        probe_args: ProbeArgs,

        /// Optional shortlist file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the built-in candidate sources
    #[command(alias = "s")]
    Sources,
}

/// Probe-stage knobs shared by `run` and `probe`.
#[derive(Args)]
pub struct ProbeArgs {
    /// Shortlist length
    #[arg(short = 'k', long = "top", default_value_t = 5)]
    pub top: usize,

    /// Latency samples per endpoint
    #[arg(short = 'n', long, default_value_t = 5)]
    pub samples: u32,

    /// Milliseconds between two samples of the same endpoint
    #[arg(long, default_value_t = 1000)]
    pub spacing_ms: u64,

    /// Per-probe timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Probe sequences in flight at once
    #[arg(short = 'w', long, default_value_t = 10)]
    pub width: usize,

    /// Deadline for the whole probe stage, in seconds
    #[arg(long, default_value_t = 120)]
    pub deadline_s: u64,

    /// Per-source fetch timeout, in seconds
    #[arg(long, default_value_t = 15)]
    pub fetch_timeout_s: u64,

    /// Time a bare TCP connect instead of an HTTP GET
    #[arg(long)]
    pub tcp: bool,

    /// Port for endpoints that carry none (default: 80, or 443 with --tcp)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ProbeArgs {
    pub fn to_config(&self) -> RunConfig {
        RunConfig {
            sample_count: self.samples,
            sample_spacing: Duration::from_millis(self.spacing_ms),
            probe_timeout: Duration::from_millis(self.timeout_ms),
            pool_width: self.width,
            top_k: self.top,
            stage_deadline: Duration::from_secs(self.deadline_s),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_s),
            probe_port: self.port.unwrap_or(if self.tcp { 443 } else { 80 }),
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
