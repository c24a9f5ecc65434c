pub mod discover;
pub mod segments;

use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing::Level;

use lanprobe_common::config::ScanConfig;

#[derive(Parser)]
#[command(name = "lanprobe")]
#[command(about = "Active ARP/NDP discovery of the hosts on a local segment.")]
#[command(version)]
pub struct CommandLine {
    /// Block to probe, e.g. 192.168.1.0/24 or fe80::/120 (prompts when omitted)
    pub cidr: Option<String>,

    /// Milliseconds to keep listening after the last request has been sent
    #[arg(short, long, value_name = "MS")]
    pub window: Option<u64>,

    /// Milliseconds to drain replies still in flight once the window closes
    #[arg(short, long, value_name = "MS")]
    pub grace: Option<u64>,

    /// More output (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Less output (warnings and results only)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn level(&self) -> Level {
        match (self.quiet, self.verbose) {
            (q, _) if q > 0 => Level::WARN,
            (_, 0) => Level::INFO,
            (_, 1) => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    pub fn scan_config(&self) -> ScanConfig {
        let mut cfg = ScanConfig::default();
        if let Some(ms) = self.window {
            cfg = cfg.with_window(Duration::from_millis(ms));
        }
        if let Some(ms) = self.grace {
            cfg = cfg.with_grace(Duration::from_millis(ms));
        }
        cfg
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
