use std::io::{self, BufRead, Write};

use anyhow::{Context, bail};
use tracing::warn;

use lanprobe_common::network::interface::{self, NetworkSegment};

use crate::terminal::print;

/// Lists the attached segments and asks which one to scan.
pub fn choose() -> anyhow::Result<String> {
    let segments: Vec<NetworkSegment> = interface::available_segments(&interface::system_interfaces())
        .context("no segment to scan, pass a block such as 192.168.1.0/24 or fe80::/120")?;

    print::header("available segments");
    print::table(&print::segment_table(&segments));

    let segment: &NetworkSegment = prompt(io::stdin().lock(), &segments)?;
    print::print_status(format!(
        "Selected {} (interface {}, address {})",
        segment.cidr, segment.interface, segment.ip
    ));
    Ok(segment.cidr.clone())
}

fn prompt<'a, R: BufRead>(mut input: R, segments: &'a [NetworkSegment]) -> anyhow::Result<&'a NetworkSegment> {
    loop {
        print!("Select a segment (1-{}): ", segments.len());
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("reading selection")? == 0 {
            bail!("no segment selected");
        }

        match parse_choice(&line, segments.len()) {
            Some(idx) => return Ok(&segments[idx]),
            None => warn!("Invalid index, enter a number between 1 and {}", segments.len()),
        }
    }
}

/// One-based selection to zero-based index.
fn parse_choice(input: &str, count: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(choice) if (1..=count).contains(&choice) => Some(choice - 1),
        _ => None,
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
