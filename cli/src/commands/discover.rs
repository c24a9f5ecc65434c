use std::time::Instant;

use anyhow::Context;
use tracing::warn;

use lanprobe_common::config::ScanConfig;
use lanprobe_common::network::binding::HostRecord;
use lanprobe_core::Scanner;

use crate::terminal::{print, spinner};

pub async fn discover(cidr: &str, cfg: ScanConfig) -> anyhow::Result<()> {
    if !is_root::is_root() {
        warn!("Not running as root, opening the capture will most likely fail");
    }

    print::header("getting ready for discovery");
    let scanner = Scanner::system(cfg);

    let start_time: Instant = Instant::now();
    let result = {
        let _spinner = spinner::start(format!("Probing {cidr}..."));
        scanner.scan(cidr).await
    };
    let hosts: Vec<HostRecord> = result.with_context(|| format!("discovery of {cidr} failed"))?;

    discovery_ends(&hosts, start_time);
    Ok(())
}

fn discovery_ends(hosts: &[HostRecord], start_time: Instant) {
    if hosts.is_empty() {
        print::header("zero hosts detected");
        print::no_results();
        return;
    }

    print::header("network discovery");
    print::table(&print::host_table(hosts));
    print::summary(hosts.len(), start_time.elapsed());
}
