use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use lanprobe_common::network::binding::HostRecord;
use lanprobe_common::network::interface::NetworkSegment;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;
pub const PRINT_TARGET: &str = "lanprobe::print";

pub fn print(msg: &str) {
    info!(target: "lanprobe::print", raw_msg = msg);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = UnicodeWidthStr::width(formatted.as_str());

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    let message: String = format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT));
    print(&message);
}

/// A plain text table; cells are padded to the widest entry of their column.
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, head)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| UnicodeWidthStr::width(cell.as_str()))
                    .fold(UnicodeWidthStr::width(*head), usize::max)
            })
            .collect()
    }

    pub fn render(&self) -> Vec<String> {
        let widths: Vec<usize> = self.widths();
        let total: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 2;
        let rule: String = "─".repeat(total);

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| pad(cell, *width))
                .collect::<Vec<String>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let headers: Vec<String> = self.headers.iter().map(|h| h.to_string()).collect();
        let mut out: Vec<String> = vec![rule.clone(), line(&headers), rule.clone()];
        out.extend(self.rows.iter().map(|row| line(row)));
        out.push(rule);
        out
    }
}

fn pad(cell: &str, width: usize) -> String {
    let fill: usize = width.saturating_sub(UnicodeWidthStr::width(cell));
    format!("{}{}", cell, " ".repeat(fill))
}

pub fn segment_table(segments: &[NetworkSegment]) -> Table {
    let mut table = Table::new(vec!["#", "Interface", "IP", "MAC", "Family"]);
    for (idx, segment) in segments.iter().enumerate() {
        table.row(vec![
            (idx + 1).to_string(),
            segment.interface.clone(),
            segment.cidr.clone(),
            segment.mac.to_string(),
            segment.family.to_string(),
        ]);
    }
    table
}

pub fn host_table(hosts: &[HostRecord]) -> Table {
    let mut table = Table::new(vec!["IP", "MAC", "Requester IP", "Requester MAC"]);
    for host in hosts {
        table.row(vec![
            host.ip.clone(),
            host.mac.clone(),
            host.requester_ip.clone(),
            host.requester_mac.clone(),
        ]);
    }
    table
}

pub fn table(table: &Table) {
    for (i, line) in table.render().iter().enumerate() {
        let colored: ColoredString = match i {
            1 => line.color(colors::PRIMARY).bold(),
            _ if line.starts_with('─') => line.color(colors::SEPARATOR),
            _ => line.color(colors::TEXT_DEFAULT),
        };
        print(&format!("{}", colored));
    }
}

pub fn summary(count: usize, elapsed: std::time::Duration) {
    let hosts: ColoredString = format!("{count} devices").bold().green();
    let secs: ColoredString = format!("{:.2}s", elapsed.as_secs_f64()).bold().yellow();
    print_status(format!("Discovery complete: {hosts} found in {secs}"));
}

const NO_RESULTS: &str = r#"
         _   _  ___    ____  _______     _____ ____ _____ ____
        | \ | |/ _ \  |  _ \| ____\ \   / /_ _/ ___| ____/ ___|
        |  \| | | | | | | | |  _|  \ \ / / | | |   |  _| \___ \
        | |\  | |_| | | |_| | |___  \ V /  | | |___| |___ ___) |
        |_| \_|\___/  |____/|_____|  \_/  |___\____|_____|____/
"#;

pub fn no_results() {
    print(&format!("{}", NO_RESULTS.red().bold()));
    print_status("No devices found");
}

pub fn end_of_program() {
    print(&format!(
        "{}",
        "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR)
    ));
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
