use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(100);
const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Spinner shown while a scan is in flight. Cleared on drop.
pub struct SpinnerGuard;

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        let Ok(mut active) = ACTIVE.lock() else {
            return;
        };
        if let Some(pb) = active.take() {
            pb.finish_and_clear();
        }
    }
}

pub fn start(message: String) -> SpinnerGuard {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_strings(TICK_STRINGS));
    }
    pb.set_message(message);
    pb.enable_steady_tick(TICK);

    if let Ok(mut active) = ACTIVE.lock() {
        *active = Some(pb);
    }
    SpinnerGuard
}

/// Log writer that keeps output above a running spinner.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg = msg.trim_end_matches('\n');
        let active = ACTIVE.lock().ok().and_then(|active| active.clone());
        match active {
            Some(pb) => pb.println(msg),
            None => writeln!(io::stdout(), "{msg}")?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}
