//! The **capture task**.
//!
//! Runs on its own OS thread because the capture read is blocking. It owns
//! the receiving half of the session, decodes every captured frame, keeps the
//! first binding seen per IP address and publishes it on the bounded result
//! channel. Publishing blocks while the channel is full, so a slow collector
//! slows the capture down instead of losing replies.

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use lanprobe_common::network::binding::AddressBinding;
use lanprobe_protocols::DiscoveryProtocol;

use crate::capture::FrameReceiver;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListenerStats {
    pub frames: usize,
    pub published: usize,
    pub duplicates: usize,
}

/// Handle on a running capture task.
///
/// Dropping the handle raises the stop signal; [`ListenerHandle::join`]
/// additionally waits until the receiving half has been released.
pub(crate) struct ListenerHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<ListenerStats>>,
}

impl ListenerHandle {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub async fn join(mut self) -> ListenerStats {
        self.stop();
        let Some(thread) = self.thread.take() else {
            return ListenerStats::default();
        };

        match tokio::task::spawn_blocking(move || thread.join()).await {
            Ok(Ok(stats)) => stats,
            _ => {
                warn!("Capture task ended abnormally");
                ListenerStats::default()
            }
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

pub(crate) fn spawn(
    receiver: Box<dyn FrameReceiver>,
    protocol: DiscoveryProtocol,
    results: mpsc::Sender<AddressBinding>,
) -> ListenerHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let signal = stop.clone();
    let thread = std::thread::spawn(move || run(receiver, protocol, results, &signal));

    ListenerHandle {
        stop,
        thread: Some(thread),
    }
}

fn run(
    mut receiver: Box<dyn FrameReceiver>,
    protocol: DiscoveryProtocol,
    results: mpsc::Sender<AddressBinding>,
    stop: &AtomicBool,
) -> ListenerStats {
    let mut seen: HashSet<IpAddr> = HashSet::new();
    let mut stats = ListenerStats::default();

    loop {
        let frame = match receiver.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                continue;
            }
            Err(e) => {
                warn!("Capture stopped: {e}");
                break;
            }
        };

        if stop.load(Ordering::Relaxed) {
            break;
        }
        stats.frames += 1;

        let Some(binding) = protocol.decode(frame) else {
            continue;
        };
        if !seen.insert(binding.ip) {
            stats.duplicates += 1;
            continue;
        }
        if results.blocking_send(binding).is_err() {
            break;
        }
        stats.published += 1;
    }

    debug!(
        "Capture task done: {} frames, {} bindings, {} duplicates",
        stats.frames, stats.published, stats.duplicates
    );
    stats
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
