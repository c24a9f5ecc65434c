//! The **discovery orchestrator**.
//!
//! A [`Scanner`] drives one scan from start to finish:
//!
//! 1. parse the block and pick the discovery protocol for its family,
//! 2. resolve the local binding the requests are sent from,
//! 3. open a capture session, install the reply filter and start the
//!    capture task **before** the first request leaves,
//! 4. send one request per candidate address, in order,
//! 5. collect bindings until the window closes, stop the capture task and
//!    drain whatever is still in flight during the grace period.
//!
//! The capture session is released before [`Scanner::scan`] returns, on
//! every path.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info};

use lanprobe_common::config::ScanConfig;
use lanprobe_common::network::binding::{AddressBinding, HostRecord, LocalBinding};
use lanprobe_common::network::block::AddressBlock;
use lanprobe_common::network::interface;
use lanprobe_common::network::range;
use lanprobe_common::{ScanError, success};
use lanprobe_protocols::DiscoveryProtocol;

use crate::capture::{CaptureDevice, DatalinkDevice, FrameSender};

mod listener;

use listener::ListenerHandle;

/// Finds the local binding that serves an address block.
pub trait InterfaceResolver: Send + Sync {
    fn resolve(&self, block: &AddressBlock) -> Result<LocalBinding, ScanError>;
}

/// Resolves against the interfaces of the running system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInterfaces;

impl InterfaceResolver for SystemInterfaces {
    fn resolve(&self, block: &AddressBlock) -> Result<LocalBinding, ScanError> {
        interface::resolve_local_binding(block, &interface::system_interfaces())
    }
}

pub struct Scanner {
    device: Arc<dyn CaptureDevice>,
    resolver: Arc<dyn InterfaceResolver>,
    config: ScanConfig,
}

impl Scanner {
    pub fn new(
        device: Arc<dyn CaptureDevice>,
        resolver: Arc<dyn InterfaceResolver>,
        config: ScanConfig,
    ) -> Self {
        Self {
            device,
            resolver,
            config,
        }
    }

    /// A scanner using the system's interfaces and pnet's datalink capture.
    pub fn system(config: ScanConfig) -> Self {
        Self::new(
            Arc::new(DatalinkDevice::new(config.read_timeout)),
            Arc::new(SystemInterfaces),
            config,
        )
    }

    /// Actively discovers every neighbor in `cidr` that answers a request.
    ///
    /// Returns one record per responding address in the order the replies
    /// were captured. Any transmit failure fails the whole scan.
    pub async fn scan(&self, cidr: &str) -> Result<Vec<HostRecord>, ScanError> {
        let block = AddressBlock::parse(cidr)?;
        let protocol = DiscoveryProtocol::for_block(&block);
        let local = self.resolver.resolve(&block)?;
        info!(
            "Scanning {block} via {} ({}, {})",
            local.interface, local.ip, local.mac
        );

        let mut session = self.device.open(&local)?;
        session.set_filter(protocol.filter())?;
        let (mut sender, receiver) = session.split();

        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let listener = listener::spawn(receiver, protocol, tx);

        let sent = self.send_requests(sender.as_mut(), protocol, &block, &local);
        drop(sender);

        let bindings = match sent {
            Ok(count) => {
                debug!("Sent {count} discovery frames");
                self.collect(rx, &listener).await
            }
            Err(e) => {
                drop(rx);
                listener.join().await;
                return Err(e);
            }
        };

        let stats = listener.join().await;
        debug!(
            "Captured {} frames, {} duplicate replies",
            stats.frames, stats.duplicates
        );

        let records: Vec<HostRecord> = bindings.iter().map(HostRecord::from).collect();
        success!("Discovered {} hosts in {block}", records.len());
        Ok(records)
    }

    fn send_requests(
        &self,
        sender: &mut dyn FrameSender,
        protocol: DiscoveryProtocol,
        block: &AddressBlock,
        local: &LocalBinding,
    ) -> Result<usize, ScanError> {
        let targets = range::candidates(block, local.ip, self.config.v6_candidate_cap);
        debug!("{} host identifiers planned for {block}", targets.planned());

        let mut sent: usize = 0;
        for target in targets {
            let frame: Vec<u8> = protocol.encode(target, local)?;
            sender
                .send(&frame)
                .map_err(|source| ScanError::Transmit { target, source })?;
            sent += 1;
        }
        Ok(sent)
    }

    async fn collect(
        &self,
        mut rx: mpsc::Receiver<AddressBinding>,
        listener: &ListenerHandle,
    ) -> Vec<AddressBinding> {
        let mut found: Vec<AddressBinding> = Vec::new();

        let window = sleep(self.config.window);
        tokio::pin!(window);
        loop {
            tokio::select! {
                binding = rx.recv() => match binding {
                    Some(binding) => found.push(binding),
                    None => break,
                },
                _ = &mut window => break,
            }
        }

        listener.stop();
        debug!("Window closed with {} hosts, draining", found.len());

        let grace = sleep(self.config.grace);
        tokio::pin!(grace);
        loop {
            tokio::select! {
                binding = rx.recv() => match binding {
                    Some(binding) => found.push(binding),
                    None => break,
                },
                _ = &mut grace => break,
            }
        }

        rx.close();
        while let Ok(binding) = rx.try_recv() {
            found.push(binding);
        }
        found
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
