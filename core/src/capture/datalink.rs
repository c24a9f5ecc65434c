use std::io;
use std::time::Duration;

use pnet::datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender, NetworkInterface};
use tracing::debug;

use lanprobe_common::network::binding::LocalBinding;
use lanprobe_common::ScanError;
use lanprobe_protocols::CaptureFilter;

use super::{CaptureDevice, CaptureSession, FrameReceiver, FrameSender};

/// Capture backed by pnet's layer 2 channel.
///
/// The channel has no kernel filter, so [`CaptureFilter::matches`] is applied
/// to every frame before it leaves the receiver.
#[derive(Debug, Clone, Copy)]
pub struct DatalinkDevice {
    read_timeout: Duration,
}

impl DatalinkDevice {
    pub fn new(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }

    fn config(&self) -> Config {
        Config {
            read_timeout: Some(self.read_timeout),
            promiscuous: true,
            ..Default::default()
        }
    }
}

impl CaptureDevice for DatalinkDevice {
    fn open(&self, local: &LocalBinding) -> Result<Box<dyn CaptureSession>, ScanError> {
        let interface: NetworkInterface = datalink::interfaces()
            .into_iter()
            .find(|intf| intf.name == local.interface)
            .ok_or_else(|| ScanError::CaptureOpen {
                interface: local.interface.clone(),
                reason: "interface disappeared".to_string(),
            })?;

        let (tx, rx) = ethernet_channel(&interface, &self.config(), datalink::channel)?;
        debug!("Capture opened on {}", interface.name);

        Ok(Box::new(DatalinkSession {
            tx,
            rx,
            filter: None,
        }))
    }
}

fn ethernet_channel<F>(intf: &NetworkInterface, cfg: &Config, channel_opener: F)
    -> Result<(Box<dyn DataLinkSender>, Box<dyn DataLinkReceiver>), ScanError>
where F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>
{
    let ch: Channel = channel_opener(intf, *cfg).map_err(|e| ScanError::CaptureOpen {
        interface: intf.name.clone(),
        reason: e.to_string(),
    })?;
    match ch {
        Channel::Ethernet(tx, rx) => Ok((tx, rx)),
        _ => Err(ScanError::CaptureOpen {
            interface: intf.name.clone(),
            reason: "non-ethernet channel".to_string(),
        }),
    }
}

struct DatalinkSession {
    tx: Box<dyn DataLinkSender>,
    rx: Box<dyn DataLinkReceiver>,
    filter: Option<CaptureFilter>,
}

impl CaptureSession for DatalinkSession {
    fn set_filter(&mut self, filter: CaptureFilter) -> Result<(), ScanError> {
        debug!("Filtering in user space: {}", filter.expression());
        self.filter = Some(filter);
        Ok(())
    }

    fn split(self: Box<Self>) -> (Box<dyn FrameSender>, Box<dyn FrameReceiver>) {
        let session = *self;
        (
            Box::new(DatalinkSender { tx: session.tx }),
            Box::new(DatalinkReceiver {
                rx: session.rx,
                filter: session.filter,
            }),
        )
    }
}

struct DatalinkSender {
    tx: Box<dyn DataLinkSender>,
}

impl FrameSender for DatalinkSender {
    fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        match self.tx.send_to(frame, None) {
            Some(result) => result,
            None => Err(io::Error::other("datalink sender has no room for the frame")),
        }
    }
}

struct DatalinkReceiver {
    rx: Box<dyn DataLinkReceiver>,
    filter: Option<CaptureFilter>,
}

impl FrameReceiver for DatalinkReceiver {
    fn next_frame(&mut self) -> io::Result<Option<&[u8]>> {
        let filter = self.filter;
        match self.rx.next() {
            Ok(frame) if filter.is_none_or(|f| f.matches(frame)) => Ok(Some(frame)),
            Ok(_) => Ok(None),
            Err(e) if is_timeout(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
