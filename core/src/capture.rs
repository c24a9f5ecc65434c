//! The **capture session** contract.
//!
//! A [`CaptureDevice`] opens a live session on the interface named by a
//! [`LocalBinding`]. The session accepts one capture filter and is then split
//! into its two halves: a [`FrameSender`] for injecting discovery frames and a
//! [`FrameReceiver`] yielding captured frames one at a time.
//!
//! Closing a session is dropping both halves. Nothing else owns the
//! underlying handle, so a session is never used after it has been closed.

use std::io;

use lanprobe_common::network::binding::LocalBinding;
use lanprobe_common::ScanError;
use lanprobe_protocols::CaptureFilter;

pub mod datalink;

pub use datalink::DatalinkDevice;

/// Opens capture sessions on local interfaces.
pub trait CaptureDevice: Send + Sync {
    /// Opens a live, promiscuous session on `local.interface`.
    fn open(&self, local: &LocalBinding) -> Result<Box<dyn CaptureSession>, ScanError>;
}

/// An opened session that has not started exchanging frames yet.
pub trait CaptureSession: Send {
    /// Restricts the frames delivered by the receiving half.
    fn set_filter(&mut self, filter: CaptureFilter) -> Result<(), ScanError>;

    /// Hands out the sending and receiving halves of the session.
    fn split(self: Box<Self>) -> (Box<dyn FrameSender>, Box<dyn FrameReceiver>);
}

pub trait FrameSender: Send {
    /// Writes one complete Ethernet frame to the wire.
    fn send(&mut self, frame: &[u8]) -> io::Result<()>;
}

pub trait FrameReceiver: Send {
    /// Blocks until the next frame passing the filter arrives.
    ///
    /// Returns `Ok(None)` when the read timeout elapses without a frame. An
    /// error ends the sequence: the receiver must not be read again.
    fn next_frame(&mut self) -> io::Result<Option<&[u8]>>;
}
