//! # lanprobe core
//!
//! Active neighbor discovery on a local segment: capture sessions and the
//! orchestrator that runs a scan over them.

pub mod capture;
pub mod scanner;

pub use capture::{CaptureDevice, CaptureSession, DatalinkDevice, FrameReceiver, FrameSender};
pub use scanner::{InterfaceResolver, Scanner, SystemInterfaces};
