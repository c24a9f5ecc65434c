//! # Scan Errors
//!
//! Every way a discovery scan can fail, grouped the same way the scan
//! progresses: input, interface resolution, capture setup and transmission.
//! A captured frame that does not decode is never an error.

use std::io;
use std::net::IpAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// The address block could not be parsed as CIDR notation.
    #[error("invalid address block '{input}': {reason}")]
    InvalidBlock { input: String, reason: String },

    /// The block parsed, but its address representation is neither plain IPv4 nor plain IPv6.
    #[error("unsupported address format: {0}")]
    UnsupportedAddress(IpAddr),

    /// The prefix does not fit the address width.
    #[error("degenerate prefix /{prefix} for a {width}-bit address")]
    DegeneratePrefix { prefix: u8, width: u8 },

    #[error("no active interface serves {0}")]
    NoMatchingInterface(String),

    #[error("interface {interface} serves the block but has no hardware address")]
    NoHardwareAddress { interface: String },

    #[error("failed to open capture on {interface}: {reason}")]
    CaptureOpen { interface: String, reason: String },

    #[error("capture filter '{expression}' rejected: {reason}")]
    FilterRejected { expression: String, reason: String },

    #[error("failed to build discovery frame for {target}: {reason}")]
    FrameBuild { target: IpAddr, reason: String },

    #[error("failed to send discovery frame to {target}")]
    Transmit {
        target: IpAddr,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// True for failures caused by the caller's input rather than the host.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidBlock { .. } | Self::UnsupportedAddress(_) | Self::DegeneratePrefix { .. }
        )
    }
}
