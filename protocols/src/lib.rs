//! # Discovery Protocols
//!
//! Wire formats for active neighbor discovery.
//!
//! The set of protocols is closed: [`DiscoveryProtocol::Arp`] probes IPv4
//! blocks and [`DiscoveryProtocol::Ndp`] probes IPv6 blocks. Each variant
//! knows how to build a request, how to read a reply and which frames the
//! capture needs to deliver.

pub mod arp;
pub mod ethernet;
pub mod filter;
pub mod ndp;

use std::net::IpAddr;

use thiserror::Error;
use tracing::trace;

use lanprobe_common::network::binding::{AddressBinding, LocalBinding};
use lanprobe_common::network::block::{AddressBlock, AddressFamily};
use lanprobe_common::ScanError;

pub use filter::CaptureFilter;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    #[error("buffer too small for the ethernet header")]
    EthernetBuffer,
    #[error("buffer too small for the ARP payload")]
    ArpBuffer,
    #[error("buffer too small for the IPv6 header")]
    Ipv6Buffer,
    #[error("buffer too small for the neighbor solicitation")]
    NdpBuffer,
    #[error("source and target address families differ")]
    FamilyMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryProtocol {
    /// ARP request/reply over broadcast.
    Arp,
    /// ICMPv6 neighbor solicitation/advertisement over solicited-node multicast.
    Ndp,
}

impl DiscoveryProtocol {
    pub fn for_family(family: AddressFamily) -> Self {
        match family {
            AddressFamily::V4 => Self::Arp,
            AddressFamily::V6 => Self::Ndp,
        }
    }

    pub fn for_block(block: &AddressBlock) -> Self {
        Self::for_family(block.family())
    }

    pub fn filter(self) -> CaptureFilter {
        match self {
            Self::Arp => CaptureFilter::ArpReply,
            Self::Ndp => CaptureFilter::NeighborAdvert,
        }
    }

    /// Builds the discovery request for `target`, sent from `local`.
    pub fn encode(self, target: IpAddr, local: &LocalBinding) -> Result<Vec<u8>, ScanError> {
        let frame = match (self, local.ip, target) {
            (Self::Arp, IpAddr::V4(src), IpAddr::V4(dst)) => arp::request_frame(local.mac, src, dst),
            (Self::Ndp, IpAddr::V6(src), IpAddr::V6(dst)) => {
                ndp::solicitation_frame(local.mac, src, dst)
            }
            _ => Err(PacketError::FamilyMismatch),
        };

        frame.map_err(|e| ScanError::FrameBuild {
            target,
            reason: e.to_string(),
        })
    }

    /// Reads a binding out of a captured frame; anything else yields `None`.
    pub fn decode(self, frame: &[u8]) -> Option<AddressBinding> {
        let binding = match self {
            Self::Arp => arp::parse_reply(frame),
            Self::Ndp => ndp::parse_advertisement(frame),
        };
        if binding.is_none() {
            trace!("Ignoring {}-byte frame that is not a {self:?} reply", frame.len());
        }
        binding
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
