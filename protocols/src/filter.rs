//! Capture filters for discovery replies.
//!
//! Each filter has a BPF expression for capture backends that compile
//! filters in the kernel, and an equivalent byte-level predicate for
//! backends that can only filter in user space.

use crate::ethernet::ETH_HDR_LEN;

const ETHERTYPE_ARP: [u8; 2] = [0x08, 0x06];
const ETHERTYPE_IPV6: [u8; 2] = [0x86, 0xdd];
const ARP_OP_OFFSET: usize = ETH_HDR_LEN + 6;
const ARP_OP_REPLY: [u8; 2] = [0x00, 0x02];
const IPV6_NEXT_HEADER_OFFSET: usize = ETH_HDR_LEN + 6;
const IPV6_PAYLOAD_OFFSET: usize = ETH_HDR_LEN + 40;
const NEXT_HEADER_ICMPV6: u8 = 58;
const ICMPV6_NEIGHBOR_ADVERT: u8 = 136;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFilter {
    /// ARP frames whose operation is "reply".
    ArpReply,
    /// ICMPv6 neighbor advertisements.
    NeighborAdvert,
}

impl CaptureFilter {
    pub fn expression(self) -> &'static str {
        match self {
            Self::ArpReply => "arp and arp[6:2] = 2",
            Self::NeighborAdvert => "icmp6 and ip6[40] = 136",
        }
    }

    /// Evaluates the filter against a raw ethernet frame.
    pub fn matches(self, frame: &[u8]) -> bool {
        if frame.len() < ETH_HDR_LEN {
            return false;
        }
        let ethertype = &frame[12..14];

        match self {
            Self::ArpReply => {
                ethertype == ETHERTYPE_ARP
                    && frame.get(ARP_OP_OFFSET..ARP_OP_OFFSET + 2) == Some(&ARP_OP_REPLY[..])
            }
            Self::NeighborAdvert => {
                ethertype == ETHERTYPE_IPV6
                    && frame.get(IPV6_NEXT_HEADER_OFFSET) == Some(&NEXT_HEADER_ICMPV6)
                    && frame.get(IPV6_PAYLOAD_OFFSET) == Some(&ICMPV6_NEIGHBOR_ADVERT)
            }
        }
    }
}

impl std::fmt::Display for CaptureFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.expression())
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
