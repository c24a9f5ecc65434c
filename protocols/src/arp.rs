//! ARP request construction and reply parsing (IPv4).

use std::net::{IpAddr, Ipv4Addr};

use pnet::datalink::MacAddr;
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};

use lanprobe_common::network::binding::AddressBinding;

use crate::PacketError;
use crate::ethernet::{self, ETH_HDR_LEN};

pub const ARP_LEN: usize = 28;

/// Broadcast ethernet frame asking who holds `target_addr`.
pub fn request_frame(src_mac: MacAddr, src_addr: Ipv4Addr, target_addr: Ipv4Addr)
                     -> Result<Vec<u8>, PacketError> {
    let mut frame = vec![0u8; ETH_HDR_LEN + ARP_LEN];
    let payload = ethernet::write_header(&mut frame, src_mac, MacAddr::broadcast(), EtherTypes::Arp)?;
    fill_request(payload, src_mac, src_addr, target_addr)?;
    Ok(frame)
}

/// "Who has `target_addr`, tell `src_addr`", written into an ARP-sized region.
fn fill_request(region: &mut [u8], src_mac: MacAddr, src_addr: Ipv4Addr, target_addr: Ipv4Addr)
                -> Result<(), PacketError> {
    let region = region.get_mut(..ARP_LEN).ok_or(PacketError::ArpBuffer)?;
    let mut arp = MutableArpPacket::new(region).ok_or(PacketError::ArpBuffer)?;
    arp.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp.set_protocol_type(EtherTypes::Ipv4);
    arp.set_hw_addr_len(6);
    arp.set_proto_addr_len(4);
    arp.set_operation(ArpOperations::Request);
    arp.set_sender_hw_addr(src_mac);
    arp.set_sender_proto_addr(src_addr);
    arp.set_target_hw_addr(MacAddr::zero());
    arp.set_target_proto_addr(target_addr);
    Ok(())
}

/// Sender of an ARP reply; requests and non-ARP frames are ignored.
pub fn parse_reply(frame: &[u8]) -> Option<AddressBinding> {
    let eth = EthernetPacket::new(frame)?;
    if eth.get_ethertype() != EtherTypes::Arp {
        return None;
    }

    let arp = ArpPacket::new(eth.payload())?;
    if arp.get_operation() != ArpOperations::Reply {
        return None;
    }

    let binding = AddressBinding::new(
        IpAddr::V4(arp.get_sender_proto_addr()),
        arp.get_sender_hw_addr(),
    )
    .with_requester(
        IpAddr::V4(arp.get_target_proto_addr()),
        arp.get_target_hw_addr(),
    );
    Some(binding)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
