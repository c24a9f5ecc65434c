//! # Neighbor Discovery (IPv6)
//!
//! Neighbor solicitations are sent to the target's solicited-node multicast
//! group (`ff02::1:ffXX:XXXX`) on the matching `33:33:..` ethernet address,
//! and carry our hardware address in a source link-layer address option.
//! Replies are neighbor advertisements whose target link-layer address
//! option names the neighbor's hardware address.

use std::net::{IpAddr, Ipv6Addr};

use pnet::datalink::MacAddr;
use pnet::packet::Packet;
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::icmpv6::ndp::{
    MutableNeighborSolicitPacket, NdpOption, NdpOptionType, NdpOptionTypes, NeighborAdvertPacket,
};
use pnet::packet::icmpv6::{self, Icmpv6Code, Icmpv6Packet, Icmpv6Types};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv6::{Ipv6Packet, MutableIpv6Packet};

use lanprobe_common::network::binding::AddressBinding;

use crate::PacketError;
use crate::ethernet::{self, ETH_HDR_LEN};

pub const IPV6_HDR_LEN: usize = 40;
pub const NEIGHBOR_SOLICIT_LEN: usize = 24;
pub const NEIGHBOR_ADVERT_LEN: usize = 24;
/// A link-layer address option: type, length and six address bytes.
pub const LL_ADDR_OPTION_LEN: usize = 8;
pub const HOP_LIMIT: u8 = 255;

const NS_START: usize = ETH_HDR_LEN + IPV6_HDR_LEN;
const NS_TOTAL_LEN: usize = NEIGHBOR_SOLICIT_LEN + LL_ADDR_OPTION_LEN;

/// `ff02::1:ff00:0/104` with the low 24 bits of `target`.
pub fn solicited_node_multicast(target: Ipv6Addr) -> Ipv6Addr {
    let t = target.octets();
    let mut group = [0u8; 16];
    group[0] = 0xff;
    group[1] = 0x02;
    group[11] = 0x01;
    group[12] = 0xff;
    group[13..].copy_from_slice(&t[13..]);
    Ipv6Addr::from(group)
}

/// `33:33` followed by the low 32 bits of a multicast group.
pub fn multicast_mac(group: Ipv6Addr) -> MacAddr {
    let g = group.octets();
    MacAddr::new(0x33, 0x33, g[12], g[13], g[14], g[15])
}

pub fn solicitation_frame(src_mac: MacAddr, src_addr: Ipv6Addr, target_addr: Ipv6Addr)
                          -> Result<Vec<u8>, PacketError> {
    let group = solicited_node_multicast(target_addr);
    let mut frame = vec![0u8; NS_START + NS_TOTAL_LEN];

    let packet = ethernet::write_header(&mut frame, src_mac, multicast_mac(group), EtherTypes::Ipv6)?;
    ipv6_header(packet, src_addr, group)?;
    solicitation_payload(packet, src_mac, src_addr, group, target_addr)?;
    Ok(frame)
}

fn ipv6_header(packet: &mut [u8], src_addr: Ipv6Addr, dst_addr: Ipv6Addr) -> Result<(), PacketError> {
    let region = packet.get_mut(..IPV6_HDR_LEN).ok_or(PacketError::Ipv6Buffer)?;
    let mut pkt = MutableIpv6Packet::new(region).ok_or(PacketError::Ipv6Buffer)?;
    pkt.set_version(6);
    pkt.set_traffic_class(0);
    pkt.set_flow_label(0);
    pkt.set_payload_length(NS_TOTAL_LEN as u16);
    pkt.set_next_header(IpNextHeaderProtocols::Icmpv6);
    pkt.set_hop_limit(HOP_LIMIT);
    pkt.set_source(src_addr);
    pkt.set_destination(dst_addr);
    Ok(())
}

fn solicitation_payload(
    packet: &mut [u8],
    src_mac: MacAddr,
    src_addr: Ipv6Addr,
    dst_addr: Ipv6Addr,
    target_addr: Ipv6Addr,
) -> Result<(), PacketError> {
    let region = packet
        .get_mut(IPV6_HDR_LEN..IPV6_HDR_LEN + NS_TOTAL_LEN)
        .ok_or(PacketError::NdpBuffer)?;
    let mut ns = MutableNeighborSolicitPacket::new(region).ok_or(PacketError::NdpBuffer)?;
    ns.set_icmpv6_type(Icmpv6Types::NeighborSolicit);
    ns.set_icmpv6_code(Icmpv6Code(0));
    ns.set_reserved(0);
    ns.set_target_addr(target_addr);
    ns.set_options(&[NdpOption {
        option_type: NdpOptionTypes::SourceLLAddr,
        length: 1,
        data: src_mac.octets().to_vec(),
    }]);

    ns.set_checksum(0);
    let csm = {
        let icmp = Icmpv6Packet::new(ns.packet()).ok_or(PacketError::NdpBuffer)?;
        icmpv6::checksum(&icmp, &src_addr, &dst_addr)
    };
    ns.set_checksum(csm);
    Ok(())
}

/// Target of a neighbor advertisement, provided it names its link-layer address.
///
/// The requester pair is only filled in for advertisements sent to a unicast
/// address; unsolicited ones go to a multicast group and name no requester.
pub fn parse_advertisement(frame: &[u8]) -> Option<AddressBinding> {
    let eth = EthernetPacket::new(frame)?;
    if eth.get_ethertype() != EtherTypes::Ipv6 {
        return None;
    }

    let ip = Ipv6Packet::new(eth.payload())?;
    if ip.get_next_header() != IpNextHeaderProtocols::Icmpv6 {
        return None;
    }

    let advert = NeighborAdvertPacket::new(ip.payload())?;
    if advert.get_icmpv6_type() != Icmpv6Types::NeighborAdvert {
        return None;
    }

    let options = advert.packet().get(NEIGHBOR_ADVERT_LEN..)?;
    let mac = target_ll_addr(options)?;

    let binding = AddressBinding::new(IpAddr::V6(advert.get_target_addr()), mac);
    let destination = ip.get_destination();
    if destination.is_multicast() {
        return Some(binding);
    }
    Some(binding.with_requester(IpAddr::V6(destination), eth.get_destination()))
}

/// Hardware address carried by the first target link-layer address option.
///
/// Options are `type, length in 8-byte units, data`. A zero length or an
/// option running past the packet makes the whole list unusable.
fn target_ll_addr(options: &[u8]) -> Option<MacAddr> {
    let mut rest = options;
    while rest.len() >= 2 {
        let len = rest[1] as usize * 8;
        if len == 0 || len > rest.len() {
            return None;
        }

        let (option, tail) = rest.split_at(len);
        if NdpOptionType::new(option[0]) == NdpOptionTypes::TargetLLAddr {
            let d = option.get(2..8)?;
            return Some(MacAddr::new(d[0], d[1], d[2], d[3], d[4], d[5]));
        }
        rest = tail;
    }
    None
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
