//! Reply frames as a neighbor would put them on the wire, and the reverse:
//! reading the target out of a captured request.

use std::net::{Ipv4Addr, Ipv6Addr};

use pnet::datalink::MacAddr;
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket, MutableEthernetPacket};
use pnet::packet::icmpv6::ndp::{
    MutableNeighborAdvertPacket, NdpOption, NdpOptionTypes, NeighborSolicitPacket,
};
use pnet::packet::icmpv6::{self, Icmpv6Code, Icmpv6Packet, Icmpv6Types};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv6::{Ipv6Packet, MutableIpv6Packet};

const ETH: usize = 14;
const ARP: usize = 28;
const IPV6: usize = 40;
const ADVERT: usize = 24 + 8;

pub fn arp_reply(sender_ip: Ipv4Addr, sender_mac: MacAddr, target_ip: Ipv4Addr, target_mac: MacAddr) -> Vec<u8> {
    let mut buf = vec![0u8; ETH + ARP];
    {
        let mut eth = MutableEthernetPacket::new(&mut buf).unwrap();
        eth.set_source(sender_mac);
        eth.set_destination(target_mac);
        eth.set_ethertype(EtherTypes::Arp);
    }
    {
        let mut arp = MutableArpPacket::new(&mut buf[ETH..]).unwrap();
        arp.set_hardware_type(ArpHardwareTypes::Ethernet);
        arp.set_protocol_type(EtherTypes::Ipv4);
        arp.set_hw_addr_len(6);
        arp.set_proto_addr_len(4);
        arp.set_operation(ArpOperations::Reply);
        arp.set_sender_hw_addr(sender_mac);
        arp.set_sender_proto_addr(sender_ip);
        arp.set_target_hw_addr(target_mac);
        arp.set_target_proto_addr(target_ip);
    }
    buf
}

/// Neighbor advertisement for `target` with a target link-layer address option.
pub fn neighbor_advert(target: Ipv6Addr, mac: MacAddr, dst_ip: Ipv6Addr, dst_mac: MacAddr) -> Vec<u8> {
    let mut buf = vec![0u8; ETH + IPV6 + ADVERT];
    {
        let mut eth = MutableEthernetPacket::new(&mut buf).unwrap();
        eth.set_source(mac);
        eth.set_destination(dst_mac);
        eth.set_ethertype(EtherTypes::Ipv6);
    }
    {
        let mut ip = MutableIpv6Packet::new(&mut buf[ETH..]).unwrap();
        ip.set_version(6);
        ip.set_payload_length(ADVERT as u16);
        ip.set_next_header(IpNextHeaderProtocols::Icmpv6);
        ip.set_hop_limit(255);
        ip.set_source(target);
        ip.set_destination(dst_ip);
    }
    {
        let mut na = MutableNeighborAdvertPacket::new(&mut buf[ETH + IPV6..]).unwrap();
        na.set_icmpv6_type(Icmpv6Types::NeighborAdvert);
        na.set_icmpv6_code(Icmpv6Code(0));
        na.set_flags(0x60);
        na.set_target_addr(target);
        na.set_options(&[NdpOption {
            option_type: NdpOptionTypes::TargetLLAddr,
            length: 1,
            data: mac.octets().to_vec(),
        }]);
        let csm = icmpv6::checksum(&Icmpv6Packet::new(na.packet()).unwrap(), &target, &dst_ip);
        na.set_checksum(csm);
    }
    buf
}

/// Overwrites the length byte of the first option of a neighbor advertisement.
pub fn set_option_length(advert: &mut [u8], length: u8) {
    advert[ETH + IPV6 + 24 + 1] = length;
}

/// Requester and target of a captured ARP request.
pub fn arp_request(frame: &[u8]) -> Option<(Ipv4Addr, MacAddr, Ipv4Addr)> {
    let eth = EthernetPacket::new(frame)?;
    let arp = ArpPacket::new(eth.payload())?;
    (arp.get_operation() == ArpOperations::Request).then(|| {
        (
            arp.get_sender_proto_addr(),
            arp.get_sender_hw_addr(),
            arp.get_target_proto_addr(),
        )
    })
}

/// Requester and target of a captured neighbor solicitation.
pub fn neighbor_solicit(frame: &[u8]) -> Option<(Ipv6Addr, MacAddr, Ipv6Addr)> {
    let eth = EthernetPacket::new(frame)?;
    let ip = Ipv6Packet::new(eth.payload())?;
    let ns = NeighborSolicitPacket::new(ip.payload())?;
    (ns.get_icmpv6_type() == Icmpv6Types::NeighborSolicit)
        .then(|| (ip.get_source(), eth.get_source(), ns.get_target_addr()))
}
