//! # Local Interfaces
//!
//! Finds the local interface that serves a target block and lists the
//! segments this host is attached to.

use std::net::IpAddr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;
use pnet::util::MacAddr;
use tracing::debug;

use crate::error::ScanError;
use crate::network::binding::LocalBinding;
use crate::network::block::{AddressBlock, AddressFamily};

/// A network segment this host is directly attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSegment {
    pub cidr: String,
    pub interface: String,
    pub ip: IpAddr,
    pub mac: MacAddr,
    pub family: AddressFamily,
}

pub trait NetworkInterfaceExtension {
    /// The hardware address, unless it is missing or all zeros.
    fn hardware_addr(&self) -> Option<MacAddr>;
    /// Up and not a loopback device.
    fn is_candidate(&self) -> bool;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn hardware_addr(&self) -> Option<MacAddr> {
        self.mac.filter(|mac| *mac != MacAddr::zero())
    }

    fn is_candidate(&self) -> bool {
        self.is_up() && !self.is_loopback()
    }
}

/// Every interface the operating system reports.
pub fn system_interfaces() -> Vec<NetworkInterface> {
    datalink::interfaces()
}

/// Picks the first candidate interface holding an address of the block's family inside the block.
///
/// Interfaces without a hardware address are passed over; if the only match
/// lacks one, [`ScanError::NoHardwareAddress`] names it.
pub fn resolve_local_binding(
    block: &AddressBlock,
    interfaces: &[NetworkInterface],
) -> Result<LocalBinding, ScanError> {
    let mut without_mac: Option<&str> = None;

    for interface in interfaces.iter().filter(|i| i.is_candidate()) {
        let Some(ip) = interface
            .ips
            .iter()
            .map(|net| net.ip())
            .find(|ip| block.contains(*ip))
        else {
            continue;
        };

        match interface.hardware_addr() {
            Some(mac) => {
                debug!("{} serves {block} with {ip} ({mac})", interface.name);
                return Ok(LocalBinding::new(interface.name.clone(), ip, mac));
            }
            None => {
                debug!("{} serves {block} but has no hardware address", interface.name);
                without_mac.get_or_insert(interface.name.as_str());
            }
        }
    }

    match without_mac {
        Some(name) => Err(ScanError::NoHardwareAddress {
            interface: name.to_string(),
        }),
        None => Err(ScanError::NoMatchingInterface(block.to_string())),
    }
}

/// Lists each address of every candidate interface that has a hardware address.
pub fn available_segments(interfaces: &[NetworkInterface]) -> Result<Vec<NetworkSegment>, ScanError> {
    let segments: Vec<NetworkSegment> = interfaces
        .iter()
        .filter(|i| i.is_candidate())
        .filter_map(|i| i.hardware_addr().map(|mac| (i, mac)))
        .flat_map(|(interface, mac)| {
            interface
                .ips
                .iter()
                .filter(|net| net.prefix() > 0)
                .map(move |net| NetworkSegment {
                    cidr: format!("{}/{}", net.ip(), net.prefix()),
                    interface: interface.name.clone(),
                    ip: net.ip(),
                    mac,
                    family: AddressFamily::of(&net.ip()),
                })
        })
        .collect();

    if segments.is_empty() {
        return Err(ScanError::NoMatchingInterface("any local segment".to_string()));
    }

    Ok(segments)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
