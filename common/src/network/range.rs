//! # Candidate Addresses
//!
//! Enumerates the host addresses worth probing inside an [`AddressBlock`].
//!
//! * **IPv4**: the open interval between the network and broadcast identifiers.
//! * **IPv6**: host identifiers `1..` overlaid on the block's base address,
//!   truncated to a fixed cap so very large prefixes stay scannable.
//!
//! The local address is never yielded. The iterators are `Clone`, so a
//! sequence can be restarted from any point.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::ops::RangeInclusive;

use crate::network::block::AddressBlock;

/// Builds the candidate sequence for `block`, skipping `local`.
///
/// `v6_cap` bounds the number of IPv6 host identifiers and is ignored for IPv4.
pub fn candidates(block: &AddressBlock, local: IpAddr, v6_cap: usize) -> Candidates {
    match block.network() {
        IpAddr::V4(network) => Candidates::V4(V4Hosts::new(network, block.prefix(), local)),
        IpAddr::V6(network) => {
            Candidates::V6(V6Hosts::new(network, block.prefix(), local, v6_cap))
        }
    }
}

#[derive(Debug, Clone)]
pub enum Candidates {
    V4(V4Hosts),
    V6(V6Hosts),
}

impl Candidates {
    /// Number of addresses enumerated before the local address is skipped.
    pub fn planned(&self) -> u64 {
        match self {
            Self::V4(hosts) => hosts.planned(),
            Self::V6(hosts) => hosts.planned(),
        }
    }
}

impl Iterator for Candidates {
    type Item = IpAddr;

    fn next(&mut self) -> Option<IpAddr> {
        match self {
            Self::V4(hosts) => hosts.next().map(IpAddr::V4),
            Self::V6(hosts) => hosts.next().map(IpAddr::V6),
        }
    }
}

#[derive(Debug, Clone)]
pub struct V4Hosts {
    hosts: RangeInclusive<u32>,
    local: Option<Ipv4Addr>,
    planned: u64,
}

impl V4Hosts {
    fn new(network: Ipv4Addr, prefix: u8, local: IpAddr) -> Self {
        let mask: u32 = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
        let network: u32 = u32::from(network) & mask;
        let broadcast: u32 = network | !mask;

        // /31 and /32 have no host between the two identifiers.
        let hosts = match (network.checked_add(1), broadcast.checked_sub(1)) {
            (Some(first), Some(last)) if first <= last => first..=last,
            _ => empty_v4(),
        };

        let planned = if hosts.is_empty() {
            0
        } else {
            u64::from(*hosts.end()) - u64::from(*hosts.start()) + 1
        };

        let local = match local {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        };

        Self {
            hosts,
            local,
            planned,
        }
    }

    pub fn planned(&self) -> u64 {
        self.planned
    }
}

fn empty_v4() -> RangeInclusive<u32> {
    let mut range = 0..=0;
    range.next();
    range
}

impl Iterator for V4Hosts {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Ipv4Addr> {
        loop {
            let addr = Ipv4Addr::from(self.hosts.next()?);
            if Some(addr) != self.local {
                return Some(addr);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct V6Hosts {
    network: u128,
    next_id: u128,
    last_id: u128,
    local: Option<Ipv6Addr>,
}

impl V6Hosts {
    fn new(network: Ipv6Addr, prefix: u8, local: IpAddr, cap: usize) -> Self {
        let host_bits: u32 = 128 - u32::from(prefix);
        let host_mask: u128 = 1u128.checked_shl(host_bits).map_or(u128::MAX, |n| n - 1);
        let network: u128 = u128::from(network) & !host_mask;

        // Identifier 0 is the subnet-router anycast address.
        let last_id = host_mask.min(cap as u128);

        let local = match local {
            IpAddr::V6(v6) => Some(v6),
            IpAddr::V4(_) => None,
        };

        Self {
            network,
            next_id: 1,
            last_id,
            local,
        }
    }

    pub fn planned(&self) -> u64 {
        self.last_id as u64
    }
}

impl Iterator for V6Hosts {
    type Item = Ipv6Addr;

    fn next(&mut self) -> Option<Ipv6Addr> {
        while self.next_id <= self.last_id {
            let addr = Ipv6Addr::from(self.network | self.next_id);
            self.next_id += 1;
            if Some(addr) != self.local {
                return Some(addr);
            }
        }
        None
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
