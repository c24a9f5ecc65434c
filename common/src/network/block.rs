//! # Address Block
//!
//! The network prefix a scan targets, parsed once from CIDR notation.
//! Host bits are masked away on construction, so `192.168.1.7/24` and
//! `192.168.1.0/24` describe the same block.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use pnet::ipnetwork::IpNetwork;

use crate::error::ScanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => Self::V4,
            IpAddr::V6(_) => Self::V6,
        }
    }

    /// Address width in bits.
    pub fn width(self) -> u8 {
        match self {
            Self::V4 => 32,
            Self::V6 => 128,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressBlock {
    net: IpNetwork,
}

impl AddressBlock {
    /// Parses CIDR notation such as `10.0.0.0/24` or `2001:db8::/64`.
    pub fn parse(s: &str) -> Result<Self, ScanError> {
        let input = s.trim();
        let invalid = |reason: String| ScanError::InvalidBlock {
            input: input.to_string(),
            reason,
        };

        let Some((ip_str, prefix_str)) = input.split_once('/') else {
            return Err(invalid("expected <address>/<prefix>".to_string()));
        };

        let ip = ip_str
            .parse::<IpAddr>()
            .map_err(|e| invalid(format!("invalid address '{ip_str}': {e}")))?;

        let prefix = prefix_str
            .parse::<u8>()
            .map_err(|e| invalid(format!("invalid prefix '{prefix_str}': {e}")))?;

        Self::new(ip, prefix)
    }

    pub fn new(ip: IpAddr, prefix: u8) -> Result<Self, ScanError> {
        if let IpAddr::V6(v6) = ip {
            if v6.to_ipv4_mapped().is_some() {
                return Err(ScanError::UnsupportedAddress(ip));
            }
        }

        let width = AddressFamily::of(&ip).width();
        let degenerate = || ScanError::DegeneratePrefix { prefix, width };
        if prefix > width {
            return Err(degenerate());
        }

        let net = IpNetwork::new(ip, prefix).map_err(|_| degenerate())?;
        let net = IpNetwork::new(net.network(), prefix).map_err(|_| degenerate())?;
        Ok(Self { net })
    }

    pub fn family(&self) -> AddressFamily {
        AddressFamily::of(&self.net.ip())
    }

    /// The block's base address with every host bit cleared.
    pub fn network(&self) -> IpAddr {
        self.net.network()
    }

    pub fn prefix(&self) -> u8 {
        self.net.prefix()
    }

    /// Number of host-identifier bits.
    pub fn host_bits(&self) -> u8 {
        self.family().width() - self.prefix()
    }

    pub fn contains(&self, addr: IpAddr) -> bool {
        match (self.net, addr) {
            (IpNetwork::V4(net), IpAddr::V4(v4)) => net.contains(v4),
            (IpNetwork::V6(net), IpAddr::V6(v6)) => net.contains(v6),
            _ => false,
        }
    }
}

impl FromStr for AddressBlock {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AddressBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix())
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
