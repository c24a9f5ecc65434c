use std::net::IpAddr;

use pnet::util::MacAddr;

/// The local (interface, address, hardware address) every discovery frame is sent from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBinding {
    pub interface: String,
    pub ip: IpAddr,
    pub mac: MacAddr,
}

impl LocalBinding {
    pub fn new(interface: impl Into<String>, ip: IpAddr, mac: MacAddr) -> Self {
        Self {
            interface: interface.into(),
            ip,
            mac,
        }
    }
}

/// A neighbor that answered a discovery request.
///
/// The IP address is the identity of a binding; a scan keeps at most one per IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressBinding {
    pub ip: IpAddr,
    pub mac: MacAddr,
    /// The requester the reply was addressed to, when the frame names one.
    pub requester: Option<(IpAddr, MacAddr)>,
}

impl AddressBinding {
    pub fn new(ip: IpAddr, mac: MacAddr) -> Self {
        Self {
            ip,
            mac,
            requester: None,
        }
    }

    pub fn with_requester(mut self, ip: IpAddr, mac: MacAddr) -> Self {
        self.requester = Some((ip, mac));
        self
    }
}

/// Text form of an [`AddressBinding`] as returned to callers.
///
/// Addresses are upper-cased; the requester columns are empty unless the
/// reply carried them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostRecord {
    pub ip: String,
    pub mac: String,
    pub requester_ip: String,
    pub requester_mac: String,
}

impl From<&AddressBinding> for HostRecord {
    fn from(binding: &AddressBinding) -> Self {
        let (requester_ip, requester_mac) = match binding.requester {
            Some((ip, mac)) => (upper(ip), upper(mac)),
            None => (String::new(), String::new()),
        };

        Self {
            ip: upper(binding.ip),
            mac: upper(binding.mac),
            requester_ip,
            requester_mac,
        }
    }
}

fn upper(value: impl ToString) -> String {
    value.to_string().to_uppercase()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
