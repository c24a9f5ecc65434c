use pnet::datalink::MacAddr;
use pnet::packet::ethernet::{EtherType, MutableEthernetPacket};

use crate::PacketError;

pub const ETH_HDR_LEN: usize = 14;

/// Writes the ethernet header at the start of `frame` and hands back the
/// region that follows it.
pub fn write_header(frame: &mut [u8], src: MacAddr, dst: MacAddr, ethertype: EtherType)
                    -> Result<&mut [u8], PacketError> {
    {
        let mut eth = MutableEthernetPacket::new(frame).ok_or(PacketError::EthernetBuffer)?;
        eth.set_source(src);
        eth.set_destination(dst);
        eth.set_ethertype(ethertype);
    }
    Ok(&mut frame[ETH_HDR_LEN..])
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
