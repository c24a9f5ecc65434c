#![cfg(test)]
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use pnet::datalink::MacAddr;

use lanprobe_common::ScanError;
use lanprobe_common::config::ScanConfig;
use lanprobe_common::network::binding::HostRecord;
use lanprobe_core::Scanner;
use lanprobe_protocols::CaptureFilter;

use crate::frames;
use crate::scripted::{Event, ScriptedDevice};
use crate::util::{self, LOCAL_MAC};

const NEIGHBOR_MAC: MacAddr = MacAddr(0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff);
const OTHER_MAC: MacAddr = MacAddr(0x11, 0x22, 0x33, 0x44, 0x55, 0x66);

fn fast() -> ScanConfig {
    ScanConfig::default()
        .with_window(Duration::from_millis(150))
        .with_grace(Duration::from_millis(50))
        .with_read_timeout(Duration::from_millis(5))
}

fn scanner(device: &Arc<ScriptedDevice>) -> Scanner {
    Scanner::new(device.clone(), Arc::new(util::lan()), fast())
}

/// Answers ARP requests for the given addresses with `mac`.
fn arp_neighbors(alive: Vec<Ipv4Addr>, mac: MacAddr) -> impl Fn(&[u8]) -> Vec<Vec<u8>> + Send + Sync {
    move |frame: &[u8]| match frames::arp_request(frame) {
        Some((requester_ip, requester_mac, target)) if alive.contains(&target) => {
            vec![frames::arp_reply(target, mac, requester_ip, requester_mac)]
        }
        _ => Vec::new(),
    }
}

fn assert_closed(device: &ScriptedDevice) {
    let events = device.events();
    assert!(events.contains(&Event::SenderClosed), "sender left open: {events:?}");
    assert!(events.contains(&Event::ReceiverClosed), "receiver left open: {events:?}");
}

#[tokio::test]
async fn single_arp_reply_yields_one_record() {
    let device = Arc::new(
        ScriptedDevice::new().responding(arp_neighbors(vec![Ipv4Addr::new(10, 0, 0, 5)], NEIGHBOR_MAC)),
    );

    let hosts = scanner(&device).scan("10.0.0.0/24").await.unwrap();

    assert_eq!(
        hosts,
        vec![HostRecord {
            ip: "10.0.0.5".to_string(),
            mac: "AA:BB:CC:DD:EE:FF".to_string(),
            requester_ip: "10.0.0.2".to_string(),
            requester_mac: "02:00:00:00:00:02".to_string(),
        }]
    );
    assert_eq!(device.sent().len(), 253);
    assert_closed(&device);
}

#[tokio::test]
async fn replies_keep_capture_order() {
    let alive = vec![Ipv4Addr::new(10, 0, 0, 9), Ipv4Addr::new(10, 0, 0, 3), Ipv4Addr::new(10, 0, 0, 200)];
    let device = Arc::new(ScriptedDevice::new().responding(arp_neighbors(alive, NEIGHBOR_MAC)));

    let hosts = scanner(&device).scan("10.0.0.0/24").await.unwrap();

    let ips: Vec<&str> = hosts.iter().map(|h| h.ip.as_str()).collect();
    assert_eq!(ips, vec!["10.0.0.3", "10.0.0.9", "10.0.0.200"]);
}

#[tokio::test]
async fn listener_is_ready_before_first_request() {
    let device = Arc::new(ScriptedDevice::new());

    let hosts = scanner(&device).scan("10.0.0.0/30").await.unwrap();

    assert!(hosts.is_empty());
    let events = device.events();
    assert_eq!(
        &events[..4],
        &[
            Event::Opened("eth0".to_string()),
            Event::Filter(CaptureFilter::ArpReply),
            Event::Split,
            Event::Sent,
        ]
    );
    assert_eq!(device.sent().len(), 1);
    assert_closed(&device);
}

#[tokio::test]
async fn duplicate_advertisements_keep_the_first() {
    let target: Ipv6Addr = "fe80::10".parse().unwrap();
    let local: Ipv6Addr = "fe80::2".parse().unwrap();
    let device = Arc::new(ScriptedDevice::new().with_frames(vec![
        frames::neighbor_advert(target, NEIGHBOR_MAC, local, LOCAL_MAC),
        frames::neighbor_advert(target, OTHER_MAC, local, LOCAL_MAC),
    ]));

    let hosts = scanner(&device).scan("fe80::/120").await.unwrap();

    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].ip, "FE80::10");
    assert_eq!(hosts[0].mac, "AA:BB:CC:DD:EE:FF");
    assert_eq!(hosts[0].requester_ip, "FE80::2");
    assert_eq!(device.sent().len(), 254);
}

#[tokio::test]
async fn malformed_advertisement_does_not_end_the_capture() {
    let local: Ipv6Addr = "fe80::2".parse().unwrap();
    let mut malformed = frames::neighbor_advert("fe80::11".parse().unwrap(), OTHER_MAC, local, LOCAL_MAC);
    frames::set_option_length(&mut malformed, 32);
    let device = Arc::new(ScriptedDevice::new().with_frames(vec![
        malformed,
        frames::neighbor_advert("fe80::10".parse().unwrap(), NEIGHBOR_MAC, local, LOCAL_MAC),
    ]));

    let started = Instant::now();
    let hosts = scanner(&device).scan("fe80::/120").await.unwrap();

    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].ip, "FE80::10");
    assert_eq!(hosts[0].mac, "AA:BB:CC:DD:EE:FF");
    assert!(started.elapsed() >= Duration::from_millis(150));
    assert_closed(&device);
}

#[tokio::test]
async fn unsolicited_advertisement_names_no_requester() {
    let all_nodes: Ipv6Addr = "ff02::1".parse().unwrap();
    let device = Arc::new(ScriptedDevice::new().with_frames(vec![frames::neighbor_advert(
        "fe80::10".parse().unwrap(),
        NEIGHBOR_MAC,
        all_nodes,
        MacAddr::new(0x33, 0x33, 0, 0, 0, 1),
    )]));

    let hosts = scanner(&device).scan("fe80::/120").await.unwrap();

    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].ip, "FE80::10");
    assert!(hosts[0].requester_ip.is_empty());
    assert!(hosts[0].requester_mac.is_empty());
}

#[tokio::test]
async fn ndp_scan_answers_solicitations() {
    let alive: Ipv6Addr = "fe80::42".parse().unwrap();
    let device = Arc::new(ScriptedDevice::new().responding(move |frame: &[u8]| {
        match frames::neighbor_solicit(frame) {
            Some((requester_ip, requester_mac, target)) if target == alive => {
                vec![frames::neighbor_advert(target, NEIGHBOR_MAC, requester_ip, requester_mac)]
            }
            _ => Vec::new(),
        }
    }));

    let hosts = scanner(&device).scan("fe80::/120").await.unwrap();

    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].ip, "FE80::42");
    assert!(device.events().contains(&Event::Filter(CaptureFilter::NeighborAdvert)));
}

#[tokio::test]
async fn requests_and_unrelated_traffic_are_ignored() {
    let stray_request = lanprobe_protocols::arp::request_frame(
        OTHER_MAC,
        Ipv4Addr::new(10, 0, 0, 77),
        Ipv4Addr::new(10, 0, 0, 2),
    )
    .unwrap();
    let device = Arc::new(ScriptedDevice::new().with_frames(vec![stray_request, vec![0xff; 20]]));

    let hosts = scanner(&device).scan("10.0.0.0/29").await.unwrap();
    assert!(hosts.is_empty());
}

#[tokio::test]
async fn transmit_failure_discards_partial_results() {
    let alive = vec![Ipv4Addr::new(10, 0, 0, 1)];
    let device = Arc::new(
        ScriptedDevice::new()
            .responding(arp_neighbors(alive, NEIGHBOR_MAC))
            .failing_send_at(2),
    );

    let err = scanner(&device).scan("10.0.0.0/24").await.unwrap_err();

    match err {
        ScanError::Transmit { target, .. } => assert_eq!(target, IpAddr::from([10, 0, 0, 4])),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(device.sent().len(), 2);
    assert_closed(&device);
}

#[tokio::test]
async fn silent_segment_returns_empty_list_after_window() {
    let device = Arc::new(ScriptedDevice::new());
    let start = Instant::now();

    let hosts = scanner(&device).scan("10.0.0.0/28").await.unwrap();

    assert!(hosts.is_empty());
    assert!(start.elapsed() >= Duration::from_millis(150));
    assert_eq!(device.sent().len(), 13);
    assert_closed(&device);
}

#[tokio::test]
async fn rejected_filter_aborts_before_sending() {
    let device = Arc::new(ScriptedDevice::new().rejecting_filter());

    let err = scanner(&device).scan("10.0.0.0/24").await.unwrap_err();

    assert!(matches!(err, ScanError::FilterRejected { .. }));
    assert!(device.sent().is_empty());
}

#[tokio::test]
async fn block_outside_every_interface_is_rejected() {
    let device = Arc::new(ScriptedDevice::new());

    let err = scanner(&device).scan("172.16.0.0/24").await.unwrap_err();

    assert!(matches!(err, ScanError::NoMatchingInterface(_)));
    assert!(device.events().is_empty());
}

#[tokio::test]
async fn malformed_blocks_are_input_errors() {
    let device = Arc::new(ScriptedDevice::new());
    let scanner = scanner(&device);

    for input in ["10.0.0.0", "10.0.0.0/33", "nonsense/8", "::ffff:10.0.0.0/120"] {
        let err = scanner.scan(input).await.unwrap_err();
        assert!(err.is_input_error(), "{input}: {err}");
    }
    assert!(device.events().is_empty());
}

#[tokio::test]
async fn point_to_point_block_sends_nothing() {
    let device = Arc::new(ScriptedDevice::new());
    let resolver = util::ListedInterfaces(vec![util::ni(
        "eth0",
        2,
        Some(LOCAL_MAC),
        &[util::v4(10, 0, 0, 2, 31)],
        util::IFF_UP,
    )]);
    let scanner = Scanner::new(device.clone(), Arc::new(resolver), fast());

    let hosts = scanner.scan("10.0.0.2/31").await.unwrap();

    assert!(hosts.is_empty());
    assert!(device.sent().is_empty());
    assert_closed(&device);
}
