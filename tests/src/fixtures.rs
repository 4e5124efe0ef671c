//! Mock `NetworkInterface` snapshots.

use std::net::Ipv4Addr;

use pnet::datalink::{MacAddr, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

pub const IFF_UP: u32 = 1;
pub const IFF_LOOPBACK: u32 = 1 << 3;

pub fn ni(name: &str, index: u32, ips: &[IpNetwork], flags: u32) -> NetworkInterface {
    NetworkInterface {
        name: name.into(),
        description: String::new(),
        index,
        mac: Some(MacAddr(0x1, 0x2, 0x3, 0x4, 0x5, 0x6)),
        ips: ips.to_vec(),
        flags,
    }
}

pub fn v4(a: u8, b: u8, c: u8, d: u8, prefix: u8) -> IpNetwork {
    IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(a, b, c, d), prefix).unwrap())
}

pub fn lo() -> NetworkInterface {
    ni("lo", 1, &[v4(127, 0, 0, 1, 8)], IFF_UP | IFF_LOOPBACK)
}

/// A laptop-style Wi-Fi interface at `192.168.1.42/24`.
pub fn wlan0() -> NetworkInterface {
    ni("wlan0", 2, &[v4(192, 168, 1, 42, 24)], IFF_UP)
}

pub fn eth1_down() -> NetworkInterface {
    ni("eth1", 3, &[v4(10, 0, 1, 15, 24)], 0)
}
