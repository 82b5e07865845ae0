//! The synthetic network-flow record carried in every batch.

use crate::generators::{bounded_i32, bounded_i64, counter, random_hex, random_ipv4, random_ipv6};
use rand::Rng;

/// One network-flow row.
///
/// Column order and naming live in [`crate::fields::FIELDS`]; this struct
/// only holds the values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRecord {
    pub netnum: i32,
    pub ip: u32,
    pub flow_id: String,
    pub src_ipv4: u32,
    pub src_ipv6: [u8; 16],
    pub src_port: i32,
    pub s_tunnel_ip: u32,
    pub s_tunnel_port: i32,
    pub dest_ipv4: u32,
    pub dest_ipv6: [u8; 16],
    pub dest_port: i32,
    pub d_tunnel_ip: u32,
    pub d_tunnel_port: i32,
    pub packet_group: i32,
    pub proto_type: i32,
    pub connect_status: i32,
    pub direct: i32,
    pub server_dir: i32,
    pub up_packets: i64,
    pub up_bytes: i64,
    pub down_packets: i64,
    pub down_bytes: i64,
    pub c2s_packet_jitter: i32,
    pub s2c_packet_jitter: i32,
    /// Milliseconds since the Unix epoch.
    pub log_time: i64,
    pub app_type: String,
    /// Milliseconds since the Unix epoch.
    pub stream_time: i64,
    pub hostr: String,
    pub s_boundary: i64,
    pub s_region: i64,
    pub s_city: i64,
    pub s_district: i64,
    pub s_operators: i64,
    pub s_owner: String,
    pub d_boundary: i64,
    pub d_region: i64,
    pub d_city: i64,
    pub d_district: i64,
    pub d_operators: i64,
    pub d_owner: String,
    pub s_marks: [i64; 5],
    pub d_marks: [i64; 5],
}

impl FlowRecord {
    /// Generate a record with independent random values.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let now_ms = chrono::Utc::now().timestamp_millis();

        Self {
            netnum: bounded_i32(rng, 512),
            ip: random_ipv4(rng),
            flow_id: random_hex(rng, 10),
            src_ipv4: random_ipv4(rng),
            src_ipv6: random_ipv6(rng),
            src_port: bounded_i32(rng, 65536),
            s_tunnel_ip: random_ipv4(rng),
            s_tunnel_port: bounded_i32(rng, 1024),
            dest_ipv4: random_ipv4(rng),
            dest_ipv6: random_ipv6(rng),
            dest_port: bounded_i32(rng, 65536),
            d_tunnel_ip: random_ipv4(rng),
            d_tunnel_port: bounded_i32(rng, 65536),
            packet_group: bounded_i32(rng, 256),
            proto_type: bounded_i32(rng, 128),
            connect_status: bounded_i32(rng, 32),
            direct: bounded_i32(rng, 512),
            server_dir: bounded_i32(rng, 256),
            up_packets: counter(rng),
            up_bytes: counter(rng),
            down_packets: counter(rng),
            down_bytes: counter(rng),
            c2s_packet_jitter: bounded_i32(rng, 65536),
            s2c_packet_jitter: bounded_i32(rng, 65536),
            log_time: now_ms,
            app_type: random_hex(rng, 9),
            stream_time: now_ms,
            hostr: random_hex(rng, 22),
            s_boundary: bounded_i64(rng, 1024),
            s_region: bounded_i64(rng, 512),
            s_city: bounded_i64(rng, 2048),
            s_district: bounded_i64(rng, 1024),
            s_operators: bounded_i64(rng, 128),
            s_owner: random_hex(rng, 12),
            d_boundary: bounded_i64(rng, 1024),
            d_region: bounded_i64(rng, 512),
            d_city: bounded_i64(rng, 2048),
            d_district: bounded_i64(rng, 1024),
            d_operators: bounded_i64(rng, 128),
            d_owner: random_hex(rng, 12),
            s_marks: std::array::from_fn(|_| bounded_i64(rng, 65536)),
            d_marks: std::array::from_fn(|_| bounded_i64(rng, 65536)),
        }
    }
}
