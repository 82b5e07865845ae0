//! Static column table for [`FlowRecord`].
//!
//! Both encoders walk this table in order, so the CSV column order, the Avro
//! field order and the generated Avro schema always agree.

use crate::record::FlowRecord;
use std::net::{Ipv4Addr, Ipv6Addr};

/// How a column is stored and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// IPv4 address, a `long` on the wire and dotted-quad in CSV.
    Ipv4,
    /// IPv6 address, raw `bytes` on the wire and textual in CSV.
    Ipv6,
    /// UTF-8 string.
    Text,
}

impl ColumnKind {
    /// Avro primitive type name for this column.
    pub fn avro_type(&self) -> &'static str {
        match self {
            ColumnKind::Int => "int",
            ColumnKind::Long | ColumnKind::Ipv4 => "long",
            ColumnKind::Ipv6 => "bytes",
            ColumnKind::Text => "string",
        }
    }
}

/// A borrowed column value read out of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Int(i32),
    Long(i64),
    Ipv4(u32),
    Ipv6(&'a [u8; 16]),
    Text(&'a str),
}

impl FieldValue<'_> {
    /// Render the value as a CSV cell.
    pub fn to_csv_cell(&self) -> String {
        match self {
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Long(v) => v.to_string(),
            FieldValue::Ipv4(v) => Ipv4Addr::from(*v).to_string(),
            FieldValue::Ipv6(v) => Ipv6Addr::from(**v).to_string(),
            FieldValue::Text(v) => (*v).to_string(),
        }
    }
}

/// One column of the record layout.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    /// Column name, also the Avro field name.
    pub name: &'static str,
    /// Storage kind.
    pub kind: ColumnKind,
    /// Reads the column out of a record.
    pub value: for<'a> fn(&'a FlowRecord) -> FieldValue<'a>,
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Column layout of a [`FlowRecord`], in wire order.
pub static FIELDS: [FieldSpec; 50] = [
    FieldSpec {
        name: "c_netnum",
        kind: ColumnKind::Int,
        value: |r| FieldValue::Int(r.netnum),
    },
    FieldSpec {
        name: "c_ip",
        kind: ColumnKind::Ipv4,
        value: |r| FieldValue::Ipv4(r.ip),
    },
    FieldSpec {
        name: "c_flowid",
        kind: ColumnKind::Text,
        value: |r| FieldValue::Text(&r.flow_id),
    },
    FieldSpec {
        name: "c_src_ipv4",
        kind: ColumnKind::Ipv4,
        value: |r| FieldValue::Ipv4(r.src_ipv4),
    },
    FieldSpec {
        name: "c_src_ipv6",
        kind: ColumnKind::Ipv6,
        value: |r| FieldValue::Ipv6(&r.src_ipv6),
    },
    FieldSpec {
        name: "c_src_port",
        kind: ColumnKind::Int,
        value: |r| FieldValue::Int(r.src_port),
    },
    FieldSpec {
        name: "c_s_tunnel_ip",
        kind: ColumnKind::Ipv4,
        value: |r| FieldValue::Ipv4(r.s_tunnel_ip),
    },
    FieldSpec {
        name: "c_s_tunnel_port",
        kind: ColumnKind::Int,
        value: |r| FieldValue::Int(r.s_tunnel_port),
    },
    FieldSpec {
        name: "c_dest_ipv4",
        kind: ColumnKind::Ipv4,
        value: |r| FieldValue::Ipv4(r.dest_ipv4),
    },
    FieldSpec {
        name: "c_dest_ipv6",
        kind: ColumnKind::Ipv6,
        value: |r| FieldValue::Ipv6(&r.dest_ipv6),
    },
    FieldSpec {
        name: "c_dest_port",
        kind: ColumnKind::Int,
        value: |r| FieldValue::Int(r.dest_port),
    },
    FieldSpec {
        name: "c_d_tunnel_ip",
        kind: ColumnKind::Ipv4,
        value: |r| FieldValue::Ipv4(r.d_tunnel_ip),
    },
    FieldSpec {
        name: "c_d_tunnel_port",
        kind: ColumnKind::Int,
        value: |r| FieldValue::Int(r.d_tunnel_port),
    },
    FieldSpec {
        name: "c_packet_group",
        kind: ColumnKind::Int,
        value: |r| FieldValue::Int(r.packet_group),
    },
    FieldSpec {
        name: "c_proto_type",
        kind: ColumnKind::Int,
        value: |r| FieldValue::Int(r.proto_type),
    },
    FieldSpec {
        name: "c_connect_status",
        kind: ColumnKind::Int,
        value: |r| FieldValue::Int(r.connect_status),
    },
    FieldSpec {
        name: "c_direct",
        kind: ColumnKind::Int,
        value: |r| FieldValue::Int(r.direct),
    },
    FieldSpec {
        name: "c_server_dir",
        kind: ColumnKind::Int,
        value: |r| FieldValue::Int(r.server_dir),
    },
    FieldSpec {
        name: "c_up_packets",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.up_packets),
    },
    FieldSpec {
        name: "c_up_bytes",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.up_bytes),
    },
    FieldSpec {
        name: "c_down_packets",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.down_packets),
    },
    FieldSpec {
        name: "c_down_bytes",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.down_bytes),
    },
    FieldSpec {
        name: "c_c2s_packet_jitter",
        kind: ColumnKind::Int,
        value: |r| FieldValue::Int(r.c2s_packet_jitter),
    },
    FieldSpec {
        name: "c_s2c_packet_jitter",
        kind: ColumnKind::Int,
        value: |r| FieldValue::Int(r.s2c_packet_jitter),
    },
    FieldSpec {
        name: "c_log_time",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.log_time),
    },
    FieldSpec {
        name: "c_app_type",
        kind: ColumnKind::Text,
        value: |r| FieldValue::Text(&r.app_type),
    },
    FieldSpec {
        name: "c_stream_time",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.stream_time),
    },
    FieldSpec {
        name: "c_hostr",
        kind: ColumnKind::Text,
        value: |r| FieldValue::Text(&r.hostr),
    },
    FieldSpec {
        name: "c_s_boundary",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.s_boundary),
    },
    FieldSpec {
        name: "c_s_region",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.s_region),
    },
    FieldSpec {
        name: "c_s_city",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.s_city),
    },
    FieldSpec {
        name: "c_s_district",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.s_district),
    },
    FieldSpec {
        name: "c_s_operators",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.s_operators),
    },
    FieldSpec {
        name: "c_s_owner",
        kind: ColumnKind::Text,
        value: |r| FieldValue::Text(&r.s_owner),
    },
    FieldSpec {
        name: "c_d_boundary",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.d_boundary),
    },
    FieldSpec {
        name: "c_d_region",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.d_region),
    },
    FieldSpec {
        name: "c_d_city",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.d_city),
    },
    FieldSpec {
        name: "c_d_district",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.d_district),
    },
    FieldSpec {
        name: "c_d_operators",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.d_operators),
    },
    FieldSpec {
        name: "c_d_owner",
        kind: ColumnKind::Text,
        value: |r| FieldValue::Text(&r.d_owner),
    },
    FieldSpec {
        name: "c_s_mark1",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.s_marks[0]),
    },
    FieldSpec {
        name: "c_s_mark2",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.s_marks[1]),
    },
    FieldSpec {
        name: "c_s_mark3",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.s_marks[2]),
    },
    FieldSpec {
        name: "c_s_mark4",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.s_marks[3]),
    },
    FieldSpec {
        name: "c_s_mark5",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.s_marks[4]),
    },
    FieldSpec {
        name: "c_d_mark1",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.d_marks[0]),
    },
    FieldSpec {
        name: "c_d_mark2",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.d_marks[1]),
    },
    FieldSpec {
        name: "c_d_mark3",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.d_marks[2]),
    },
    FieldSpec {
        name: "c_d_mark4",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.d_marks[3]),
    },
    FieldSpec {
        name: "c_d_mark5",
        kind: ColumnKind::Long,
        value: |r| FieldValue::Long(r.d_marks[4]),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_are_unique() {
        let names: HashSet<_> = FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names.len(), FIELDS.len());
    }

    #[test]
    fn test_accessor_kinds_match_table() {
        let mut rng = StdRng::seed_from_u64(1);
        let record = FlowRecord::random(&mut rng);

        for field in FIELDS.iter() {
            let value = (field.value)(&record);
            let matches = matches!(
                (field.kind, value),
                (ColumnKind::Int, FieldValue::Int(_))
                    | (ColumnKind::Long, FieldValue::Long(_))
                    | (ColumnKind::Ipv4, FieldValue::Ipv4(_))
                    | (ColumnKind::Ipv6, FieldValue::Ipv6(_))
                    | (ColumnKind::Text, FieldValue::Text(_))
            );
            assert!(matches, "column {} has mismatched accessor", field.name);
        }
    }

    #[test]
    fn test_csv_cell_rendering() {
        assert_eq!(FieldValue::Ipv4(0xC0A8_0001).to_csv_cell(), "192.168.0.1");
        let mut v6 = [0u8; 16];
        v6[15] = 1;
        assert_eq!(FieldValue::Ipv6(&v6).to_csv_cell(), "::1");
        assert_eq!(FieldValue::Int(-5).to_csv_cell(), "-5");
        assert_eq!(FieldValue::Text("abc").to_csv_cell(), "abc");
    }
}
