//! Flow record decoding: turns one template-shaped slice of bytes into a
//! `FlowRecord` with typed common fields plus a raw field bag for everything
//! else, the same split `original_source/netflow/types.go`'s `FlowRecord`
//! and `original_source/netflow/ipfixDecoder.go`'s `decodeField` use.

use std::collections::BTreeMap;
use std::net::{Ipv4Addr, Ipv6Addr};

use nom::number::complete::{be_u16, be_u32, be_u64, be_u8};
use nom::IResult;
use serde::{Deserialize, Serialize};

use super::fields::{field_kind, raw_field_key, FieldKind};
use super::template::Template;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    UInt(u64),
    Text(String),
    Hex(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub source_ipv4: Option<Ipv4Addr>,
    pub destination_ipv4: Option<Ipv4Addr>,
    pub source_ipv6: Option<Ipv6Addr>,
    pub destination_ipv6: Option<Ipv6Addr>,
    pub source_port: Option<u16>,
    pub destination_port: Option<u16>,
    pub protocol_identifier: Option<u8>,
    pub octet_delta_count: Option<u64>,
    pub packet_delta_count: Option<u64>,
    pub ingress_interface: Option<u32>,
    pub egress_interface: Option<u32>,
    pub flow_start_milliseconds: Option<u64>,
    pub flow_end_milliseconds: Option<u64>,
    pub flow_direction: Option<u8>,
    pub ip_version: Option<u8>,

    #[serde(default)]
    pub raw_fields: BTreeMap<String, FieldValue>,
}

/// Reads one fixed-size unsigned integer of 1/2/4/8 bytes directly; any other
/// length is read as a big-endian value zero-extended into a `u64`, matching
/// `original_source/netflow/ipfixDecoder.go`'s `readUintN`.
fn read_uint_n(input: &[u8], len: usize) -> IResult<&[u8], u64> {
    match len {
        1 => be_u8(input).map(|(r, v)| (r, v as u64)),
        2 => be_u16(input).map(|(r, v)| (r, v as u64)),
        4 => be_u32(input).map(|(r, v)| (r, v as u64)),
        8 => be_u64(input).map(|(r, v)| (r, v as u64)),
        0 => Ok((input, 0)),
        n => {
            // No built-in nom reader for odd widths (3, 5, 6, 7 bytes) -
            // fold them big-endian by hand, same as the original's
            // zero-padded-left `readUintN`.
            if input.len() < n {
                return Err(nom::Err::Incomplete(nom::Needed::new(n - input.len())));
            }
            let mut value: u64 = 0;
            for &byte in &input[..n.min(8)] {
                value = (value << 8) | byte as u64;
            }
            Ok((&input[n..], value))
        }
    }
}

fn is_printable(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(|&b| (0x20..0x7f).contains(&b) || b == 0)
}

/// Decodes every record in a Data FlowSet body against `template`, following
/// `original_source/netflow/ipfixDecoder.go`'s `parseDataFlowSet`: the
/// per-record size is the sum of the template's field lengths (for
/// fixed-length templates), and decoding stops once fewer bytes remain than
/// one full record needs.
pub fn parse_data_flowset(mut input: &[u8], template: &Template) -> IResult<&[u8], Vec<FlowRecord>> {
    let mut records = Vec::new();
    loop {
        let before = input;
        let mut record = FlowRecord::default();
        let mut ok = true;
        for field in &template.fields {
            let len = if field.field_length == 0xFFFF {
                // Variable-length encoding (RFC 7011 §7): a 1-byte length,
                // or 0xFF followed by a 2-byte length for longer values.
                if input.is_empty() {
                    ok = false;
                    break;
                }
                let (rest, marker) = be_u8(input)?;
                if marker == 0xFF {
                    let (rest, real_len) = be_u16(rest)?;
                    input = rest;
                    real_len as usize
                } else {
                    input = rest;
                    marker as usize
                }
            } else {
                field.field_length as usize
            };

            if input.len() < len {
                ok = false;
                break;
            }
            let (rest, raw) = nom::bytes::complete::take(len)(input)?;
            input = rest;
            decode_field(field.field_id, len, raw, &mut record)?;
        }
        if !ok {
            input = before;
            break;
        }
        records.push(record);
        if input.is_empty() {
            break;
        }
    }
    Ok((input, records))
}

fn decode_field<'a>(
    field_id: u16,
    len: usize,
    raw: &'a [u8],
    record: &mut FlowRecord,
) -> Result<(), nom::Err<nom::error::Error<&'a [u8]>>> {
    match field_id {
        8 if len == 4 => record.source_ipv4 = Some(Ipv4Addr::new(raw[0], raw[1], raw[2], raw[3])),
        12 if len == 4 => record.destination_ipv4 = Some(Ipv4Addr::new(raw[0], raw[1], raw[2], raw[3])),
        27 if len == 16 => record.source_ipv6 = Some(ipv6_from_slice(raw)),
        28 if len == 16 => record.destination_ipv6 = Some(ipv6_from_slice(raw)),
        7 if len == 2 => record.source_port = Some(u16::from_be_bytes([raw[0], raw[1]])),
        11 if len == 2 => record.destination_port = Some(u16::from_be_bytes([raw[0], raw[1]])),
        4 if len == 1 => record.protocol_identifier = Some(raw[0]),
        1 => {
            let (_, v) = read_uint_n(raw, len)?;
            record.octet_delta_count = Some(v);
        }
        2 => {
            let (_, v) = read_uint_n(raw, len)?;
            record.packet_delta_count = Some(v);
        }
        10 => {
            let (_, v) = read_uint_n(raw, len)?;
            record.ingress_interface = Some(v as u32);
        }
        14 => {
            let (_, v) = read_uint_n(raw, len)?;
            record.egress_interface = Some(v as u32);
        }
        152 => {
            let (_, v) = read_uint_n(raw, len)?;
            record.flow_start_milliseconds = Some(v);
        }
        153 => {
            let (_, v) = read_uint_n(raw, len)?;
            record.flow_end_milliseconds = Some(v);
        }
        61 if len == 1 => record.flow_direction = Some(raw[0]),
        60 if len == 1 => record.ip_version = Some(raw[0]),
        other => {
            let value = match field_kind(other) {
                FieldKind::UnsignedInt | FieldKind::DurationSeconds | FieldKind::DurationMillis | FieldKind::DurationMicros
                    if len <= 8 =>
                {
                    let (_, v) = read_uint_n(raw, len)?;
                    FieldValue::UInt(v)
                }
                FieldKind::Ipv4Addr if len == 4 => {
                    FieldValue::Text(Ipv4Addr::new(raw[0], raw[1], raw[2], raw[3]).to_string())
                }
                FieldKind::Ipv6Addr if len == 16 => FieldValue::Text(ipv6_from_slice(raw).to_string()),
                FieldKind::MacAddr if len == 6 => FieldValue::Text(format_mac(raw)),
                _ if len <= 8 && !raw.is_empty() => {
                    let (_, v) = read_uint_n(raw, len)?;
                    FieldValue::UInt(v)
                }
                _ if is_printable(raw) => {
                    FieldValue::Text(String::from_utf8_lossy(raw).trim_end_matches('\0').to_string())
                }
                _ => FieldValue::Hex(to_hex(raw)),
            };
            record.raw_fields.insert(raw_field_key(other), value);
        }
    }
    Ok(())
}

fn ipv6_from_slice(raw: &[u8]) -> Ipv6Addr {
    let mut octets = [0u8; 16];
    octets.copy_from_slice(&raw[..16]);
    Ipv6Addr::from(octets)
}

fn format_mac(raw: &[u8]) -> String {
    raw.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Renders a non-printable, oversized field as a plain hex string (no
/// separators), so it lands in JSON output as a string rather than an array
/// of byte numbers.
fn to_hex(raw: &[u8]) -> String {
    raw.iter().map(|b| format!("{b:02x}")).collect()
}
