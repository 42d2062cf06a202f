//! Minimal BER/ASN.1 decoder for the subset of SNMPv2c this crate needs
//! (GetRequest/GetResponse PDUs and Trap-v2 PDUs).
//!
//! No SNMP crate in the example pack is a real, fetchable dependency (the
//! only reference to one in the wider pack is a commented-out internal path
//! in `ContinuousC-SmartAgent`'s Cargo.toml), so this hand-rolls the wire
//! format the same way the teacher hand-rolls IPFIX framing: `nom` parser
//! combinators over tagged TLV fields, rather than fabricating a dependency.

use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use nom::IResult;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum BerError {
    Truncated,
    UnexpectedTag { expected: u8, found: u8 },
    InvalidLength,
}

impl fmt::Display for BerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BerError::Truncated => write!(f, "BER value truncated"),
            BerError::UnexpectedTag { expected, found } => {
                write!(f, "expected BER tag 0x{expected:02x}, found 0x{found:02x}")
            }
            BerError::InvalidLength => write!(f, "invalid BER length encoding"),
        }
    }
}

impl std::error::Error for BerError {}

pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_NULL: u8 = 0x05;
pub const TAG_OID: u8 = 0x06;
pub const TAG_SEQUENCE: u8 = 0x30;
pub const TAG_IP_ADDRESS: u8 = 0x40;
pub const TAG_COUNTER32: u8 = 0x41;
pub const TAG_GAUGE32: u8 = 0x42;
pub const TAG_TIME_TICKS: u8 = 0x43;
pub const TAG_GET_REQUEST: u8 = 0xA0;
pub const TAG_GET_RESPONSE: u8 = 0xA2;
pub const TAG_SNMPV2_TRAP: u8 = 0xA7;

#[derive(Debug, Clone, PartialEq)]
pub struct Tlv<'a> {
    pub tag: u8,
    pub value: &'a [u8],
}

/// Reads one length octet(s) per X.690 §8.1.3: short form (<128) is a single
/// byte, long form has the high bit set with the low 7 bits giving the count
/// of following big-endian length bytes.
fn parse_length(input: &[u8]) -> IResult<&[u8], usize> {
    let (rest, first) = be_u8(input)?;
    if first & 0x80 == 0 {
        Ok((rest, first as usize))
    } else {
        let count = (first & 0x7F) as usize;
        if count == 0 || count > 4 {
            return Err(nom::Err::Failure(nom::error::Error::new(input, nom::error::ErrorKind::LengthValue)));
        }
        let (rest, bytes) = take(count)(rest)?;
        let mut len = 0usize;
        for &b in bytes {
            len = (len << 8) | b as usize;
        }
        Ok((rest, len))
    }
}

/// Reads one tag-length-value triple.
pub fn parse_tlv(input: &[u8]) -> IResult<&[u8], Tlv<'_>> {
    let (rest, tag) = be_u8(input)?;
    let (rest, len) = parse_length(rest)?;
    let (rest, value) = take(len)(rest)?;
    Ok((rest, Tlv { tag, value }))
}

pub fn expect_tag<'a>(tlv: &Tlv<'a>, tag: u8) -> Result<&'a [u8], BerError> {
    if tlv.tag == tag {
        Ok(tlv.value)
    } else {
        Err(BerError::UnexpectedTag { expected: tag, found: tlv.tag })
    }
}

/// Decodes a BER INTEGER (signed, big-endian two's complement).
pub fn decode_integer(bytes: &[u8]) -> Result<i64, BerError> {
    if bytes.is_empty() {
        return Err(BerError::Truncated);
    }
    let negative = bytes[0] & 0x80 != 0;
    let mut value: i64 = if negative { -1 } else { 0 };
    for &b in bytes {
        value = (value << 8) | b as i64;
    }
    Ok(value)
}

/// Decodes an OBJECT IDENTIFIER into its dotted-decimal string form.
pub fn decode_oid(bytes: &[u8]) -> Result<String, BerError> {
    if bytes.is_empty() {
        return Err(BerError::Truncated);
    }
    let mut parts = Vec::new();
    let first = bytes[0];
    parts.push((first / 40) as u64);
    parts.push((first % 40) as u64);

    let mut value: u64 = 0;
    for &b in &bytes[1..] {
        value = (value << 7) | (b & 0x7F) as u64;
        if b & 0x80 == 0 {
            parts.push(value);
            value = 0;
        }
    }
    Ok(parts.iter().map(|p| p.to_string()).collect::<Vec<_>>().join("."))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    OctetString(Vec<u8>),
    Oid(String),
    IpAddress([u8; 4]),
    Counter32(u32),
    Gauge32(u32),
    TimeTicks(u32),
    Null,
}

impl Value {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Integer(v) => Some(*v as u64),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(*v as u64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<String> {
        match self {
            Value::OctetString(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
            Value::Oid(s) => Some(s.clone()),
            _ => None,
        }
    }
}

pub fn decode_value(tlv: &Tlv<'_>) -> Result<Value, BerError> {
    match tlv.tag {
        TAG_INTEGER => Ok(Value::Integer(decode_integer(tlv.value)?)),
        TAG_OCTET_STRING => Ok(Value::OctetString(tlv.value.to_vec())),
        TAG_OID => Ok(Value::Oid(decode_oid(tlv.value)?)),
        TAG_NULL => Ok(Value::Null),
        TAG_IP_ADDRESS => {
            if tlv.value.len() != 4 {
                return Err(BerError::InvalidLength);
            }
            let mut addr = [0u8; 4];
            addr.copy_from_slice(tlv.value);
            Ok(Value::IpAddress(addr))
        }
        TAG_COUNTER32 => Ok(Value::Counter32(decode_integer(tlv.value)? as u32)),
        TAG_GAUGE32 => Ok(Value::Gauge32(decode_integer(tlv.value)? as u32)),
        TAG_TIME_TICKS => Ok(Value::TimeTicks(decode_integer(tlv.value)? as u32)),
        other => Err(BerError::UnexpectedTag { expected: 0, found: other }),
    }
}

/// A single varbind: `(oid, value)`.
pub type VarBind = (String, Value);

/// Walks a SEQUENCE OF SEQUENCE { OID, value } varbind list.
pub fn decode_varbinds(mut input: &[u8]) -> Result<Vec<VarBind>, BerError> {
    let mut out = Vec::new();
    while !input.is_empty() {
        let (rest, binding_tlv) = parse_tlv(input).map_err(|_| BerError::Truncated)?;
        let inner = expect_tag(&binding_tlv, TAG_SEQUENCE)?;
        let (after_oid, oid_tlv) = parse_tlv(inner).map_err(|_| BerError::Truncated)?;
        let oid = decode_oid(expect_tag(&oid_tlv, TAG_OID)?)?;
        let (_, value_tlv) = parse_tlv(after_oid).map_err(|_| BerError::Truncated)?;
        let value = decode_value(&value_tlv)?;
        out.push((oid, value));
        input = rest;
    }
    Ok(out)
}
