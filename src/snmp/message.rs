//! SNMPv2c message framing: `SEQUENCE { version INTEGER, community OCTET
//! STRING, data PDU }`, where `PDU` is itself a tagged SEQUENCE of
//! `(request-id, error-status, error-index, varbinds)`.

use super::ber::{self, decode_varbinds, expect_tag, parse_tlv, VarBind, TAG_SEQUENCE};
use crate::error::TrapError;

#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    pub tag: u8,
    pub request_id: i64,
    pub error_status: i64,
    pub error_index: i64,
    pub varbinds: Vec<VarBind>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnmpMessage {
    pub version: i64,
    pub community: String,
    pub pdu: Pdu,
}

pub fn decode_message(input: &[u8]) -> Result<SnmpMessage, TrapError> {
    if input.is_empty() {
        return Err(TrapError::Truncated);
    }
    let (_, envelope) = parse_tlv(input).map_err(|_| TrapError::Truncated)?;
    let body = expect_tag(&envelope, TAG_SEQUENCE)?;

    let (rest, version_tlv) = parse_tlv(body).map_err(|_| TrapError::Truncated)?;
    let version = ber::decode_integer(expect_tag(&version_tlv, ber::TAG_INTEGER)?)?;

    let (rest, community_tlv) = parse_tlv(rest).map_err(|_| TrapError::Truncated)?;
    let community = String::from_utf8_lossy(expect_tag(&community_tlv, ber::TAG_OCTET_STRING)?).to_string();

    let (_, pdu_tlv) = parse_tlv(rest).map_err(|_| TrapError::Truncated)?;
    let pdu_body = pdu_tlv.value;

    let (rest, request_id_tlv) = parse_tlv(pdu_body).map_err(|_| TrapError::Truncated)?;
    let request_id = ber::decode_integer(expect_tag(&request_id_tlv, ber::TAG_INTEGER)?)?;
    let (rest, error_status_tlv) = parse_tlv(rest).map_err(|_| TrapError::Truncated)?;
    let error_status = ber::decode_integer(expect_tag(&error_status_tlv, ber::TAG_INTEGER)?)?;
    let (rest, error_index_tlv) = parse_tlv(rest).map_err(|_| TrapError::Truncated)?;
    let error_index = ber::decode_integer(expect_tag(&error_index_tlv, ber::TAG_INTEGER)?)?;

    let (_, varbind_list_tlv) = parse_tlv(rest).map_err(|_| TrapError::Truncated)?;
    let varbinds = decode_varbinds(expect_tag(&varbind_list_tlv, TAG_SEQUENCE)?)?;

    Ok(SnmpMessage {
        version,
        community,
        pdu: Pdu {
            tag: pdu_tlv.tag,
            request_id,
            error_status,
            error_index,
            varbinds,
        },
    })
}
