//! FlowSet framing: each IPFIX message body is a sequence of FlowSets, each
//! starting with a 2-byte set id and 2-byte total length (including this
//! 4-byte header). Set id 2 is the Template FlowSet; ids >= 256 are Data
//! FlowSets keyed by template id. Mirrors `original_source/netflow/ipfixDecoder.go`'s
//! `DecodeIPFIX` dispatch loop.

use nom::number::complete::be_u16;
use nom::IResult;

pub const TEMPLATE_SET_ID: u16 = 2;
pub const OPTIONS_TEMPLATE_SET_ID: u16 = 3;
pub const MIN_DATA_SET_ID: u16 = 256;

pub struct RawFlowSet<'a> {
    pub set_id: u16,
    pub body: &'a [u8],
}

/// Splits a message body into its constituent FlowSets without interpreting
/// their contents. A FlowSet whose declared length would overrun the
/// remaining buffer is recorded as one final, short `RawFlowSet` carrying
/// whatever bytes are actually available, rather than being dropped.
pub fn split_flowsets(mut input: &[u8]) -> IResult<&[u8], Vec<RawFlowSet<'_>>> {
    let mut sets = Vec::new();
    while input.len() >= 4 {
        let (rest, set_id) = be_u16(input)?;
        let (rest, set_len) = be_u16(rest)?;
        if (set_len as usize) < 4 {
            break;
        }
        let body_len = set_len as usize - 4;
        if rest.len() < body_len {
            sets.push(RawFlowSet { set_id, body: rest });
            input = &rest[rest.len()..];
            break;
        }
        let (rest, body) = nom::bytes::complete::take(body_len)(rest)?;
        sets.push(RawFlowSet { set_id, body });
        input = rest;
    }
    Ok((input, sets))
}
