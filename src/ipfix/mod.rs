//! IPFIX decoder: header framing, template tracking, and flow record
//! extraction.
//!
//! Grounded on the teacher's `variable_versions/ipfix.rs` for parsing
//! technique (`nom`/`nom_derive`, FlowSet dispatch) and on
//! `original_source/netflow/ipfixDecoder.go` / `types.go` for wire semantics
//! (field table, template/data FlowSet framing, truncated-tail handling).

pub mod error;
pub mod fields;
pub mod flowset;
pub mod header;
pub mod record;
pub mod template;

use nom_derive::Parse;
use serde::{Deserialize, Serialize};

pub use error::DecodeError;
pub use header::Header;
pub use record::FlowRecord;
pub use template::{Template, TemplateCache};

use flowset::{split_flowsets, OPTIONS_TEMPLATE_SET_ID, TEMPLATE_SET_ID};

/// One fully decoded IPFIX message: the header plus every flow record
/// produced by its data FlowSets. Template FlowSets update `cache` in place
/// and contribute no records of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedMessage {
    pub header: Header,
    pub records: Vec<FlowRecord>,
}

/// Decodes one UDP datagram's worth of IPFIX message against `cache`,
/// inserting any newly announced templates and decoding any data FlowSets for
/// templates already known. A data FlowSet whose template id isn't cached yet
/// is silently skipped (`UnknownTemplate` in the error taxonomy) rather than
/// failing the whole message, since vendors are free to interleave templates
/// and data within a single export.
pub fn decode(input: &[u8], cache: &mut TemplateCache) -> Result<DecodedMessage, DecodeError> {
    if input.len() < Header::SIZE {
        return Err(DecodeError::Incomplete {
            needed: Header::SIZE,
            available: input.len(),
        });
    }
    let (body, header) = Header::parse(input).map_err(|_: nom::Err<nom::error::Error<&[u8]>>| DecodeError::ParseError {
        offset: 0,
        context: "header",
    })?;
    // header.version is passed through uninspected; a value other than 10 is
    // tolerated here and left for processors downstream to act on.

    let (_, flowsets) = split_flowsets(body).map_err(|_| DecodeError::ParseError {
        offset: Header::SIZE,
        context: "flowset framing",
    })?;

    let mut records = Vec::new();
    for set in flowsets {
        match set.set_id {
            TEMPLATE_SET_ID => {
                let (_, templates) = template::parse_template_flowset(set.body).map_err(|_| DecodeError::ParseError {
                    offset: Header::SIZE,
                    context: "template flowset",
                })?;
                for template in templates {
                    cache.insert(header.observation_domain_id, template);
                }
            }
            OPTIONS_TEMPLATE_SET_ID => {
                // Options templates describe scope metadata (exporter stats,
                // interface metadata) rather than flow records; this decoder
                // doesn't surface them as metrics, so they're parsed only far
                // enough to stay framed correctly and then dropped.
            }
            set_id if set_id >= flowset::MIN_DATA_SET_ID => {
                let template_id = set_id;
                match cache.get(header.observation_domain_id, template_id) {
                    Some(template) => {
                        let (_, mut decoded) = record::parse_data_flowset(set.body, template)
                            .map_err(|_| DecodeError::ParseError {
                                offset: Header::SIZE,
                                context: "data flowset",
                            })?;
                        records.append(&mut decoded);
                    }
                    None => continue,
                }
            }
            _ => continue,
        }
    }

    Ok(DecodedMessage { header, records })
}
