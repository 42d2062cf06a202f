//! Hand-rolled decode error, matching the teacher's own `NetflowError`: a
//! manual `Display`/`std::error::Error` impl rather than `thiserror`, since
//! this sits directly on the wire-parsing hot path alongside `nom`.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Buffer too short to contain a 16-byte IPFIX message header.
    Incomplete { needed: usize, available: usize },
    /// A data FlowSet referenced a template id this parser has never seen,
    /// for this observation domain.
    MissingTemplate {
        template_id: u16,
        observation_domain: u32,
    },
    /// Lower-level `nom` parse failure, with the offset it occurred at.
    ParseError { offset: usize, context: &'static str },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Incomplete { needed, available } => {
                write!(f, "incomplete IPFIX message: needed {needed} bytes, had {available}")
            }
            DecodeError::MissingTemplate {
                template_id,
                observation_domain,
            } => write!(
                f,
                "no template {template_id} cached for observation domain {observation_domain}"
            ),
            DecodeError::ParseError { offset, context } => {
                write!(f, "parse error at offset {offset}: {context}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}
