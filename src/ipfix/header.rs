//! The 16-byte IPFIX message header (RFC 7011 §3.1).
//!
//! Field layout grounded on `original_source/netflow/types.go`'s `IPFIXHeader`;
//! parsed with `nom_derive`, the same technique the teacher uses for its own
//! `Header` in `variable_versions/ipfix.rs`.

use nom_derive::Nom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Nom, Serialize, Deserialize)]
pub struct Header {
    pub version: u16,
    pub length: u16,
    pub export_time: u32,
    pub sequence_number: u32,
    pub observation_domain_id: u32,
}

impl Header {
    pub const SIZE: usize = 16;
}
