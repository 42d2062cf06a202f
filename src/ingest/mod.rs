//! IPFIX flow ingestion pipeline: UDP listener -> raw queue -> decoder
//! worker pool -> decoded queue.

pub mod decoder;
pub mod listener;
pub mod message;

pub use message::{DecodedMessage, PacketMessage};
