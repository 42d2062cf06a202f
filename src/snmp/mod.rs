//! SNMP transport: a hand-rolled BER/ASN.1 codec, a minimal GET client used
//! by collectors, and the trap listener/demultiplexer.

pub mod ber;
pub mod client;
pub mod handlers;
pub mod listener;
pub mod message;
pub mod trap;

pub use client::SnmpClient;
pub use trap::{TrapEvent, TrapHandler};
