//! UDP trap listener: receives SNMP traps, resolves the sending IP to a
//! known device, demultiplexes to a vendor `TrapHandler`, and broadcasts the
//! normalized `TrapEvent` over the event hub.
//!
//! Grounded on `original_source/snmp/trap/trapListener.go`: unregistered
//! source IPs are dropped (`DeviceUnknown` in the error taxonomy - log and
//! drop, no nack/ack since this isn't queue-backed).

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, warn};
use tokio::net::UdpSocket;

use crate::hub::EventHub;
use crate::snmp::handlers;
use crate::snmp::message::decode_message;
use crate::snmp::trap::TrapHandler;
use crate::storage::DeviceRepository;

pub async fn run(listen_addr: SocketAddr, devices: Arc<DeviceRepository>, hub: Arc<EventHub>) -> std::io::Result<()> {
    let socket = UdpSocket::bind(listen_addr).await?;
    let handlers = handlers::default_registry();
    let mut buf = vec![0u8; 4096];

    loop {
        let (n, peer) = match socket.recv_from(&mut buf).await {
            Ok(result) => result,
            Err(err) => {
                warn!("SNMP trap listener read error: {err}");
                continue;
            }
        };
        let packet = &buf[..n];

        let device = match devices.find_by_ip(&peer.ip().to_string()).await {
            Ok(Some(device)) => device,
            Ok(None) => {
                debug!("dropping trap from unregistered device {peer}");
                continue;
            }
            Err(err) => {
                warn!("device lookup failed for trap from {peer}: {err}");
                continue;
            }
        };

        let message = match decode_message(packet) {
            Ok(m) => m,
            Err(err) => {
                warn!("malformed trap packet from {peer}: {err}");
                continue;
            }
        };

        let trap_oid = match crate::snmp::trap::extract_trap_oid(&message.pdu.varbinds) {
            Some(oid) => oid,
            None => {
                warn!("trap from {peer} carries no trap OID, dropping");
                continue;
            }
        };

        let handler: Option<&Box<dyn TrapHandler>> = handlers.iter().find(|h| h.can_handle(&trap_oid));
        let Some(handler) = handler else {
            warn!("no handler registered for trap OID {trap_oid} from {peer}");
            continue;
        };

        match handler.parse(&message.pdu.varbinds, &device) {
            Ok(event) => hub.broadcast_trap(event).await,
            Err(err) => warn!("failed to parse trap from {peer}: {err}"),
        }
    }
}
