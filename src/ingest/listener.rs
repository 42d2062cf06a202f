//! UDP listener that accepts IPFIX exports and hands each datagram to the raw
//! queue unparsed. Grounded on `original_source/netflow/listener.go`: bind,
//! read into a reusable buffer, copy the payload before publishing (so the
//! next `recv_from` can't clobber data still in flight), log-and-continue on
//! publish failure rather than tearing down the listener.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use log::{error, info, warn};
use tokio::net::UdpSocket;

use crate::bus::Queue;
use crate::ingest::message::PacketMessage;

pub async fn run(listen_addr: SocketAddr, raw_queue: Arc<Queue>) -> std::io::Result<()> {
    let socket = UdpSocket::bind(listen_addr).await?;
    info!("IPFIX listener bound to {listen_addr}");
    let mut buf = vec![0u8; 65535];
    loop {
        let (n, peer) = match socket.recv_from(&mut buf).await {
            Ok(result) => result,
            Err(err) => {
                warn!("IPFIX listener read error: {err}");
                continue;
            }
        };
        let payload = buf[..n].to_vec();
        let message = PacketMessage {
            raw: payload,
            src_ip: peer.ip().to_string(),
            src_port: peer.port(),
            received: Utc::now(),
        };
        if let Err(err) = raw_queue.publish_json(&message).await {
            error!("failed to publish raw IPFIX datagram from {peer}: {err}");
        }
    }
}
