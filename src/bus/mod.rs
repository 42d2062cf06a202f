//! Durable AMQP queues connecting the ingest, decode, and metric stages.
//!
//! Grounded on `original_source/netflow/rabbitmq.go`: one durable queue per
//! stage, `Qos(1)` prefetch, persistent delivery mode, manual ack/nack. Built
//! on `lapin`, the async AMQP client already present in the wider example
//! pack (`vectordotdev-vector`'s Cargo.toml).

use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicPublishOptions, BasicQosOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use serde::Serialize;

use crate::error::QueueError;

pub struct Queue {
    channel: Channel,
    name: String,
}

impl Queue {
    /// Connects to `amqp_url` and declares a durable queue named `name` with
    /// prefetch 1, matching `rabbitmq.go`'s `NewRabbitMQ`.
    pub async fn connect(amqp_url: &str, name: &str) -> Result<Self, QueueError> {
        let conn = Connection::connect(amqp_url, ConnectionProperties::default())
            .await
            .map_err(|source| QueueError::Connect {
                url: amqp_url.to_string(),
                source,
            })?;
        let channel = conn.create_channel().await.map_err(|source| QueueError::Connect {
            url: amqp_url.to_string(),
            source,
        })?;
        channel
            .queue_declare(name, QueueDeclareOptions { durable: true, ..Default::default() }, FieldTable::default())
            .await
            .map_err(|source| QueueError::Declare { name: name.to_string(), source })?;
        channel
            .basic_qos(1, BasicQosOptions::default())
            .await
            .map_err(QueueError::Publish)?;
        Ok(Queue { channel, name: name.to_string() })
    }

    pub async fn publish_json<T: Serialize>(&self, message: &T) -> Result<(), QueueError> {
        let body = serde_json::to_vec(message).map_err(QueueError::Serialization)?;
        self.channel
            .basic_publish(
                "",
                &self.name,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default().with_delivery_mode(2).with_content_type("application/json".into()),
            )
            .await
            .map_err(QueueError::Publish)?
            .await
            .map_err(QueueError::Publish)?;
        Ok(())
    }

    /// Returns a manual-ack consumer over this queue's deliveries.
    pub async fn consume(&self, consumer_tag: &str) -> Result<lapin::Consumer, QueueError> {
        self.channel
            .basic_consume(&self.name, consumer_tag, BasicConsumeOptions::default(), FieldTable::default())
            .await
            .map_err(QueueError::Consume)
    }
}

/// Acks a delivery - the success path for `MalformedInput` (drop unrecoverable
/// input) and normal completion alike.
pub async fn ack(delivery: &lapin::message::Delivery) -> Result<(), QueueError> {
    delivery
        .ack(BasicAckOptions::default())
        .await
        .map_err(QueueError::Consume)
}

/// Nacks a delivery. `requeue` distinguishes `DownstreamTransient`/`ProcessorFailure`
/// (requeue = true) from a permanently unrecoverable datagram (requeue = false),
/// per the error-handling table.
pub async fn nack(delivery: &lapin::message::Delivery, requeue: bool) -> Result<(), QueueError> {
    delivery
        .nack(BasicNackOptions { requeue, ..Default::default() })
        .await
        .map_err(QueueError::Consume)
}
