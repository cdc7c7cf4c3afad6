//! Message bus client over RabbitMQ, generalizing
//! `com-junkawasaki-kotoba`'s `MessageQueueIntegration` (a single
//! `lapin::Connection` + `Channel` pair wired to publish/consume) to the
//! two queue roles spec §6 requires: per-cluster work queues and one
//! shared feedback queue.

use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicPublishOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, Consumer};
use uuid::Uuid;
use wcp_defs::messages::BusMessage;

pub const FEEDBACK_QUEUE: &str = "feedback.common";

pub fn cluster_queue_name(cluster_id: Uuid) -> String {
    format!("cluster.{cluster_id}.workloads")
}

pub struct Bus {
    connection: Connection,
    channel: Channel,
}

impl Bus {
    pub async fn connect(amqp_url: &str) -> anyhow::Result<Self> {
        let connection = Connection::connect(amqp_url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        Ok(Bus { connection, channel })
    }

    pub async fn declare_queue(&self, name: &str) -> anyhow::Result<()> {
        self.channel
            .queue_declare(
                name,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        Ok(())
    }

    pub async fn publish(&self, queue: &str, message: &BusMessage) -> anyhow::Result<()> {
        self.channel
            .basic_publish(
                "",
                queue,
                BasicPublishOptions::default(),
                &message.encode(),
                BasicProperties::default(),
            )
            .await?
            .await?;
        Ok(())
    }

    /// Returns a raw lapin consumer with manual ack. Callers must ack
    /// each delivery themselves, and must do so only after the
    /// corresponding DB transaction commits (DESIGN.md Open Question
    /// #2) — acking earlier risks losing a message on crash between ack
    /// and commit.
    pub async fn consume(&self, queue: &str, consumer_tag: &str) -> anyhow::Result<Consumer> {
        let consumer = self
            .channel
            .basic_consume(
                queue,
                consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;
        Ok(consumer)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.status().connected()
    }
}

/// A decoded message paired with the means to ack it. Kept separate from
/// raw `lapin::message::Delivery` so call sites in `wcp-common` never
/// need to import `lapin` directly.
pub struct Delivery {
    pub message: BusMessage,
    inner: lapin::message::Delivery,
}

impl Delivery {
    pub fn from_raw(inner: lapin::message::Delivery) -> Result<Self, serde_json::Error> {
        let message = BusMessage::decode(&inner.data)?;
        Ok(Delivery { message, inner })
    }

    pub async fn ack(self) -> anyhow::Result<()> {
        self.inner.ack(BasicAckOptions::default()).await?;
        Ok(())
    }
}
