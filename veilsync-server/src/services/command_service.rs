use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, QoS};
use veilsync_api::Directive;

use crate::configs::GatewayTopic;
use crate::errors::CommandError;

/// Outbound side of the broker connection.
#[async_trait]
pub trait CommandChannel: Send + Sync {
    async fn send(&self, topic: &str, payload: &'static str) -> Result<(), CommandError>;
}

#[async_trait]
impl CommandChannel for AsyncClient {
    async fn send(&self, topic: &str, payload: &'static str) -> Result<(), CommandError> {
        self.publish(topic, QoS::AtMostOnce, false, payload)
            .await
            .map_err(|e| CommandError::Rejected(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandTarget {
    /// Topic every device listens on
    Shared,
    /// Topic of a single device
    Device(String),
}

pub struct CommandService {
    channel: Arc<dyn CommandChannel>,
    topic: GatewayTopic,
    publish_timeout: Duration,
}

impl CommandService {
    pub fn new(channel: Arc<dyn CommandChannel>, topic: GatewayTopic, publish_timeout: Duration) -> Self {
        Self {
            channel,
            topic,
            publish_timeout,
        }
    }

    pub fn topic_for(&self, target: &CommandTarget) -> Result<String, CommandError> {
        match target {
            CommandTarget::Shared => Ok(self.topic.command.clone()),
            CommandTarget::Device(device_id) => {
                if device_id.is_empty() || device_id.contains(['/', '+', '#']) {
                    return Err(CommandError::InvalidTarget(device_id.clone()));
                }
                Ok(self.topic.command_for(device_id))
            }
        }
    }

    /// Sends one directive, once. Success means the channel took it, not that
    /// the device acted on it.
    pub async fn publish(&self, target: &CommandTarget, directive: Directive) -> Result<String, CommandError> {
        let topic = self.topic_for(target)?;

        match tokio::time::timeout(self.publish_timeout, self.channel.send(&topic, directive.token())).await {
            Ok(Ok(())) => {
                tracing::info!(topic = %topic, "directive `{}` published", directive);
                Ok(topic)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(CommandError::Timeout(self.publish_timeout.as_millis() as u64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::{MockBehaviour, MockChannel, test_topics};

    use super::*;

    fn service(channel: Arc<MockChannel>) -> CommandService {
        CommandService::new(channel, test_topics(), Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_publish_to_shared_topic() {
        let channel = Arc::new(MockChannel::new(MockBehaviour::Accept));
        let service = service(channel.clone());

        let topic = service.publish(&CommandTarget::Shared, Directive::Open).await.unwrap();

        assert_eq!(topic, "esp32/cortina/cmd");
        assert_eq!(
            channel.sent().await,
            vec![("esp32/cortina/cmd".to_string(), "abrir".to_string())]
        );
    }

    #[tokio::test]
    async fn test_publish_to_device_topic() {
        let channel = Arc::new(MockChannel::new(MockBehaviour::Accept));
        let service = service(channel.clone());

        service
            .publish(&CommandTarget::Device("esp32-a".into()), Directive::SetAutomatic)
            .await
            .unwrap();

        assert_eq!(
            channel.sent().await,
            vec![("esp32/cortina/esp32-a/cmd".to_string(), "modoAutomatico".to_string())]
        );
    }

    #[tokio::test]
    async fn test_rejection_is_surfaced_without_retry() {
        let channel = Arc::new(MockChannel::new(MockBehaviour::Reject));
        let service = service(channel.clone());

        let result = service.publish(&CommandTarget::Shared, Directive::Close).await;

        assert!(matches!(result, Err(CommandError::Rejected(_))));
        assert_eq!(channel.attempts().await, 1);
    }

    #[tokio::test]
    async fn test_hanging_channel_times_out() {
        let channel = Arc::new(MockChannel::new(MockBehaviour::Hang));
        let service = service(channel.clone());

        let result = service.publish(&CommandTarget::Shared, Directive::SetManual).await;

        assert!(matches!(result, Err(CommandError::Timeout(50))));
        assert_eq!(channel.attempts().await, 1);
    }

    #[tokio::test]
    async fn test_wildcard_device_id_is_rejected() {
        let channel = Arc::new(MockChannel::new(MockBehaviour::Accept));
        let service = service(channel.clone());

        for device_id in ["", "a/b", "esp32-#", "+"] {
            let result = service
                .publish(&CommandTarget::Device(device_id.into()), Directive::Open)
                .await;
            assert!(matches!(result, Err(CommandError::InvalidTarget(_))));
        }
        assert_eq!(channel.attempts().await, 0);
    }
}
