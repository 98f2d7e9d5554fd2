use std::fs;
use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, TlsConfiguration, Transport};
use tokio::task::JoinHandle;

use crate::configs::Gateway as GatewaySettings;
use crate::services::IngestDispatcher;

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Owns the broker connection shared by telemetry ingestion and directives.
pub struct Gateway {
    client: AsyncClient,
    telemetry_topic: String,
}

impl Gateway {
    pub fn new(settings: &GatewaySettings) -> anyhow::Result<(Self, EventLoop)> {
        let mut options = MqttOptions::new(&settings.client_id, &settings.host, settings.port);
        options.set_keep_alive(Duration::from_secs(settings.keep_alive));

        if let Some(auth) = &settings.auth {
            options.set_credentials(&auth.username, &auth.password);

            if let Some(ca_path) = &auth.ca_path {
                let ca = fs::read(ca_path)?;
                options.set_transport(Transport::Tls(TlsConfiguration::Simple {
                    ca,
                    alpn: None,
                    client_auth: None,
                }));
            }
        }

        let (client, event_loop) = AsyncClient::new(options, settings.capacity);

        Ok((
            Self {
                client,
                telemetry_topic: settings.topic.telemetry.clone(),
            },
            event_loop,
        ))
    }

    pub fn client(&self) -> &AsyncClient {
        &self.client
    }

    /// Drives the connection and feeds telemetry into the dispatcher.
    ///
    /// The subscription is renewed on every connection acknowledgement so a
    /// broker reconnect does not silently stop ingestion.
    pub fn start(self, mut event_loop: EventLoop, dispatcher: Arc<IngestDispatcher>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        tracing::info!("connected to broker, subscribing to {}", self.telemetry_topic);
                        if let Err(e) = self.client.try_subscribe(&self.telemetry_topic, QoS::AtLeastOnce) {
                            tracing::error!("Failed to subscribe to {}: {}", self.telemetry_topic, e);
                        }
                    }
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        if publish.topic == self.telemetry_topic {
                            // failures are logged by the dispatcher
                            let _ = dispatcher.dispatch(&publish.payload);
                        } else {
                            tracing::debug!("ignoring message on {}", publish.topic);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!("MQTT error: {}", e);
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    }
                }
            }
        })
    }
}
