use std::env;
use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gateway {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    /// Keep alive interval in seconds
    pub keep_alive: u64,
    /// Size of the client request queue
    pub capacity: usize,
    pub topic: GatewayTopic,
    pub auth: Option<GatewayAuth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayAuth {
    pub username: String,
    pub password: String,
    /// CA bundle, enables TLS when present
    pub ca_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayTopic {
    /// Topic devices publish telemetry on
    pub telemetry: String,
    /// Command topic shared by every device
    pub command: String,
    /// Per device command topic, `{device_id}` is substituted
    pub device_command: String,
}

impl GatewayTopic {
    pub fn command_for(&self, device_id: &str) -> String {
        self.device_command.replace("{device_id}", device_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub migration_path: Option<String>,
    pub clean_start: bool,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingest {
    /// Number of per device workers
    pub shards: usize,
    pub queue_capacity: usize,
    /// Milliseconds allowed for each store operation
    pub store_timeout: u64,
}

impl Ingest {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout)
    }
}

impl Default for Ingest {
    fn default() -> Self {
        Self {
            shards: 8,
            queue_capacity: 128,
            store_timeout: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Milliseconds allowed for the channel to accept a directive
    pub publish_timeout: u64,
}

impl Command {
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout)
    }
}

impl Default for Command {
    fn default() -> Self {
        Self { publish_timeout: 3000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    pub require_device_id: bool,
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for History {
    fn default() -> Self {
        Self {
            require_device_id: false,
            default_limit: 10,
            max_limit: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub gateway: Gateway,
    pub database: Database,
    #[serde(default)]
    pub ingest: Ingest,
    #[serde(default)]
    pub command: Command,
    #[serde(default)]
    pub history: History,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        let mut settings: Settings = Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::with_prefix("VEILSYNC").separator("__"))
            .build()?
            .try_deserialize()?;

        if let Some(migrate) = &settings.database.migration_path {
            if !Path::new(migrate).is_dir() {
                tracing::warn!("migration path {} is not a directory, skipping", migrate);
                settings.database.migration_path = None;
            }
        }

        if settings.ingest.shards == 0 {
            return Err(ConfigError::Message("ingest.shards must be at least 1".into()));
        }

        if settings.history.default_limit == 0 || settings.history.max_limit == 0 {
            return Err(ConfigError::Message("history limits must be at least 1".into()));
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_command_topic() {
        let topic = GatewayTopic {
            telemetry: "esp32/cortina/data".into(),
            command: "esp32/cortina/cmd".into(),
            device_command: "esp32/cortina/{device_id}/cmd".into(),
        };

        assert_eq!(topic.command_for("living-room"), "esp32/cortina/living-room/cmd");
    }

    #[test]
    fn test_section_defaults() {
        assert_eq!(Ingest::default().store_timeout(), Duration::from_secs(5));
        assert_eq!(Command::default().publish_timeout(), Duration::from_secs(3));
        assert!(!History::default().require_device_id);
    }
}
