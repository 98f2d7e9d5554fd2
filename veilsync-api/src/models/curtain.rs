use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Inferred trigger of a state or mode transition.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CauseMethod {
    /// Physical button on the device
    Button,
    /// Ambient light trigger in automatic mode
    Light,
    /// Sound trigger
    Sound,
    /// Remote directive
    Command,
    /// Trigger could not be inferred
    #[default]
    Unknown,
}

impl CauseMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CauseMethod::Button => "button",
            CauseMethod::Light => "light",
            CauseMethod::Sound => "sound",
            CauseMethod::Command => "command",
            CauseMethod::Unknown => "unknown",
        }
    }
}

impl From<String> for CauseMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "button" => CauseMethod::Button,
            "light" => CauseMethod::Light,
            "sound" => CauseMethod::Sound,
            "command" => CauseMethod::Command,
            _ => CauseMethod::Unknown,
        }
    }
}

impl fmt::Display for CauseMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeLabel {
    Automatic,
    Manual,
}

impl ModeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeLabel::Automatic => "Automatic",
            ModeLabel::Manual => "Manual",
        }
    }
}

impl From<bool> for ModeLabel {
    fn from(automatic: bool) -> Self {
        if automatic { ModeLabel::Automatic } else { ModeLabel::Manual }
    }
}

impl FromStr for ModeLabel {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Automatic" => Ok(ModeLabel::Automatic),
            "Manual" => Ok(ModeLabel::Manual),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

impl fmt::Display for ModeLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateLabel {
    Open,
    Closed,
}

impl StateLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateLabel::Open => "Open",
            StateLabel::Closed => "Closed",
        }
    }
}

impl From<bool> for StateLabel {
    fn from(open: bool) -> Self {
        if open { StateLabel::Open } else { StateLabel::Closed }
    }
}

impl FromStr for StateLabel {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Open" => Ok(StateLabel::Open),
            "Closed" => Ok(StateLabel::Closed),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown label `{}`", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStateResponse {
    /// Device identifier
    pub device_id: String,
    /// Automatic mode flag
    pub automatic_mode: bool,
    /// Curtain open flag
    pub curtain_open: bool,
    /// Last light sensor reading
    pub light_value: f64,
    /// Last sound sensor reading
    pub sound_value: f64,
    /// Last telemetry time
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEventResponse {
    /// Event identifier
    pub id: i64,
    /// Device identifier
    pub device_id: String,
    /// Mode after the transition
    pub mode: ModeLabel,
    /// Curtain state after the transition
    pub state: StateLabel,
    /// Inferred trigger
    pub method: CauseMethod,
    /// Time the transition was recorded
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}
