use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outbound instruction for a curtain actuator.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Directive {
    /// Open the curtain
    Open,
    /// Close the curtain
    Close,
    /// Switch to manual mode
    SetManual,
    /// Switch to automatic mode
    SetAutomatic,
}

impl Directive {
    const ALL: [Directive; 4] = [
        Directive::Open,
        Directive::Close,
        Directive::SetManual,
        Directive::SetAutomatic,
    ];

    /// Literal payload understood by the firmware.
    pub fn token(&self) -> &'static str {
        match self {
            Directive::Open => "abrir",
            Directive::Close => "cerrar",
            Directive::SetManual => "modoManual",
            Directive::SetAutomatic => "modoAutomatico",
        }
    }

    /// Name used in request paths.
    pub fn name(&self) -> &'static str {
        match self {
            Directive::Open => "open",
            Directive::Close => "close",
            Directive::SetManual => "set-manual",
            Directive::SetAutomatic => "set-automatic",
        }
    }
}

impl FromStr for Directive {
    type Err = UnknownDirective;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|directive| directive.name() == value)
            .ok_or_else(|| UnknownDirective(value.to_string()))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDirective(pub String);

impl fmt::Display for UnknownDirective {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown directive `{}`", self.0)
    }
}

impl std::error::Error for UnknownDirective {}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Channel accepted the directive
    pub success: bool,
    /// Directive that was sent
    pub directive: Directive,
    /// Topic the directive was published to
    pub topic: String,
    /// Operation result message
    pub message: String,
}
