use veilsync_api::{CauseMethod, TelemetryPayload};

use crate::models::DeviceState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub state_changed: bool,
    pub mode_changed: bool,
    /// `Unknown` when nothing changed.
    pub method: CauseMethod,
}

impl Classification {
    pub fn is_change(&self) -> bool {
        self.state_changed || self.mode_changed
    }
}

/// Compares the stored state with an incoming report and infers the trigger.
///
/// A first report for an identifier counts as both a state and a mode change.
/// When the curtain moved, the trigger is the light sensor in automatic mode,
/// the sound sensor when its reading went from 0 to 1, and the button
/// otherwise. A mode switch without movement is always the button.
pub fn classify(previous: Option<&DeviceState>, incoming: &TelemetryPayload) -> Classification {
    let (state_changed, mode_changed, previous_sound) = match previous {
        Some(previous) => (
            previous.curtain_open != incoming.curtain_open,
            previous.automatic_mode != incoming.automatic_mode,
            previous.sound_value,
        ),
        None => (true, true, 0.0),
    };

    let method = if state_changed {
        if incoming.automatic_mode {
            CauseMethod::Light
        } else if previous_sound == 0.0 && incoming.sound_value == 1.0 {
            CauseMethod::Sound
        } else {
            CauseMethod::Button
        }
    } else if mode_changed {
        CauseMethod::Button
    } else {
        CauseMethod::Unknown
    };

    Classification {
        state_changed,
        mode_changed,
        method,
    }
}
