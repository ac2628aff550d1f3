//! Voice navigation state and the button affordance derived from it.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a voice navigation session.
///
/// `Idle` is both the initial and the terminal state; only one session can
/// be outside `Idle` at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceState {
    /// Not listening. The microphone button starts a session.
    #[default]
    Idle,
    /// The recognition engine is capturing speech.
    Listening,
    /// A transcript was received and is being dispatched.
    Processing,
}

impl VoiceState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Processing => "processing",
        }
    }
}

impl std::fmt::Display for VoiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the microphone button should render for a given [`VoiceState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonAffordance {
    /// Accessible label / tooltip text.
    pub label: &'static str,
    /// Whether the button shows its active (pulsing) treatment.
    pub active: bool,
    /// Whether presses are ignored.
    pub disabled: bool,
}

impl ButtonAffordance {
    pub fn for_state(state: VoiceState) -> Self {
        match state {
            VoiceState::Idle => Self {
                label: "Start voice navigation",
                active: false,
                disabled: false,
            },
            VoiceState::Listening => Self {
                label: "Listening... tap to stop",
                active: true,
                disabled: false,
            },
            VoiceState::Processing => Self {
                label: "Processing command",
                active: true,
                disabled: true,
            },
        }
    }
}
