use crate::error::VoiceError;
use crate::normalize::NormalizerMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_recognition_locale() -> String {
    "en-US".to_string()
}

fn default_max_network_retries() -> u8 {
    2
}

fn default_navigation_delay_ms() -> u64 {
    1500
}

fn default_reset_delay_ms() -> u64 {
    1000
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_listening_timeout_ms() -> u64 {
    15_000
}

fn default_speech_rate() -> f32 {
    0.9
}

fn default_unit() -> f32 {
    1.0
}

/// Tuning for the voice navigation pipeline.
///
/// Every field has a default so a partial `[voice]` table is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Locale handed to the recognition engine. Fixed regardless of the
    /// display language.
    #[serde(default = "default_recognition_locale")]
    pub recognition_locale: String,
    /// Fresh-session retries allowed after a network error. Default: 2.
    #[serde(default = "default_max_network_retries")]
    pub max_network_retries: u8,
    /// Pause between the spoken confirmation and the page transition.
    #[serde(default = "default_navigation_delay_ms")]
    pub navigation_delay_ms: u64,
    /// Pause before `processing` falls back to `idle`.
    #[serde(default = "default_reset_delay_ms")]
    pub reset_delay_ms: u64,
    /// Pause before restarting recognition after a network error.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Longest wait for an engine callback while listening. Zero disables it.
    #[serde(default = "default_listening_timeout_ms")]
    pub listening_timeout_ms: u64,
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
    #[serde(default = "default_unit")]
    pub speech_pitch: f32,
    #[serde(default = "default_unit")]
    pub speech_volume: f32,
    #[serde(default)]
    pub normalizer: NormalizerMode,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            recognition_locale: default_recognition_locale(),
            max_network_retries: default_max_network_retries(),
            navigation_delay_ms: default_navigation_delay_ms(),
            reset_delay_ms: default_reset_delay_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            listening_timeout_ms: default_listening_timeout_ms(),
            speech_rate: default_speech_rate(),
            speech_pitch: default_unit(),
            speech_volume: default_unit(),
            normalizer: NormalizerMode::default(),
        }
    }
}

impl VoiceConfig {
    pub fn navigation_delay(&self) -> Duration {
        Duration::from_millis(self.navigation_delay_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Returns `None` when the listening timeout is disabled.
    pub fn listening_timeout(&self) -> Option<Duration> {
        (self.listening_timeout_ms > 0).then(|| Duration::from_millis(self.listening_timeout_ms))
    }

    /// Checks the values a recognition or synthesis engine would reject.
    pub fn validate(&self) -> Result<(), VoiceError> {
        if self.recognition_locale.trim().is_empty() {
            return Err(VoiceError::Config(
                "recognition_locale must not be empty".to_string(),
            ));
        }
        if !(0.1..=10.0).contains(&self.speech_rate) {
            return Err(VoiceError::Config(
                "speech_rate must be between 0.1 and 10.0".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.speech_pitch) {
            return Err(VoiceError::Config(
                "speech_pitch must be between 0.0 and 2.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.speech_volume) {
            return Err(VoiceError::Config(
                "speech_volume must be between 0.0 and 1.0".to_string(),
            ));
        }
        Ok(())
    }
}
