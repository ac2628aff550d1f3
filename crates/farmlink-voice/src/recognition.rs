//! Speech recognition engine boundary.
//!
//! Platform engines are callback driven: `start` returns immediately and
//! results arrive later. Engines report through an [`EventSink`], which
//! tags every callback with the ticket of the session that produced it so
//! late callbacks from an aborted handle can be discarded.

use crate::error::VoiceError;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// Settings passed to the engine when a session starts.
///
/// `None` leaves the setting to the engine's own default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionConfig {
    pub locale: String,
    pub continuous: Option<bool>,
    pub interim_results: Option<bool>,
    pub max_alternatives: Option<u32>,
}

impl RecognitionConfig {
    /// Single-shot, final results only, one alternative. Every session
    /// starts with this: the navigator treats each result as final.
    pub fn single_shot(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            continuous: Some(false),
            interim_results: Some(false),
            max_alternatives: Some(1),
        }
    }

    /// The stripped-down configuration used when retrying after a network
    /// error. Only the locale is set.
    pub fn minimal(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            continuous: None,
            interim_results: None,
            max_alternatives: None,
        }
    }
}

/// Error codes reported by recognition engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorCode {
    Network,
    NoSpeech,
    AudioCapture,
    NotAllowed,
    ServiceNotAllowed,
    BadGrammar,
    LanguageNotSupported,
    Aborted,
    Other(String),
}

impl RecognitionErrorCode {
    /// Parses the engine's wire code (`"no-speech"`, `"network"`, ...).
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "network" => Self::Network,
            "no-speech" => Self::NoSpeech,
            "audio-capture" => Self::AudioCapture,
            "not-allowed" => Self::NotAllowed,
            "service-not-allowed" => Self::ServiceNotAllowed,
            "bad-grammar" => Self::BadGrammar,
            "language-not-supported" => Self::LanguageNotSupported,
            "aborted" => Self::Aborted,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Network => "network",
            Self::NoSpeech => "no-speech",
            Self::AudioCapture => "audio-capture",
            Self::NotAllowed => "not-allowed",
            Self::ServiceNotAllowed => "service-not-allowed",
            Self::BadGrammar => "bad-grammar",
            Self::LanguageNotSupported => "language-not-supported",
            Self::Aborted => "aborted",
            Self::Other(code) => code,
        }
    }

    /// Only network failures are worth a fresh session.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// The notice shown when this error ends the session.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network => "Network error: voice recognition is unavailable right now. \
                 Please use the menu to navigate instead."
                .to_string(),
            Self::NoSpeech => "No speech was detected. Please try again.".to_string(),
            Self::AudioCapture => {
                "No microphone was found. Please check that a microphone is connected."
                    .to_string()
            }
            Self::NotAllowed => "Microphone access was denied. Please allow microphone \
                 permission in your browser settings."
                .to_string(),
            Self::ServiceNotAllowed => {
                "The speech recognition service is not allowed. Please check your browser settings."
                    .to_string()
            }
            Self::BadGrammar => "Speech recognition grammar error. Please try again.".to_string(),
            Self::LanguageNotSupported => {
                "The selected language is not supported for voice recognition.".to_string()
            }
            Self::Aborted => "Voice recognition was stopped.".to_string(),
            Self::Other(code) => format!("Voice recognition error ({code}). Please try again."),
        }
    }
}

impl std::fmt::Display for RecognitionErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A callback from the recognition engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    Started,
    /// Final transcript of the best alternative.
    Result(String),
    Error(RecognitionErrorCode),
    Ended,
}

/// A [`RecognitionEvent`] tagged with the session ticket that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub ticket: u64,
    pub event: RecognitionEvent,
}

/// Callback handle given to an engine for one recognition session.
#[derive(Debug, Clone)]
pub struct EventSink {
    ticket: u64,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventSink {
    pub fn new(ticket: u64, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { ticket, tx }
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn started(&self) {
        self.emit(RecognitionEvent::Started);
    }

    pub fn result(&self, transcript: impl Into<String>) {
        self.emit(RecognitionEvent::Result(transcript.into()));
    }

    pub fn error(&self, code: RecognitionErrorCode) {
        self.emit(RecognitionEvent::Error(code));
    }

    pub fn ended(&self) {
        self.emit(RecognitionEvent::Ended);
    }

    pub fn emit(&self, event: RecognitionEvent) {
        // The receiver only goes away with the navigator itself.
        if self
            .tx
            .send(SessionEvent {
                ticket: self.ticket,
                event,
            })
            .is_err()
        {
            debug!(ticket = self.ticket, "recognition event dropped, navigator gone");
        }
    }
}

/// A platform speech recognition engine.
///
/// `start` must return without waiting for speech; all outcomes are
/// reported through the sink.
pub trait RecognitionEngine: Send + Sync {
    /// Whether the platform offers speech recognition at all.
    fn is_supported(&self) -> bool;

    fn start(&self, config: &RecognitionConfig, sink: EventSink) -> Result<(), VoiceError>;

    /// Aborts the live handle, if any. Callbacks it still fires carry a
    /// stale ticket and are discarded.
    fn stop(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_round_trip() {
        for code in [
            "network",
            "no-speech",
            "audio-capture",
            "not-allowed",
            "service-not-allowed",
            "bad-grammar",
            "language-not-supported",
            "aborted",
        ] {
            let parsed = RecognitionErrorCode::from_code(code);
            assert!(!matches!(parsed, RecognitionErrorCode::Other(_)), "{code}");
            assert_eq!(parsed.as_str(), code);
        }
    }

    #[test]
    fn unclassified_code_keeps_raw_value() {
        let code = RecognitionErrorCode::from_code("phonetic-overload");
        assert_eq!(code, RecognitionErrorCode::Other("phonetic-overload".to_string()));
        assert!(code.user_message().contains("phonetic-overload"));
    }

    #[test]
    fn only_network_is_transient() {
        assert!(RecognitionErrorCode::Network.is_transient());
        assert!(!RecognitionErrorCode::NoSpeech.is_transient());
        assert!(!RecognitionErrorCode::NotAllowed.is_transient());
    }

    #[test]
    fn permission_and_device_messages_differ() {
        let denied = RecognitionErrorCode::NotAllowed.user_message();
        let device = RecognitionErrorCode::AudioCapture.user_message();
        assert!(denied.contains("permission"));
        assert!(device.contains("microphone is connected"));
    }

    #[test]
    fn single_shot_defaults() {
        let config = RecognitionConfig::single_shot("en-US");
        assert_eq!(config.continuous, Some(false));
        assert_eq!(config.interim_results, Some(false));
        assert_eq!(config.max_alternatives, Some(1));
    }

    #[test]
    fn minimal_only_sets_locale() {
        let config = RecognitionConfig::minimal("hi-IN");
        assert_eq!(config.locale, "hi-IN");
        assert_eq!(config.continuous, None);
        assert_eq!(config.interim_results, None);
        assert_eq!(config.max_alternatives, None);
        assert_ne!(config, RecognitionConfig::single_shot("hi-IN"));
    }

    #[tokio::test]
    async fn sink_tags_events_with_ticket() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = EventSink::new(7, tx);
        sink.result("go to orders");
        sink.ended();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.ticket, 7);
        assert_eq!(first.event, RecognitionEvent::Result("go to orders".to_string()));
        assert_eq!(rx.recv().await.unwrap().event, RecognitionEvent::Ended);
    }
}
