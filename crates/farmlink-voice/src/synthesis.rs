use crate::config::VoiceConfig;
use crate::messages::synthesis_locale;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A single piece of text to speak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// A platform speech synthesizer.
pub trait SpeechSynthesizer: Send + Sync {
    fn speak(&self, utterance: Utterance);

    /// Cancels queued and in-flight utterances.
    fn cancel(&self);
}

/// Speaks confirmations with fixed voice settings.
///
/// At most one utterance is active: every `say` cancels whatever the
/// synthesizer is still speaking before queueing the new text.
#[derive(Clone)]
pub struct Speaker {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    rate: f32,
    pitch: f32,
    volume: f32,
}

impl Speaker {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, config: &VoiceConfig) -> Self {
        Self {
            synthesizer,
            rate: config.speech_rate,
            pitch: config.speech_pitch,
            volume: config.speech_volume,
        }
    }

    /// Speaks `text` in the locale mapped from the display `language`.
    pub fn say(&self, text: impl Into<String>, language: &str) {
        let utterance = Utterance {
            text: text.into(),
            locale: synthesis_locale(language).to_string(),
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
        };
        debug!(locale = %utterance.locale, text = %utterance.text, "speaking");
        self.synthesizer.cancel();
        self.synthesizer.speak(utterance);
    }

    pub fn silence(&self) {
        self.synthesizer.cancel();
    }
}

impl std::fmt::Debug for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Speaker")
            .field("rate", &self.rate)
            .field("pitch", &self.pitch)
            .field("volume", &self.volume)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, PartialEq)]
    enum Call {
        Speak(Utterance),
        Cancel,
    }

    #[derive(Default)]
    struct RecordingSynth {
        calls: Mutex<Vec<Call>>,
    }

    impl SpeechSynthesizer for RecordingSynth {
        fn speak(&self, utterance: Utterance) {
            self.calls.lock().unwrap().push(Call::Speak(utterance));
        }

        fn cancel(&self) {
            self.calls.lock().unwrap().push(Call::Cancel);
        }
    }

    #[test]
    fn say_cancels_before_speaking() {
        let synth = Arc::new(RecordingSynth::default());
        let speaker = Speaker::new(synth.clone(), &VoiceConfig::default());

        speaker.say("first", "en");
        speaker.say("second", "en");

        let calls = synth.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], Call::Cancel);
        assert!(matches!(&calls[1], Call::Speak(u) if u.text == "first"));
        assert_eq!(calls[2], Call::Cancel);
        assert!(matches!(&calls[3], Call::Speak(u) if u.text == "second"));
    }

    #[test]
    fn utterance_uses_mapped_locale_and_fixed_voice() {
        let synth = Arc::new(RecordingSynth::default());
        let config = VoiceConfig {
            speech_rate: 1.2,
            ..VoiceConfig::default()
        };
        let speaker = Speaker::new(synth.clone(), &config);

        speaker.say("नमस्ते", "hi");
        speaker.say("hello", "xx");

        let calls = synth.calls.lock().unwrap();
        match (&calls[1], &calls[3]) {
            (Call::Speak(hindi), Call::Speak(fallback)) => {
                assert_eq!(hindi.locale, "hi-IN");
                assert_eq!(hindi.rate, 1.2);
                assert_eq!(hindi.volume, 1.0);
                assert_eq!(fallback.locale, "en-US");
            }
            other => panic!("unexpected calls: {other:?}"),
        }
    }
}
