//! In-memory collaborators for driving `VoiceNavigator` in tests.

#![allow(dead_code)]

use async_trait::async_trait;
use farmlink_types::{NoticeSeverity, Session, UserType};
use farmlink_voice::{
    EventSink, Notifier, Pacer, PageContext, RecognitionConfig, RecognitionEngine,
    RecognitionEvent, RedirectStore, Router, SessionProvider, SpeechSynthesizer, TokioPacer,
    Utterance, VoiceConfig, VoiceError, VoiceHost, VoiceNavigator,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Ordered record of side effects across all fakes.
#[derive(Default)]
pub struct Timeline {
    entries: Mutex<Vec<String>>,
}

impl Timeline {
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn position(&self, entry: &str) -> usize {
        self.entries()
            .iter()
            .position(|e| e == entry)
            .unwrap_or_else(|| panic!("{entry:?} not in timeline {:?}", self.entries()))
    }
}

/// Recognition engine that replays one scripted batch of callbacks per start.
pub struct FakeEngine {
    supported: bool,
    fail_start: bool,
    script: Mutex<VecDeque<Vec<RecognitionEvent>>>,
    starts: Mutex<Vec<(RecognitionConfig, u64)>>,
    sinks: Mutex<Vec<EventSink>>,
    stops: Mutex<usize>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            supported: true,
            fail_start: false,
            script: Mutex::new(VecDeque::new()),
            starts: Mutex::new(Vec::new()),
            sinks: Mutex::new(Vec::new()),
            stops: Mutex::new(0),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_start: true,
            ..Self::new()
        }
    }

    /// Queues the callbacks fired by the next `start`.
    pub fn script(&self, events: Vec<RecognitionEvent>) {
        self.script.lock().unwrap().push_back(events);
    }

    pub fn starts(&self) -> Vec<(RecognitionConfig, u64)> {
        self.starts.lock().unwrap().clone()
    }

    pub fn stops(&self) -> usize {
        *self.stops.lock().unwrap()
    }

    /// Sink handed to the most recent `start`.
    pub fn last_sink(&self) -> EventSink {
        self.sinks
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("engine was never started")
    }
}

impl RecognitionEngine for FakeEngine {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn start(&self, config: &RecognitionConfig, sink: EventSink) -> Result<(), VoiceError> {
        if self.fail_start {
            return Err(VoiceError::Engine("microphone busy".to_string()));
        }
        self.starts
            .lock()
            .unwrap()
            .push((config.clone(), sink.ticket()));
        if let Some(events) = self.script.lock().unwrap().pop_front() {
            for event in events {
                sink.emit(event);
            }
        }
        self.sinks.lock().unwrap().push(sink);
        Ok(())
    }

    fn stop(&self) {
        *self.stops.lock().unwrap() += 1;
    }
}

pub struct FakeSynth {
    timeline: Arc<Timeline>,
    spoken: Mutex<Vec<Utterance>>,
}

impl FakeSynth {
    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }
}

impl SpeechSynthesizer for FakeSynth {
    fn speak(&self, utterance: Utterance) {
        self.timeline.record(format!("speak:{}", utterance.text));
        self.spoken.lock().unwrap().push(utterance);
    }

    fn cancel(&self) {
        self.timeline.record("cancel");
    }
}

#[derive(Default)]
pub struct FakeSessions {
    session: Mutex<Option<Session>>,
}

impl FakeSessions {
    pub fn login(&self, user_type: UserType) {
        *self.session.lock().unwrap() = Some(Session::new("user-1", user_type));
    }
}

impl SessionProvider for FakeSessions {
    fn current_session(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }
}

pub struct FakePage {
    path: Mutex<String>,
    language: Mutex<String>,
}

impl FakePage {
    pub fn set_path(&self, path: &str) {
        *self.path.lock().unwrap() = path.to_string();
    }

    pub fn set_language(&self, language: &str) {
        *self.language.lock().unwrap() = language.to_string();
    }
}

impl PageContext for FakePage {
    fn current_path(&self) -> String {
        self.path.lock().unwrap().clone()
    }

    fn display_language(&self) -> String {
        self.language.lock().unwrap().clone()
    }
}

pub struct FakeRouter {
    timeline: Arc<Timeline>,
    pushes: Mutex<Vec<String>>,
}

impl FakeRouter {
    pub fn pushes(&self) -> Vec<String> {
        self.pushes.lock().unwrap().clone()
    }
}

impl Router for FakeRouter {
    fn push(&self, path: &str) {
        self.timeline.record(format!("push:{path}"));
        self.pushes.lock().unwrap().push(path.to_string());
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    notices: Mutex<Vec<(NoticeSeverity, String)>>,
}

impl FakeNotifier {
    pub fn notices(&self) -> Vec<(NoticeSeverity, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn last(&self) -> (NoticeSeverity, String) {
        self.notices().last().cloned().expect("no notices shown")
    }
}

impl Notifier for FakeNotifier {
    fn notify(&self, severity: NoticeSeverity, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((severity, message.to_string()));
    }
}

#[derive(Default)]
pub struct FakeRedirects {
    remembered: Mutex<Vec<String>>,
}

impl FakeRedirects {
    pub fn remembered(&self) -> Vec<String> {
        self.remembered.lock().unwrap().clone()
    }
}

impl RedirectStore for FakeRedirects {
    fn remember(&self, path: &str) {
        self.remembered.lock().unwrap().push(path.to_string());
    }
}

/// Returns immediately, recording every requested pause.
pub struct InstantPacer {
    timeline: Arc<Timeline>,
}

#[async_trait]
impl Pacer for InstantPacer {
    async fn pause(&self, duration: Duration) {
        self.timeline
            .record(format!("pause:{}", duration.as_millis()));
    }
}

pub struct Harness {
    pub timeline: Arc<Timeline>,
    pub engine: Arc<FakeEngine>,
    pub synth: Arc<FakeSynth>,
    pub sessions: Arc<FakeSessions>,
    pub page: Arc<FakePage>,
    pub router: Arc<FakeRouter>,
    pub notifier: Arc<FakeNotifier>,
    pub redirects: Arc<FakeRedirects>,
    pub navigator: VoiceNavigator,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(VoiceConfig::default(), FakeEngine::new())
    }

    pub fn with(config: VoiceConfig, engine: FakeEngine) -> Self {
        let timeline = Arc::new(Timeline::default());
        let pacer = Arc::new(InstantPacer {
            timeline: timeline.clone(),
        });
        Self::assemble(config, engine, timeline, pacer)
    }

    /// Pauses on the tokio timer, so other work can run during them.
    /// Pair with `start_paused` tests.
    pub fn with_tokio_pacer(config: VoiceConfig, engine: FakeEngine) -> Self {
        Self::assemble(
            config,
            engine,
            Arc::new(Timeline::default()),
            Arc::new(TokioPacer),
        )
    }

    fn assemble(
        config: VoiceConfig,
        engine: FakeEngine,
        timeline: Arc<Timeline>,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        let engine = Arc::new(engine);
        let synth = Arc::new(FakeSynth {
            timeline: timeline.clone(),
            spoken: Mutex::new(Vec::new()),
        });
        let sessions = Arc::new(FakeSessions::default());
        let page = Arc::new(FakePage {
            path: Mutex::new("/".to_string()),
            language: Mutex::new("en".to_string()),
        });
        let router = Arc::new(FakeRouter {
            timeline: timeline.clone(),
            pushes: Mutex::new(Vec::new()),
        });
        let notifier = Arc::new(FakeNotifier::default());
        let redirects = Arc::new(FakeRedirects::default());

        let host = VoiceHost {
            engine: engine.clone(),
            synthesizer: synth.clone(),
            sessions: sessions.clone(),
            page: page.clone(),
            router: router.clone(),
            notifier: notifier.clone(),
            redirects: redirects.clone(),
            pacer,
        };
        let navigator = VoiceNavigator::new(config, host).expect("valid config");

        Self {
            timeline,
            engine,
            synth,
            sessions,
            page,
            router,
            notifier,
            redirects,
            navigator,
        }
    }
}
