//! Voice navigation controller.
//!
//! [`VoiceNavigator`] is what a page mounts behind its microphone button.
//! It starts and stops the recognition engine, feeds engine callbacks
//! through the [`VoiceStateMachine`], and turns transcripts into navigation:
//!
//! ```text
//! transcript -> normalize -> route table -> auth gate -> speak -> pause -> router.push
//! ```
//!
//! All user-visible failures go to the [`Notifier`]; nothing here panics or
//! propagates errors up into the page beyond the `Result` from [`toggle`].
//!
//! [`toggle`]: VoiceNavigator::toggle

use crate::auth::{AuthGate, GateDecision};
use crate::config::VoiceConfig;
use crate::error::VoiceError;
use crate::host::{Notifier, Pacer, PageContext, RedirectStore, Router, SessionProvider};
use crate::machine::{Activation, ErrorOutcome, TranscriptOutcome, VoiceStateMachine};
use crate::messages::Phrasebook;
use crate::normalize::Normalizer;
use crate::recognition::{
    EventSink, RecognitionConfig, RecognitionEngine, RecognitionErrorCode, RecognitionEvent,
    SessionEvent,
};
use crate::routes::build_route_table;
use crate::synthesis::{SpeechSynthesizer, Speaker};
use farmlink_types::{ButtonAffordance, NoticeSeverity, VoiceState};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

const UNSUPPORTED_NOTICE: &str = "Voice navigation is not supported in this browser. \
     Please use the menu to navigate.";
const NO_SPEECH_NOTICE: &str = "No speech detected. Please try again.";
const START_FAILED_NOTICE: &str = "Could not start voice recognition. Please try again.";
const TIMEOUT_NOTICE: &str = "Voice recognition timed out. Please try again.";
const LOGIN_NOTICE: &str = "Please login to continue.";
const COMMAND_HINT: &str = "Try \"go to dashboard\" or \"open help\".";

/// Everything the navigator needs from its host page.
#[derive(Clone)]
pub struct VoiceHost {
    pub engine: Arc<dyn RecognitionEngine>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub sessions: Arc<dyn SessionProvider>,
    pub page: Arc<dyn PageContext>,
    pub router: Arc<dyn Router>,
    pub notifier: Arc<dyn Notifier>,
    pub redirects: Arc<dyn RedirectStore>,
    pub pacer: Arc<dyn Pacer>,
}

/// What a dispatched voice command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The keyword resolved and the gate decided where to go.
    Routed(GateDecision),
    /// No route matched the normalized keyword.
    Unrecognized { keyword: String },
}

pub struct VoiceNavigator {
    config: VoiceConfig,
    engine: Arc<dyn RecognitionEngine>,
    speaker: Speaker,
    sessions: Arc<dyn SessionProvider>,
    page: Arc<dyn PageContext>,
    router: Arc<dyn Router>,
    notifier: Arc<dyn Notifier>,
    redirects: Arc<dyn RedirectStore>,
    pacer: Arc<dyn Pacer>,
    normalizer: Normalizer,
    gate: AuthGate,
    supported: bool,
    machine: Mutex<VoiceStateMachine>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<SessionEvent>>,
    state_tx: watch::Sender<VoiceState>,
}

impl VoiceNavigator {
    /// Creates a navigator for one mounted microphone button.
    ///
    /// If the engine reports no platform support, an error notice is shown
    /// once here and every later [`toggle`](Self::toggle) is refused.
    pub fn new(config: VoiceConfig, host: VoiceHost) -> Result<Self, VoiceError> {
        config.validate()?;

        let supported = host.engine.is_supported();
        if !supported {
            warn!("speech recognition unavailable on this platform");
            host.notifier.notify(NoticeSeverity::Error, UNSUPPORTED_NOTICE);
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(VoiceState::Idle);

        Ok(Self {
            speaker: Speaker::new(host.synthesizer, &config),
            normalizer: Normalizer::new(config.normalizer),
            machine: Mutex::new(VoiceStateMachine::new(config.max_network_retries)),
            config,
            engine: host.engine,
            sessions: host.sessions,
            page: host.page,
            router: host.router,
            notifier: host.notifier,
            redirects: host.redirects,
            pacer: host.pacer,
            gate: AuthGate,
            supported,
            events_tx,
            events_rx: tokio::sync::Mutex::new(events_rx),
            state_tx,
        })
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn state(&self) -> VoiceState {
        self.with_machine(|machine| machine.state())
    }

    /// Retries spent in the live session.
    pub fn retries(&self) -> u8 {
        self.with_machine(|machine| machine.retries())
    }

    pub fn affordance(&self) -> ButtonAffordance {
        ButtonAffordance::for_state(self.state())
    }

    /// Watches state changes, e.g. to re-render the button.
    pub fn subscribe(&self) -> watch::Receiver<VoiceState> {
        self.state_tx.subscribe()
    }

    /// Handles a microphone button press.
    ///
    /// Idle starts a session, listening stops it, processing is ignored.
    /// Returns the state after the press.
    pub fn toggle(&self) -> Result<VoiceState, VoiceError> {
        if !self.supported {
            return Err(VoiceError::Unsupported);
        }

        match self.with_machine(VoiceStateMachine::activate) {
            Activation::Start { ticket } => {
                info!(ticket, "voice session starting");
                self.start_engine(ticket, self.recognition_config())?;
                Ok(VoiceState::Listening)
            }
            Activation::Stop => {
                info!("voice session stopped by user");
                self.engine.stop();
                Ok(VoiceState::Idle)
            }
            Activation::Busy => {
                debug!("voice command still processing, ignoring press");
                Ok(VoiceState::Processing)
            }
        }
    }

    /// Stops a live listening session. No-op otherwise.
    pub fn stop(&self) {
        if self.with_machine(VoiceStateMachine::stop) {
            info!("voice session stopped");
            self.engine.stop();
        }
    }

    /// Tears the navigator down when its page goes away, cutting off any
    /// confirmation still being spoken.
    pub fn shutdown(&self) {
        if self.with_machine(VoiceStateMachine::stop) {
            debug!("aborting live recognition on shutdown");
        }
        // Unconditional: the engine may still hold a handle from a session
        // that already left `listening`.
        self.engine.stop();
        self.speaker.silence();
    }

    /// Drives engine callbacks until the session returns to idle.
    ///
    /// While listening, waits at most `listening_timeout` for the next
    /// callback before aborting the engine and resetting to idle.
    /// Returns the outcome of the command dispatched in this session, if any.
    pub async fn run_session(&self) -> Option<CommandOutcome> {
        let mut events = self.events_rx.lock().await;
        let mut outcome = None;

        while self.state() == VoiceState::Listening {
            let next = match self.config.listening_timeout() {
                Some(limit) => match tokio::time::timeout(limit, events.recv()).await {
                    Ok(next) => next,
                    Err(_) => {
                        self.expire(limit);
                        break;
                    }
                },
                None => events.recv().await,
            };

            let Some(event) = next else {
                break;
            };
            if let Some(result) = self.handle(event).await {
                outcome = Some(result);
            }
        }

        outcome
    }

    /// Applies one engine callback. Callbacks from stale handles are dropped.
    pub async fn handle(&self, event: SessionEvent) -> Option<CommandOutcome> {
        let SessionEvent { ticket, event } = event;
        if !self.with_machine(|machine| machine.is_current(ticket)) {
            debug!(ticket, ?event, "discarding stale recognition event");
            return None;
        }

        match event {
            RecognitionEvent::Started => {
                debug!(ticket, "recognition started");
                None
            }
            RecognitionEvent::Result(transcript) => self.on_transcript(&transcript).await,
            RecognitionEvent::Error(code) => {
                self.on_error(code).await;
                None
            }
            RecognitionEvent::Ended => {
                if self.with_machine(VoiceStateMachine::on_end) {
                    debug!(ticket, "recognition ended without a result");
                }
                None
            }
        }
    }

    /// Runs a transcript through normalize -> route -> gate and navigates.
    pub async fn dispatch(&self, transcript: &str) -> CommandOutcome {
        let keyword = self.normalizer.normalize(transcript);
        let session = self.sessions.current_session();
        let current_path = self.page.current_path();
        let language = self.page.display_language();
        let phrases = Phrasebook::for_language(&language);

        let table = build_route_table(session.as_ref().map(|s| s.user_type), &current_path);
        let Some(path) = table.resolve(&keyword) else {
            warn!(%keyword, %current_path, "no route for voice command");
            let notice = if keyword.is_empty() {
                format!("Command not recognized. {COMMAND_HINT}")
            } else {
                format!("Command \"{keyword}\" not recognized. {COMMAND_HINT}")
            };
            self.notifier.notify(NoticeSeverity::Warning, &notice);
            self.speaker.say(phrases.not_understood(&keyword), &language);
            return CommandOutcome::Unrecognized { keyword };
        };

        let decision = self
            .gate
            .decide(&keyword, path, session.as_ref(), &current_path);
        match &decision {
            GateDecision::RequireLogin {
                intended,
                login_path,
                ..
            } => {
                info!(%keyword, %intended, %login_path, "login required for voice route");
                self.redirects.remember(intended);
                self.speaker.say(phrases.login_required(), &language);
                self.notifier.notify(NoticeSeverity::Info, LOGIN_NOTICE);
            }
            GateDecision::Navigate { path, .. } => {
                info!(%keyword, %path, "voice navigation");
                self.speaker.say(phrases.navigating_to(&keyword), &language);
            }
        }

        self.pacer.pause(self.config.navigation_delay()).await;
        self.router.push(decision.target());
        CommandOutcome::Routed(decision)
    }

    async fn on_transcript(&self, transcript: &str) -> Option<CommandOutcome> {
        match self.with_machine(|machine| machine.on_transcript(transcript)) {
            TranscriptOutcome::Dispatch(text) => {
                info!(transcript = %text, "voice command received");
                let (outcome, ()) = tokio::join!(
                    self.dispatch(&text),
                    self.pacer.pause(self.config.reset_delay())
                );
                self.with_machine(VoiceStateMachine::finish_processing);
                Some(outcome)
            }
            TranscriptOutcome::Empty => {
                self.notifier.notify(NoticeSeverity::Info, NO_SPEECH_NOTICE);
                None
            }
            TranscriptOutcome::Ignored => None,
        }
    }

    async fn on_error(&self, code: RecognitionErrorCode) {
        match self.with_machine(|machine| machine.on_error(&code)) {
            ErrorOutcome::Retry { attempt, ticket } => {
                let max = self.config.max_network_retries;
                warn!(%code, attempt, max, "recognition network error, retrying");
                self.engine.stop();
                self.notifier.notify(
                    NoticeSeverity::Info,
                    &format!("Network issue, retrying voice recognition ({attempt}/{max})..."),
                );
                self.pacer.pause(self.config.retry_delay()).await;

                if !self.with_machine(|machine| machine.is_current(ticket)) {
                    debug!(ticket, "session ended before retry could start");
                    return;
                }
                let config = RecognitionConfig::minimal(&self.config.recognition_locale);
                // start_engine already reported the failure.
                let _ = self.start_engine(ticket, config);
            }
            ErrorOutcome::Terminal { message } => {
                warn!(%code, "voice recognition failed");
                let severity = match code {
                    RecognitionErrorCode::Aborted | RecognitionErrorCode::NoSpeech => {
                        NoticeSeverity::Info
                    }
                    _ => NoticeSeverity::Error,
                };
                self.notifier.notify(severity, &message);
            }
            ErrorOutcome::Ignored => {}
        }
    }

    fn expire(&self, limit: std::time::Duration) {
        if self.with_machine(VoiceStateMachine::on_timeout) {
            warn!(
                timeout_ms = limit.as_millis() as u64,
                "no recognition callback before timeout, resetting"
            );
            self.engine.stop();
            self.notifier.notify(NoticeSeverity::Warning, TIMEOUT_NOTICE);
        }
    }

    fn start_engine(&self, ticket: u64, config: RecognitionConfig) -> Result<(), VoiceError> {
        let sink = EventSink::new(ticket, self.events_tx.clone());
        if let Err(e) = self.engine.start(&config, sink) {
            warn!(error = %e, ticket, "failed to start speech recognition");
            self.with_machine(VoiceStateMachine::stop);
            self.notifier.notify(NoticeSeverity::Error, START_FAILED_NOTICE);
            return Err(e);
        }
        Ok(())
    }

    fn recognition_config(&self) -> RecognitionConfig {
        RecognitionConfig::single_shot(&self.config.recognition_locale)
    }

    fn with_machine<R>(&self, f: impl FnOnce(&mut VoiceStateMachine) -> R) -> R {
        let mut machine = self.machine.lock().unwrap_or_else(PoisonError::into_inner);
        let before = machine.state();
        let result = f(&mut machine);
        let after = machine.state();
        drop(machine);

        if before != after {
            debug!(from = %before, to = %after, "voice state changed");
            self.state_tx.send_replace(after);
        }
        result
    }
}

impl Drop for VoiceNavigator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for VoiceNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceNavigator")
            .field("config", &self.config)
            .field("supported", &self.supported)
            .field("state", &self.state())
            .finish()
    }
}
