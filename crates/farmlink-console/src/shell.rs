//! A terminal stand-in for the browser page hosting the voice button.
//!
//! [`ConsoleShell`] plays every page-side collaborator at once (session,
//! location, router, toasts, speech output) and [`ScriptedEngine`] replays
//! typed utterances as recognition callbacks.

use farmlink_types::{NoticeSeverity, Session, UserType};
use farmlink_voice::{
    EventSink, Notifier, PageContext, RecognitionConfig, RecognitionEngine, RecognitionErrorCode,
    RecognitionEvent, RedirectStore, Router, SessionProvider, SpeechSynthesizer, Utterance,
    VoiceError,
};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError, RwLock};
use tracing::{debug, info};

/// What the simulated engine hears on one recognition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Speech(String),
    Error(RecognitionErrorCode),
}

impl Attempt {
    fn events(&self) -> Vec<RecognitionEvent> {
        match self {
            Self::Speech(text) => vec![
                RecognitionEvent::Started,
                RecognitionEvent::Result(text.clone()),
                RecognitionEvent::Ended,
            ],
            Self::Error(code) => vec![
                RecognitionEvent::Started,
                RecognitionEvent::Error(code.clone()),
                RecognitionEvent::Ended,
            ],
        }
    }
}

/// Recognition engine fed from typed input.
///
/// Each `start` consumes one queued [`Attempt`]. With nothing queued the
/// engine stays silent, which exercises the listening timeout.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    attempts: Mutex<VecDeque<Attempt>>,
}

impl ScriptedEngine {
    pub fn load(&self, attempts: impl IntoIterator<Item = Attempt>) {
        let mut queue = self.attempts.lock().unwrap_or_else(PoisonError::into_inner);
        queue.clear();
        queue.extend(attempts);
    }
}

impl RecognitionEngine for ScriptedEngine {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&self, config: &RecognitionConfig, sink: EventSink) -> Result<(), VoiceError> {
        debug!(locale = %config.locale, ticket = sink.ticket(), "scripted recognition started");
        let attempt = self
            .attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(attempt) = attempt {
            for event in attempt.events() {
                sink.emit(event);
            }
        }
        Ok(())
    }

    fn stop(&self) {
        debug!("scripted recognition stopped");
    }
}

/// The simulated page: session, location, router, toasts, speech.
#[derive(Debug)]
pub struct ConsoleShell {
    session: RwLock<Option<Session>>,
    path: RwLock<String>,
    language: RwLock<String>,
    pending_redirect: Mutex<Option<String>>,
}

impl ConsoleShell {
    pub fn new(start_path: &str, language: &str, user: Option<UserType>) -> Self {
        Self {
            session: RwLock::new(user.map(|user_type| Session::new("console-user", user_type))),
            path: RwLock::new(start_path.to_string()),
            language: RwLock::new(language.to_string()),
            pending_redirect: Mutex::new(None),
        }
    }

    /// Logs in and returns the remembered post-login destination, if any.
    pub fn login(&self, user_type: UserType) -> Option<String> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) =
            Some(Session::new("console-user", user_type));
        info!(%user_type, "logged in");
        self.pending_redirect
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn logout(&self) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
        info!("logged out");
    }

    pub fn set_path(&self, path: &str) {
        *self.path.write().unwrap_or_else(PoisonError::into_inner) = path.to_string();
    }

    pub fn set_language(&self, language: &str) {
        *self.language.write().unwrap_or_else(PoisonError::into_inner) = language.to_string();
    }

    pub fn pending_redirect(&self) -> Option<String> {
        self.pending_redirect
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionProvider for ConsoleShell {
    fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PageContext for ConsoleShell {
    fn current_path(&self) -> String {
        self.path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn display_language(&self) -> String {
        self.language
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Router for ConsoleShell {
    fn push(&self, path: &str) {
        println!("-> {path}");
        self.set_path(path);
    }
}

impl Notifier for ConsoleShell {
    fn notify(&self, severity: NoticeSeverity, message: &str) {
        println!("[{severity}] {message}");
    }
}

impl RedirectStore for ConsoleShell {
    fn remember(&self, path: &str) {
        *self
            .pending_redirect
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(path.to_string());
    }
}

impl SpeechSynthesizer for ConsoleShell {
    fn speak(&self, utterance: Utterance) {
        println!("({}) \"{}\"", utterance.locale, utterance.text);
    }

    fn cancel(&self) {}
}

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Press the microphone and hear these attempts, one per engine start.
    Speak(Vec<Attempt>),
    Login(UserType),
    Logout,
    Goto(String),
    Language(String),
    Routes,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
Type what you would say, e.g. `go to products`.
Separate retry attempts with `;`; `error:<code>` simulates an engine error,
e.g. `error:network; open orders`.
Commands:
  !login <farmer|hub|customer|restaurant>   log in (follows any saved redirect)
  !logout                                   log out
  !goto <path>                              change the current page
  !lang <code>                              change the display language
  !routes                                   list voice keywords for this page
  !help                                     show this help
  !quit                                     exit";

impl ConsoleCommand {
    /// Parses a line of input. Unknown `!` commands are reported as errors.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Empty);
        }

        let Some(command) = line.strip_prefix('!') else {
            return Ok(Self::Speak(parse_attempts(line)));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();
        match (name, arg) {
            ("login", Some(role)) => role
                .parse::<UserType>()
                .ok()
                .filter(|user_type| user_type.is_known())
                .map(Self::Login)
                .ok_or_else(|| format!("unknown role: {role}")),
            ("logout", None) => Ok(Self::Logout),
            ("goto", Some(path)) if path.starts_with('/') => Ok(Self::Goto(path.to_string())),
            ("lang", Some(code)) => Ok(Self::Language(code.to_string())),
            ("routes", None) => Ok(Self::Routes),
            ("help", None) => Ok(Self::Help),
            ("quit" | "exit", None) => Ok(Self::Quit),
            _ => Err(format!("unrecognised command: !{command}")),
        }
    }
}

fn parse_attempts(line: &str) -> Vec<Attempt> {
    line.split(';')
        .map(str::trim)
        .map(|segment| match segment.strip_prefix("error:") {
            Some(code) => Attempt::Error(RecognitionErrorCode::from_code(code)),
            None => Attempt::Speech(segment.to_string()),
        })
        .collect()
}
