//! Interactive console for trying FarmLink voice navigation without a browser.
//!
//! Typed lines stand in for speech; page state (session, path, language)
//! lives in a [`ConsoleShell`](shell::ConsoleShell) and navigation prints to
//! stdout.

pub mod config;
pub mod shell;

use config::Config;
use farmlink_types::{UserType, VoiceState};
use farmlink_voice::{
    build_route_table, CommandOutcome, PageContext, SessionProvider, TokioPacer, VoiceError,
    VoiceHost, VoiceNavigator,
};
use shell::{ConsoleCommand, ConsoleShell, ScriptedEngine, HELP};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while assembling the console.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Voice(#[from] VoiceError),

    #[error("unknown console.user role: {0}")]
    UnknownRole(String),
}

/// Whether the input loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A navigator wired to the console shell and scripted engine.
#[derive(Debug)]
pub struct Console {
    shell: Arc<ConsoleShell>,
    engine: Arc<ScriptedEngine>,
    navigator: VoiceNavigator,
}

impl Console {
    pub fn from_config(config: &Config) -> Result<Self, ConsoleError> {
        let user = match config.console.user.as_deref() {
            Some(label) => Some(
                label
                    .parse::<UserType>()
                    .ok()
                    .filter(|user_type| user_type.is_known())
                    .ok_or_else(|| ConsoleError::UnknownRole(label.to_string()))?,
            ),
            None => None,
        };

        let shell = Arc::new(ConsoleShell::new(
            &config.console.start_path,
            &config.console.language,
            user,
        ));
        let engine = Arc::new(ScriptedEngine::default());
        let host = VoiceHost {
            engine: engine.clone(),
            synthesizer: shell.clone(),
            sessions: shell.clone(),
            page: shell.clone(),
            router: shell.clone(),
            notifier: shell.clone(),
            redirects: shell.clone(),
            pacer: Arc::new(TokioPacer),
        };
        let navigator = VoiceNavigator::new(config.voice.clone(), host)?;

        Ok(Self {
            shell,
            engine,
            navigator,
        })
    }

    pub fn shell(&self) -> &ConsoleShell {
        &self.shell
    }

    pub fn navigator(&self) -> &VoiceNavigator {
        &self.navigator
    }

    /// Executes one parsed line of input.
    pub async fn run(&self, command: ConsoleCommand) -> Flow {
        match command {
            ConsoleCommand::Speak(attempts) => {
                self.engine.load(attempts);
                if let Err(e) = self.navigator.toggle() {
                    tracing::warn!(error = %e, "could not start voice session");
                    return Flow::Continue;
                }
                if let Some(CommandOutcome::Unrecognized { keyword }) =
                    self.navigator.run_session().await
                {
                    tracing::debug!(%keyword, "voice command not recognized");
                }
            }
            ConsoleCommand::Login(user_type) => {
                if let Some(path) = self.shell.login(user_type) {
                    println!("-> {path}");
                    self.shell.set_path(&path);
                }
            }
            ConsoleCommand::Logout => self.shell.logout(),
            ConsoleCommand::Goto(path) => self.shell.set_path(&path),
            ConsoleCommand::Language(code) => self.shell.set_language(&code),
            ConsoleCommand::Routes => {
                let session = self.shell.current_session();
                let table = build_route_table(
                    session.map(|s| s.user_type),
                    &self.shell.current_path(),
                );
                println!("{}", table.keywords().join(", "));
            }
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => return Flow::Quit,
            ConsoleCommand::Empty => {}
        }
        Flow::Continue
    }

    /// Prompt shown before each line: current page, role and button label.
    pub fn prompt(&self) -> String {
        let role = self
            .shell
            .current_session()
            .map_or("guest", |s| s.user_type.as_str());
        let state = self.navigator.state();
        let marker = if state == VoiceState::Idle {
            String::new()
        } else {
            format!(" [{state}]")
        };
        format!(
            "{} ({role}) {}{marker}> ",
            self.shell.current_path(),
            self.navigator.affordance().label
        )
    }
}
