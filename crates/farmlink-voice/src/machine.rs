//! The idle / listening / processing state machine.
//!
//! Pure bookkeeping: it decides transitions and retry budgets, while the
//! navigator performs the side effects those decisions call for.

use crate::recognition::RecognitionErrorCode;
use farmlink_types::VoiceState;

/// Result of pressing the microphone button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A new session begins; start the engine with this ticket.
    Start { ticket: u64 },
    /// The live session was stopped (toggle off).
    Stop,
    /// A command is being processed; the press is ignored.
    Busy,
}

/// What a transcript turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptOutcome {
    /// Dispatch this trimmed transcript.
    Dispatch(String),
    /// Nothing was said; the session is over.
    Empty,
    /// Not listening, so the transcript is stale.
    Ignored,
}

/// What a recognition error turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorOutcome {
    /// Start a fresh session with this ticket. `attempt` is 1-based.
    Retry { attempt: u8, ticket: u64 },
    /// The session is over; show `message`.
    Terminal { message: String },
    /// Not listening, so the error is stale.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct VoiceStateMachine {
    state: VoiceState,
    retries: u8,
    max_retries: u8,
    ticket: u64,
}

impl VoiceStateMachine {
    pub fn new(max_retries: u8) -> Self {
        Self {
            state: VoiceState::Idle,
            retries: 0,
            max_retries,
            ticket: 0,
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn retries(&self) -> u8 {
        self.retries
    }

    /// Ticket of the live recognition handle. Only meaningful while listening.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Whether an event tagged `ticket` belongs to the live handle.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.state == VoiceState::Listening && ticket == self.ticket
    }

    fn next_ticket(&mut self) -> u64 {
        self.ticket += 1;
        self.ticket
    }

    /// Toggles the microphone. Pressing while listening stops the session
    /// instead of starting a second one.
    pub fn activate(&mut self) -> Activation {
        match self.state {
            VoiceState::Idle => {
                self.state = VoiceState::Listening;
                self.retries = 0;
                Activation::Start {
                    ticket: self.next_ticket(),
                }
            }
            VoiceState::Listening => {
                self.reset();
                Activation::Stop
            }
            VoiceState::Processing => Activation::Busy,
        }
    }

    /// Manual stop or teardown. Returns `true` if a session was live.
    pub fn stop(&mut self) -> bool {
        let was_live = self.state == VoiceState::Listening;
        if was_live {
            self.reset();
        }
        was_live
    }

    pub fn on_transcript(&mut self, transcript: &str) -> TranscriptOutcome {
        if self.state != VoiceState::Listening {
            return TranscriptOutcome::Ignored;
        }
        let transcript = transcript.trim();
        if transcript.is_empty() {
            self.reset();
            return TranscriptOutcome::Empty;
        }
        self.state = VoiceState::Processing;
        self.retries = 0;
        // Later callbacks from this handle must not reach the processing session.
        self.next_ticket();
        TranscriptOutcome::Dispatch(transcript.to_string())
    }

    pub fn on_error(&mut self, code: &RecognitionErrorCode) -> ErrorOutcome {
        if self.state != VoiceState::Listening {
            return ErrorOutcome::Ignored;
        }
        if code.is_transient() && self.retries < self.max_retries {
            self.retries += 1;
            return ErrorOutcome::Retry {
                attempt: self.retries,
                ticket: self.next_ticket(),
            };
        }
        self.reset();
        ErrorOutcome::Terminal {
            message: code.user_message(),
        }
    }

    /// The engine ended without a result. Returns `true` if that ended the
    /// session.
    pub fn on_end(&mut self) -> bool {
        self.stop()
    }

    /// No callback arrived in time. Returns `true` if that ended the session.
    pub fn on_timeout(&mut self) -> bool {
        self.stop()
    }

    /// Command dispatch is done; back to idle.
    pub fn finish_processing(&mut self) {
        if self.state == VoiceState::Processing {
            self.state = VoiceState::Idle;
        }
    }

    fn reset(&mut self) {
        self.state = VoiceState::Idle;
        self.retries = 0;
        // Invalidate the handle that was live.
        self.ticket += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listening() -> (VoiceStateMachine, u64) {
        let mut machine = VoiceStateMachine::new(2);
        match machine.activate() {
            Activation::Start { ticket } => (machine, ticket),
            other => panic!("expected Start, got {other:?}"),
        }
    }

    #[test]
    fn starts_idle() {
        let machine = VoiceStateMachine::new(2);
        assert_eq!(machine.state(), VoiceState::Idle);
        assert_eq!(machine.retries(), 0);
    }

    #[test]
    fn activate_while_listening_stops() {
        let (mut machine, ticket) = listening();
        assert_eq!(machine.state(), VoiceState::Listening);
        assert!(machine.is_current(ticket));

        assert_eq!(machine.activate(), Activation::Stop);
        assert_eq!(machine.state(), VoiceState::Idle);
        assert!(!machine.is_current(ticket));
    }

    #[test]
    fn activate_while_processing_is_busy() {
        let (mut machine, _) = listening();
        machine.on_transcript("orders");
        assert_eq!(machine.activate(), Activation::Busy);
        assert_eq!(machine.state(), VoiceState::Processing);
    }

    #[test]
    fn transcript_moves_to_processing_then_idle() {
        let (mut machine, ticket) = listening();
        assert_eq!(
            machine.on_transcript("  go to orders "),
            TranscriptOutcome::Dispatch("go to orders".to_string())
        );
        assert_eq!(machine.state(), VoiceState::Processing);
        assert!(!machine.is_current(ticket));

        machine.finish_processing();
        assert_eq!(machine.state(), VoiceState::Idle);
    }

    #[test]
    fn empty_transcript_resets() {
        let (mut machine, _) = listening();
        assert_eq!(machine.on_transcript("   "), TranscriptOutcome::Empty);
        assert_eq!(machine.state(), VoiceState::Idle);
    }

    #[test]
    fn network_errors_retry_twice_then_terminate() {
        let (mut machine, first) = listening();

        let second = match machine.on_error(&RecognitionErrorCode::Network) {
            ErrorOutcome::Retry { attempt: 1, ticket } => ticket,
            other => panic!("expected first retry, got {other:?}"),
        };
        assert_ne!(second, first);
        assert!(machine.is_current(second));
        assert!(!machine.is_current(first));

        assert!(matches!(
            machine.on_error(&RecognitionErrorCode::Network),
            ErrorOutcome::Retry { attempt: 2, .. }
        ));
        assert_eq!(machine.retries(), 2);
        assert_eq!(machine.state(), VoiceState::Listening);

        match machine.on_error(&RecognitionErrorCode::Network) {
            ErrorOutcome::Terminal { message } => assert!(message.contains("Network error")),
            other => panic!("expected terminal error, got {other:?}"),
        }
        assert_eq!(machine.retries(), 0);
        assert_eq!(machine.state(), VoiceState::Idle);
    }

    #[test]
    fn retry_budget_resets_per_session() {
        let (mut machine, _) = listening();
        machine.on_error(&RecognitionErrorCode::Network);
        machine.on_error(&RecognitionErrorCode::Network);
        machine.activate();
        assert_eq!(machine.state(), VoiceState::Idle);

        machine.activate();
        assert_eq!(machine.retries(), 0);
        assert!(matches!(
            machine.on_error(&RecognitionErrorCode::Network),
            ErrorOutcome::Retry { attempt: 1, .. }
        ));
    }

    #[test]
    fn non_network_errors_terminate_immediately() {
        let (mut machine, _) = listening();
        match machine.on_error(&RecognitionErrorCode::NotAllowed) {
            ErrorOutcome::Terminal { message } => assert!(message.contains("denied")),
            other => panic!("expected terminal error, got {other:?}"),
        }
        assert_eq!(machine.state(), VoiceState::Idle);
    }

    #[test]
    fn zero_retry_budget_terminates_on_first_network_error() {
        let mut machine = VoiceStateMachine::new(0);
        machine.activate();
        assert!(matches!(
            machine.on_error(&RecognitionErrorCode::Network),
            ErrorOutcome::Terminal { .. }
        ));
    }

    #[test]
    fn events_outside_listening_are_ignored() {
        let mut machine = VoiceStateMachine::new(2);
        assert_eq!(machine.on_transcript("orders"), TranscriptOutcome::Ignored);
        assert_eq!(
            machine.on_error(&RecognitionErrorCode::NoSpeech),
            ErrorOutcome::Ignored
        );
        assert!(!machine.on_end());
        assert!(!machine.on_timeout());
    }

    #[test]
    fn end_without_result_returns_to_idle() {
        let (mut machine, _) = listening();
        assert!(machine.on_end());
        assert_eq!(machine.state(), VoiceState::Idle);
    }
}
