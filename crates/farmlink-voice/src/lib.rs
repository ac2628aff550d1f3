//! Voice navigation for the FarmLink marketplace.
//!
//! Lets farmers, hubs, customers, and restaurants move around the
//! marketplace by speaking: "go to products", "open orders", "take me to
//! help". A transcript is stripped of navigational filler, looked up in a
//! route table built for the user's role, checked against the login gate,
//! confirmed out loud, and finally handed to the router.
//!
//! The platform's speech recognition and synthesis engines, the auth
//! provider, the router and the toast service are all injected through the
//! traits in [`host`], [`recognition`] and [`synthesis`], so the whole
//! pipeline runs the same against a browser shell, a console, or test fakes.
//!
//! # Session lifecycle
//!
//! ```text
//! idle --press--> listening --transcript--> processing --reset delay--> idle
//!                  |   ^
//!                  |   +-- network error, retry budget left
//!                  +--> idle on press, terminal error, end, timeout
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod host;
pub mod machine;
pub mod messages;
pub mod navigator;
pub mod normalize;
pub mod recognition;
pub mod routes;
pub mod synthesis;

pub use auth::{AuthGate, GateDecision, PROTECTED_KEYWORDS};
pub use config::VoiceConfig;
pub use error::VoiceError;
pub use host::{Notifier, Pacer, PageContext, RedirectStore, Router, SessionProvider, TokioPacer};
pub use machine::VoiceStateMachine;
pub use navigator::{CommandOutcome, VoiceHost, VoiceNavigator};
pub use normalize::{normalize_command, Normalizer, NormalizerMode};
pub use recognition::{
    EventSink, RecognitionConfig, RecognitionEngine, RecognitionErrorCode, RecognitionEvent,
    SessionEvent,
};
pub use routes::{build_route_table, RouteTable};
pub use synthesis::{SpeechSynthesizer, Speaker, Utterance};
