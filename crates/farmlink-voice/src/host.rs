//! Collaborators supplied by the hosting page.
//!
//! The navigator never owns session state, routing, or notices; it reads and
//! drives them through these traits so it can run against a real UI shell or
//! against in-memory fakes.

use async_trait::async_trait;
use farmlink_types::{NoticeSeverity, Session};
use std::time::Duration;

/// Read-only access to the auth provider's current session.
pub trait SessionProvider: Send + Sync {
    fn current_session(&self) -> Option<Session>;
}

/// Where the user currently is and which language the UI is shown in.
pub trait PageContext: Send + Sync {
    fn current_path(&self) -> String;

    /// Display language code, e.g. `en` or `hi`.
    fn display_language(&self) -> String;
}

pub trait Router: Send + Sync {
    fn push(&self, path: &str);
}

/// Toast-style notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: NoticeSeverity, message: &str);
}

/// Remembers where to send the user once they have logged in.
pub trait RedirectStore: Send + Sync {
    fn remember(&self, path: &str);
}

/// Fixed UX pauses. Injected so tests do not wait on real timers.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Pauses with the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
