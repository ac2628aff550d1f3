//! Shared types for the FarmLink marketplace.
//!
//! This crate provides the foundational types used across all FarmLink
//! crates: the marketplace user roles, the session identity handed out by
//! the auth collaborator, notice severities, and the voice navigation
//! state shared between the controller and whatever renders its button.
//!
//! No crate in the workspace depends on anything *except* `farmlink-types`
//! for cross-cutting type definitions.

use serde::{Deserialize, Serialize};

mod voice;
pub use voice::{ButtonAffordance, VoiceState};

/// Marketplace user roles.
///
/// Each logged-in user has exactly one role, which selects the role-specific
/// pages (dashboards, orders, inventory) they navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// A producer listing crops and managing harvest inventory.
    Farmer,
    /// An aggregation hub handling storage and transport.
    Hub,
    /// A retail customer buying from the marketplace.
    Customer,
    /// A restaurant sourcing produce from suppliers.
    Restaurant,
    /// Identity is present but the role could not be determined.
    Unknown,
}

impl UserType {
    /// Roles that own a dedicated set of pages, in inference order.
    pub const KNOWN: [UserType; 4] = [
        UserType::Farmer,
        UserType::Hub,
        UserType::Customer,
        UserType::Restaurant,
    ];

    /// Returns the canonical lowercase label for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Farmer => "farmer",
            Self::Hub => "hub",
            Self::Customer => "customer",
            Self::Restaurant => "restaurant",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a role label, mapping anything unrecognised to `Unknown`.
    ///
    /// Matching is case-insensitive and accepts `retailer` as an alias of
    /// `customer`.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Self::Unknown)
    }

    /// Returns `true` for roles that own role-specific pages.
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserType {
    type Err = ParseUserTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "farmer" => Ok(Self::Farmer),
            "hub" => Ok(Self::Hub),
            "customer" | "retailer" => Ok(Self::Customer),
            "restaurant" => Ok(Self::Restaurant),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ParseUserTypeError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown user type label.
#[derive(Debug, Clone)]
pub struct ParseUserTypeError(pub String);

impl std::fmt::Display for ParseUserTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown user type: {}", self.0)
    }
}

impl std::error::Error for ParseUserTypeError {}

/// An authenticated session as exposed by the auth provider.
///
/// Created at login and destroyed at logout by the provider; consumers only
/// ever read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque user identifier.
    pub user_id: String,
    /// Role of the logged-in user.
    pub user_type: UserType,
}

impl Session {
    pub fn new(user_id: impl Into<String>, user_type: UserType) -> Self {
        Self {
            user_id: user_id.into(),
            user_type,
        }
    }
}

/// Severity of a user-facing notice (toast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeSeverity {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for NoticeSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
