//! Login gating for voice-resolved routes.

use crate::routes::infer_role;
use farmlink_types::{Session, UserType};

/// Keywords whose pages need a logged-in session, whatever path they resolve to.
pub const PROTECTED_KEYWORDS: &[&str] = &[
    "dashboard",
    "orders",
    "inventory",
    "analytics",
    "profile",
    "cart",
    "earnings",
    "deliveries",
];

/// Login entry point when no role can be inferred.
pub const DEFAULT_LOGIN_PATH: &str = "/";

pub fn is_protected(keyword: &str) -> bool {
    PROTECTED_KEYWORDS.contains(&keyword)
}

/// Resolves the login page for the role the user appears to belong to.
///
/// Uses the same inference as the route table: session role first, then the
/// role named in the URL, then the home page.
pub fn login_path_for(user_type: Option<UserType>, current_path: &str) -> &'static str {
    match infer_role(user_type, current_path) {
        Some(UserType::Farmer) => "/farmer/login",
        Some(UserType::Hub) => "/hub/login",
        Some(UserType::Customer) => "/customer/login",
        Some(UserType::Restaurant) => "/restaurant/login",
        Some(UserType::Unknown) | None => DEFAULT_LOGIN_PATH,
    }
}

/// What to do with a resolved voice command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Go straight to the resolved page.
    Navigate { keyword: String, path: String },
    /// Remember `intended` for after login and send the user to `login_path`.
    RequireLogin {
        keyword: String,
        intended: String,
        login_path: String,
    },
}

impl GateDecision {
    /// The path the router will be pushed to.
    pub fn target(&self) -> &str {
        match self {
            Self::Navigate { path, .. } => path,
            Self::RequireLogin { login_path, .. } => login_path,
        }
    }
}

/// Decides between direct navigation and a login redirect.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGate;

impl AuthGate {
    pub fn decide(
        &self,
        keyword: &str,
        path: &str,
        session: Option<&Session>,
        current_path: &str,
    ) -> GateDecision {
        if session.is_none() && is_protected(keyword) {
            return GateDecision::RequireLogin {
                keyword: keyword.to_string(),
                intended: path.to_string(),
                login_path: login_path_for(None, current_path).to_string(),
            };
        }
        GateDecision::Navigate {
            keyword: keyword.to_string(),
            path: path.to_string(),
        }
    }
}
