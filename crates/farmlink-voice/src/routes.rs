//! Spoken keyword to page path mapping.
//!
//! The table is rebuilt for every command from the session role and the
//! current URL, so a user who logs in or moves between role sections never
//! sees a stale mapping.

use farmlink_types::UserType;
use std::collections::HashMap;

/// Keywords available to everyone, whatever their role.
const BASE_ROUTES: &[(&str, &str)] = &[
    ("home", "/"),
    ("faq", "/faq"),
    ("help", "/help"),
    ("support", "/support"),
];

const FARMER_ROUTES: &[(&str, &str)] = &[
    ("dashboard", "/farmer/dashboard"),
    ("products", "/farmer/products"),
    ("add product", "/farmer/products/new"),
    ("orders", "/farmer/orders"),
    ("inventory", "/farmer/inventory"),
    ("analytics", "/farmer/analytics"),
    ("earnings", "/farmer/earnings"),
    ("profile", "/farmer/profile"),
];

const HUB_ROUTES: &[(&str, &str)] = &[
    ("dashboard", "/hub/dashboard"),
    ("orders", "/hub/orders"),
    ("inventory", "/hub/inventory"),
    ("transport", "/hub/transport"),
    ("deliveries", "/hub/deliveries"),
    ("analytics", "/hub/analytics"),
    ("profile", "/hub/profile"),
];

const CUSTOMER_ROUTES: &[(&str, &str)] = &[
    ("dashboard", "/customer/dashboard"),
    ("marketplace", "/customer/marketplace"),
    ("products", "/customer/marketplace"),
    ("orders", "/customer/orders"),
    ("cart", "/customer/cart"),
    ("profile", "/customer/profile"),
];

const RESTAURANT_ROUTES: &[(&str, &str)] = &[
    ("dashboard", "/restaurant/dashboard"),
    ("marketplace", "/restaurant/marketplace"),
    ("orders", "/restaurant/orders"),
    ("inventory", "/restaurant/inventory"),
    ("suppliers", "/restaurant/suppliers"),
    ("profile", "/restaurant/profile"),
];

/// Overlay used when neither the session nor the URL names a role.
const DEFAULT_ROUTES: &[(&str, &str)] = &[
    ("login", "/login"),
    ("signup", "/signup"),
    ("register", "/signup"),
    ("about", "/about"),
    ("marketplace", "/marketplace"),
    ("dashboard", "/dashboard"),
    ("orders", "/orders"),
    ("inventory", "/inventory"),
];

/// URL slugs that imply a role besides the role labels themselves.
const PATH_ROLE_ALIASES: &[(&str, UserType)] = &[("retailer", UserType::Customer)];

/// URL substrings that imply a role, checked in order: the role labels in
/// [`UserType::KNOWN`] order, then the aliases.
fn path_role_hints() -> impl Iterator<Item = (&'static str, UserType)> {
    UserType::KNOWN
        .into_iter()
        .map(|role| (role.as_str(), role))
        .chain(PATH_ROLE_ALIASES.iter().copied())
}

/// Resolves the role whose pages the user is working in.
///
/// A known session role wins. Otherwise the first role slug contained in
/// `current_path` is used, which covers visitors browsing a role section
/// before logging in.
pub fn infer_role(user_type: Option<UserType>, current_path: &str) -> Option<UserType> {
    if let Some(user_type) = user_type.filter(|t| t.is_known()) {
        return Some(user_type);
    }
    let path = current_path.to_ascii_lowercase();
    path_role_hints()
        .find(|(hint, _)| path.contains(hint))
        .map(|(_, role)| role)
}

fn role_routes(role: Option<UserType>) -> &'static [(&'static str, &'static str)] {
    match role {
        Some(UserType::Farmer) => FARMER_ROUTES,
        Some(UserType::Hub) => HUB_ROUTES,
        Some(UserType::Customer) => CUSTOMER_ROUTES,
        Some(UserType::Restaurant) => RESTAURANT_ROUTES,
        Some(UserType::Unknown) | None => DEFAULT_ROUTES,
    }
}

/// Keyword to absolute path mapping for one voice command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    role: Option<UserType>,
    routes: HashMap<String, String>,
}

impl RouteTable {
    /// Looks up an exact keyword. A miss is `None`, never an empty path.
    pub fn resolve(&self, keyword: &str) -> Option<&str> {
        self.routes.get(keyword).map(String::as_str)
    }

    /// The role whose overlay was applied, if any.
    pub fn role(&self) -> Option<UserType> {
        self.role
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Keywords in sorted order, for help listings.
    pub fn keywords(&self) -> Vec<&str> {
        let mut keywords: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        keywords.sort_unstable();
        keywords
    }
}

/// Builds the route table for the given session role and current URL path.
pub fn build_route_table(user_type: Option<UserType>, current_path: &str) -> RouteTable {
    let role = infer_role(user_type, current_path);
    let routes = BASE_ROUTES
        .iter()
        .chain(role_routes(role))
        .map(|(keyword, path)| (keyword.to_string(), path.to_string()))
        .collect();
    RouteTable { role, routes }
}
