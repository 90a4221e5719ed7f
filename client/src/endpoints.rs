//! Endpoint registry mapping category/action pairs onto API paths.
//!
//! The registry is the single source of truth for request URLs: every
//! service call resolves its path here, including the export and
//! availability-check endpoints that the original console addressed with
//! literal strings. Lookup of an unregistered pair is a caller bug and
//! fails loudly with [`EndpointError::NotRegistered`] rather than silently
//! producing an empty path.

use url::Url;

/// Endpoint category, the first half of a registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// User account and user management endpoints.
    User,
    /// Token lifecycle and credential recovery endpoints.
    Auth,
    /// Dashboard statistics endpoints.
    Dashboard,
    /// System administration endpoints.
    System,
}

impl Category {
    /// Canonical lowercase name used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Auth => "auth",
            Self::Dashboard => "dashboard",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action name constants, grouped per category.
///
/// Services address the registry through these constants so a typo shows up
/// in one place instead of at every call site.
pub mod actions {
    /// Actions under [`super::Category::User`].
    pub mod user {
        pub const LOGIN: &str = "login";
        pub const LOGOUT: &str = "logout";
        pub const REGISTER: &str = "register";
        pub const PROFILE: &str = "profile";
        pub const UPDATE_PROFILE: &str = "update-profile";
        pub const CHANGE_PASSWORD: &str = "change-password";
        pub const LIST: &str = "list";
        pub const CREATE: &str = "create";
        pub const UPDATE: &str = "update";
        pub const DELETE: &str = "delete";
        pub const TOGGLE_STATUS: &str = "toggle-status";
        pub const EXPORT: &str = "export";
        pub const CHECK_USERNAME: &str = "check-username";
        pub const CHECK_EMAIL: &str = "check-email";
    }

    /// Actions under [`super::Category::Auth`].
    pub mod auth {
        pub const REFRESH_TOKEN: &str = "refresh-token";
        pub const VERIFY_TOKEN: &str = "verify-token";
        pub const RESET_PASSWORD: &str = "reset-password";
        pub const SEND_CODE: &str = "send-code";
    }

    /// Actions under [`super::Category::Dashboard`].
    pub mod dashboard {
        pub const STATS: &str = "stats";
        pub const CHARTS: &str = "charts";
        pub const ACTIVITIES: &str = "activities";
    }

    /// Actions under [`super::Category::System`].
    pub mod system {
        pub const CONFIG: &str = "config";
        pub const LOGS: &str = "logs";
        pub const HEALTH: &str = "health";
    }
}

/// Failures surfaced while resolving endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    /// The category/action pair has no registered path.
    #[error("endpoint not registered: {category}.{action}")]
    NotRegistered {
        /// Category half of the rejected key.
        category: Category,
        /// Action half of the rejected key.
        action: String,
    },
    /// The configured base URL could not be parsed.
    #[error("invalid base URL: {message}")]
    InvalidBaseUrl {
        /// Parser diagnostic.
        message: String,
    },
    /// Joining base URL and path produced an invalid URL.
    #[error("endpoint URL could not be built: {message}")]
    InvalidUrl {
        /// Parser diagnostic.
        message: String,
    },
}

/// Registered path for one category/action pair, if any.
#[must_use]
pub fn registered_path(category: Category, action: &str) -> Option<&'static str> {
    use actions::{auth, dashboard, system, user};
    match category {
        Category::User => match action {
            user::LOGIN => Some("/user/login"),
            user::LOGOUT => Some("/user/logout"),
            user::REGISTER => Some("/user/register"),
            // PROFILE (fetch) and UPDATE_PROFILE (mutate) share one path and
            // differ by HTTP method.
            user::PROFILE | user::UPDATE_PROFILE => Some("/user/profile"),
            user::CHANGE_PASSWORD => Some("/user/change-password"),
            user::LIST => Some("/user/list"),
            user::CREATE => Some("/user/create"),
            user::UPDATE => Some("/user/update"),
            user::DELETE => Some("/user/delete"),
            user::TOGGLE_STATUS => Some("/user/toggle-status"),
            user::EXPORT => Some("/user/export"),
            user::CHECK_USERNAME => Some("/user/check-username"),
            user::CHECK_EMAIL => Some("/user/check-email"),
            _ => None,
        },
        Category::Auth => match action {
            auth::REFRESH_TOKEN => Some("/auth/refresh"),
            auth::VERIFY_TOKEN => Some("/auth/verify"),
            auth::RESET_PASSWORD => Some("/auth/reset-password"),
            auth::SEND_CODE => Some("/auth/send-code"),
            _ => None,
        },
        Category::Dashboard => match action {
            dashboard::STATS => Some("/dashboard/stats"),
            dashboard::CHARTS => Some("/dashboard/charts"),
            dashboard::ACTIVITIES => Some("/dashboard/activities"),
            _ => None,
        },
        Category::System => match action {
            system::CONFIG => Some("/system/config"),
            system::LOGS => Some("/system/logs"),
            system::HEALTH => Some("/system/health"),
            _ => None,
        },
    }
}

/// Registry bound to one base URL. Pure, no I/O.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Bind the registry to a base URL.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::InvalidBaseUrl`] when the base URL does not
    /// parse.
    pub fn new(base_url: &str) -> Result<Self, EndpointError> {
        let base = Url::parse(base_url).map_err(|error| EndpointError::InvalidBaseUrl {
            message: error.to_string(),
        })?;
        Ok(Self { base })
    }

    /// The bound base URL.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Full URL for a registered category/action pair.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::NotRegistered`] for an unknown pair.
    pub fn url(&self, category: Category, action: &str) -> Result<Url, EndpointError> {
        self.build(category, action, None)
    }

    /// Full URL with a path suffix appended, for `/user/update/{id}`-style
    /// endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::NotRegistered`] for an unknown pair.
    pub fn url_with_suffix(
        &self,
        category: Category,
        action: &str,
        suffix: &str,
    ) -> Result<Url, EndpointError> {
        self.build(category, action, Some(suffix))
    }

    fn build(
        &self,
        category: Category,
        action: &str,
        suffix: Option<&str>,
    ) -> Result<Url, EndpointError> {
        let path =
            registered_path(category, action).ok_or_else(|| EndpointError::NotRegistered {
                category,
                action: action.to_owned(),
            })?;
        // Plain concatenation, not Url::join, so a base URL carrying a path
        // prefix (e.g. "https://host/api") keeps that prefix.
        let mut raw = format!("{}{path}", self.base.as_str().trim_end_matches('/'));
        if let Some(suffix) = suffix {
            raw.push('/');
            raw.push_str(suffix);
        }
        Url::parse(&raw).map_err(|error| EndpointError::InvalidUrl {
            message: error.to_string(),
        })
    }
}
