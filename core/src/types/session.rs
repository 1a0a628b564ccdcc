use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Expandable, User};

/// A login session owned by a user. `details` holds the caller's custom data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session<T, TUser> {
    pub id: String,
    /// Opaque session key handed to the end user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_access: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Expandable<User<TUser>>>,
}

impl<T, TUser> Session<T, TUser> {
    pub fn to_update(&self) -> UpdateSession<'_, T> {
        UpdateSession {
            ip: self.ip.as_deref(),
            user_agent: self.user_agent.as_deref(),
            details: self.details.as_ref(),
        }
    }
}

/// Payload for opening a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSession<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<T>,
}

impl<T> Default for CreateSession<T> {
    fn default() -> Self {
        Self {
            ip: None,
            user_agent: None,
            details: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateSession<'a, T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a T>,
}
