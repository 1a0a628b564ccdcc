use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Expandable, User};

/// An API key pair issued to a user. `secret` is only present in the
/// response that created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiAuthentication<T, TUser> {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_access: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Expandable<User<TUser>>>,
}

impl<T, TUser> ApiAuthentication<T, TUser> {
    pub fn to_update(&self) -> UpdateApiAuthentication<'_, T> {
        UpdateApiAuthentication {
            details: self.details.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateApiAuthentication<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<T>,
}

impl<T> Default for CreateApiAuthentication<T> {
    fn default() -> Self {
        Self { details: None }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateApiAuthentication<'a, T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a T>,
}
