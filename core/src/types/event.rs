use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Expandable, User};

/// Something a user did. `details` holds the caller's custom data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event<T, TUser> {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Expandable<User<TUser>>>,
}

impl<T, TUser> Event<T, TUser> {
    pub fn to_update(&self) -> UpdateEvent<'_, T> {
        UpdateEvent {
            name: Some(self.name.as_str()),
            details: self.details.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEvent<T> {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<T>,
}

impl<T> CreateEvent<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: T) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateEvent<'a, T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a T>,
}
