use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account. `profile` holds the caller's custom data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User<T> {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Set once the user has been deactivated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<T>,
}

impl<T> Default for User<T> {
    fn default() -> Self {
        Self {
            id: String::new(),
            created: None,
            closed: None,
            email: None,
            username: None,
            name: None,
            first_name: None,
            last_name: None,
            profile: None,
        }
    }
}

impl<T> User<T> {
    pub fn is_closed(&self) -> bool {
        self.closed.is_some()
    }

    /// The mutable subset of this user, ready to send as an update.
    pub fn to_update(&self) -> UpdateUser<'_, T> {
        UpdateUser {
            email: self.email.as_deref(),
            username: self.username.as_deref(),
            name: self.name.as_deref(),
            first_name: self.first_name.as_deref(),
            last_name: self.last_name.as_deref(),
            profile: self.profile.as_ref(),
        }
    }
}

/// Payload for creating a user. The server assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUser<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<T>,
}

impl<T> Default for CreateUser<T> {
    fn default() -> Self {
        Self {
            email: None,
            username: None,
            name: None,
            first_name: None,
            last_name: None,
            password: None,
            profile: None,
        }
    }
}

/// Mutable user fields, borrowed from a full `User`.
#[derive(Debug, Serialize)]
pub struct UpdateUser<'a, T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<&'a T>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Profile {
        plan: String,
        seats: u32,
    }

    #[test]
    fn create_payload_survives_server_echo() {
        let create = CreateUser {
            email: Some("alice@example.com".to_string()),
            first_name: Some("Alice".to_string()),
            last_name: Some("Liddell".to_string()),
            profile: Some(Profile {
                plan: "pro".to_string(),
                seats: 3,
            }),
            ..CreateUser::default()
        };
        let mut echoed = serde_json::to_value(&create).unwrap();
        echoed["id"] = json!("usr_1");
        echoed["created"] = json!("2017-06-01T10:00:00Z");

        let user: User<Profile> = serde_json::from_value(echoed).unwrap();
        assert_eq!(user.id, "usr_1");
        assert_eq!(user.email, create.email);
        assert_eq!(user.first_name, create.first_name);
        assert_eq!(user.last_name, create.last_name);
        assert_eq!(user.profile, create.profile);
        assert!(user.created.is_some());
        assert!(!user.is_closed());
    }

    #[test]
    fn create_payload_omits_unset_fields() {
        let create: CreateUser<Profile> = CreateUser {
            username: Some("alice".to_string()),
            ..CreateUser::default()
        };
        assert_eq!(serde_json::to_value(&create).unwrap(), json!({"username": "alice"}));
    }

    #[test]
    fn update_excludes_server_fields() {
        let user: User<Profile> = serde_json::from_value(json!({
            "id": "usr_1",
            "created": "2017-06-01T10:00:00Z",
            "closed": "2017-07-01T10:00:00Z",
            "email": "alice@example.com",
            "profile": {"plan": "free", "seats": 1}
        }))
        .unwrap();
        let body = serde_json::to_value(user.to_update()).unwrap();
        assert_eq!(
            body,
            json!({"email": "alice@example.com", "profile": {"plan": "free", "seats": 1}})
        );
    }
}
