//! Identifier extraction for "by id or by entity" arguments.
//!
//! Every client method that addresses an existing resource takes
//! `impl Key<R>`, where `R` is one of the resource markers below. A bare id
//! (`&str`, `String`), an already fetched entity, or an `Option` of either
//! all work; `None` and empty ids fail with `ApiError::InvalidArgument`
//! before a request is built. The marker keeps a `Session` from being passed
//! where a user id is expected.

use std::borrow::Cow;

use crate::error::{ApiError, Result};
use crate::types::{ApiAuthentication, Event, Session, User};

/// Marker for user ids.
#[derive(Debug)]
pub enum Users {}
/// Marker for session ids.
#[derive(Debug)]
pub enum Sessions {}
/// Marker for event ids.
#[derive(Debug)]
pub enum Events {}
/// Marker for API key ids.
#[derive(Debug)]
pub enum ApiAuthentications {}

/// Something that identifies a resource of kind `R`.
pub trait Key<R> {
    /// Argument name reported when the key is missing.
    const NAME: &'static str;

    fn key(&self) -> Option<&str>;

    /// The id, or `InvalidArgument` if it is absent or empty.
    fn require(&self) -> Result<&str> {
        match self.key() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ApiError::InvalidArgument { name: Self::NAME }),
        }
    }

    /// The id percent-encoded as a single path segment. `.` and `..` are
    /// rejected since URL normalisation would resolve them.
    fn segment(&self) -> Result<Cow<'_, str>> {
        match self.require()? {
            "." | ".." => Err(ApiError::InvalidArgument { name: Self::NAME }),
            id => Ok(urlencoding::encode(id)),
        }
    }
}

impl<R> Key<R> for str {
    const NAME: &'static str = "id";

    fn key(&self) -> Option<&str> {
        Some(self)
    }
}

impl<R> Key<R> for String {
    const NAME: &'static str = "id";

    fn key(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<R, K: Key<R> + ?Sized> Key<R> for &K {
    const NAME: &'static str = K::NAME;

    fn key(&self) -> Option<&str> {
        (**self).key()
    }
}

impl<R, K: Key<R>> Key<R> for Option<K> {
    const NAME: &'static str = K::NAME;

    fn key(&self) -> Option<&str> {
        self.as_ref().and_then(|k| k.key())
    }
}

impl<T> Key<Users> for User<T> {
    const NAME: &'static str = "user";

    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }
}

impl<T, U> Key<Sessions> for Session<T, U> {
    const NAME: &'static str = "session";

    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }
}

impl<T, U> Key<Events> for Event<T, U> {
    const NAME: &'static str = "event";

    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }
}

impl<T, U> Key<ApiAuthentications> for ApiAuthentication<T, U> {
    const NAME: &'static str = "api_authentication";

    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    fn user(id: &str) -> User<Value> {
        User {
            id: id.to_string(),
            ..User::default()
        }
    }

    fn user_key(key: impl Key<Users>) -> Result<String> {
        key.require().map(str::to_string)
    }

    #[test]
    fn ids_and_entities_resolve_to_the_same_key() {
        let u = user("usr_1");
        assert_eq!(user_key("usr_1").unwrap(), "usr_1");
        assert_eq!(user_key("usr_1".to_string()).unwrap(), "usr_1");
        assert_eq!(user_key(&u).unwrap(), "usr_1");
        assert_eq!(user_key(Some(&u)).unwrap(), "usr_1");
    }

    #[test]
    fn missing_entity_is_invalid_argument() {
        let err = user_key(None::<&User<Value>>).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument { name: "user" }));
    }

    #[test]
    fn empty_id_is_invalid_argument() {
        let err = user_key("").unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument { name: "id" }));
        let err = user_key(&user("")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument { name: "user" }));
    }

    fn user_segment(key: impl Key<Users>) -> Result<String> {
        key.segment().map(Cow::into_owned)
    }

    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(user_segment("usr_1").unwrap(), "usr_1");
        assert_eq!(user_segment("usr_1#").unwrap(), "usr_1%23");
        assert_eq!(user_segment("usr_1?x=1").unwrap(), "usr_1%3Fx%3D1");
        assert_eq!(user_segment("a/b").unwrap(), "a%2Fb");
    }

    #[test]
    fn dot_segments_are_invalid_argument() {
        for id in [".", ".."] {
            let err = user_segment(id).unwrap_err();
            assert!(matches!(err, ApiError::InvalidArgument { name: "id" }));
        }
    }
}
