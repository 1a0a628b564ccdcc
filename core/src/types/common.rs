use serde::{Deserialize, Serialize};

use super::{Session, User};

/// Acknowledgement returned by actions that do not echo an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Cursor bounds of a page. `next` is the cursor to pass as `from` to fetch
/// the following page; it is absent on the last page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// One page of a cursor-paginated listing, in server order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationResponse<T> {
    pub list: Vec<T>,
    #[serde(default)]
    pub page: Page,
}

impl<T> PaginationResponse<T> {
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Cursor for the following page, if the server reported one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.page.next.as_deref()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.list.iter()
    }
}

impl<T> IntoIterator for PaginationResponse<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

/// A related resource that is either referenced by id or inlined in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    Id(String),
    Expanded(Box<T>),
}

impl<T> Expandable<T> {
    /// The inlined resource, when the request expanded it.
    pub fn expanded(&self) -> Option<&T> {
        match self {
            Expandable::Id(_) => None,
            Expandable::Expanded(inner) => Some(inner),
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self, Expandable::Expanded(_))
    }
}

impl<T> Expandable<User<T>> {
    pub fn id(&self) -> &str {
        match self {
            Expandable::Id(id) => id,
            Expandable::Expanded(user) => &user.id,
        }
    }
}

/// Result of a successful login: the user and the session just opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse<TUser, TSession> {
    pub user: User<TUser>,
    pub session: Session<TSession, TUser>,
}
