//! Optional-parameter bundles and their query-string encoding.
//!
//! Only parameters the caller supplied are encoded. The two exceptions are
//! `limit`, which list calls always send (defaulting to 100), and
//! `auto_name`, which user create/update calls always send as the literal
//! `"true"` or `"false"`.

use chrono::NaiveDate;

use crate::http::Query;

/// Page size used when the caller does not pick one. The server documents
/// a 0 to 200 range; it is not enforced locally.
pub const DEFAULT_LIMIT: u32 = 100;

/// Cursor pagination and expansion for list calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: u32,
    pub expand: Vec<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            limit: DEFAULT_LIMIT,
            expand: Vec::new(),
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the page at this item id.
    #[must_use]
    pub fn from(mut self, id: impl Into<String>) -> Self {
        self.from = Some(id.into());
        self
    }

    /// Stop the page at this item id.
    #[must_use]
    pub fn to(mut self, id: impl Into<String>) -> Self {
        self.to = Some(id.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn expand<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expand = names.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.insert("limit".to_string(), self.limit.to_string());
        if let Some(from) = &self.from {
            query.insert("from".to_string(), from.clone());
        }
        if let Some(to) = &self.to {
            query.insert("to".to_string(), to.clone());
        }
        insert_expand(&mut query, &self.expand);
        query
    }
}

/// Options for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    /// Derive `name` from `first_name`/`last_name` (or the reverse) server-side.
    pub auto_name: bool,
    pub expand: Vec<String>,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            auto_name: true,
            expand: Vec::new(),
        }
    }
}

impl CreateOptions {
    #[must_use]
    pub fn auto_name(mut self, auto_name: bool) -> Self {
        self.auto_name = auto_name;
        self
    }

    #[must_use]
    pub fn expand<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expand = names.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.insert("auto_name".to_string(), self.auto_name.to_string());
        insert_expand(&mut query, &self.expand);
        query
    }
}

/// Options for updating an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Only sent for users.
    pub auto_name: bool,
    /// Replace the whole entity (PUT) instead of merging (PATCH).
    pub destructive: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            auto_name: true,
            destructive: false,
        }
    }
}

impl UpdateOptions {
    pub fn merge() -> Self {
        Self::default()
    }

    pub fn replace() -> Self {
        Self {
            destructive: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn auto_name(mut self, auto_name: bool) -> Self {
        self.auto_name = auto_name;
        self
    }
}

/// Inclusive date window for analytics queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AnalyticsRange {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub(crate) fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(from) = self.from {
            query.insert("from".to_string(), from.format("%Y-%m-%d").to_string());
        }
        if let Some(to) = self.to {
            query.insert("to".to_string(), to.format("%Y-%m-%d").to_string());
        }
        query
    }
}

/// Query carrying only `expand`, when any names were given.
pub(crate) fn expand_query<S: AsRef<str>>(expand: &[S]) -> Query {
    let mut query = Query::new();
    insert_expand(&mut query, expand);
    query
}

pub(crate) fn insert_expand<S: AsRef<str>>(query: &mut Query, expand: &[S]) {
    if expand.is_empty() {
        return;
    }
    let joined = expand.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
    query.insert("expand".to_string(), joined);
}
