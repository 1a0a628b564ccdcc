//! Top-level `/sessions` endpoints.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::connection::Connection;
use crate::error::Result;
use crate::http::Query;
use crate::key::{Key, Sessions, Users};
use crate::params::{expand_query, ListOptions, UpdateOptions};
use crate::types::{CreateSession, PaginationResponse, Session, SuccessResponse};

#[derive(Serialize)]
struct NewSession<'a, T> {
    user_id: &'a str,
    #[serde(flatten)]
    session: &'a CreateSession<T>,
}

#[derive(Serialize)]
struct SessionAccess<'a> {
    key: &'a str,
}

#[derive(Debug, Clone)]
pub struct SessionsClient {
    connection: Connection,
}

impl SessionsClient {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Open a session for `user`.
    pub async fn create<TSession, TUser>(
        &self,
        user: impl Key<Users>,
        session: &CreateSession<TSession>,
        expand: &[&str],
    ) -> Result<Session<TSession, TUser>>
    where
        TSession: Serialize + DeserializeOwned,
        TUser: DeserializeOwned,
    {
        let body = NewSession {
            user_id: user.require()?,
            session,
        };
        self.connection
            .post("/sessions", Some(&body), expand_query(expand))
            .await
    }

    pub async fn get<TSession, TUser>(
        &self,
        session: impl Key<Sessions>,
        expand: &[&str],
    ) -> Result<Session<TSession, TUser>>
    where
        TSession: DeserializeOwned,
        TUser: DeserializeOwned,
    {
        let path = session_path(&session)?;
        self.connection.get(&path, expand_query(expand)).await
    }

    pub async fn list<TSession, TUser>(
        &self,
        options: &ListOptions,
    ) -> Result<PaginationResponse<Session<TSession, TUser>>>
    where
        TSession: DeserializeOwned,
        TUser: DeserializeOwned,
    {
        self.connection.get("/sessions", options.to_query()).await
    }

    /// Send the mutable fields of `changes`. `auto_name` is ignored here.
    pub async fn update<TSession: Serialize, TUser>(
        &self,
        session: impl Key<Sessions>,
        changes: &Session<TSession, TUser>,
        options: UpdateOptions,
    ) -> Result<SuccessResponse> {
        let path = session_path(&session)?;
        let body = changes.to_update();
        if options.destructive {
            self.connection.put(&path, &body, Query::new()).await
        } else {
            self.connection.patch(&path, &body, Query::new()).await
        }
    }

    pub async fn delete(&self, session: impl Key<Sessions>) -> Result<SuccessResponse> {
        let path = session_path(&session)?;
        self.connection.delete(&path, Query::new()).await
    }

    /// Resolve a session by the key handed to the end user, recording an
    /// access on the server.
    pub async fn validate<TSession, TUser>(
        &self,
        key: &str,
        expand: &[&str],
    ) -> Result<Session<TSession, TUser>>
    where
        TSession: DeserializeOwned,
        TUser: DeserializeOwned,
    {
        let key = Key::<Sessions>::require(key)?;
        self.connection
            .post("/sessions/access", Some(&SessionAccess { key }), expand_query(expand))
            .await
    }
}

fn session_path(session: &impl Key<Sessions>) -> Result<String> {
    Ok(format!("/sessions/{}", session.segment()?))
}
