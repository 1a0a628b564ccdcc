//! Users and everything nested under `/users/{id}`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::connection::Connection;
use crate::error::Result;
use crate::http::Query;
use crate::key::{Key, Users};
use crate::params::{expand_query, CreateOptions, ListOptions, UpdateOptions};
use crate::types::{
    ApiAuthentication, CreateApiAuthentication, CreateEvent, CreateSession, CreateUser, Event,
    LoginResponse, PaginationResponse, Session, SuccessResponse, User,
};

#[derive(Serialize)]
struct PasswordCheck<'a> {
    password: &'a str,
}

#[derive(Serialize)]
struct PasswordChange<'a> {
    password: &'a str,
    current_password: Option<&'a str>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    login: &'a str,
    password: &'a str,
}

/// Client for `/users`.
///
/// Methods that address an existing user take `impl Key<Users>`: a user id,
/// a fetched `User<T>`, or an `Option` of either.
#[derive(Debug, Clone)]
pub struct UsersClient {
    connection: Connection,
}

impl UsersClient {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Create a user.
    pub async fn create<T>(&self, user: &CreateUser<T>, options: &CreateOptions) -> Result<User<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        self.connection
            .post("/users", Some(user), options.to_query())
            .await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        user: impl Key<Users>,
        expand: &[&str],
    ) -> Result<User<T>> {
        let path = user_path(&user, "")?;
        self.connection.get(&path, expand_query(expand)).await
    }

    /// List recently created users, one page at a time.
    pub async fn list<T: DeserializeOwned>(
        &self,
        options: &ListOptions,
    ) -> Result<PaginationResponse<User<T>>> {
        self.connection.get("/users", options.to_query()).await
    }

    /// Send the mutable fields of `changes` to the user identified by `user`.
    ///
    /// `options.destructive` replaces the stored user (PUT); otherwise the
    /// fields are merged into it (PATCH).
    pub async fn update<T: Serialize>(
        &self,
        user: impl Key<Users>,
        changes: &User<T>,
        options: UpdateOptions,
    ) -> Result<SuccessResponse> {
        let path = user_path(&user, "")?;
        let body = changes.to_update();
        let mut query = Query::new();
        query.insert("auto_name".to_string(), options.auto_name.to_string());

        if options.destructive {
            self.connection.put(&path, &body, query).await
        } else {
            self.connection.patch(&path, &body, query).await
        }
    }

    /// Update a fetched user in place, addressed by its own id.
    pub async fn save<T: Serialize>(
        &self,
        user: &User<T>,
        options: UpdateOptions,
    ) -> Result<SuccessResponse> {
        self.update(user, user, options).await
    }

    /// Deactivate a user, setting its `closed` timestamp.
    pub async fn deactivate(&self, user: impl Key<Users>) -> Result<SuccessResponse> {
        let path = user_path(&user, "")?;
        self.connection.delete(&path, Query::new()).await
    }

    /// Check a password without logging the user in.
    pub async fn validate_password(
        &self,
        user: impl Key<Users>,
        password: &str,
    ) -> Result<SuccessResponse> {
        let path = user_path(&user, "/password/validate")?;
        self.connection
            .post(&path, Some(&PasswordCheck { password }), Query::new())
            .await
    }

    /// Set a new password without proving knowledge of the current one.
    pub async fn change_password(
        &self,
        user: impl Key<Users>,
        new_password: &str,
    ) -> Result<SuccessResponse> {
        self.send_password_change(&user, new_password, None).await
    }

    /// Set a new password, letting the server verify `current_password` first.
    pub async fn change_password_with_current(
        &self,
        user: impl Key<Users>,
        new_password: &str,
        current_password: &str,
    ) -> Result<SuccessResponse> {
        self.send_password_change(&user, new_password, Some(current_password))
            .await
    }

    async fn send_password_change(
        &self,
        user: &impl Key<Users>,
        password: &str,
        current_password: Option<&str>,
    ) -> Result<SuccessResponse> {
        let path = user_path(user, "/password/change")?;
        let body = PasswordChange {
            password,
            current_password,
        };
        self.connection.post(&path, Some(&body), Query::new()).await
    }

    /// Record an event for this user.
    pub async fn create_event<TEvent, TUser>(
        &self,
        user: impl Key<Users>,
        event: &CreateEvent<TEvent>,
        expand: &[&str],
    ) -> Result<Event<TEvent, TUser>>
    where
        TEvent: Serialize + DeserializeOwned,
        TUser: DeserializeOwned,
    {
        let path = user_path(&user, "/events")?;
        self.connection
            .post(&path, Some(event), expand_query(expand))
            .await
    }

    /// List events recently recorded for this user.
    pub async fn list_events<TEvent, TUser>(
        &self,
        user: impl Key<Users>,
        options: &ListOptions,
    ) -> Result<PaginationResponse<Event<TEvent, TUser>>>
    where
        TEvent: DeserializeOwned,
        TUser: DeserializeOwned,
    {
        let path = user_path(&user, "/events")?;
        self.connection.get(&path, options.to_query()).await
    }

    /// Log a user in by id, email or username.
    pub async fn login<TUser, TSession>(
        &self,
        login: &str,
        password: &str,
        expand: &[&str],
    ) -> Result<LoginResponse<TUser, TSession>>
    where
        TUser: DeserializeOwned,
        TSession: DeserializeOwned,
    {
        let body = Credentials { login, password };
        self.connection
            .post("/users/login", Some(&body), expand_query(expand))
            .await
    }

    /// Open a session for this user. A `None` payload sends no body.
    pub async fn create_session<TSession, TUser>(
        &self,
        user: impl Key<Users>,
        session: Option<&CreateSession<TSession>>,
        expand: &[&str],
    ) -> Result<Session<TSession, TUser>>
    where
        TSession: Serialize + DeserializeOwned,
        TUser: DeserializeOwned,
    {
        let path = user_path(&user, "/sessions")?;
        self.connection.post(&path, session, expand_query(expand)).await
    }

    pub async fn list_sessions<TSession, TUser>(
        &self,
        user: impl Key<Users>,
        options: &ListOptions,
    ) -> Result<PaginationResponse<Session<TSession, TUser>>>
    where
        TSession: DeserializeOwned,
        TUser: DeserializeOwned,
    {
        let path = user_path(&user, "/sessions")?;
        self.connection.get(&path, options.to_query()).await
    }

    /// Permanently delete every session this user owns.
    pub async fn delete_sessions(&self, user: impl Key<Users>) -> Result<SuccessResponse> {
        let path = user_path(&user, "/sessions")?;
        self.connection.delete(&path, Query::new()).await
    }

    /// Issue a new API key pair for this user.
    pub async fn create_api_authentication<TApi, TUser>(
        &self,
        user: impl Key<Users>,
        api_authentication: Option<&CreateApiAuthentication<TApi>>,
        expand: &[&str],
    ) -> Result<ApiAuthentication<TApi, TUser>>
    where
        TApi: Serialize + DeserializeOwned,
        TUser: DeserializeOwned,
    {
        let path = user_path(&user, "/api_authentication")?;
        self.connection
            .post(&path, api_authentication, expand_query(expand))
            .await
    }

    pub async fn list_api_authentications<TApi, TUser>(
        &self,
        user: impl Key<Users>,
        options: &ListOptions,
    ) -> Result<PaginationResponse<ApiAuthentication<TApi, TUser>>>
    where
        TApi: DeserializeOwned,
        TUser: DeserializeOwned,
    {
        let path = user_path(&user, "/api_authentication")?;
        self.connection.get(&path, options.to_query()).await
    }
}

fn user_path(user: &impl Key<Users>, suffix: &str) -> Result<String> {
    Ok(format!("/users/{}{suffix}", user.segment()?))
}
