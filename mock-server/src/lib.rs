//! In-memory stand-in for the Luno API, used by the client's end-to-end tests.
//!
//! Entities are stored as raw JSON objects so custom `profile` / `details`
//! payloads round-trip untouched. Owned resources keep their owner as a user
//! id under `user`; `expand=user` swaps in the full user object on the way
//! out. Every route requires a Basic `Authorization` header.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 200;
const SESSION_TTL_DAYS: i64 = 30;

type Params = HashMap<String, String>;

#[derive(Debug, Default)]
pub struct Store {
    users: Vec<Value>,
    passwords: HashMap<String, String>,
    sessions: Vec<Value>,
    events: Vec<Value>,
    api_keys: Vec<Value>,
}

pub type Db = Arc<RwLock<Store>>;

/// Error body in the shape the real API uses.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn not_found(what: &str, id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", format!("{what} {id} not found"))
    }

    fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
    }

    fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({"code": self.code, "message": self.message});
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/login", post(login))
        .route(
            "/users/{id}",
            get(get_user)
                .patch(patch_user)
                .put(replace_user)
                .delete(deactivate_user),
        )
        .route("/users/{id}/password/validate", post(validate_password))
        .route("/users/{id}/password/change", post(change_password))
        .route("/users/{id}/events", get(list_user_events).post(create_event))
        .route(
            "/users/{id}/sessions",
            get(list_user_sessions)
                .post(create_session)
                .delete(delete_user_sessions),
        )
        .route(
            "/users/{id}/api_authentication",
            get(list_user_api_keys).post(create_api_key),
        )
        .route("/sessions/access", post(access_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/events/{id}", get(get_event))
        .route("/analytics", get(analytics_overview))
        .layer(middleware::from_fn(require_auth))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_auth(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .is_some_and(|credentials| !credentials.is_empty());
    if !authorized {
        return ApiError::unauthorized("unauthorized", "missing or malformed API credentials")
            .into_response();
    }
    next.run(request).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

fn id_of(value: &Value) -> &str {
    value["id"].as_str().unwrap_or_default()
}

fn str_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn success() -> Json<Value> {
    Json(json!({"success": true}))
}

fn wants_user(params: &Params) -> bool {
    params
        .get("expand")
        .is_some_and(|names| names.split(',').any(|n| n.trim() == "user"))
}

fn auto_name(params: &Params) -> bool {
    params.get("auto_name").is_none_or(|v| v != "false")
}

fn into_object(body: Value) -> ApiResult<Map<String, Value>> {
    match body {
        Value::Object(fields) => Ok(fields),
        Value::Null => Ok(Map::new()),
        _ => Err(ApiError::validation("request body must be a JSON object")),
    }
}

/// Parse an optional JSON object body; an empty body is an empty object.
fn optional_object(body: &Bytes) -> ApiResult<Map<String, Value>> {
    if body.is_empty() {
        return Ok(Map::new());
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::validation(format!("invalid JSON body: {e}")))?;
    into_object(value)
}

fn strip_server_fields(fields: &mut Map<String, Value>) {
    for key in ["id", "created", "closed"] {
        fields.remove(key);
    }
}

/// Fill in whichever of `name` or `first_name`/`last_name` the caller left
/// out, based on which of them the request touched.
pub fn apply_auto_name(user: &mut Map<String, Value>, touched_name: bool, touched_parts: bool) {
    if touched_parts && !touched_name {
        let joined = [str_field(user, "first_name"), str_field(user, "last_name")]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !joined.is_empty() {
            user.insert("name".to_string(), Value::String(joined));
        }
    } else if touched_name && !touched_parts {
        if let Some(name) = str_field(user, "name") {
            let mut parts = name.trim().splitn(2, ' ');
            if let Some(first) = parts.next() {
                user.insert("first_name".to_string(), Value::String(first.to_string()));
            }
            match parts.next().map(str::trim).filter(|s| !s.is_empty()) {
                Some(last) => {
                    user.insert("last_name".to_string(), Value::String(last.to_string()));
                }
                None => {
                    user.remove("last_name");
                }
            }
        }
    }
}

fn touches(fields: &Map<String, Value>) -> (bool, bool) {
    let name = fields.contains_key("name");
    let parts = fields.contains_key("first_name") || fields.contains_key("last_name");
    (name, parts)
}

/// Cut one page out of `items` (oldest first).
///
/// `from` and `to` are inclusive item ids. `page.next` is the id to pass as
/// `from` for the following page.
pub fn paginate(items: Vec<Value>, params: &Params) -> ApiResult<Value> {
    let limit = match params.get("limit") {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ApiError::validation("limit must be a non-negative integer"))?,
        None => DEFAULT_LIMIT,
    };
    if limit > MAX_LIMIT {
        return Err(ApiError::validation(format!("limit must be at most {MAX_LIMIT}")));
    }

    let position = |cursor: &str| {
        items
            .iter()
            .position(|item| id_of(item) == cursor)
            .ok_or_else(|| ApiError::validation(format!("unknown cursor {cursor}")))
    };
    let start = match params.get("from") {
        Some(from) => position(from)?,
        None => 0,
    };
    let end = match params.get("to") {
        Some(to) => position(to)? + 1,
        None => items.len(),
    };

    let window = if start < end { &items[start..end] } else { &[][..] };
    let list: Vec<Value> = window.iter().take(limit).cloned().collect();
    let next = window.get(limit).map(|item| id_of(item).to_string());

    Ok(json!({
        "list": list,
        "page": {
            "from": list.first().map(|item| id_of(item).to_string()),
            "to": list.last().map(|item| id_of(item).to_string()),
            "limit": limit,
            "next": next,
        }
    }))
}

impl Store {
    fn user(&self, id: &str) -> ApiResult<&Value> {
        self.users
            .iter()
            .find(|u| id_of(u) == id)
            .ok_or_else(|| ApiError::not_found("user", id))
    }

    fn user_mut(&mut self, id: &str) -> ApiResult<&mut Value> {
        self.users
            .iter_mut()
            .find(|u| id_of(u) == id)
            .ok_or_else(|| ApiError::not_found("user", id))
    }

    fn find_login(&self, login: &str) -> Option<&Value> {
        self.users.iter().find(|u| {
            id_of(u) == login || u["email"] == login || u["username"] == login
        })
    }

    /// Clone `item`, inlining its owner when `expand_user` is set.
    fn render(&self, item: &Value, expand_user: bool) -> Value {
        let mut item = item.clone();
        if expand_user {
            let owner = item["user"]
                .as_str()
                .and_then(|id| self.users.iter().find(|u| id_of(u) == id))
                .cloned();
            if let Some(owner) = owner {
                item["user"] = owner;
            }
        }
        item
    }

    fn render_all<'a>(&self, items: impl Iterator<Item = &'a Value>, expand_user: bool) -> Vec<Value> {
        items.map(|item| self.render(item, expand_user)).collect()
    }

    fn open_session(&mut self, user_id: &str, fields: Map<String, Value>) -> Value {
        let created = Utc::now();
        let mut session = Map::new();
        for key in ["ip", "user_agent", "details"] {
            if let Some(value) = fields.get(key).filter(|v| !v.is_null()) {
                session.insert(key.to_string(), value.clone());
            }
        }
        session.insert("id".to_string(), json!(new_id("sess")));
        session.insert("key".to_string(), json!(Uuid::new_v4().simple().to_string()));
        session.insert("created".to_string(), json!(now()));
        session.insert(
            "expires".to_string(),
            json!((created + Duration::days(SESSION_TTL_DAYS)).to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        session.insert("last_access".to_string(), json!(now()));
        session.insert("access_count".to_string(), json!(0));
        session.insert("user".to_string(), json!(user_id));

        let session = Value::Object(session);
        self.sessions.push(session.clone());
        session
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn create_user(
    State(db): State<Db>,
    Query(params): Query<Params>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut fields = into_object(body)?;
    let password = match fields.remove("password") {
        Some(Value::String(p)) => Some(p),
        Some(Value::Null) | None => None,
        Some(_) => return Err(ApiError::validation("password must be a string")),
    };
    strip_server_fields(&mut fields);
    if str_field(&fields, "email").is_none() && str_field(&fields, "username").is_none() {
        return Err(ApiError::validation("email or username is required"));
    }
    if auto_name(&params) {
        let (name, parts) = touches(&fields);
        apply_auto_name(&mut fields, name, parts);
    }

    let mut store = db.write().await;
    if let Some(email) = str_field(&fields, "email") {
        if store.users.iter().any(|u| u["email"] == email.as_str()) {
            return Err(ApiError::new(
                StatusCode::CONFLICT,
                "duplicate_email",
                format!("a user with email {email} already exists"),
            ));
        }
    }

    let id = new_id("usr");
    fields.insert("id".to_string(), json!(id));
    fields.insert("created".to_string(), json!(now()));
    if let Some(password) = password {
        store.passwords.insert(id.clone(), password);
    }
    let user = Value::Object(fields);
    store.users.push(user.clone());
    debug!(%id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users(State(db): State<Db>, Query(params): Query<Params>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    paginate(store.users.clone(), &params).map(Json)
}

async fn get_user(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.user(&id).cloned().map(Json)
}

async fn patch_user(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let mut patch = into_object(body)?;
    strip_server_fields(&mut patch);
    patch.remove("password");
    let (touched_name, touched_parts) = touches(&patch);

    let mut store = db.write().await;
    let user = store
        .user_mut(&id)?
        .as_object_mut()
        .ok_or_else(|| ApiError::validation("stored user is not an object"))?;
    for (key, value) in patch {
        if value.is_null() {
            user.remove(&key);
            continue;
        }
        if key == "profile" {
            if let (Some(Value::Object(existing)), Value::Object(incoming)) =
                (user.get_mut("profile"), &value)
            {
                existing.extend(incoming.clone());
                continue;
            }
        }
        user.insert(key, value);
    }
    if auto_name(&params) {
        apply_auto_name(user, touched_name, touched_parts);
    }
    Ok(success())
}

async fn replace_user(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let mut fields = into_object(body)?;
    strip_server_fields(&mut fields);
    fields.remove("password");
    if auto_name(&params) {
        let (name, parts) = touches(&fields);
        apply_auto_name(&mut fields, name, parts);
    }

    let mut store = db.write().await;
    let user = store.user_mut(&id)?;
    for key in ["id", "created", "closed"] {
        if let Some(value) = user.get(key).filter(|v| !v.is_null()) {
            fields.insert(key.to_string(), value.clone());
        }
    }
    *user = Value::Object(fields);
    Ok(success())
}

async fn deactivate_user(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let user = store.user_mut(&id)?;
    if user["closed"].is_null() {
        user["closed"] = json!(now());
    }
    Ok(success())
}

#[derive(Deserialize)]
struct PasswordCheck {
    password: String,
}

#[derive(Deserialize)]
struct PasswordChange {
    password: String,
    #[serde(default)]
    current_password: Option<String>,
}

async fn validate_password(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(body): Json<PasswordCheck>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.user(&id)?;
    if store.passwords.get(&id) != Some(&body.password) {
        return Err(ApiError::unauthorized("incorrect_password", "incorrect password"));
    }
    Ok(success())
}

async fn change_password(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(body): Json<PasswordChange>,
) -> ApiResult<Json<Value>> {
    if body.password.is_empty() {
        return Err(ApiError::validation("password must not be empty"));
    }
    let mut store = db.write().await;
    store.user(&id)?;
    if let Some(current) = &body.current_password {
        if store.passwords.get(&id) != Some(current) {
            return Err(ApiError::unauthorized("incorrect_password", "incorrect current password"));
        }
    }
    store.passwords.insert(id, body.password);
    Ok(success())
}

#[derive(Deserialize)]
struct LoginRequest {
    login: String,
    password: String,
}

async fn login(
    State(db): State<Db>,
    Query(params): Query<Params>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let user = store
        .find_login(&body.login)
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("incorrect_login", "incorrect login or password"))?;
    let id = id_of(&user).to_string();
    if store.passwords.get(&id) != Some(&body.password) {
        return Err(ApiError::unauthorized("incorrect_login", "incorrect login or password"));
    }
    if !user["closed"].is_null() {
        return Err(ApiError::unauthorized("user_closed", "user has been deactivated"));
    }

    let session = store.open_session(&id, Map::new());
    let session = store.render(&session, wants_user(&params));
    Ok(Json(json!({"user": user, "session": session})))
}

// ---------------------------------------------------------------------------
// Resources nested under a user
// ---------------------------------------------------------------------------

async fn create_event(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let fields = into_object(body)?;
    let name = str_field(&fields, "name").ok_or_else(|| ApiError::validation("name is required"))?;

    let mut store = db.write().await;
    store.user(&id)?;
    let mut event = json!({
        "id": new_id("evt"),
        "name": name,
        "created": now(),
        "user": id,
    });
    if let Some(details) = fields.get("details").filter(|v| !v.is_null()) {
        event["details"] = details.clone();
    }
    store.events.push(event.clone());
    Ok((StatusCode::CREATED, Json(store.render(&event, wants_user(&params)))))
}

async fn list_user_events(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.user(&id)?;
    let owned = store.events.iter().filter(|e| e["user"] == id.as_str());
    paginate(store.render_all(owned, wants_user(&params)), &params).map(Json)
}

async fn create_session(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let fields = optional_object(&body)?;
    let mut store = db.write().await;
    store.user(&id)?;
    let session = store.open_session(&id, fields);
    Ok((StatusCode::CREATED, Json(store.render(&session, wants_user(&params)))))
}

async fn list_user_sessions(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.user(&id)?;
    let owned = store.sessions.iter().filter(|s| s["user"] == id.as_str());
    paginate(store.render_all(owned, wants_user(&params)), &params).map(Json)
}

async fn delete_user_sessions(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    store.user(&id)?;
    store.sessions.retain(|s| s["user"] != id.as_str());
    Ok(success())
}

async fn create_api_key(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let fields = optional_object(&body)?;
    let mut store = db.write().await;
    store.user(&id)?;

    let mut stored = json!({
        "id": new_id("api"),
        "key": Uuid::new_v4().simple().to_string(),
        "created": now(),
        "user": id,
    });
    if let Some(details) = fields.get("details").filter(|v| !v.is_null()) {
        stored["details"] = details.clone();
    }
    store.api_keys.push(stored.clone());

    // The secret is only ever returned once.
    let mut created = store.render(&stored, wants_user(&params));
    created["secret"] = json!(Uuid::new_v4().simple().to_string());
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_user_api_keys(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.user(&id)?;
    let owned = store.api_keys.iter().filter(|k| k["user"] == id.as_str());
    paginate(store.render_all(owned, wants_user(&params)), &params).map(Json)
}

// ---------------------------------------------------------------------------
// Top-level sessions, events, analytics
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SessionAccess {
    key: String,
}

async fn access_session(
    State(db): State<Db>,
    Query(params): Query<Params>,
    Json(body): Json<SessionAccess>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let session = store
        .sessions
        .iter_mut()
        .find(|s| s["key"] == body.key.as_str())
        .ok_or_else(|| ApiError::not_found("session with key", &body.key))?;
    let count = session["access_count"].as_u64().unwrap_or(0) + 1;
    session["access_count"] = json!(count);
    session["last_access"] = json!(now());
    let session = session.clone();
    Ok(Json(store.render(&session, wants_user(&params))))
}

async fn get_session(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let session = store
        .sessions
        .iter()
        .find(|s| id_of(s) == id)
        .ok_or_else(|| ApiError::not_found("session", &id))?;
    Ok(Json(store.render(session, wants_user(&params))))
}

async fn delete_session(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let before = store.sessions.len();
    store.sessions.retain(|s| id_of(s) != id);
    if store.sessions.len() == before {
        return Err(ApiError::not_found("session", &id));
    }
    Ok(success())
}

async fn get_event(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let event = store
        .events
        .iter()
        .find(|e| id_of(e) == id)
        .ok_or_else(|| ApiError::not_found("event", &id))?;
    Ok(Json(store.render(event, wants_user(&params))))
}

async fn analytics_overview(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    Json(json!({
        "users": store.users.len(),
        "sessions": store.sessions.len(),
        "events": store.events.len(),
    }))
}
