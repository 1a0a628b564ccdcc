use axum::http::{self, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{json, Value};
use tower::ServiceExt;

// base64("key:secret")
const AUTH: &str = "Basic a2V5OnNlY3JldA==";

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

async fn send(app: &Router, request: Request<String>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn create_user(app: &Router, body: Value) -> Value {
    let resp = send(app, json_request("POST", "/users", body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- auth ---

#[tokio::test]
async fn missing_credentials_return_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/users").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn bearer_credentials_are_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/users")
                .header(http::header::AUTHORIZATION, "Bearer token")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- users ---

#[tokio::test]
async fn list_users_empty() {
    let resp = app().oneshot(request("GET", "/users")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["list"], json!([]));
    assert_eq!(body["page"]["limit"], 100);
}

#[tokio::test]
async fn create_user_derives_names_and_hides_password() {
    let app = app();
    let user = create_user(
        &app,
        json!({"email": "alice@example.com", "name": "Alice Liddell", "password": "hunter2"}),
    )
    .await;

    assert!(user["id"].as_str().unwrap().starts_with("usr_"));
    assert!(user["created"].is_string());
    assert_eq!(user["first_name"], "Alice");
    assert_eq!(user["last_name"], "Liddell");
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn create_user_without_auto_name_keeps_fields_as_sent() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/users?auto_name=false",
            json!({"username": "alice", "name": "Alice Liddell"}),
        ))
        .await
        .unwrap();

    let user = body_json(resp).await;
    assert_eq!(user["name"], "Alice Liddell");
    assert!(user.get("first_name").is_none());
}

#[tokio::test]
async fn create_user_requires_email_or_username() {
    let resp = app()
        .oneshot(json_request("POST", "/users", json!({"name": "Nobody"})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["code"], "validation_error");
}

#[tokio::test]
async fn duplicate_email_returns_409() {
    let app = app();
    create_user(&app, json!({"email": "alice@example.com"})).await;
    let resp = send(&app, json_request("POST", "/users", json!({"email": "alice@example.com"}))).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn get_user_not_found() {
    let resp = app().oneshot(request("GET", "/users/usr_missing")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["code"], "not_found");
}

#[tokio::test]
async fn list_users_paginates() {
    let app = app();
    let mut ids = Vec::new();
    for n in 0..3 {
        let user = create_user(&app, json!({"username": format!("user{n}")})).await;
        ids.push(user["id"].as_str().unwrap().to_string());
    }

    let body = body_json(send(&app, request("GET", "/users?limit=2")).await).await;
    assert_eq!(body["list"].as_array().unwrap().len(), 2);
    assert_eq!(body["page"]["next"], ids[2].as_str());

    let uri = format!("/users?from={}&limit=2", ids[2]);
    let body = body_json(send(&app, request("GET", &uri)).await).await;
    assert_eq!(body["list"][0]["id"], ids[2].as_str());
    assert!(body["page"]["next"].is_null());

    let resp = send(&app, request("GET", "/users?limit=500")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_merges_profile_and_put_replaces() {
    let app = app();
    let user = create_user(
        &app,
        json!({"email": "a@example.com", "profile": {"plan": "free", "seats": 1}}),
    )
    .await;
    let uri = format!("/users/{}", user["id"].as_str().unwrap());

    let resp = send(
        &app,
        json_request("PATCH", &uri, json!({"profile": {"plan": "pro"}, "first_name": "Ann"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"success": true}));

    let patched = body_json(send(&app, request("GET", &uri)).await).await;
    assert_eq!(patched["profile"], json!({"plan": "pro", "seats": 1}));
    assert_eq!(patched["name"], "Ann");
    assert_eq!(patched["email"], "a@example.com");

    send(&app, json_request("PUT", &uri, json!({"username": "ann"}))).await;
    let replaced = body_json(send(&app, request("GET", &uri)).await).await;
    assert_eq!(replaced["id"], user["id"]);
    assert_eq!(replaced["created"], user["created"]);
    assert_eq!(replaced["username"], "ann");
    assert!(replaced.get("email").is_none());
    assert!(replaced.get("profile").is_none());
}

#[tokio::test]
async fn delete_marks_user_closed() {
    let app = app();
    let user = create_user(&app, json!({"username": "bob"})).await;
    let uri = format!("/users/{}", user["id"].as_str().unwrap());

    let resp = send(&app, request("DELETE", &uri)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let closed = body_json(send(&app, request("GET", &uri)).await).await;
    assert!(closed["closed"].is_string());
}

// --- passwords and login ---

#[tokio::test]
async fn password_validate_and_change() {
    let app = app();
    let user = create_user(&app, json!({"username": "carol", "password": "old"})).await;
    let id = user["id"].as_str().unwrap();
    let validate = format!("/users/{id}/password/validate");
    let change = format!("/users/{id}/password/change");

    let resp = send(&app, json_request("POST", &validate, json!({"password": "old"}))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send(&app, json_request("POST", &validate, json!({"password": "nope"}))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = send(
        &app,
        json_request("POST", &change, json!({"password": "new", "current_password": "wrong"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = send(
        &app,
        json_request("POST", &change, json!({"password": "new", "current_password": null})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send(&app, json_request("POST", &validate, json!({"password": "new"}))).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_opens_a_session() {
    let app = app();
    let user = create_user(
        &app,
        json!({"email": "dave@example.com", "username": "dave", "password": "pw"}),
    )
    .await;

    let resp = send(
        &app,
        json_request("POST", "/users/login?expand=user", json!({"login": "dave", "password": "pw"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["user"]["id"], user["id"]);
    assert_eq!(body["session"]["user"]["email"], "dave@example.com");
    assert_eq!(body["session"]["access_count"], 0);

    let resp = send(
        &app,
        json_request("POST", "/users/login", json!({"login": "dave@example.com", "password": "bad"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- nested resources ---

#[tokio::test]
async fn events_are_created_and_listed_per_user() {
    let app = app();
    let user = create_user(&app, json!({"username": "erin"})).await;
    let id = user["id"].as_str().unwrap();
    let uri = format!("/users/{id}/events");

    let resp = send(
        &app,
        json_request("POST", &uri, json!({"name": "signed_up", "details": {"via": "web"}})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let event = body_json(resp).await;
    assert_eq!(event["user"], id);

    let resp = send(&app, json_request("POST", &uri, json!({"details": {}}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let listed = body_json(send(&app, request("GET", &uri)).await).await;
    assert_eq!(listed["list"].as_array().unwrap().len(), 1);

    let event_uri = format!("/events/{}?expand=user", event["id"].as_str().unwrap());
    let fetched = body_json(send(&app, request("GET", &event_uri)).await).await;
    assert_eq!(fetched["user"]["username"], "erin");
}

#[tokio::test]
async fn events_for_unknown_user_return_404() {
    let resp = app()
        .oneshot(json_request("POST", "/users/usr_missing/events", json!({"name": "x"})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn session_lifecycle() {
    let app = app();
    let user = create_user(&app, json!({"username": "frank"})).await;
    let uri = format!("/users/{}/sessions", user["id"].as_str().unwrap());

    // no body at all
    let resp = send(&app, request("POST", &uri)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let session = body_json(resp).await;

    let resp = send(&app, json_request("POST", "/sessions/access", json!({"key": session["key"]}))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["access_count"], 1);

    let session_uri = format!("/sessions/{}", session["id"].as_str().unwrap());
    let resp = send(&app, request("GET", &session_uri)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    send(&app, request("DELETE", &uri)).await;
    let resp = send(&app, request("GET", &session_uri)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_key_secret_is_only_returned_on_create() {
    let app = app();
    let user = create_user(&app, json!({"username": "grace"})).await;
    let uri = format!("/users/{}/api_authentication", user["id"].as_str().unwrap());

    let resp = send(&app, json_request("POST", &uri, json!({"details": {"label": "ci"}}))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert!(created["secret"].is_string());

    let listed = body_json(send(&app, request("GET", &uri)).await).await;
    assert_eq!(listed["list"][0]["id"], created["id"]);
    assert!(listed["list"][0].get("secret").is_none());
}

#[tokio::test]
async fn analytics_counts_everything() {
    let app = app();
    let user = create_user(&app, json!({"username": "heidi"})).await;
    let id = user["id"].as_str().unwrap();
    send(&app, json_request("POST", &format!("/users/{id}/events"), json!({"name": "a"}))).await;
    send(&app, request("POST", &format!("/users/{id}/sessions"))).await;

    let body = body_json(send(&app, request("GET", "/analytics")).await).await;
    assert_eq!(body, json!({"users": 1, "sessions": 1, "events": 1}));
}
