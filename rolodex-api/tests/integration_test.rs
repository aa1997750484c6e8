/// Integration tests for the Rolodex API
///
/// These tests verify the HTTP surface end-to-end:
/// - Registration, login, and refresh-token rotation
/// - Owner-scoped contact CRUD with 404 semantics
/// - Pagination and search
/// - Authentication enforcement on the /contacts routes
///
/// They require a running PostgreSQL (DATABASE_URL) and skip otherwise.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Datelike;
use common::{authed_get, body_json, contact_payload, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_contacts_require_authentication() {
    let Some(ctx) = TestContext::new().await.unwrap() else { return };

    let response = ctx
        .send(
            Request::builder()
                .method("GET")
                .uri("/contacts/")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage token is also rejected before any handler runs
    let response = ctx.send(authed_get("/contacts/", "not-a-jwt")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A non-Bearer scheme is a credential failure, not a bad request
    let response = ctx
        .send(
            Request::builder()
                .method("GET")
                .uri("/contacts/")
                .header("authorization", "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_and_duplicate_email() {
    let Some(ctx) = TestContext::new().await.unwrap() else { return };

    let email = format!("dup-{}@example.com", common::unique_tag());
    let register = |password: &str| {
        Request::builder()
            .method("POST")
            .uri("/auth/register")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"email": email.as_str(), "password": password}).to_string(),
            ))
            .unwrap()
    };

    let response = ctx.send(register("first_pass_1")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Second registration with the same email hits the schema constraint
    let response = ctx.send(register("second_pass_2")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Login with the right password succeeds
    let response = ctx
        .send(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"email": email, "password": "first_pass_1"}).to_string(),
                ))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["access_token"].is_string());

    // Wrong password is a 401 with the same generic message
    let response = ctx
        .send(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"email": email, "password": "wrong_pass_3"}).to_string(),
                ))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_rotation() {
    let Some(ctx) = TestContext::new().await.unwrap() else { return };

    let (_, refresh_token, _) = ctx.register_user().await;

    // Claims carry second-granularity timestamps; wait so the rotated token
    // cannot collide with the original
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let refresh = |token: &str| {
        Request::builder()
            .method("POST")
            .uri("/auth/refresh")
            .header("content-type", "application/json")
            .body(Body::from(json!({"refresh_token": token}).to_string()))
            .unwrap()
    };

    let response = ctx.send(refresh(&refresh_token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let new_refresh = body["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(new_refresh, refresh_token);

    // The old token was rotated out and can no longer be used
    let response = ctx.send(refresh(&refresh_token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let Some(ctx) = TestContext::new().await.unwrap() else { return };

    let (token, _, user_id) = ctx.register_user().await;
    let created = ctx
        .create_contact(&token, contact_payload("Roundtrip", "1990-06-15"))
        .await;

    assert_eq!(created["owner_id"].as_i64().unwrap(), user_id);
    let id = created["id"].as_i64().unwrap();

    let response = ctx.send(authed_get(&format!("/contacts/{}", id), &token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let fetched = body_json(response).await;
    assert_eq!(fetched["first_name"], "Roundtrip");
    assert_eq!(fetched["email"], "roundtrip@example.com");
    assert_eq!(fetched["birthday"], "1990-06-15");
}

#[tokio::test]
async fn test_update_then_get_reflects_new_payload() {
    let Some(ctx) = TestContext::new().await.unwrap() else { return };

    let (token, _, _) = ctx.register_user().await;
    let created = ctx
        .create_contact(&token, contact_payload("Before", "1985-03-03"))
        .await;
    let id = created["id"].as_i64().unwrap();

    let mut updated_payload = contact_payload("After", "1985-03-03");
    updated_payload["notes"] = json!("renamed");

    let response = ctx
        .send(
            Request::builder()
                .method("PUT")
                .uri(format!("/contacts/{}", id))
                .header("authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(updated_payload.to_string()))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx.send(authed_get(&format!("/contacts/{}", id), &token)).await;
    let fetched = body_json(response).await;
    assert_eq!(fetched["first_name"], "After");
    assert_eq!(fetched["notes"], "renamed");
}

#[tokio::test]
async fn test_delete_returns_prior_state_then_404() {
    let Some(ctx) = TestContext::new().await.unwrap() else { return };

    let (token, _, _) = ctx.register_user().await;
    let created = ctx
        .create_contact(&token, contact_payload("Doomed", "1970-01-01"))
        .await;
    let id = created["id"].as_i64().unwrap();

    let response = ctx
        .send(
            Request::builder()
                .method("DELETE")
                .uri(format!("/contacts/{}", id))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = body_json(response).await;
    assert_eq!(deleted["first_name"], "Doomed");

    // Gone now
    let response = ctx.send(authed_get(&format!("/contacts/{}", id), &token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Contact not found");
}

#[tokio::test]
async fn test_missing_id_yields_fixed_404_body() {
    let Some(ctx) = TestContext::new().await.unwrap() else { return };

    let (token, _, _) = ctx.register_user().await;

    let response = ctx
        .send(authed_get(&format!("/contacts/{}", i64::MAX), &token))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Contact not found");
}

#[tokio::test]
async fn test_foreign_contact_is_invisible() {
    let Some(ctx) = TestContext::new().await.unwrap() else { return };

    let (alice_token, _, _) = ctx.register_user().await;
    let (bob_token, _, _) = ctx.register_user().await;

    let created = ctx
        .create_contact(&alice_token, contact_payload("Private", "1992-09-09"))
        .await;
    let id = created["id"].as_i64().unwrap();

    // Bob's get, update, and delete all see a 404, indistinguishable from a
    // missing id
    let response = ctx
        .send(authed_get(&format!("/contacts/{}", id), &bob_token))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .send(
            Request::builder()
                .method("DELETE")
                .uri(format!("/contacts/{}", id))
                .header("authorization", format!("Bearer {}", bob_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Bob's list never includes Alice's contact
    let response = ctx.send(authed_get("/contacts/", &bob_token)).await;
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 0);

    // Alice still owns it
    let response = ctx
        .send(authed_get(&format!("/contacts/{}", id), &alice_token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_pagination_over_http() {
    let Some(ctx) = TestContext::new().await.unwrap() else { return };

    let (token, _, _) = ctx.register_user().await;
    for name in ["PageOne", "PageTwo", "PageThree"] {
        ctx.create_contact(&token, contact_payload(name, "1991-01-01"))
            .await;
    }

    let response = ctx.send(authed_get("/contacts/?limit=1", &token)).await;
    let page = body_json(response).await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["first_name"], "PageOne");

    let response = ctx
        .send(authed_get("/contacts/?offset=1&limit=1", &token))
        .await;
    let page = body_json(response).await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["first_name"], "PageTwo");
}

#[tokio::test]
async fn test_search_over_http() {
    let Some(ctx) = TestContext::new().await.unwrap() else { return };

    let (token, _, _) = ctx.register_user().await;
    ctx.create_contact(&token, contact_payload("Findme", "1988-08-08"))
        .await;
    ctx.create_contact(&token, contact_payload("Other", "1988-08-08"))
        .await;

    let response = ctx
        .send(authed_get("/contacts/search?query=findm", &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let results = body_json(response).await;
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(results[0]["first_name"], "Findme");

    let response = ctx
        .send(authed_get("/contacts/search?query=nomatch", &token))
        .await;
    let results = body_json(response).await;
    assert_eq!(results.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_birthday_endpoint_returns_list() {
    let Some(ctx) = TestContext::new().await.unwrap() else { return };

    let (token, _, _) = ctx.register_user().await;
    // A birthday far from any 7-day window
    let today = chrono::Utc::now().date_naive();
    let far = today
        .checked_add_signed(chrono::Duration::days(120))
        .unwrap();
    ctx.create_contact(
        &token,
        contact_payload("Faraway", &format!("1980-{:02}-{:02}", far.month(), far.day())),
    )
    .await;

    let response = ctx.send(authed_get("/contacts/birthday", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let results = body_json(response).await;
    assert_eq!(results.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_invalid_contact_payload_rejected() {
    let Some(ctx) = TestContext::new().await.unwrap() else { return };

    let (token, _, _) = ctx.register_user().await;

    let response = ctx
        .send(
            Request::builder()
                .method("POST")
                .uri("/contacts/")
                .header("authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "first_name": "",
                        "last_name": "X",
                        "email": "not-an-email",
                        "phone": "123",
                        "birthday": "1990-01-01"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["errors"].is_array());
}

#[tokio::test]
async fn test_health_endpoint() {
    let Some(ctx) = TestContext::new().await.unwrap() else { return };

    let response = ctx
        .send(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
