/// Integration tests for the install wizard API
///
/// Drives the router end-to-end over an in-memory store:
/// - Install-mode gate
/// - Install record lifecycle
/// - Default roles, organization and admin creation
/// - Error mapping (400, 403, 404, 409, 422)

mod common;

use axum::http::StatusCode;
use common::TestContext;
use learnhouse_shared::models::role::RoleType;
use learnhouse_shared::store::InstallStore;
use serde_json::json;

fn acme_org() -> serde_json::Value {
    json!({
        "name": "Acme",
        "slug": "acme",
        "email": "hello@acme.test"
    })
}

fn admin_user() -> serde_json::Value {
    json!({
        "username": "admin",
        "email": "admin@acme.test",
        "password": "secret"
    })
}

#[tokio::test]
async fn test_health_reports_install_mode() {
    let ctx = TestContext::new();

    let (status, body) = ctx.json("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["install_mode"], true);
}

#[tokio::test]
async fn test_install_routes_forbidden_when_provisioned() {
    let ctx = TestContext::provisioned();

    let requests = [
        ("POST", "/api/v1/install/start", Some(json!({}))),
        ("GET", "/api/v1/install/latest", None),
        ("POST", "/api/v1/install/update?step=2", Some(json!({}))),
        ("POST", "/api/v1/install/default_elements", None),
        ("POST", "/api/v1/install/org", Some(acme_org())),
        ("POST", "/api/v1/install/user?org_slug=acme", Some(admin_user())),
    ];

    for (method, uri, body) in requests {
        let (status, response) = ctx.json(method, uri, body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
        assert_eq!(response["error"], "forbidden");
        assert_eq!(response["message"], "Install mode is not enabled");
    }

    // Gate runs before any handler touches the store
    assert!(ctx.store.latest_install().await.unwrap().is_none());
}

#[tokio::test]
async fn test_health_is_not_gated() {
    let ctx = TestContext::provisioned();

    let (status, body) = ctx.json("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["install_mode"], false);
}

#[tokio::test]
async fn test_latest_before_start_is_not_found() {
    let ctx = TestContext::new();

    let (status, body) = ctx.json("GET", "/api/v1/install/latest", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No install instance found");

    let (status, _) = ctx
        .json("POST", "/api/v1/install/update?step=2", Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_install_record_lifecycle() {
    let ctx = TestContext::new();

    let (status, created) = ctx
        .json("POST", "/api/v1/install/start", Some(json!({"lang": "en"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["step"], 1);
    assert!(created["install_uuid"].as_str().unwrap().starts_with("install_"));

    for step in [2, 5, 1] {
        let (status, updated) = ctx
            .json(
                "POST",
                &format!("/api/v1/install/update?step={}", step),
                Some(json!({"step_seen": step})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["step"], step);
    }

    let (status, latest) = ctx.json("GET", "/api/v1/install/latest", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["id"], created["id"]);
    assert_eq!(latest["step"], 1);
    assert_eq!(latest["data"], json!({"step_seen": 1}));
}

#[tokio::test]
async fn test_update_requires_step() {
    let ctx = TestContext::new();
    ctx.json("POST", "/api/v1/install/start", Some(json!({}))).await;

    let (status, body) = ctx
        .json("POST", "/api/v1/install/update", Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_default_elements_twice() {
    let ctx = TestContext::new();

    for _ in 0..2 {
        let (status, body) = ctx
            .json("POST", "/api/v1/install/default_elements", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(true));
    }

    let roles = ctx.store.list_roles_by_type(RoleType::Global).await.unwrap();
    let ids: Vec<i64> = roles.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_invalid_organization_is_unprocessable() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .json(
            "POST",
            "/api/v1/install/org",
            Some(json!({"name": "Acme", "slug": "acme", "email": "nope"})),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_organization_slug_characters_accepted() {
    let ctx = TestContext::new();

    for slug in ["my_org", "Acme", "acme.edu"] {
        let (status, body) = ctx
            .json(
                "POST",
                "/api/v1/install/org",
                Some(json!({"name": "Acme", "slug": slug, "email": "hello@acme.test"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "slug {}", slug);
        assert_eq!(body["slug"], slug);
    }
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .json("POST", "/api/v1/install/org", Some(json!({"name": "Acme"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_user_for_unknown_org_conflicts() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .json("POST", "/api/v1/install/user?org_slug=acme", Some(admin_user()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Organization does not exist");
}

#[tokio::test]
async fn test_full_wizard() {
    let ctx = TestContext::new();

    let (status, _) = ctx.json("POST", "/api/v1/install/start", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx.json("POST", "/api/v1/install/default_elements", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, org) = ctx.json("POST", "/api/v1/install/org", Some(acme_org())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(org["org_uuid"].as_str().unwrap().starts_with("org_"));

    let (status, user) = ctx
        .json("POST", "/api/v1/install/user?org_slug=acme", Some(admin_user()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "admin");
    assert_eq!(user["email_verified"], false);
    assert!(user.get("password").is_none());

    let user_id = user["id"].as_i64().unwrap();
    let memberships = ctx.store.list_user_organizations(user_id).await.unwrap();
    assert_eq!(memberships.len(), 1);
    assert_eq!(memberships[0].org_id, org["id"].as_i64().unwrap());
    assert_eq!(memberships[0].role_id, 1);

    // Same admin again
    let (status, body) = ctx
        .json("POST", "/api/v1/install/user?org_slug=acme", Some(admin_user()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already exists");

    // Same slug again
    let (status, body) = ctx.json("POST", "/api/v1/install/org", Some(acme_org())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Organization slug already exists");
}
