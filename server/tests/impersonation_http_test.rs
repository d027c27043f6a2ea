//! HTTP integration tests for Super-Admin impersonation.
//!
//! Run with: `cargo test --test impersonation_http_test`

mod helpers;

use axum::http::{Method, StatusCode};
use helpers::{body_to_json, TestApp};
use kader_server::auth::jwt::ActAs;
use serde_json::json;
use uuid::Uuid;

async fn start(app: &TestApp, token: &str, role: &str, club_id: Option<Uuid>) -> serde_json::Value {
    let resp = app
        .send(
            Method::POST,
            "/api/auth/impersonation",
            Some(token),
            Some(json!({ "role": role, "club_id": club_id })),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_to_json(resp).await
}

#[tokio::test]
async fn test_impersonation_round_trip() {
    let app = TestApp::new();
    let admin = app.add_user("Super-Admin", None);
    let admin_token = app.token_for(admin.user_id);
    let club = Uuid::new_v4();

    let issued = start(&app, &admin_token, "Player", Some(club)).await;
    assert_eq!(issued["role"], "Player");
    assert_eq!(issued["token_type"], "Bearer");
    let act_token = issued["access_token"].as_str().unwrap().to_string();

    let ctx = body_to_json(app.send(Method::GET, "/api/me/context", Some(&act_token), None).await)
        .await;
    assert_eq!(ctx["role"], "Player");
    assert_eq!(ctx["club_id"], club.to_string());
    assert_eq!(ctx["impersonating"], true);
    assert_eq!(ctx["impersonator"]["role"], "Super-Admin");
    assert_eq!(ctx["user_id"], admin.user_id.to_string());

    // The impersonated role governs checks
    let resp = app
        .send(Method::GET, "/api/admin/permissions", Some(&act_token), None)
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let nav = body_to_json(app.send(Method::GET, "/api/navigation", Some(&act_token), None).await)
        .await;
    assert!(nav
        .as_array()
        .unwrap()
        .iter()
        .all(|e| e["module"] != "Roles & Rights" && e["module"] != "Finances"));

    let ended = app
        .send(Method::DELETE, "/api/auth/impersonation", Some(&act_token), None)
        .await;
    assert_eq!(ended.status(), StatusCode::OK);
    let ended = body_to_json(ended).await;
    assert_eq!(ended["role"], "Super-Admin");

    let plain_token = ended["access_token"].as_str().unwrap();
    let ctx = body_to_json(app.send(Method::GET, "/api/me/context", Some(plain_token), None).await)
        .await;
    assert_eq!(ctx["role"], "Super-Admin");
    assert_eq!(ctx["impersonating"], false);

    let audit = app.audit.entries().await;
    let actions: Vec<&str> = audit.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(
        actions,
        vec!["auth.impersonation.started", "auth.impersonation.ended"]
    );
    assert!(audit.iter().all(|e| e.actor_id == Some(admin.user_id)));
    assert_eq!(audit[0].target_id.as_deref(), Some("Player"));
}

#[tokio::test]
async fn test_only_super_admin_may_impersonate() {
    let app = TestApp::new();
    let club_admin = app.add_user("Club-Admin", Some(Uuid::new_v4()));
    let token = app.token_for(club_admin.user_id);

    let resp = app
        .send(
            Method::POST,
            "/api/auth/impersonation",
            Some(&token),
            Some(json!({ "role": "Player" })),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_to_json(resp).await["error"], "ACCESS_DENIED");
    assert!(app.audit.entries().await.is_empty());
}

#[tokio::test]
async fn test_impersonation_target_is_validated() {
    let app = TestApp::new();
    let admin = app.add_user("Super-Admin", None);
    let token = app.token_for(admin.user_id);

    for role in ["Super-Admin", "Wizard", ""] {
        let resp = app
            .send(
                Method::POST,
                "/api/auth/impersonation",
                Some(&token),
                Some(json!({ "role": role })),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{role}");
    }
}

#[tokio::test]
async fn test_impersonation_cannot_be_nested() {
    let app = TestApp::new();
    let admin = app.add_user("Super-Admin", None);
    let issued = start(&app, &app.token_for(admin.user_id), "Coach", None).await;
    let act_token = issued["access_token"].as_str().unwrap();

    let resp = app
        .send(
            Method::POST,
            "/api/auth/impersonation",
            Some(act_token),
            Some(json!({ "role": "Fan" })),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_ending_without_impersonation_is_rejected() {
    let app = TestApp::new();
    let admin = app.add_user("Super-Admin", None);

    let resp = app
        .send(
            Method::DELETE,
            "/api/auth/impersonation",
            Some(&app.token_for(admin.user_id)),
            None,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_forged_act_claim_is_denied() {
    let app = TestApp::new();
    let coach = app.add_user("Coach", Some(Uuid::new_v4()));

    // Validly signed, but the subject is not a Super-Admin
    let token = app.act_as_token(
        coach.user_id,
        ActAs {
            role: "Club-Admin".into(),
            club_id: None,
            original_sub: coach.user_id.to_string(),
        },
    );

    let resp = app.send(Method::GET, "/api/me/context", Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_mismatched_original_subject_is_denied() {
    let app = TestApp::new();
    let admin = app.add_user("Super-Admin", None);

    let token = app.act_as_token(
        admin.user_id,
        ActAs {
            role: "Player".into(),
            club_id: None,
            original_sub: Uuid::new_v4().to_string(),
        },
    );

    let resp = app.send(Method::GET, "/api/me/context", Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_demotion_ends_impersonation() {
    let app = TestApp::new();
    let admin = app.add_user("Super-Admin", None);
    let issued = start(&app, &app.token_for(admin.user_id), "Player", None).await;
    let act_token = issued["access_token"].as_str().unwrap();

    let resp = app.send(Method::GET, "/api/me/context", Some(act_token), None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert!(app.identities.set_role(admin.user_id, "Coach"));

    let resp = app.send(Method::GET, "/api/me/context", Some(act_token), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
