mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn superadmin_login_checks_credentials() -> Result<()> {
    let server = common::TestServer::start().await?;

    let (status, body) = server
        .post(
            "/superadmin/login",
            None,
            json!({ "email": common::SUPERADMIN_EMAIL, "password": "not the password" }),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = server
        .post(
            "/superadmin/login",
            None,
            json!({ "email": "someone@else.example", "password": common::SUPERADMIN_PASSWORD }),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Emails are matched case-insensitively.
    let (status, body) = server
        .post(
            "/superadmin/login",
            None,
            json!({ "email": "OPS@Example.com", "password": common::SUPERADMIN_PASSWORD }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());
    Ok(())
}

#[tokio::test]
async fn tenant_management_requires_a_superadmin_token() -> Result<()> {
    let server = common::TestServer::start().await?;
    let (_, _, tenant_token) = server.onboard("Quiet Meadow", "quiet@meadow.example").await?;

    let (status, _) = server.get("/superadmin/api/tenants", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = server.get("/superadmin/api/tenants", Some(&tenant_token)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn superadmin_lists_tenants_with_status() -> Result<()> {
    let server = common::TestServer::start().await?;
    let (fresh, _) = server.signup("Fresh Start", "fresh@start.example").await?;
    let (stale, _) = server.signup("Stale Trial", "stale@trial.example").await?;
    server.expire_trial(&stale).await?;
    let operator = server.superadmin_token().await?;

    let (status, body) = server.get("/superadmin/api/tenants", Some(&operator)).await?;
    assert_eq!(status, StatusCode::OK);

    let tenants = body["data"]["tenants"].as_array().cloned().unwrap_or_default();
    assert_eq!(tenants.len(), 2);
    let find = |slug: &str| tenants.iter().find(|t| t["slug"] == slug).cloned().unwrap_or_default();

    assert_eq!(find(fresh.as_str())["trialExpired"], false);
    assert_eq!(find(fresh.as_str())["hasAdminKey"], true);
    assert_eq!(find(stale.as_str())["trialExpired"], true);
    assert_eq!(find(stale.as_str())["daysRemaining"], 0);
    Ok(())
}

#[tokio::test]
async fn superadmin_creates_updates_and_deletes_tenants() -> Result<()> {
    let server = common::TestServer::start().await?;
    let operator = server.superadmin_token().await?;

    let (status, body) = server
        .post(
            "/superadmin/api/tenants",
            Some(&operator),
            json!({
                "funeralHomeName": "Harbor Light",
                "email": "harbor@light.example",
                "slug": "harbor",
                "adminKey": "harbor-admin-key-2026"
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["tenant"]["slug"], "harbor");
    assert_eq!(body["data"]["adminKey"], "harbor-admin-key-2026");

    // The chosen key works for the tenant admin.
    let token = server.admin_token("harbor", "harbor-admin-key-2026").await?;

    // Taken explicit slugs are a conflict, not a suffix.
    let (status, _) = server
        .post(
            "/superadmin/api/tenants",
            Some(&operator),
            json!({ "funeralHomeName": "Other", "email": "o@other.example", "slug": "harbor" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    // Reserved slugs are refused.
    let (status, _) = server
        .post(
            "/superadmin/api/tenants",
            Some(&operator),
            json!({ "funeralHomeName": "Other", "email": "o@other.example", "slug": "superadmin" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .send_json(
            Method::PUT,
            "/superadmin/api/tenant/harbor",
            Some(&operator),
            json!({ "funeralHomeName": "Harbor Light Chapel", "features": { "pdf": false } }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["funeralHomeName"], "Harbor Light Chapel");
    assert_eq!(body["data"]["slug"], "harbor");

    let (status, body) = server.get("/superadmin/api/tenants/harbor", Some(&operator)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["features"]["pdf"], false);

    // Leave a record behind to check it goes with the tenant.
    let (status, _) = server
        .post("/api/harbor/admin/appointments", Some(&token), json!({ "clientName": "Someone" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = server
        .send_json(Method::DELETE, "/superadmin/api/tenants/harbor", Some(&operator), json!({}))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(!server.dir.path().join("data").join("tenants").join("harbor").exists());

    let (status, _) = server.get("/api/tenant/harbor", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .post("/api/admin/login", None, json!({ "tenant": "harbor", "key": "harbor-admin-key-2026" }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .send_json(Method::DELETE, "/superadmin/api/tenants/harbor", Some(&operator), json!({}))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn superadmin_create_rejects_weak_keys_and_unknown_fields() -> Result<()> {
    let server = common::TestServer::start().await?;
    let operator = server.superadmin_token().await?;

    let (status, body) = server
        .post(
            "/superadmin/api/tenants",
            Some(&operator),
            json!({ "funeralHomeName": "Short Key", "email": "s@k.example", "adminKey": "abc" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = server
        .post(
            "/superadmin/api/tenants",
            Some(&operator),
            json!({ "funeralHomeName": "Extra", "email": "e@x.example", "plan": "gold" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = server.get("/superadmin/api/tenants", Some(&operator)).await?;
    assert_eq!(body["data"]["tenants"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn old_sessions_die_with_a_deleted_tenant() -> Result<()> {
    let server = common::TestServer::start().await?;
    let operator = server.superadmin_token().await?;
    let (slug, key) = server.signup("Willow Bend", "first@willow.example").await?;
    let (_, login) = server
        .post("/api/admin/login", None, json!({ "tenant": slug, "key": key }))
        .await?;
    let old_token = login["data"]["token"].as_str().unwrap_or_default().to_string();
    let old_refresh = login["data"]["refreshToken"].as_str().unwrap_or_default().to_string();

    let (status, _) = server
        .send_json(Method::DELETE, &format!("/superadmin/api/tenants/{slug}"), Some(&operator), json!({}))
        .await?;
    assert_eq!(status, StatusCode::OK);

    // Someone else signs up under the same name and inherits the slug.
    let (reused, new_key) = server.signup("Willow Bend", "second@willow.example").await?;
    assert_eq!(reused, slug);

    let (status, _) = server.get(&format!("/api/{slug}/admin/appointments"), Some(&old_token)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = server
        .post("/api/auth/refresh", None, json!({ "refreshToken": old_refresh }))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = server.admin_token(&slug, &new_key).await?;
    let (status, _) = server.get(&format!("/api/{slug}/admin/appointments"), Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
