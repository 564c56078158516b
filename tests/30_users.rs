mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn user_management_requires_admin() -> Result<()> {
    let Some(server) = common::try_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let (author_token, _) = common::register_and_login(&client, &server.base_url).await?;
    let resp = client
        .get(format!("{}/api/users", server.base_url))
        .bearer_auth(&author_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_creates_and_deletes_accounts() -> Result<()> {
    let Some(server) = common::try_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let (admin_token, _) = common::admin_login(&client, &server.base_url).await?;

    // Admin may grant the admin role
    let email = common::unique_email("second-admin");
    let resp = client
        .post(format!("{}/api/users", server.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({ "email": email, "password": "pass1234", "name": "Second", "role": "admin" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await?;
    assert_eq!(created["role"], "admin");

    // Unrecognized roles fall back to author
    let email = common::unique_email("weird-role");
    let resp = client
        .post(format!("{}/api/users", server.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({ "email": email, "password": "pass1234", "name": "W", "role": "superuser" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let weird: Value = resp.json().await?;
    assert_eq!(weird["role"], "author");

    // Deleting the created account works and reports it
    let resp = client
        .delete(format!("{}/api/users/{}", server.base_url, weird["id"].as_str().unwrap()))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "User deleted successfully");

    // A second delete of the same id is a 404
    let resp = client
        .delete(format!("{}/api/users/{}", server.base_url, weird["id"].as_str().unwrap()))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Clean up the extra admin too
    client
        .delete(format!("{}/api/users/{}", server.base_url, created["id"].as_str().unwrap()))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    Ok(())
}

#[tokio::test]
async fn admin_cannot_delete_own_account() -> Result<()> {
    let Some(server) = common::try_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let (admin_token, admin) = common::admin_login(&client, &server.base_url).await?;

    let resp = client
        .delete(format!("{}/api/users/{}", server.base_url, admin["id"].as_str().unwrap()))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "Cannot delete your own account");
    Ok(())
}

#[tokio::test]
async fn deleted_users_lose_access_immediately() -> Result<()> {
    let Some(server) = common::try_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let (admin_token, _) = common::admin_login(&client, &server.base_url).await?;
    let (author_token, author) = common::register_and_login(&client, &server.base_url).await?;

    let resp = client
        .delete(format!("{}/api/users/{}", server.base_url, author["id"].as_str().unwrap()))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // The still-valid token no longer authenticates
    let resp = client
        .get(format!("{}/api/auth/me", server.base_url))
        .bearer_auth(&author_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
