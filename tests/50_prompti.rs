mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create_category(
    client: &reqwest::Client,
    base_url: &str,
    admin_token: &str,
    name: &str,
) -> Result<Value> {
    let resp = client
        .post(format!("{}/api/categories", base_url))
        .bearer_auth(admin_token)
        .json(&json!({ "name": name }))
        .send()
        .await?;
    anyhow::ensure!(resp.status() == StatusCode::CREATED);
    Ok(resp.json().await?)
}

async fn create_prompt(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    payload: Value,
) -> Result<Value> {
    let resp = client
        .post(format!("{}/api/prompti", base_url))
        .bearer_auth(token)
        .json(&payload)
        .send()
        .await?;
    anyhow::ensure!(resp.status() == StatusCode::CREATED, "create prompt: {}", resp.status());
    Ok(resp.json().await?)
}

#[tokio::test]
async fn owner_crud_is_scoped_by_author() -> Result<()> {
    let Some(server) = common::try_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let (admin_token, _) = common::admin_login(&client, &server.base_url).await?;
    let (owner_token, owner) = common::register_and_login(&client, &server.base_url).await?;
    let (other_token, _) = common::register_and_login(&client, &server.base_url).await?;

    let category = create_category(&client, &server.base_url, &admin_token, "Owner CRUD").await?;
    let prompt = create_prompt(
        &client,
        &server.base_url,
        &owner_token,
        json!({
            "title": "Draft prompt",
            "body": "Say something useful",
            "category_id": category["id"],
            "published": false
        }),
    )
    .await?;
    assert_eq!(prompt["author_name"], owner["name"]);
    assert_eq!(prompt["category_name"], category["name"]);
    assert_eq!(prompt["average_rating"], 0.0);
    assert_eq!(prompt["rating_count"], 0);

    let id = prompt["id"].as_str().unwrap();

    // Owner sees it in the list and by id
    let resp = client
        .get(format!("{}/api/prompti", server.base_url))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    let mine: Vec<Value> = resp.json().await?;
    assert!(mine.iter().any(|p| p["id"] == prompt["id"]));

    // Someone else's prompt is a 404, not a 403
    let resp = client
        .get(format!("{}/api/prompti/{}", server.base_url, id))
        .bearer_auth(&other_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = client
        .delete(format!("{}/api/prompti/{}", server.base_url, id))
        .bearer_auth(&other_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Partial update touches only the provided fields
    let resp = client
        .put(format!("{}/api/prompti/{}", server.base_url, id))
        .bearer_auth(&owner_token)
        .json(&json!({ "title": "Renamed prompt" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await?;
    assert_eq!(updated["title"], "Renamed prompt");
    assert_eq!(updated["body"], "Say something useful");

    let resp = client
        .delete(format!("{}/api/prompti/{}", server.base_url, id))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "Prompti deleted successfully");
    Ok(())
}

#[tokio::test]
async fn public_surface_shows_published_prompts_only() -> Result<()> {
    let Some(server) = common::try_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let (admin_token, _) = common::admin_login(&client, &server.base_url).await?;
    let (owner_token, _) = common::register_and_login(&client, &server.base_url).await?;

    let category = create_category(&client, &server.base_url, &admin_token, "Public list").await?;
    let marker = uuid::Uuid::new_v4().to_string();

    let draft = create_prompt(
        &client,
        &server.base_url,
        &owner_token,
        json!({
            "title": format!("Draft {}", marker),
            "body": "hidden",
            "category_id": category["id"],
            "published": false
        }),
    )
    .await?;
    let published = create_prompt(
        &client,
        &server.base_url,
        &owner_token,
        json!({
            "title": format!("GUIDE {}", marker),
            "body": "visible",
            "category_id": category["id"],
            "published": true
        }),
    )
    .await?;

    // Search is case-insensitive over title and body, published only
    let resp = client
        .get(format!("{}/api/public/prompti", server.base_url))
        .query(&[("search", marker.as_str())])
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let found: Vec<Value> = resp.json().await?;
    assert!(found.iter().any(|p| p["id"] == published["id"]));
    assert!(!found.iter().any(|p| p["id"] == draft["id"]));

    let resp = client
        .get(format!("{}/api/public/prompti", server.base_url))
        .query(&[("search", "guide"), ("category_id", category["id"].as_str().unwrap())])
        .send()
        .await?;
    let found: Vec<Value> = resp.json().await?;
    assert!(found.iter().any(|p| p["id"] == published["id"]));

    // Unpublished prompts are invisible by id as well
    let resp = client
        .get(format!(
            "{}/api/public/prompti/{}",
            server.base_url,
            draft["id"].as_str().unwrap()
        ))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn ratings_aggregate_over_live_data() -> Result<()> {
    let Some(server) = common::try_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let (admin_token, _) = common::admin_login(&client, &server.base_url).await?;
    let (owner_token, _) = common::register_and_login(&client, &server.base_url).await?;

    let category = create_category(&client, &server.base_url, &admin_token, "Ratings").await?;
    let prompt = create_prompt(
        &client,
        &server.base_url,
        &owner_token,
        json!({
            "title": "Rate me",
            "body": "please",
            "category_id": category["id"],
            "published": true
        }),
    )
    .await?;
    let id = prompt["id"].as_str().unwrap();

    // Out-of-range scores are rejected before anything is stored
    for bad in [0, 6] {
        let resp = client
            .post(format!("{}/api/public/prompti/{}/rate", server.base_url, id))
            .json(&json!({ "rating": bad }))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    for score in [3, 4, 5] {
        let resp = client
            .post(format!("{}/api/public/prompti/{}/rate", server.base_url, id))
            .json(&json!({ "rating": score, "feedback": "ok" }))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = client
        .get(format!("{}/api/public/prompti/{}", server.base_url, id))
        .send()
        .await?;
    let view: Value = resp.json().await?;
    assert_eq!(view["average_rating"], 4.0);
    assert_eq!(view["rating_count"], 3);

    let resp = client
        .get(format!("{}/api/public/prompti/{}/ratings", server.base_url, id))
        .send()
        .await?;
    let ratings: Vec<Value> = resp.json().await?;
    assert_eq!(ratings.len(), 3);

    // Rating an unpublished prompt is a 404
    let draft = create_prompt(
        &client,
        &server.base_url,
        &owner_token,
        json!({
            "title": "Unrated draft",
            "body": "no",
            "category_id": category["id"],
            "published": false
        }),
    )
    .await?;
    let resp = client
        .post(format!(
            "{}/api/public/prompti/{}/rate",
            server.base_url,
            draft["id"].as_str().unwrap()
        ))
        .json(&json!({ "rating": 5 }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleting_a_category_degrades_reads_instead_of_failing() -> Result<()> {
    let Some(server) = common::try_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let (admin_token, _) = common::admin_login(&client, &server.base_url).await?;
    let (owner_token, _) = common::register_and_login(&client, &server.base_url).await?;

    let category = create_category(&client, &server.base_url, &admin_token, "Doomed").await?;
    let prompt = create_prompt(
        &client,
        &server.base_url,
        &owner_token,
        json!({
            "title": "Orphan-to-be",
            "body": "still readable",
            "category_id": category["id"],
            "published": true
        }),
    )
    .await?;
    assert_eq!(prompt["category_name"], "Doomed");

    let resp = client
        .delete(format!(
            "{}/api/categories/{}",
            server.base_url,
            category["id"].as_str().unwrap()
        ))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // The prompt still reads fine; the dangling reference resolves to null
    let resp = client
        .get(format!(
            "{}/api/public/prompti/{}",
            server.base_url,
            prompt["id"].as_str().unwrap()
        ))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let view: Value = resp.json().await?;
    assert!(view["category_name"].is_null());
    Ok(())
}
