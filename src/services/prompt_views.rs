// Prompt Aggregation
//
// Joins a prompt with its category name, tag names, author name, and live
// rating statistics. References have no storage-level integrity, so every
// lookup degrades instead of failing: a missing category becomes None,
// missing tags are omitted, a missing author renders as "Unknown". The reads
// are not transactional; a concurrent writer can produce a momentarily stale
// join and that is accepted.
use serde_json::json;
use sqlx::PgPool;

use crate::database::Repository;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::models::{Category, Prompt, PromptView, Rating, Tag, User};

/// Expand one prompt into its response shape. `author_name` short-circuits
/// the author lookup when the caller already knows it (owner endpoints pass
/// the authenticated user's name).
pub async fn expand_prompt(
    pool: &PgPool,
    prompt: Prompt,
    author_name: Option<String>,
) -> Result<PromptView, ApiError> {
    let categories: Repository<Category> = Repository::new("categories", pool.clone());
    let category_name = categories
        .select_one(by_id(&prompt.category_id))
        .await?
        .map(|c| c.name);

    let tag_names = if prompt.tag_ids.is_empty() {
        vec![]
    } else {
        let tags: Repository<Tag> = Repository::new("tags", pool.clone());
        tags.select_any(FilterData {
            where_clause: Some(json!({ "id": { "$in": &prompt.tag_ids } })),
            ..Default::default()
        })
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect()
    };

    let author_name = match author_name {
        Some(name) => name,
        None => {
            let users: Repository<User> = Repository::new("users", pool.clone());
            users
                .select_one(by_id(&prompt.author_id))
                .await?
                .map(|u| u.name)
                .unwrap_or_else(|| "Unknown".to_string())
        }
    };

    let ratings: Repository<Rating> = Repository::new("ratings", pool.clone());
    let prompt_ratings = ratings
        .select_any(FilterData {
            where_clause: Some(json!({ "prompti_id": &prompt.id })),
            ..Default::default()
        })
        .await?;
    let (average_rating, rating_count) = rating_stats(&prompt_ratings);

    Ok(PromptView {
        prompt,
        category_name,
        tag_names,
        author_name,
        average_rating,
        rating_count,
    })
}

pub async fn expand_prompts(
    pool: &PgPool,
    prompts: Vec<Prompt>,
    author_name: Option<&str>,
) -> Result<Vec<PromptView>, ApiError> {
    let mut views = Vec::with_capacity(prompts.len());
    for prompt in prompts {
        views.push(expand_prompt(pool, prompt, author_name.map(String::from)).await?);
    }
    Ok(views)
}

/// Mean rating rounded to one decimal place, plus count. Always derived from
/// live ratings, never stored.
pub fn rating_stats(ratings: &[Rating]) -> (f64, i64) {
    let count = ratings.len() as i64;
    if count == 0 {
        return (0.0, 0);
    }
    let sum: i64 = ratings.iter().map(|r| r.rating as i64).sum();
    let average = sum as f64 / count as f64;
    ((average * 10.0).round() / 10.0, count)
}

fn by_id(id: &str) -> FilterData {
    FilterData {
        where_clause: Some(json!({ "id": id })),
        ..Default::default()
    }
}
