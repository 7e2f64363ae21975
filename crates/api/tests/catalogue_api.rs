//! HTTP-level integration tests for `GET /user/medias`.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn seed(pool: &PgPool, token: &str) {
    for (title, category, rating) in [
        ("The Godfather", "movie", json!(10)),
        ("Cowboy Bebop", "anime", json!(9)),
        ("Planet Earth", "documentary", Value::Null),
        ("Alien", "movie", json!(7)),
        ("Breaking Bad", "tv show", json!(10)),
    ] {
        common::create_media(
            pool,
            token,
            json!({ "title": title, "category": category, "status": "completed", "rating": rating }),
        )
        .await;
    }
}

async fn list(pool: &PgPool, token: &str, query: &str) -> Vec<Value> {
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/user/medias{query}"),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "query: {query}");
    body_json(response).await["data"].as_array().unwrap().clone()
}

fn titles(media: &[Value]) -> Vec<&str> {
    media.iter().map(|m| m["title"].as_str().unwrap()).collect()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_default_list_in_insertion_order(pool: PgPool) {
    let token = common::register_and_login(&pool, "ana@example.com").await;
    seed(&pool, &token).await;

    let media = list(&pool, &token, "").await;
    assert_eq!(
        titles(&media),
        vec!["The Godfather", "Cowboy Bebop", "Planet Earth", "Alien", "Breaking Bad"]
    );

    // Blank parameters behave like absent ones.
    let media = list(&pool, &token, "?search=&category=&orderby=").await;
    assert_eq!(media.len(), 5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_category_filter(pool: PgPool) {
    let token = common::register_and_login(&pool, "ana@example.com").await;
    seed(&pool, &token).await;

    let media = list(&pool, &token, "?category=movie").await;
    assert_eq!(titles(&media), vec!["The Godfather", "Alien"]);
    assert!(media.iter().all(|m| m["category"] == "movie"));

    let media = list(&pool, &token, "?category=tv%20shows").await;
    assert_eq!(titles(&media), vec!["Breaking Bad"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_search_is_case_insensitive_substring(pool: PgPool) {
    let token = common::register_and_login(&pool, "ana@example.com").await;
    seed(&pool, &token).await;

    let media = list(&pool, &token, "?search=EA").await;
    assert_eq!(titles(&media), vec!["Planet Earth", "Breaking Bad"]);

    let media = list(&pool, &token, "?search=a&category=movie&orderby=a-z").await;
    assert_eq!(titles(&media), vec!["Alien", "The Godfather"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_rating_highest_is_non_increasing(pool: PgPool) {
    let token = common::register_and_login(&pool, "ana@example.com").await;
    seed(&pool, &token).await;

    let media = list(&pool, &token, "?orderby=rating_highest").await;
    let ratings: Vec<Option<i64>> = media.iter().map(|m| m["rating"].as_i64()).collect();
    assert_eq!(ratings, vec![Some(10), Some(10), Some(9), Some(7), None]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_filters_are_400(pool: PgPool) {
    let token = common::register_and_login(&pool, "ana@example.com").await;

    for query in ["?orderby=popularity", "?category=podcast"] {
        let response = get_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/user/medias{query}"),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "query: {query}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}
