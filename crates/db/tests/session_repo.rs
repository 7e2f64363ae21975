use chrono::{Duration, Utc};
use mediatrack_db::models::session::CreateSession;
use mediatrack_db::models::user::CreateUser;
use mediatrack_db::repositories::{SessionRepo, UserRepo};
use sqlx::PgPool;

fn session(user_id: i64, hash: &str) -> CreateSession {
    CreateSession {
        user_id,
        refresh_token_hash: hash.into(),
        expires_at: Utc::now() + Duration::days(1),
    }
}

async fn active_count(pool: &PgPool, user_id: i64) -> i64 {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM user_sessions WHERE user_id = $1 AND is_revoked = false",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .unwrap();
    count
}

async fn new_user(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: "s@example.com".into(),
            name: "S".into(),
            password_hash: "hash".into(),
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "./migrations")]
async fn test_session_lifecycle(pool: PgPool) {
    let user_id = new_user(&pool).await;
    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            user_id,
            refresh_token_hash: "abc".into(),
            expires_at: Utc::now() + Duration::days(1),
        },
    )
    .await
    .unwrap();

    let found = SessionRepo::find_by_refresh_token_hash(&pool, "abc")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, session.id);

    assert_eq!(SessionRepo::revoke_all_for_user(&pool, user_id).await.unwrap(), 1);
    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "abc")
        .await
        .unwrap()
        .is_none());

    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_session_not_found(pool: PgPool) {
    let user_id = new_user(&pool).await;
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id,
            refresh_token_hash: "old".into(),
            expires_at: Utc::now() - Duration::minutes(1),
        },
    )
    .await
    .unwrap();

    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "old")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revoke_all_for_user(pool: PgPool) {
    let user_id = new_user(&pool).await;
    for hash in ["one", "two"] {
        SessionRepo::create(
            &pool,
            &CreateSession {
                user_id,
                refresh_token_hash: hash.into(),
                expires_at: Utc::now() + Duration::days(1),
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(SessionRepo::revoke_all_for_user(&pool, user_id).await.unwrap(), 2);
    assert_eq!(SessionRepo::revoke_all_for_user(&pool, user_id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rotate_is_single_use(pool: PgPool) {
    let user_id = new_user(&pool).await;
    let first = SessionRepo::create(&pool, &session(user_id, "first")).await.unwrap();

    let second = SessionRepo::rotate(&pool, first.id, &session(user_id, "second"))
        .await
        .unwrap()
        .expect("active session rotates");
    assert_eq!(second.refresh_token_hash, "second");
    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "first")
        .await
        .unwrap()
        .is_none());

    // Rotating the same session again yields nothing and inserts nothing.
    let replay = SessionRepo::rotate(&pool, first.id, &session(user_id, "third"))
        .await
        .unwrap();
    assert!(replay.is_none());
    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "third")
        .await
        .unwrap()
        .is_none());
    assert_eq!(active_count(&pool, user_id).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_prune_keeps_newest_sessions(pool: PgPool) {
    let user_id = new_user(&pool).await;
    for i in 0..5 {
        SessionRepo::create(&pool, &session(user_id, &format!("s{i}")))
            .await
            .unwrap();
    }
    let expired = CreateSession {
        expires_at: Utc::now() - Duration::minutes(1),
        ..session(user_id, "expired")
    };
    SessionRepo::create(&pool, &expired).await.unwrap();

    // Two surplus active sessions plus the expired one.
    assert_eq!(SessionRepo::prune_for_user(&pool, user_id, 3).await.unwrap(), 3);
    assert_eq!(active_count(&pool, user_id).await, 3);

    for hash in ["s2", "s3", "s4"] {
        assert!(SessionRepo::find_by_refresh_token_hash(&pool, hash)
            .await
            .unwrap()
            .is_some());
    }
    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "s0")
        .await
        .unwrap()
        .is_none());

    assert_eq!(SessionRepo::prune_for_user(&pool, user_id, 3).await.unwrap(), 0);
}
