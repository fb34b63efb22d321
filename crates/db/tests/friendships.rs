use assert_matches::assert_matches;
use sqlx::PgPool;
use eventsync_core::status::FriendshipStatus;
use eventsync_db::models::user::CreateUser;
use eventsync_db::repositories::{FriendshipRepo, UserRepo};
use eventsync_db::StoreError;

async fn seed_user(pool: &PgPool, email: &str) -> i64 {
    let input = CreateUser {
        name: email.split('@').next().unwrap_or("user").into(),
        email: email.into(),
        password_hash: "not-a-real-hash".into(),
        city: "Braga".into(),
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_request_accept_and_list(pool: PgPool) {
    let ana = seed_user(&pool, "ana@example.com").await;
    let rui = seed_user(&pool, "rui@example.com").await;

    let request = FriendshipRepo::create_request(&pool, ana, rui).await.unwrap();
    assert_eq!(request.status, FriendshipStatus::Pending);
    assert!(!FriendshipRepo::are_friends(&pool, ana, rui).await.unwrap());

    let pending = FriendshipRepo::list_pending_received(&pool, rui).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert!(FriendshipRepo::list_pending_received(&pool, ana)
        .await
        .unwrap()
        .is_empty());

    assert!(FriendshipRepo::accept(&pool, request.id).await.unwrap());
    assert!(FriendshipRepo::are_friends(&pool, rui, ana).await.unwrap());
    assert_eq!(FriendshipRepo::friend_ids(&pool, ana).await.unwrap(), vec![rui]);
    assert_eq!(FriendshipRepo::friend_ids(&pool, rui).await.unwrap(), vec![ana]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_pair_is_unique_in_both_directions(pool: PgPool) {
    let ana = seed_user(&pool, "ana@example.com").await;
    let rui = seed_user(&pool, "rui@example.com").await;

    FriendshipRepo::create_request(&pool, ana, rui).await.unwrap();
    let err = FriendshipRepo::create_request(&pool, rui, ana)
        .await
        .unwrap_err();
    assert_matches!(StoreError::from(err), StoreError::Duplicate(name) if name == "uq_friendships_pair");

    let found = FriendshipRepo::find_between(&pool, rui, ana).await.unwrap();
    assert_matches!(found, Some(f) if f.requester_id == ana);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_email_maps_to_duplicate(pool: PgPool) {
    seed_user(&pool, "ana@example.com").await;
    let input = CreateUser {
        name: "Other".into(),
        email: "ana@example.com".into(),
        password_hash: "x".into(),
        city: "Faro".into(),
    };
    let err = UserRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(StoreError::from(err), StoreError::Duplicate(name) if name == "uq_users_email");
}
