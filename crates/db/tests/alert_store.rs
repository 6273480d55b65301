use assert_matches::assert_matches;
use beacon_core::snapshot::{UserContact, UserInfoSnapshot};
use beacon_db::models::alert::{Archival, UpsertOutcome};
use beacon_db::models::user::CreateUser;
use beacon_db::repositories::{AlertRepo, CompletedAlertRepo, StatisticRepo, UserRepo};
use beacon_db::{AlertStore, PgAlertStore, PgUserDirectory, UserDirectory};
use chrono::{Duration, Utc};
use sqlx::PgPool;

async fn create_user(pool: &PgPool, email: &str) -> beacon_db::models::user::User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Ana".into(),
            surname: "Rojas".into(),
            national_id: format!("id-{email}"),
            email: email.into(),
            phone: "555-0100".into(),
            password_hash: "hash".into(),
            address: "Calle 1".into(),
            photo: None,
            role: "user".into(),
        },
    )
    .await
    .unwrap()
}

fn snapshot() -> UserInfoSnapshot {
    UserInfoSnapshot::capture(&UserContact::default())
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_creates_then_updates(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com").await;

    let first = AlertRepo::upsert_active(&pool, user.id, 10.0, 20.0, &snapshot())
        .await
        .unwrap();
    let second = AlertRepo::upsert_active(&pool, user.id, 10.5, 20.5, &snapshot())
        .await
        .unwrap();

    assert_eq!(first.outcome, UpsertOutcome::Created);
    assert_eq!(second.outcome, UpsertOutcome::Updated);
    assert_eq!(second.alert.id, first.alert.id);
    assert_eq!(second.alert.created_at, first.alert.created_at);
    assert_eq!(second.alert.lat, 10.5);
    assert_eq!(AlertRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_upserts_leave_one_active_alert(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com").await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            AlertRepo::upsert_active(&pool, user.id, f64::from(i), 0.0, &snapshot()).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        let upserted = handle.await.unwrap().unwrap();
        if upserted.outcome == UpsertOutcome::Created {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    let active = AlertRepo::list_by_user(&pool, user.id, None, None)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archive_moves_alert_to_history_once(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com").await;
    let alert = AlertRepo::upsert_active(&pool, user.id, -34.6, -58.4, &snapshot())
        .await
        .unwrap()
        .alert;
    let archival = Archival {
        user_info: snapshot(),
        comment: "resolved".into(),
        completed_at: Utc::now(),
    };

    let archived = AlertRepo::archive(&pool, alert.id, &archival).await.unwrap();
    let repeat = AlertRepo::archive(&pool, alert.id, &archival).await.unwrap();

    let archived = archived.expect("first archive should succeed");
    assert_eq!(archived.removed.id, alert.id);
    assert_eq!(archived.completed.user_id, user.id);
    assert_eq!(archived.completed.lat, -34.6);
    assert_eq!(archived.completed.comment, "resolved");
    assert!(repeat.is_none());

    assert!(AlertRepo::find_by_id(&pool, alert.id).await.unwrap().is_none());
    assert_eq!(CompletedAlertRepo::list(&pool, None, None).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archive_allows_a_new_active_alert(pool: PgPool) {
    let store = PgAlertStore::new(pool.clone());
    let user = create_user(&pool, "ana@example.com").await;

    let first = store.upsert_active(user.id, 1.0, 1.0, &snapshot()).await.unwrap();
    let archival = Archival {
        user_info: snapshot(),
        comment: "no comment".into(),
        completed_at: Utc::now(),
    };
    store.archive(first.alert.id, &archival).await.unwrap();

    let second = store.upsert_active(user.id, 2.0, 2.0, &snapshot()).await.unwrap();
    assert_eq!(second.outcome, UpsertOutcome::Created);
    assert_ne!(second.alert.id, first.alert.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_completed_list_filters_by_range(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com").await;
    let alert = AlertRepo::upsert_active(&pool, user.id, 1.0, 1.0, &snapshot())
        .await
        .unwrap()
        .alert;
    let now = Utc::now();
    let archival = Archival {
        user_info: snapshot(),
        comment: "no comment".into(),
        completed_at: now,
    };
    AlertRepo::archive(&pool, alert.id, &archival).await.unwrap();

    let inside = CompletedAlertRepo::list(
        &pool,
        Some(now - Duration::hours(1)),
        Some(now + Duration::hours(1)),
    )
    .await
    .unwrap();
    let outside = CompletedAlertRepo::list(&pool, Some(now + Duration::hours(1)), None)
        .await
        .unwrap();

    assert_eq!(inside.len(), 1);
    assert!(outside.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_comment_longer_than_limit_is_rejected_by_schema(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com").await;
    let alert = AlertRepo::upsert_active(&pool, user.id, 1.0, 1.0, &snapshot())
        .await
        .unwrap()
        .alert;
    let archival = Archival {
        user_info: snapshot(),
        comment: "x".repeat(121),
        completed_at: Utc::now(),
    };

    assert_matches!(
        AlertRepo::archive(&pool, alert.id, &archival).await,
        Err(sqlx::Error::Database(_))
    );
    // Rolled back: the active alert is still there.
    assert!(AlertRepo::find_by_id(&pool, alert.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_directory_returns_contact(pool: PgPool) {
    let directory = PgUserDirectory::new(pool.clone());
    let user = create_user(&pool, "ana@example.com").await;

    let contact = directory.find_contact(user.id).await.unwrap().unwrap();
    assert_eq!(contact.email.as_deref(), Some("ana@example.com"));
    assert!(directory.find_contact(user.id + 1000).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_violates_unique_constraint(pool: PgPool) {
    create_user(&pool, "ana@example.com").await;

    let err = UserRepo::create(
        &pool,
        &CreateUser {
            name: "Other".into(),
            surname: "Person".into(),
            national_id: "other-id".into(),
            email: "ana@example.com".into(),
            phone: "555".into(),
            password_hash: "hash".into(),
            address: "x".into(),
            photo: None,
            role: "user".into(),
        },
    )
    .await
    .unwrap_err();

    assert_matches!(err, sqlx::Error::Database(db) if db.constraint() == Some("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_statistic_record_increments_general_counter(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com").await;
    let now = Utc::now();

    StatisticRepo::record(&pool, user.id, "login", now).await.unwrap();
    StatisticRepo::record(&pool, user.id, "login", now).await.unwrap();
    StatisticRepo::record(&pool, user.id, "alert", now).await.unwrap();

    let general = StatisticRepo::list_general(&pool).await.unwrap();
    let login = general.iter().find(|g| g.action == "login").unwrap();
    assert_eq!(login.count, 2);

    let in_range = StatisticRepo::general_counts_between(
        &pool,
        now - Duration::minutes(1),
        now + Duration::minutes(1),
    )
    .await
    .unwrap();
    assert_eq!(in_range.len(), 2);

    let mine = StatisticRepo::list_for_user(&pool, user.id, None, None)
        .await
        .unwrap();
    assert_eq!(mine.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_latest_and_oldest_users(pool: PgPool) {
    assert!(UserRepo::latest(&pool).await.unwrap().is_none());

    let first = create_user(&pool, "first@example.com").await;
    let second = create_user(&pool, "second@example.com").await;

    assert_eq!(UserRepo::oldest(&pool).await.unwrap().unwrap().id, first.id);
    assert_eq!(UserRepo::latest(&pool).await.unwrap().unwrap().id, second.id);
    assert_eq!(UserRepo::count(&pool).await.unwrap(), 2);
}
