use chrono::Utc;
use tokio::sync::{Mutex, MutexGuard};

use bancho_app::repository::MapRequestRepository;
use bancho_db::{DbPool, PostgresMapRequestRepository, establish_test_connection_pool, run_migrations};
use bancho_types::{
    Result,
    errors::{AppError, ApplicationError},
    map_request::{MapRequestFilter, MapRequestUpdate},
};

// Run with `cargo test -p bancho_db -- --ignored` against a disposable
// database. Tests share one table and assert on absolute counts, so they
// take turns.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

struct TestContext {
    repo: PostgresMapRequestRepository,
    pool: DbPool,
    _guard: MutexGuard<'static, ()>,
}

/// Connects to `TEST_DATABASE_URL` and empties the table. Fails when no test
/// database is configured.
async fn setup() -> Result<TestContext> {
    let guard = DB_LOCK.lock().await;

    let pool = establish_test_connection_pool().await?;
    run_migrations(&pool).await?;
    sqlx::query("TRUNCATE map_requests").execute(&pool).await?;

    Ok(TestContext {
        repo: PostgresMapRequestRepository::new(pool.clone()),
        pool,
        _guard: guard,
    })
}

async fn raw_count(pool: &DbPool) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM map_requests")
        .fetch_one(pool)
        .await?)
}

#[tokio::test]
#[ignore = "needs a Postgres database at TEST_DATABASE_URL"]
async fn test_create_returns_stored_request() -> Result<()> {
    let ctx = setup().await?;

    let created = ctx.repo.create(4242, 1001, true).await?;
    assert_eq!(created.map_id, 4242);
    assert_eq!(created.player_id, 1001);
    assert!(created.active);
    assert!((Utc::now() - created.datetime).num_seconds().abs() < 300);

    let other = ctx.repo.create(4242, 1002, false).await?;
    assert_ne!(other.id, created.id);
    assert!(!other.active);

    Ok(())
}

#[tokio::test]
#[ignore = "needs a Postgres database at TEST_DATABASE_URL"]
async fn test_ids_are_not_reused_after_delete() -> Result<()> {
    let ctx = setup().await?;

    let first = ctx.repo.create(1, 10, true).await?;
    ctx.repo.delete(first.id).await?;
    let second = ctx.repo.create(1, 10, true).await?;

    assert!(second.id > first.id);

    Ok(())
}

#[tokio::test]
#[ignore = "needs a Postgres database at TEST_DATABASE_URL"]
async fn test_fetch_one() -> Result<()> {
    let ctx = setup().await?;

    let first = ctx.repo.create(100, 1, true).await?;
    let second = ctx.repo.create(100, 2, false).await?;
    ctx.repo.create(200, 1, true).await?;

    let by_id = ctx.repo.fetch_one(Some(second.id), MapRequestFilter::new()).await?;
    assert_eq!(by_id, Some(second.clone()));

    let by_filters = ctx
        .repo
        .fetch_one(None, MapRequestFilter::new().map_id(100).active(false))
        .await?;
    assert_eq!(by_filters, Some(second.clone()));

    // Several matches: the lowest id wins.
    let by_map = ctx.repo.fetch_one(None, MapRequestFilter::new().map_id(100)).await?;
    assert_eq!(by_map, Some(first.clone()));

    // Id and filters must all match.
    let mismatch = ctx
        .repo
        .fetch_one(Some(first.id), MapRequestFilter::new().player_id(2))
        .await?;
    assert!(mismatch.is_none());

    let missing = ctx.repo.fetch_one(Some(second.id + 1000), MapRequestFilter::new()).await?;
    assert!(missing.is_none());

    Ok(())
}

#[tokio::test]
#[ignore = "needs a Postgres database at TEST_DATABASE_URL"]
async fn test_fetch_one_without_filters_fails() -> Result<()> {
    let ctx = setup().await?;
    ctx.repo.create(100, 1, true).await?;

    let err = ctx.repo.fetch_one(None, MapRequestFilter::new()).await.unwrap_err();
    assert!(matches!(err, ApplicationError::App(AppError::MissingFilter)));

    Ok(())
}

#[tokio::test]
#[ignore = "needs a Postgres database at TEST_DATABASE_URL"]
async fn test_fetch_count() -> Result<()> {
    let ctx = setup().await?;

    assert_eq!(ctx.repo.fetch_count(MapRequestFilter::new()).await?, 0);

    ctx.repo.create(100, 1, true).await?;
    ctx.repo.create(100, 2, false).await?;
    ctx.repo.create(200, 1, true).await?;

    assert_eq!(ctx.repo.fetch_count(MapRequestFilter::new()).await?, raw_count(&ctx.pool).await?);
    assert_eq!(ctx.repo.fetch_count(MapRequestFilter::new()).await?, 3);
    assert_eq!(ctx.repo.fetch_count(MapRequestFilter::new().map_id(100)).await?, 2);
    assert_eq!(ctx.repo.fetch_count(MapRequestFilter::new().player_id(1).active(true)).await?, 2);
    assert_eq!(ctx.repo.fetch_count(MapRequestFilter::new().map_id(300)).await?, 0);

    Ok(())
}

#[tokio::test]
#[ignore = "needs a Postgres database at TEST_DATABASE_URL"]
async fn test_fetch_all_by_map() -> Result<()> {
    let ctx = setup().await?;

    let a = ctx.repo.create(100, 1, true).await?;
    ctx.repo.create(200, 1, true).await?;
    let b = ctx.repo.create(100, 2, false).await?;
    let c = ctx.repo.create(100, 1, true).await?;

    let requests = ctx.repo.fetch_all(MapRequestFilter::new().map_id(100)).await?;
    assert_eq!(requests, vec![a.clone(), b, c.clone()]);

    let active_for_player = ctx
        .repo
        .fetch_all(MapRequestFilter::new().map_id(100).player_id(1).active(true))
        .await?;
    assert_eq!(active_for_player, vec![a, c]);

    assert_eq!(ctx.repo.fetch_all(MapRequestFilter::new()).await?.len(), 4);
    assert!(ctx.repo.fetch_all(MapRequestFilter::new().map_id(999)).await?.is_empty());

    Ok(())
}

#[tokio::test]
#[ignore = "needs a Postgres database at TEST_DATABASE_URL"]
async fn test_update_several_maps() -> Result<()> {
    let ctx = setup().await?;

    let a = ctx.repo.create(100, 1, false).await?;
    let b = ctx.repo.create(200, 2, false).await?;
    let untouched = ctx.repo.create(300, 3, false).await?;

    let returned = ctx
        .repo
        .update(&[200, 100], MapRequestUpdate::new().active(true))
        .await?
        .unwrap();
    assert_eq!(returned.id, a.id);

    let updated = ctx.repo.fetch_all(MapRequestFilter::new().active(true)).await?;
    assert_eq!(updated.len(), 2);
    assert_eq!(updated[0].player_id, a.player_id);
    assert_eq!(updated[0].datetime, a.datetime);
    assert_eq!(updated[1].player_id, b.player_id);

    let still_inactive = ctx.repo.fetch_one(Some(untouched.id), MapRequestFilter::new()).await?;
    assert_eq!(still_inactive, Some(untouched));

    Ok(())
}

#[tokio::test]
#[ignore = "needs a Postgres database at TEST_DATABASE_URL"]
async fn test_update_player_keeps_active_flag() -> Result<()> {
    let ctx = setup().await?;

    let created = ctx.repo.create(100, 1, true).await?;

    let returned = ctx
        .repo
        .update(&[100], MapRequestUpdate::new().player_id(7))
        .await?
        .unwrap();
    assert_eq!(returned.id, created.id);
    assert_eq!(returned.player_id, 7);
    assert!(returned.active);

    Ok(())
}

#[tokio::test]
#[ignore = "needs a Postgres database at TEST_DATABASE_URL"]
async fn test_update_edge_cases() -> Result<()> {
    let ctx = setup().await?;

    let created = ctx.repo.create(100, 1, true).await?;

    let err = ctx.repo.update(&[100], MapRequestUpdate::new()).await.unwrap_err();
    assert!(matches!(err, ApplicationError::App(AppError::EmptyUpdate)));

    let none = ctx.repo.update(&[], MapRequestUpdate::new().active(false)).await?;
    assert!(none.is_none());

    let unknown = ctx.repo.update(&[555], MapRequestUpdate::new().active(false)).await?;
    assert!(unknown.is_none());

    let unchanged = ctx.repo.fetch_one(Some(created.id), MapRequestFilter::new()).await?;
    assert_eq!(unchanged, Some(created));

    Ok(())
}

#[tokio::test]
#[ignore = "needs a Postgres database at TEST_DATABASE_URL"]
async fn test_delete() -> Result<()> {
    let ctx = setup().await?;

    let keep = ctx.repo.create(100, 1, true).await?;
    let removed = ctx.repo.create(100, 2, true).await?;

    assert!(ctx.repo.delete(removed.id + 1000).await?.is_none());
    assert_eq!(raw_count(&ctx.pool).await?, 2);

    let deleted = ctx.repo.delete(removed.id).await?;
    assert_eq!(deleted, Some(removed.clone()));
    assert_eq!(raw_count(&ctx.pool).await?, 1);
    assert!(ctx.repo.fetch_one(Some(keep.id), MapRequestFilter::new()).await?.is_some());

    assert!(ctx.repo.delete(removed.id).await?.is_none());

    Ok(())
}

#[tokio::test]
#[ignore = "needs a Postgres database at TEST_DATABASE_URL"]
async fn test_create_fetch_delete_round_trip() -> Result<()> {
    let ctx = setup().await?;

    let created = ctx.repo.create(4242, 1001, true).await?;
    let fetched = ctx.repo.fetch_one(Some(created.id), MapRequestFilter::new()).await?;
    let deleted = ctx.repo.delete(created.id).await?;

    assert_eq!(fetched, Some(created.clone()));
    assert_eq!(deleted, Some(created.clone()));
    assert!(ctx.repo.fetch_one(Some(created.id), MapRequestFilter::new()).await?.is_none());

    Ok(())
}
