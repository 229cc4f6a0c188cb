use sqlx::{Postgres, QueryBuilder};

use bancho_app::repository::MapRequestRepository;
use bancho_types::{
    errors::{AppError, ApplicationError, DbError},
    map_request::{MapRequest, MapRequestFilter, MapRequestUpdate},
};

use crate::{DbPool, models as db_models};

const READ_PARAMS: &str = "id, map_id, player_id, datetime, active";

/// Implements MapRequestRepository on top of the connection pool.
///
/// Each statement runs on whatever connection the pool hands out, outside
/// of any transaction.
#[derive(Debug, Clone)]
pub struct PostgresMapRequestRepository {
    pool: DbPool,
}

impl PostgresMapRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: i32) -> Result<Option<MapRequest>, ApplicationError> {
        let row = select_query(Some(id), MapRequestFilter::default(), true)
            .build_query_as::<db_models::MapRequest>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(row.map(Into::into))
    }
}

#[async_trait::async_trait]
impl MapRequestRepository for PostgresMapRequestRepository {
    #[tracing::instrument(skip(self))]
    async fn create(
        &self,
        map_id: i32,
        player_id: i32,
        active: bool,
    ) -> Result<MapRequest, ApplicationError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO map_requests (map_id, player_id, datetime, active)
            VALUES ($1, $2, NOW(), $3)
            RETURNING id
            "#,
        )
        .bind(map_id)
        .bind(player_id)
        .bind(active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        tracing::debug!(id, "Map request inserted");

        self.fetch_by_id(id)
            .await?
            .ok_or(ApplicationError::Db(DbError::MapRequestVanished(id)))
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_one(
        &self,
        id: Option<i32>,
        filter: MapRequestFilter,
    ) -> Result<Option<MapRequest>, ApplicationError> {
        if id.is_none() && filter.is_empty() {
            return Err(ApplicationError::App(AppError::MissingFilter));
        }

        let row = select_query(id, filter, true)
            .build_query_as::<db_models::MapRequest>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_count(&self, filter: MapRequestFilter) -> Result<i64, ApplicationError> {
        let count: i64 = count_query(filter)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(count)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_all(
        &self,
        filter: MapRequestFilter,
    ) -> Result<Vec<MapRequest>, ApplicationError> {
        let rows = select_query(None, filter, false)
            .build_query_as::<db_models::MapRequest>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn update(
        &self,
        map_ids: &[i32],
        changes: MapRequestUpdate,
    ) -> Result<Option<MapRequest>, ApplicationError> {
        let Some(mut query) = update_query(map_ids, changes) else {
            return Err(ApplicationError::App(AppError::EmptyUpdate));
        };

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        tracing::debug!(rows = result.rows_affected(), "Map requests updated");

        let row = sqlx::query_as::<_, db_models::MapRequest>(
            r#"
            SELECT id, map_id, player_id, datetime, active
            FROM map_requests
            WHERE map_id = ANY($1)
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(map_ids.to_vec())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<Option<MapRequest>, ApplicationError> {
        let Some(snapshot) = self.fetch_by_id(id).await? else {
            return Ok(None);
        };

        let result = sqlx::query("DELETE FROM map_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        // Someone else removed it between the read and the delete.
        if result.rows_affected() == 0 {
            tracing::warn!(id, "Map request was already gone when deleting");
        }

        Ok(Some(snapshot))
    }
}

fn select_query(
    id: Option<i32>,
    filter: MapRequestFilter,
    first_only: bool,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT {READ_PARAMS} FROM map_requests"));
    push_filters(&mut query, id, filter);
    query.push(" ORDER BY id");
    if first_only {
        query.push(" LIMIT 1");
    }
    query
}

fn count_query(filter: MapRequestFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT COUNT(*) FROM map_requests");
    push_filters(&mut query, None, filter);
    query
}

/// Builds the bulk update, or `None` when there is nothing to set.
fn update_query(
    map_ids: &[i32],
    changes: MapRequestUpdate,
) -> Option<QueryBuilder<'static, Postgres>> {
    if changes.is_empty() {
        return None;
    }

    let mut query = QueryBuilder::new("UPDATE map_requests SET ");
    {
        let mut fields = query.separated(", ");
        if let Some(player_id) = changes.player_id.as_set() {
            fields.push("player_id = ").push_bind_unseparated(*player_id);
        }
        if let Some(active) = changes.active.as_set() {
            fields.push("active = ").push_bind_unseparated(*active);
        }
    }
    query
        .push(" WHERE map_id = ANY(")
        .push_bind(map_ids.to_vec())
        .push(")");

    Some(query)
}

/// Emits one `AND`ed clause per provided filter, and no `WHERE` at all when
/// nothing is provided.
fn push_filters(query: &mut QueryBuilder<'static, Postgres>, id: Option<i32>, filter: MapRequestFilter) {
    if id.is_none() && filter.is_empty() {
        return;
    }

    query.push(" WHERE ");
    let mut conditions = query.separated(" AND ");
    if let Some(id) = id {
        conditions.push("id = ").push_bind_unseparated(id);
    }
    if let Some(map_id) = filter.map_id {
        conditions.push("map_id = ").push_bind_unseparated(map_id);
    }
    if let Some(player_id) = filter.player_id {
        conditions.push("player_id = ").push_bind_unseparated(player_id);
    }
    if let Some(active) = filter.active {
        conditions.push("active = ").push_bind_unseparated(active);
    }
}
