use bancho_types::{
    errors::ApplicationError,
    map_request::{MapRequest, MapRequestFilter, MapRequestUpdate},
};

/// Storage for players' map ranking requests.
///
/// Every method is a standalone round-trip to the store: nothing here opens
/// a transaction, so multi-statement methods (`create`, `update`, `delete`)
/// can interleave with concurrent callers.
#[async_trait::async_trait]
pub trait MapRequestRepository: Send + Sync {
    /// Inserts a request stamped with the current time and returns it as
    /// stored.
    async fn create(
        &self,
        map_id: i32,
        player_id: i32,
        active: bool,
    ) -> Result<MapRequest, ApplicationError>;

    /// Returns the lowest-id request matching `id` and `filter`.
    ///
    /// Fails with `AppError::MissingFilter` when neither `id` nor any filter
    /// field is given.
    async fn fetch_one(
        &self,
        id: Option<i32>,
        filter: MapRequestFilter,
    ) -> Result<Option<MapRequest>, ApplicationError>;

    /// Counts requests matching `filter`. An empty filter counts everything.
    async fn fetch_count(&self, filter: MapRequestFilter) -> Result<i64, ApplicationError>;

    /// Lists requests matching `filter`, ordered by id.
    async fn fetch_all(&self, filter: MapRequestFilter)
    -> Result<Vec<MapRequest>, ApplicationError>;

    /// Applies `changes` to every request whose map is in `map_ids`.
    ///
    /// The returned row is re-read afterwards by the same map set and is the
    /// lowest-id match, which is not necessarily one touched by this call if
    /// another writer got in between. Pass a single map id when the updated
    /// row itself is needed. Fails with `AppError::EmptyUpdate` when
    /// `changes` sets nothing.
    async fn update(
        &self,
        map_ids: &[i32],
        changes: MapRequestUpdate,
    ) -> Result<Option<MapRequest>, ApplicationError>;

    /// Removes a request and returns its last known state, or `None` if it
    /// did not exist.
    async fn delete(&self, id: i32) -> Result<Option<MapRequest>, ApplicationError>;
}
