#[cfg(any(test, feature = "test-utils"))]
#[cfg(not(tarpaulin_include))]
pub mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    use bancho_types::{
        errors::{AppError, ApplicationError},
        map_request::{MapRequest, MapRequestFilter, MapRequestUpdate},
    };

    use crate::repository::MapRequestRepository;

    /// Keeps map requests in memory, ordered by id.
    #[derive(Default, Clone)]
    pub struct MockMapRequestRepository {
        requests: Arc<Mutex<Vec<MapRequest>>>,
        last_id: Arc<Mutex<i32>>,
    }

    impl MockMapRequestRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn all(&self) -> Vec<MapRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MapRequestRepository for MockMapRequestRepository {
        async fn create(
            &self,
            map_id: i32,
            player_id: i32,
            active: bool,
        ) -> Result<MapRequest, ApplicationError> {
            let mut last_id = self.last_id.lock().unwrap();
            *last_id += 1;

            let request = MapRequest {
                id: *last_id,
                map_id,
                player_id,
                datetime: Utc::now(),
                active,
            };
            self.requests.lock().unwrap().push(request.clone());

            Ok(request)
        }

        async fn fetch_one(
            &self,
            id: Option<i32>,
            filter: MapRequestFilter,
        ) -> Result<Option<MapRequest>, ApplicationError> {
            if id.is_none() && filter.is_empty() {
                return Err(AppError::MissingFilter.into());
            }

            Ok(self
                .requests
                .lock()
                .unwrap()
                .iter()
                .find(|r| id.is_none_or(|id| id == r.id) && filter.matches(r))
                .cloned())
        }

        async fn fetch_count(&self, filter: MapRequestFilter) -> Result<i64, ApplicationError> {
            let requests = self.requests.lock().unwrap();
            Ok(requests.iter().filter(|r| filter.matches(r)).count() as i64)
        }

        async fn fetch_all(
            &self,
            filter: MapRequestFilter,
        ) -> Result<Vec<MapRequest>, ApplicationError> {
            let requests = self.requests.lock().unwrap();
            Ok(requests.iter().filter(|r| filter.matches(r)).cloned().collect())
        }

        async fn update(
            &self,
            map_ids: &[i32],
            changes: MapRequestUpdate,
        ) -> Result<Option<MapRequest>, ApplicationError> {
            if changes.is_empty() {
                return Err(AppError::EmptyUpdate.into());
            }

            let mut requests = self.requests.lock().unwrap();
            for request in requests.iter_mut().filter(|r| map_ids.contains(&r.map_id)) {
                changes.apply_to(request);
            }

            Ok(requests.iter().find(|r| map_ids.contains(&r.map_id)).cloned())
        }

        async fn delete(&self, id: i32) -> Result<Option<MapRequest>, ApplicationError> {
            let mut requests = self.requests.lock().unwrap();
            let Some(pos) = requests.iter().position(|r| r.id == id) else {
                return Ok(None);
            };

            Ok(Some(requests.remove(pos)))
        }
    }
}
