use chrono::{DateTime, Utc};
use sqlx::FromRow;

use bancho_types::map_request as domain;

#[derive(Debug, Clone, FromRow)]
pub struct MapRequest {
    pub id: i32,
    pub map_id: i32,
    pub player_id: i32,
    pub datetime: DateTime<Utc>,
    pub active: bool,
}

impl From<MapRequest> for domain::MapRequest {
    fn from(row: MapRequest) -> Self {
        Self {
            id: row.id,
            map_id: row.map_id,
            player_id: row.player_id,
            datetime: row.datetime,
            active: row.active,
        }
    }
}
