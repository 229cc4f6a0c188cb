use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::patch::Patch;

/// A player's request to get a map ranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRequest {
    pub id: i32,
    pub map_id: i32,
    pub player_id: i32,
    pub datetime: DateTime<Utc>,
    pub active: bool,
}

/// Optional filters for map request lookups. A `None` field matches anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapRequestFilter {
    pub map_id: Option<i32>,
    pub player_id: Option<i32>,
    pub active: Option<bool>,
}

impl MapRequestFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map_id(mut self, map_id: i32) -> Self {
        self.map_id = Some(map_id);
        self
    }

    pub fn player_id(mut self, player_id: i32) -> Self {
        self.player_id = Some(player_id);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.map_id.is_none() && self.player_id.is_none() && self.active.is_none()
    }

    pub fn matches(&self, request: &MapRequest) -> bool {
        self.map_id.is_none_or(|v| v == request.map_id)
            && self.player_id.is_none_or(|v| v == request.player_id)
            && self.active.is_none_or(|v| v == request.active)
    }
}

/// Changes applied to every map request of a set of maps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapRequestUpdate {
    pub player_id: Patch<i32>,
    pub active: Patch<bool>,
}

impl MapRequestUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_id(mut self, player_id: i32) -> Self {
        self.player_id = Patch::Set(player_id);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Patch::Set(active);
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.player_id.is_set() && !self.active.is_set()
    }

    pub fn apply_to(&self, request: &mut MapRequest) {
        request.player_id = self.player_id.apply(request.player_id);
        request.active = self.active.apply(request.active);
    }
}
