use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

pub const DEFAULT_GROUP_NAME: &str = "Group";

/// Membership label. Elements point at a group; the group keeps no member list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ElementGroup {
    pub id: i64,
    pub uuid: Uuid,
    pub board_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
