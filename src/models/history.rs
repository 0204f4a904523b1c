use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "board.history_event_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryEventType {
    ElementCreated,
    ElementUpdated,
    ElementDeleted,
    ElementGrouped,
    ElementUngrouped,
    ElementReordered,
    ElementCopied,
    BoardRenamed,
}

/// Append-only audit row. Never updated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoryEvent {
    pub id: i64,
    pub board_id: i64,
    pub actor_id: Option<Uuid>,
    pub element_id: Option<i64>,
    pub event_type: HistoryEventType,
    pub before_state: Option<serde_json::Value>,
    pub after_state: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
