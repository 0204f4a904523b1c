use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::history::{HistoryEvent, HistoryEventType};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListHistoryQuery {
    pub limit: Option<u32>,
    pub element_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEventResponse {
    pub id: i64,
    pub actor_id: Option<Uuid>,
    pub element_id: Option<i64>,
    pub event_type: HistoryEventType,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<HistoryEvent> for HistoryEventResponse {
    fn from(event: HistoryEvent) -> Self {
        Self {
            id: event.id,
            actor_id: event.actor_id,
            element_id: event.element_id,
            event_type: event.event_type,
            before: event.before_state,
            after: event.after_state,
            created_at: event.created_at,
        }
    }
}
