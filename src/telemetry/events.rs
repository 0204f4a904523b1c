use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Structured log line for a committed mutation, emitted after the transaction
/// that produced it has been committed.
#[derive(Debug, Serialize)]
#[serde(tag = "event_type")]
pub enum BusinessEvent {
    ElementCreated {
        board_id: Uuid,
        element_id: i64,
        actor_id: Option<Uuid>,
    },
    ElementUpdated {
        board_id: Uuid,
        element_id: i64,
        actor_id: Option<Uuid>,
        operation: &'static str,
    },
    ElementDeleted {
        board_id: Uuid,
        element_id: i64,
        actor_id: Option<Uuid>,
    },
    ElementsGrouped {
        board_id: Uuid,
        group_id: Uuid,
        element_count: usize,
        actor_id: Option<Uuid>,
    },
    ElementsUngrouped {
        board_id: Uuid,
        group_id: Uuid,
        element_count: usize,
        actor_id: Option<Uuid>,
    },
    ElementsReordered {
        board_id: Uuid,
        element_count: usize,
        actor_id: Option<Uuid>,
    },
    ElementsCopied {
        board_id: Uuid,
        element_count: usize,
        actor_id: Option<Uuid>,
    },
}

impl BusinessEvent {
    pub fn log(&self) {
        let event_json = serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self));
        info!(
            target: "business_events",
            event = %event_json,
            "Business event occurred"
        );
    }
}
