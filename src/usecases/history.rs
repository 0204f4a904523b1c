use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    auth::ActorContext,
    dto::history::{HistoryEventResponse, ListHistoryQuery},
    error::AppError,
    models::{
        boards::Board,
        history::{HistoryEvent, HistoryEventType},
    },
    repositories::history::{self as history_repo, CreateHistoryEventParams},
    usecases::boards::BoardDirectory,
};

const DEFAULT_HISTORY_PAGE_SIZE: u32 = 50;
const MAX_HISTORY_PAGE_SIZE: u32 = 200;

/// One audit record waiting to be appended.
///
/// Snapshots are serialized eagerly. A side that fails to serialize is kept as
/// `None` instead of failing the mutation it describes.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    event_type: HistoryEventType,
    element_id: Option<i64>,
    before: Option<serde_json::Value>,
    after: Option<serde_json::Value>,
}

impl HistoryEntry {
    pub fn new(event_type: HistoryEventType) -> Self {
        Self {
            event_type,
            element_id: None,
            before: None,
            after: None,
        }
    }

    pub fn element(mut self, element_id: i64) -> Self {
        self.element_id = Some(element_id);
        self
    }

    pub fn before<T: Serialize + ?Sized>(mut self, state: &T) -> Self {
        self.before = snapshot(self.event_type, "before", state);
        self
    }

    pub fn after<T: Serialize + ?Sized>(mut self, state: &T) -> Self {
        self.after = snapshot(self.event_type, "after", state);
        self
    }
}

fn snapshot<T: Serialize + ?Sized>(
    event_type: HistoryEventType,
    side: &'static str,
    state: &T,
) -> Option<serde_json::Value> {
    match serde_json::to_value(state) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(
                event_type = ?event_type,
                side,
                error = %error,
                "History snapshot could not be serialized; storing it empty"
            );
            None
        }
    }
}

pub struct HistoryRecorder;

impl HistoryRecorder {
    /// Appends inside the caller's transaction so the record commits or rolls
    /// back together with the mutation it describes.
    pub async fn append(
        tx: &mut Transaction<'_, Postgres>,
        board: &Board,
        actor: ActorContext,
        entry: HistoryEntry,
    ) -> Result<HistoryEvent, AppError> {
        history_repo::insert_event(
            tx,
            CreateHistoryEventParams {
                board_id: board.id,
                actor_id: actor.user_id,
                element_id: entry.element_id,
                event_type: entry.event_type,
                before_state: entry.before,
                after_state: entry.after,
            },
        )
        .await
    }
}

pub struct HistoryService;

impl HistoryService {
    pub async fn list_history(
        pool: &PgPool,
        board_uuid: Uuid,
        actor: ActorContext,
        query: ListHistoryQuery,
    ) -> Result<Vec<HistoryEventResponse>, AppError> {
        let limit = normalize_history_limit(query.limit)?;
        let mut conn = pool.acquire().await?;
        let board = BoardDirectory::resolve(&mut conn, board_uuid, actor).await?;
        let events =
            history_repo::list_events(&mut conn, board.id, query.element_id, i64::from(limit))
                .await?;
        Ok(events.into_iter().map(HistoryEventResponse::from).collect())
    }
}

fn normalize_history_limit(limit: Option<u32>) -> Result<u32, AppError> {
    let value = limit.unwrap_or(DEFAULT_HISTORY_PAGE_SIZE);
    if value == 0 {
        return Err(AppError::ValidationError(
            "History limit must be greater than zero".to_string(),
        ));
    }
    if value > MAX_HISTORY_PAGE_SIZE {
        return Err(AppError::ValidationError(format!(
            "History limit exceeds maximum of {MAX_HISTORY_PAGE_SIZE}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{HistoryEntry, normalize_history_limit};
    use crate::{
        dto::elements::{BoardElementResponse, ElementCopy},
        models::{elements::fixtures::element, history::HistoryEventType},
    };

    #[test]
    fn created_entry_has_only_after_snapshot() {
        let view = BoardElementResponse::from(element(3, 1, 0));
        let entry = HistoryEntry::new(HistoryEventType::ElementCreated)
            .element(3)
            .after(&view);
        assert_eq!(entry.element_id, Some(3));
        assert!(entry.before.is_none());
        assert_eq!(entry.after.unwrap()["id"], 3);
    }

    #[test]
    fn copy_entry_carries_id_lists() {
        let entry = HistoryEntry::new(HistoryEventType::ElementCopied)
            .before(&[1_i64, 2])
            .after(&[ElementCopy {
                source_id: 1,
                new_id: 10,
            }]);
        assert!(entry.element_id.is_none());
        assert_eq!(entry.before.unwrap(), serde_json::json!([1, 2]));
        assert_eq!(
            entry.after.unwrap(),
            serde_json::json!([{ "sourceId": 1, "newId": 10 }])
        );
    }

    #[test]
    fn unserializable_snapshot_degrades_to_empty() {
        // JSON objects need string keys, so tuple keys fail to serialize.
        let mut bad = HashMap::new();
        bad.insert((1, 2), "x");
        let entry = HistoryEntry::new(HistoryEventType::ElementUpdated)
            .before(&bad)
            .after(&[1_i64]);
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
    }

    #[test]
    fn history_limit_bounds() {
        assert_eq!(normalize_history_limit(None).unwrap(), 50);
        assert_eq!(normalize_history_limit(Some(200)).unwrap(), 200);
        assert!(normalize_history_limit(Some(0)).is_err());
        assert!(normalize_history_limit(Some(201)).is_err());
    }
}
