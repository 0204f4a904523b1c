use sqlx::{PgConnection, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::history::{HistoryEvent, HistoryEventType},
};

pub struct CreateHistoryEventParams {
    pub board_id: i64,
    pub actor_id: Option<Uuid>,
    pub element_id: Option<i64>,
    pub event_type: HistoryEventType,
    pub before_state: Option<serde_json::Value>,
    pub after_state: Option<serde_json::Value>,
}

pub async fn insert_event(
    tx: &mut Transaction<'_, Postgres>,
    params: CreateHistoryEventParams,
) -> Result<HistoryEvent, AppError> {
    let event = crate::log_query_fetch_one!(
        "history.insert_event",
        sqlx::query_as::<_, HistoryEvent>(
            r#"
                INSERT INTO board.history_event (
                    board_id,
                    actor_id,
                    element_id,
                    event_type,
                    before_state,
                    after_state
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            "#,
        )
        .bind(params.board_id)
        .bind(params.actor_id)
        .bind(params.element_id)
        .bind(params.event_type)
        .bind(params.before_state)
        .bind(params.after_state)
        .fetch_one(&mut **tx)
    )?;

    Ok(event)
}

pub async fn list_events(
    conn: &mut PgConnection,
    board_id: i64,
    element_id: Option<i64>,
    limit: i64,
) -> Result<Vec<HistoryEvent>, AppError> {
    let events = crate::log_query_fetch_all!(
        "history.list_events",
        sqlx::query_as::<_, HistoryEvent>(
            r#"
                SELECT *
                FROM board.history_event
                WHERE board_id = $1
                  AND ($2::BIGINT IS NULL OR element_id = $2)
                ORDER BY id DESC
                LIMIT $3
            "#,
        )
        .bind(board_id)
        .bind(element_id)
        .bind(limit)
        .fetch_all(&mut *conn)
    )?;

    Ok(events)
}
