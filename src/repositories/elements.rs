use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::elements::{BoardElement, ElementType},
};

pub struct CreateElementParams {
    pub board_id: i64,
    pub element_type: ElementType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub z_index: i32,
    pub group_id: Option<i64>,
    pub media_id: Option<i64>,
    pub properties: serde_json::Value,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Row-locks the element until the surrounding transaction ends, so lock
/// flags cannot change between the gate check and the write.
pub async fn find_element_for_update(
    conn: &mut PgConnection,
    element_id: i64,
) -> Result<Option<BoardElement>, AppError> {
    let element = crate::log_query_fetch_optional!(
        "elements.find_for_update",
        sqlx::query_as::<_, BoardElement>(
            r#"
                SELECT e.*, g.uuid AS group_uuid
                FROM board.element e
                LEFT JOIN board.element_group g ON g.id = e.group_id
                WHERE e.id = $1
                FOR UPDATE OF e
            "#,
        )
        .bind(element_id)
        .fetch_optional(&mut *conn)
    )?;

    Ok(element)
}

/// Looks elements up by id regardless of board; callers check scoping.
pub async fn find_elements_by_ids(
    conn: &mut PgConnection,
    element_ids: &[i64],
) -> Result<Vec<BoardElement>, AppError> {
    let elements = crate::log_query_fetch_all!(
        "elements.find_by_ids",
        sqlx::query_as::<_, BoardElement>(
            r#"
                SELECT e.*, g.uuid AS group_uuid
                FROM board.element e
                LEFT JOIN board.element_group g ON g.id = e.group_id
                WHERE e.id = ANY($1)
                ORDER BY e.id ASC
            "#,
        )
        .bind(element_ids)
        .fetch_all(&mut *conn)
    )?;

    Ok(elements)
}

pub async fn list_elements_by_board(
    pool: &PgPool,
    board_id: i64,
) -> Result<Vec<BoardElement>, AppError> {
    let elements = crate::log_query_fetch_all!(
        "elements.list_elements_by_board",
        sqlx::query_as::<_, BoardElement>(
            r#"
                SELECT e.*, g.uuid AS group_uuid
                FROM board.element e
                LEFT JOIN board.element_group g ON g.id = e.group_id
                WHERE e.board_id = $1
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
    )?;

    Ok(elements)
}

pub async fn list_elements_by_group(
    conn: &mut PgConnection,
    group_id: i64,
) -> Result<Vec<BoardElement>, AppError> {
    let elements = crate::log_query_fetch_all!(
        "elements.list_elements_by_group",
        sqlx::query_as::<_, BoardElement>(
            r#"
                SELECT e.*, g.uuid AS group_uuid
                FROM board.element e
                LEFT JOIN board.element_group g ON g.id = e.group_id
                WHERE e.group_id = $1
                ORDER BY e.id ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&mut *conn)
    )?;

    Ok(elements)
}

pub async fn max_z_index(conn: &mut PgConnection, board_id: i64) -> Result<Option<i32>, AppError> {
    let max = crate::log_query_fetch_one!(
        "elements.max_z_index",
        sqlx::query_scalar::<_, Option<i32>>(
            r#"
                SELECT MAX(z_index)
                FROM board.element
                WHERE board_id = $1
            "#,
        )
        .bind(board_id)
        .fetch_one(&mut *conn)
    )?;

    Ok(max)
}

pub async fn create_element(
    tx: &mut Transaction<'_, Postgres>,
    params: CreateElementParams,
) -> Result<BoardElement, AppError> {
    let properties = sqlx::types::Json(params.properties);

    let element = crate::log_query_fetch_one!(
        "elements.create_element",
        sqlx::query_as::<_, BoardElement>(
            r#"
                WITH inserted AS (
                    INSERT INTO board.element (
                        board_id,
                        element_type,
                        x,
                        y,
                        width,
                        height,
                        rotation,
                        z_index,
                        group_id,
                        media_id,
                        properties,
                        created_by,
                        updated_by,
                        created_at,
                        updated_at
                    )
                    VALUES (
                        $1, $2, $3, $4, $5,
                        $6, $7, $8, $9, $10,
                        $11, $12, $12, $13, $13
                    )
                    RETURNING *
                )
                SELECT i.*, g.uuid AS group_uuid
                FROM inserted i
                LEFT JOIN board.element_group g ON g.id = i.group_id
            "#,
        )
        .bind(params.board_id)
        .bind(params.element_type)
        .bind(params.x)
        .bind(params.y)
        .bind(params.width)
        .bind(params.height)
        .bind(params.rotation)
        .bind(params.z_index)
        .bind(params.group_id)
        .bind(params.media_id)
        .bind(properties)
        .bind(params.created_by)
        .bind(params.created_at)
        .fetch_one(&mut **tx)
    )?;

    Ok(element)
}

/// Writes every mutable column of `element` back to its row.
pub async fn save_element(
    tx: &mut Transaction<'_, Postgres>,
    element: &BoardElement,
) -> Result<BoardElement, AppError> {
    let properties = sqlx::types::Json(&element.properties);

    let saved = crate::log_query_fetch_one!(
        "elements.save_element",
        sqlx::query_as::<_, BoardElement>(
            r#"
                WITH updated AS (
                    UPDATE board.element
                    SET
                        x = $2,
                        y = $3,
                        width = $4,
                        height = $5,
                        rotation = $6,
                        z_index = $7,
                        group_id = $8,
                        locked_position = $9,
                        locked_editing = $10,
                        media_id = $11,
                        properties = $12,
                        updated_by = $13,
                        updated_at = $14
                    WHERE id = $1
                    RETURNING *
                )
                SELECT u.*, g.uuid AS group_uuid
                FROM updated u
                LEFT JOIN board.element_group g ON g.id = u.group_id
            "#,
        )
        .bind(element.id)
        .bind(element.x)
        .bind(element.y)
        .bind(element.width)
        .bind(element.height)
        .bind(element.rotation)
        .bind(element.z_index)
        .bind(element.group_id)
        .bind(element.locked_position)
        .bind(element.locked_editing)
        .bind(element.media_id)
        .bind(properties)
        .bind(element.updated_by)
        .bind(element.updated_at)
        .fetch_one(&mut **tx)
    )?;

    Ok(saved)
}

pub async fn assign_group(
    tx: &mut Transaction<'_, Postgres>,
    element_ids: &[i64],
    group_id: Option<i64>,
    actor_id: Option<Uuid>,
    updated_at: DateTime<Utc>,
) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "elements.assign_group",
        sqlx::query(
            r#"
                UPDATE board.element
                SET
                    group_id = $2,
                    updated_by = COALESCE($3, updated_by),
                    updated_at = $4
                WHERE id = ANY($1)
            "#,
        )
        .bind(element_ids)
        .bind(group_id)
        .bind(actor_id)
        .bind(updated_at)
        .execute(&mut **tx)
    )?;

    Ok(result.rows_affected())
}

pub async fn set_z_index(
    tx: &mut Transaction<'_, Postgres>,
    element_id: i64,
    z_index: i32,
    actor_id: Option<Uuid>,
    updated_at: DateTime<Utc>,
) -> Result<BoardElement, AppError> {
    let element = crate::log_query_fetch_one!(
        "elements.set_z_index",
        sqlx::query_as::<_, BoardElement>(
            r#"
                WITH updated AS (
                    UPDATE board.element
                    SET
                        z_index = $2,
                        updated_by = COALESCE($3, updated_by),
                        updated_at = $4
                    WHERE id = $1
                    RETURNING *
                )
                SELECT u.*, g.uuid AS group_uuid
                FROM updated u
                LEFT JOIN board.element_group g ON g.id = u.group_id
            "#,
        )
        .bind(element_id)
        .bind(z_index)
        .bind(actor_id)
        .bind(updated_at)
        .fetch_one(&mut **tx)
    )?;

    Ok(element)
}

pub async fn delete_element(
    tx: &mut Transaction<'_, Postgres>,
    element_id: i64,
) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "elements.delete_element",
        sqlx::query(
            r#"
                DELETE FROM board.element
                WHERE id = $1
            "#,
        )
        .bind(element_id)
        .execute(&mut **tx)
    )?;

    Ok(result.rows_affected())
}
