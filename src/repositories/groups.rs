use sqlx::{PgConnection, Postgres, Transaction};
use uuid::Uuid;

use crate::{error::AppError, models::groups::ElementGroup};

pub async fn find_group_for_board(
    conn: &mut PgConnection,
    board_id: i64,
    group_uuid: Uuid,
) -> Result<Option<ElementGroup>, AppError> {
    let group = crate::log_query_fetch_optional!(
        "groups.find_for_board",
        sqlx::query_as::<_, ElementGroup>(
            r#"
                SELECT *
                FROM board.element_group
                WHERE uuid = $1
                  AND board_id = $2
            "#,
        )
        .bind(group_uuid)
        .bind(board_id)
        .fetch_optional(&mut *conn)
    )?;

    Ok(group)
}

pub async fn create_group(
    tx: &mut Transaction<'_, Postgres>,
    board_id: i64,
    group_uuid: Uuid,
    name: &str,
) -> Result<ElementGroup, AppError> {
    let group = crate::log_query_fetch_one!(
        "groups.create_group",
        sqlx::query_as::<_, ElementGroup>(
            r#"
                INSERT INTO board.element_group (uuid, board_id, name)
                VALUES ($1, $2, $3)
                RETURNING *
            "#,
        )
        .bind(group_uuid)
        .bind(board_id)
        .bind(name)
        .fetch_one(&mut **tx)
    )?;

    Ok(group)
}

pub async fn delete_group(
    tx: &mut Transaction<'_, Postgres>,
    group_id: i64,
) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "groups.delete_group",
        sqlx::query(
            r#"
                DELETE FROM board.element_group
                WHERE id = $1
            "#,
        )
        .bind(group_id)
        .execute(&mut **tx)
    )?;

    Ok(result.rows_affected())
}

/// Removes the listed groups that no longer have any member element.
pub async fn delete_empty_groups(
    tx: &mut Transaction<'_, Postgres>,
    group_ids: &[i64],
) -> Result<u64, AppError> {
    if group_ids.is_empty() {
        return Ok(0);
    }

    let result = crate::log_query_execute!(
        "groups.delete_empty_groups",
        sqlx::query(
            r#"
                DELETE FROM board.element_group g
                WHERE g.id = ANY($1)
                  AND NOT EXISTS (
                      SELECT 1
                      FROM board.element e
                      WHERE e.group_id = g.id
                  )
            "#,
        )
        .bind(group_ids)
        .execute(&mut **tx)
    )?;

    Ok(result.rows_affected())
}
