use sqlx::PgConnection;
use uuid::Uuid;

use crate::{error::AppError, models::boards::Board};

pub async fn find_board_by_uuid(
    conn: &mut PgConnection,
    board_uuid: Uuid,
) -> Result<Option<Board>, AppError> {
    let board = crate::log_query_fetch_optional!(
        "boards.find_by_uuid",
        sqlx::query_as::<_, Board>(
            r#"
                SELECT *
                FROM board.board
                WHERE uuid = $1
            "#,
        )
        .bind(board_uuid)
        .fetch_optional(&mut *conn)
    )?;

    Ok(board)
}
