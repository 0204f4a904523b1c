use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    auth::ActorContext, error::AppError, models::boards::Board,
    repositories::boards as board_repo,
};

/// Resolves public board tokens and applies expiry and ownership rules.
pub struct BoardDirectory;

impl BoardDirectory {
    pub async fn resolve(
        conn: &mut PgConnection,
        board_uuid: Uuid,
        actor: ActorContext,
    ) -> Result<Board, AppError> {
        let board = board_repo::find_board_by_uuid(conn, board_uuid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Board not found: {}", board_uuid)))?;
        ensure_board_access(&board, actor, Utc::now())?;
        Ok(board)
    }
}

fn ensure_board_access(
    board: &Board,
    actor: ActorContext,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if board.is_expired_at(now) {
        return Err(AppError::NotFound("Board expired".to_string()));
    }
    if let Some(owner_id) = board.owner_id {
        if actor.user_id != Some(owner_id) {
            return Err(AppError::Forbidden(
                "You do not have access to this board".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::ensure_board_access;
    use crate::{auth::ActorContext, error::AppError, models::boards::Board};

    fn board(owner_id: Option<Uuid>, expires_in: Option<Duration>) -> Board {
        let now = Utc::now();
        Board {
            id: 1,
            uuid: Uuid::new_v4(),
            title: "Sketches".to_string(),
            temporary: owner_id.is_none(),
            owner_id,
            expires_at: expires_in.map(|delta| now + delta),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn anonymous_actor_may_use_ownerless_board() {
        let board = board(None, Some(Duration::days(7)));
        assert!(ensure_board_access(&board, ActorContext::anonymous(), Utc::now()).is_ok());
    }

    #[test]
    fn expired_temporary_board_is_not_found() {
        let board = board(None, Some(Duration::minutes(-5)));
        let err = ensure_board_access(&board, ActorContext::anonymous(), Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn owned_board_requires_owner() {
        let owner = Uuid::new_v4();
        let board = board(Some(owner), None);
        assert!(ensure_board_access(&board, ActorContext::user(owner), Utc::now()).is_ok());

        let stranger = ensure_board_access(&board, ActorContext::user(Uuid::new_v4()), Utc::now());
        assert!(matches!(stranger, Err(AppError::Forbidden(_))));

        let anonymous = ensure_board_access(&board, ActorContext::anonymous(), Utc::now());
        assert!(matches!(anonymous, Err(AppError::Forbidden(_))));
    }
}
