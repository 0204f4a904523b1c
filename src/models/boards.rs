use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Board record as owned by the board directory. Elements only reference it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Board {
    pub id: i64,
    pub uuid: Uuid,
    pub title: String,
    pub temporary: bool,
    pub owner_id: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Temporary ownerless boards stop resolving once their expiry has passed.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        if !self.temporary || self.owner_id.is_some() {
            return false;
        }
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::Board;

    fn board(temporary: bool, owner_id: Option<Uuid>, expires_in: Option<Duration>) -> Board {
        let now = Utc::now();
        Board {
            id: 1,
            uuid: Uuid::new_v4(),
            title: "Untitled board".to_string(),
            temporary,
            owner_id,
            expires_at: expires_in.map(|delta| now + delta),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn temporary_board_expires_after_deadline() {
        let board = board(true, None, Some(Duration::hours(-1)));
        assert!(board.is_expired_at(Utc::now()));
    }

    #[test]
    fn temporary_board_alive_before_deadline() {
        let board = board(true, None, Some(Duration::hours(1)));
        assert!(!board.is_expired_at(Utc::now()));
    }

    #[test]
    fn owned_or_permanent_boards_never_expire() {
        let owned = board(true, Some(Uuid::new_v4()), Some(Duration::hours(-1)));
        let permanent = board(false, None, Some(Duration::hours(-1)));
        assert!(!owned.is_expired_at(Utc::now()));
        assert!(!permanent.is_expired_at(Utc::now()));
    }
}
