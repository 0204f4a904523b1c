use std::collections::HashSet;

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    auth::ActorContext,
    dto::elements::{BoardElementResponse, ElementOrder, ReorderElementsRequest},
    error::AppError,
    models::{boards::Board, history::HistoryEventType},
    repositories::elements as element_repo,
    telemetry::BusinessEvent,
    usecases::{
        boards::BoardDirectory,
        history::{HistoryEntry, HistoryRecorder},
        references::{self, ensure_not_empty},
    },
};

/// Stacking index for a new element: one above the current top, or zero on an
/// empty board.
pub fn next_z_index(current_max: Option<i32>) -> i32 {
    current_max.map_or(0, |max| max.saturating_add(1))
}

pub async fn default_z_index(conn: &mut PgConnection, board: &Board) -> Result<i32, AppError> {
    let current_max = element_repo::max_z_index(conn, board.id).await?;
    Ok(next_z_index(current_max))
}

pub struct OrderingService;

impl OrderingService {
    /// Applies a batch of z-index assignments. Every id is resolved and scope
    /// checked before the first write.
    pub async fn reorder(
        pool: &PgPool,
        board_uuid: Uuid,
        actor: ActorContext,
        req: ReorderElementsRequest,
    ) -> Result<(), AppError> {
        let orders = validate_orders(req.orders)?;
        let element_ids: Vec<i64> = orders.iter().map(|order| order.id).collect();

        let mut tx = pool.begin().await?;
        let board = BoardDirectory::resolve(&mut tx, board_uuid, actor).await?;
        let elements = references::load_elements_for_board(&mut tx, &board, &element_ids).await?;

        let before: Vec<BoardElementResponse> =
            elements.iter().map(BoardElementResponse::from).collect();

        let now = Utc::now();
        let mut after = Vec::with_capacity(orders.len());
        for order in &orders {
            let updated =
                element_repo::set_z_index(&mut tx, order.id, order.z_index, actor.user_id, now)
                    .await?;
            after.push(BoardElementResponse::from(updated));
        }

        HistoryRecorder::append(
            &mut tx,
            &board,
            actor,
            HistoryEntry::new(HistoryEventType::ElementReordered)
                .before(&before)
                .after(&after),
        )
        .await?;
        tx.commit().await?;

        BusinessEvent::ElementsReordered {
            board_id: board.uuid,
            element_count: orders.len(),
            actor_id: actor.user_id,
        }
        .log();

        Ok(())
    }
}

fn validate_orders(orders: Vec<ElementOrder>) -> Result<Vec<ElementOrder>, AppError> {
    ensure_not_empty(&orders, "order")?;
    let mut seen = HashSet::with_capacity(orders.len());
    for order in &orders {
        if !seen.insert(order.id) {
            return Err(AppError::ValidationError(format!(
                "Duplicate element id in reorder request: {}",
                order.id
            )));
        }
    }
    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::{next_z_index, validate_orders};
    use crate::dto::elements::ElementOrder;

    #[test]
    fn empty_board_starts_at_zero() {
        assert_eq!(next_z_index(None), 0);
    }

    #[test]
    fn next_index_sits_above_current_max() {
        assert_eq!(next_z_index(Some(0)), 1);
        assert_eq!(next_z_index(Some(41)), 42);
        assert_eq!(next_z_index(Some(-3)), -2);
    }

    #[test]
    fn next_index_saturates() {
        assert_eq!(next_z_index(Some(i32::MAX)), i32::MAX);
    }

    #[test]
    fn reorder_rejects_duplicates_and_empty_batches() {
        assert!(validate_orders(Vec::new()).is_err());

        let duplicate = vec![
            ElementOrder { id: 1, z_index: 3 },
            ElementOrder { id: 1, z_index: 4 },
        ];
        assert!(validate_orders(duplicate).is_err());

        let valid = vec![
            ElementOrder { id: 1, z_index: 3 },
            ElementOrder { id: 2, z_index: 0 },
        ];
        assert_eq!(validate_orders(valid).unwrap().len(), 2);
    }
}
