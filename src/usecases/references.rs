//! Referential integrity between elements, groups, media assets and boards.
//!
//! Every lookup here runs before any write of the calling operation, so a
//! failed check leaves nothing behind once the transaction is dropped.

use std::collections::{HashMap, HashSet};

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{boards::Board, elements::BoardElement, groups::ElementGroup, media::MediaAsset},
    repositories::{elements as element_repo, groups as group_repo, media as media_repo},
};

/// Loads and row-locks one element for a mutation.
pub async fn load_element_for_board(
    conn: &mut PgConnection,
    board: &Board,
    element_id: i64,
) -> Result<BoardElement, AppError> {
    let element = element_repo::find_element_for_update(conn, element_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Element not found: {}", element_id)))?;
    ensure_board_scope(board, &element)?;
    Ok(element)
}

/// Loads a batch in request order. `element_ids` must already be unique.
pub async fn load_elements_for_board(
    conn: &mut PgConnection,
    board: &Board,
    element_ids: &[i64],
) -> Result<Vec<BoardElement>, AppError> {
    let found = element_repo::find_elements_by_ids(conn, element_ids).await?;
    let elements = order_resolved(element_ids, found)?;
    for element in &elements {
        ensure_board_scope(board, element)?;
    }
    Ok(elements)
}

pub async fn resolve_group_ref(
    conn: &mut PgConnection,
    board: &Board,
    raw_group_id: &str,
) -> Result<ElementGroup, AppError> {
    let group_uuid = parse_group_ref(raw_group_id)?;
    group_repo::find_group_for_board(conn, board.id, group_uuid)
        .await?
        .ok_or_else(|| AppError::ValidationError(format!("Group not found: {}", raw_group_id)))
}

pub async fn resolve_media(
    conn: &mut PgConnection,
    board: &Board,
    media_id: i64,
) -> Result<MediaAsset, AppError> {
    media_repo::find_media_asset(conn, media_id)
        .await?
        .filter(|asset| asset.is_usable_on(board.id))
        .ok_or_else(|| AppError::ValidationError(format!("Media asset not found: {}", media_id)))
}

pub fn parse_group_ref(raw_group_id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw_group_id.trim())
        .map_err(|_| AppError::ValidationError(format!("Invalid group id: {:?}", raw_group_id)))
}

pub fn ensure_board_scope(board: &Board, element: &BoardElement) -> Result<(), AppError> {
    if !element.belongs_to(board.id) {
        return Err(AppError::ValidationError(format!(
            "Element {} does not belong to board {}",
            element.id, board.id
        )));
    }
    Ok(())
}

pub fn ensure_not_empty<T>(items: &[T], label: &str) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::ValidationError(format!(
            "At least one {} is required",
            label
        )));
    }
    Ok(())
}

/// Drops repeated ids, keeping the first occurrence.
pub fn dedupe_ids(element_ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(element_ids.len());
    element_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

fn order_resolved(
    requested: &[i64],
    found: Vec<BoardElement>,
) -> Result<Vec<BoardElement>, AppError> {
    if found.len() != requested.len() {
        return Err(AppError::ValidationError(
            "Some elements not found".to_string(),
        ));
    }
    let mut by_id: HashMap<i64, BoardElement> = found
        .into_iter()
        .map(|element| (element.id, element))
        .collect();
    requested
        .iter()
        .map(|id| {
            by_id
                .remove(id)
                .ok_or_else(|| AppError::ValidationError("Some elements not found".to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{dedupe_ids, ensure_board_scope, ensure_not_empty, order_resolved, parse_group_ref};
    use crate::{
        error::AppError,
        models::{boards::Board, elements::fixtures::element},
    };

    fn board(id: i64) -> Board {
        let now = Utc::now();
        Board {
            id,
            uuid: Uuid::new_v4(),
            title: "Roadmap".to_string(),
            temporary: false,
            owner_id: None,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn dedupe_keeps_first_occurrence_order() {
        assert_eq!(dedupe_ids(&[4, 2, 4, 9, 2]), vec![4, 2, 9]);
    }

    #[test]
    fn order_resolved_restores_request_order() {
        let found = vec![element(1, 1, 0), element(5, 1, 0), element(3, 1, 0)];
        let ordered = order_resolved(&[5, 1, 3], found).unwrap();
        let ids: Vec<i64> = ordered.iter().map(|element| element.id).collect();
        assert_eq!(ids, vec![5, 1, 3]);
    }

    #[test]
    fn order_resolved_rejects_missing_ids() {
        let found = vec![element(1, 1, 0), element(2, 1, 0)];
        let err = order_resolved(&[1, 2, 3], found).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(msg) if msg == "Some elements not found"));
    }

    #[test]
    fn cross_board_element_is_a_validation_error() {
        let err = ensure_board_scope(&board(1), &element(7, 2, 0)).unwrap_err();
        assert!(
            matches!(err, AppError::ValidationError(msg) if msg == "Element 7 does not belong to board 1")
        );
        assert!(ensure_board_scope(&board(2), &element(7, 2, 0)).is_ok());
    }

    #[test]
    fn malformed_group_ref_is_rejected() {
        assert!(parse_group_ref("").is_err());
        assert!(parse_group_ref("group-1").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_group_ref(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn empty_batches_are_rejected() {
        assert!(ensure_not_empty::<i64>(&[], "element id").is_err());
        assert!(ensure_not_empty(&[1_i64], "element id").is_ok());
    }
}
