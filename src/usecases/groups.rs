use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::ActorContext,
    dto::elements::{GroupElementsRequest, GroupElementsResponse, UngroupElementsRequest},
    error::AppError,
    models::{elements::BoardElement, groups::DEFAULT_GROUP_NAME, history::HistoryEventType},
    repositories::{elements as element_repo, groups as group_repo},
    telemetry::BusinessEvent,
    usecases::{
        boards::BoardDirectory,
        history::{HistoryEntry, HistoryRecorder},
        references::{self, dedupe_ids, ensure_not_empty, parse_group_ref},
    },
};

const MAX_GROUP_NAME_LENGTH: usize = 200;

pub struct GroupService;

impl GroupService {
    pub async fn group_elements(
        pool: &PgPool,
        board_uuid: Uuid,
        actor: ActorContext,
        req: GroupElementsRequest,
    ) -> Result<GroupElementsResponse, AppError> {
        ensure_not_empty(&req.element_ids, "element id")?;
        let name = normalize_group_name(req.name.as_deref())?;
        let element_ids = dedupe_ids(&req.element_ids);

        let mut tx = pool.begin().await?;
        let board = BoardDirectory::resolve(&mut tx, board_uuid, actor).await?;
        let elements = references::load_elements_for_board(&mut tx, &board, &element_ids).await?;

        let group = group_repo::create_group(&mut tx, board.id, Uuid::new_v4(), &name).await?;
        element_repo::assign_group(&mut tx, &element_ids, Some(group.id), actor.user_id, Utc::now())
            .await?;
        group_repo::delete_empty_groups(&mut tx, &vacated_group_ids(&elements, Some(group.id)))
            .await?;

        HistoryRecorder::append(
            &mut tx,
            &board,
            actor,
            HistoryEntry::new(HistoryEventType::ElementGrouped).after(&element_ids),
        )
        .await?;
        tx.commit().await?;

        BusinessEvent::ElementsGrouped {
            board_id: board.uuid,
            group_id: group.uuid,
            element_count: element_ids.len(),
            actor_id: actor.user_id,
        }
        .log();

        Ok(GroupElementsResponse {
            group_id: group.uuid,
            element_ids,
        })
    }

    /// Clears the group from all of its members and deletes it. Groups of
    /// other boards are reported as not found.
    pub async fn ungroup_elements(
        pool: &PgPool,
        board_uuid: Uuid,
        actor: ActorContext,
        req: UngroupElementsRequest,
    ) -> Result<(), AppError> {
        let group_uuid = parse_group_ref(&req.group_id)?;

        let mut tx = pool.begin().await?;
        let board = BoardDirectory::resolve(&mut tx, board_uuid, actor).await?;
        let group = group_repo::find_group_for_board(&mut tx, board.id, group_uuid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group not found: {}", group_uuid)))?;

        let members = element_repo::list_elements_by_group(&mut tx, group.id).await?;
        let member_ids: Vec<i64> = members.iter().map(|element| element.id).collect();

        if !member_ids.is_empty() {
            element_repo::assign_group(&mut tx, &member_ids, None, actor.user_id, Utc::now())
                .await?;
        }
        group_repo::delete_group(&mut tx, group.id).await?;

        HistoryRecorder::append(
            &mut tx,
            &board,
            actor,
            HistoryEntry::new(HistoryEventType::ElementUngrouped).before(&member_ids),
        )
        .await?;
        tx.commit().await?;

        BusinessEvent::ElementsUngrouped {
            board_id: board.uuid,
            group_id: group.uuid,
            element_count: member_ids.len(),
            actor_id: actor.user_id,
        }
        .log();

        Ok(())
    }
}

/// Groups the given elements belonged to before moving to `new_group`.
/// Each id appears once.
fn vacated_group_ids(elements: &[BoardElement], new_group: Option<i64>) -> Vec<i64> {
    let previous: Vec<i64> = elements
        .iter()
        .filter_map(|element| element.group_id)
        .filter(|group_id| Some(*group_id) != new_group)
        .collect();
    dedupe_ids(&previous)
}

fn normalize_group_name(name: Option<&str>) -> Result<String, AppError> {
    let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) else {
        return Ok(DEFAULT_GROUP_NAME.to_string());
    };
    if name.chars().count() > MAX_GROUP_NAME_LENGTH {
        return Err(AppError::ValidationError(format!(
            "Group name exceeds maximum of {MAX_GROUP_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_group_name, vacated_group_ids};
    use crate::models::elements::fixtures::element;

    #[test]
    fn vacated_groups_are_listed_once() {
        let mut first = element(1, 1, 0);
        first.group_id = Some(4);
        let mut second = element(2, 1, 0);
        second.group_id = Some(4);
        let mut third = element(3, 1, 0);
        third.group_id = Some(9);
        let loose = element(5, 1, 0);

        let elements = [first, second, third, loose];
        assert_eq!(vacated_group_ids(&elements, Some(20)), vec![4, 9]);
        assert_eq!(vacated_group_ids(&elements, Some(9)), vec![4]);
        assert!(vacated_group_ids(&elements[3..], None).is_empty());
    }

    #[test]
    fn group_name_defaults_when_missing_or_blank() {
        assert_eq!(normalize_group_name(None).unwrap(), "Group");
        assert_eq!(normalize_group_name(Some("   ")).unwrap(), "Group");
    }

    #[test]
    fn group_name_is_trimmed() {
        assert_eq!(normalize_group_name(Some("  Header row ")).unwrap(), "Header row");
    }

    #[test]
    fn group_name_length_is_bounded() {
        let long = "x".repeat(201);
        assert!(normalize_group_name(Some(&long)).is_err());
    }
}
