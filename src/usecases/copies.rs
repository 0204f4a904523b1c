use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::ActorContext,
    dto::elements::{CopyElementsRequest, CopyElementsResponse, ElementCopy},
    error::AppError,
    models::{elements::BoardElement, history::HistoryEventType},
    repositories::elements::{self as element_repo, CreateElementParams},
    telemetry::BusinessEvent,
    usecases::{
        boards::BoardDirectory,
        history::{HistoryEntry, HistoryRecorder},
        references::{self, dedupe_ids, ensure_not_empty},
    },
};

pub struct CopyService;

impl CopyService {
    pub async fn copy_elements(
        pool: &PgPool,
        board_uuid: Uuid,
        actor: ActorContext,
        req: CopyElementsRequest,
    ) -> Result<CopyElementsResponse, AppError> {
        ensure_not_empty(&req.element_ids, "element id")?;
        validate_offset(req.offset_x, req.offset_y)?;
        let source_ids = dedupe_ids(&req.element_ids);

        let mut tx = pool.begin().await?;
        let board = BoardDirectory::resolve(&mut tx, board_uuid, actor).await?;
        let sources = references::load_elements_for_board(&mut tx, &board, &source_ids).await?;

        let now = Utc::now();
        let mut copies = Vec::with_capacity(sources.len());
        for source in &sources {
            let params = plan_copy(source, req.offset_x, req.offset_y, actor, now)?;
            let created = element_repo::create_element(&mut tx, params).await?;
            copies.push(ElementCopy {
                source_id: source.id,
                new_id: created.id,
            });
        }

        HistoryRecorder::append(
            &mut tx,
            &board,
            actor,
            HistoryEntry::new(HistoryEventType::ElementCopied)
                .before(&source_ids)
                .after(&copies),
        )
        .await?;
        tx.commit().await?;

        BusinessEvent::ElementsCopied {
            board_id: board.uuid,
            element_count: copies.len(),
            actor_id: actor.user_id,
        }
        .log();

        Ok(CopyElementsResponse { copies })
    }
}

/// Builds the insert for one clone: shifted position, one layer above the
/// source, same group/media/properties, locks cleared and fresh audit stamps.
fn plan_copy(
    source: &BoardElement,
    offset_x: f64,
    offset_y: f64,
    actor: ActorContext,
    now: DateTime<Utc>,
) -> Result<CreateElementParams, AppError> {
    let x = source.x + offset_x;
    let y = source.y + offset_y;
    if !x.is_finite() || !y.is_finite() {
        return Err(AppError::ValidationError(format!(
            "Copy of element {} would leave the finite coordinate range",
            source.id
        )));
    }

    Ok(CreateElementParams {
        board_id: source.board_id,
        element_type: source.element_type,
        x,
        y,
        width: source.width,
        height: source.height,
        rotation: source.rotation,
        z_index: source.z_index.saturating_add(1),
        group_id: source.group_id,
        media_id: source.media_id,
        properties: source.properties.clone(),
        created_by: actor.user_id,
        created_at: now,
    })
}

fn validate_offset(offset_x: f64, offset_y: f64) -> Result<(), AppError> {
    if !offset_x.is_finite() || !offset_y.is_finite() {
        return Err(AppError::ValidationError(
            "Copy offset must be finite numbers".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{plan_copy, validate_offset};
    use crate::{auth::ActorContext, models::elements::fixtures::element};

    #[test]
    fn copy_shifts_position_and_raises_z_index() {
        let mut source = element(4, 1, 6);
        source.group_id = Some(12);
        source.media_id = Some(30);
        source.locked_position = true;
        source.locked_editing = true;
        source.properties = serde_json::json!({ "points": [0, 0, 10, 10], "stroke": "#f00" });

        let actor = ActorContext::user(Uuid::new_v4());
        let now = Utc::now();
        let params = plan_copy(&source, 10.0, -5.0, actor, now).unwrap();

        assert_eq!(params.board_id, source.board_id);
        assert_eq!(params.element_type, source.element_type);
        assert_eq!(params.x, source.x + 10.0);
        assert_eq!(params.y, source.y - 5.0);
        assert_eq!(params.width, source.width);
        assert_eq!(params.height, source.height);
        assert_eq!(params.rotation, source.rotation);
        assert_eq!(params.z_index, 7);
        assert_eq!(params.group_id, Some(12));
        assert_eq!(params.media_id, Some(30));
        assert_eq!(params.properties, source.properties);
        assert_eq!(params.created_by, actor.user_id);
        assert_eq!(params.created_at, now);
    }

    #[test]
    fn anonymous_copy_has_no_creator() {
        let params = plan_copy(&element(1, 1, 0), 0.0, 0.0, ActorContext::anonymous(), Utc::now())
            .unwrap();
        assert!(params.created_by.is_none());
    }

    #[test]
    fn copy_offset_cannot_overflow_coordinates() {
        let mut source = element(3, 1, 0);
        source.x = f64::MAX;
        let actor = ActorContext::anonymous();
        assert!(plan_copy(&source, f64::MAX, 0.0, actor, Utc::now()).is_err());

        source.x = 0.0;
        source.y = -f64::MAX;
        assert!(plan_copy(&source, 0.0, -f64::MAX, actor, Utc::now()).is_err());
        assert!(plan_copy(&source, 0.0, f64::MAX, actor, Utc::now()).is_ok());
    }

    #[test]
    fn offset_must_be_finite() {
        assert!(validate_offset(f64::NAN, 0.0).is_err());
        assert!(validate_offset(0.0, f64::INFINITY).is_err());
        assert!(validate_offset(-3.5, 12.0).is_ok());
    }
}
