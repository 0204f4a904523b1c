use crate::{error::AppError, models::elements::BoardElement};

/// Application-level lock gates. `locked_position` only blocks transforms and
/// `locked_editing` only blocks partial updates; neither blocks deletion,
/// copying, grouping, reordering or changing the locks themselves.
pub struct LockPolicy;

impl LockPolicy {
    pub fn ensure_can_transform(element: &BoardElement) -> Result<(), AppError> {
        if element.locked_position {
            return Err(AppError::ValidationError(format!(
                "Element position is locked: {}",
                element.id
            )));
        }
        Ok(())
    }

    pub fn ensure_can_edit(element: &BoardElement) -> Result<(), AppError> {
        if element.locked_editing {
            return Err(AppError::ValidationError(format!(
                "Element editing is locked: {}",
                element.id
            )));
        }
        Ok(())
    }

    /// Applies whichever flags were supplied, leaving the others untouched.
    pub fn apply(
        element: &mut BoardElement,
        locked_position: Option<bool>,
        locked_editing: Option<bool>,
    ) {
        if let Some(value) = locked_position {
            element.locked_position = value;
        }
        if let Some(value) = locked_editing {
            element.locked_editing = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LockPolicy;
    use crate::models::elements::fixtures::element;

    #[test]
    fn position_lock_blocks_transform_only() {
        let mut locked = element(1, 1, 0);
        locked.locked_position = true;
        assert!(LockPolicy::ensure_can_transform(&locked).is_err());
        assert!(LockPolicy::ensure_can_edit(&locked).is_ok());
    }

    #[test]
    fn editing_lock_blocks_update_only() {
        let mut locked = element(1, 1, 0);
        locked.locked_editing = true;
        assert!(LockPolicy::ensure_can_edit(&locked).is_err());
        assert!(LockPolicy::ensure_can_transform(&locked).is_ok());
    }

    #[test]
    fn apply_changes_flags_independently() {
        let mut target = element(1, 1, 0);
        LockPolicy::apply(&mut target, Some(true), None);
        assert!(target.locked_position);
        assert!(!target.locked_editing);

        LockPolicy::apply(&mut target, None, Some(true));
        assert!(target.locked_position);
        assert!(target.locked_editing);

        LockPolicy::apply(&mut target, Some(false), None);
        assert!(!target.locked_position);
        assert!(target.locked_editing);
    }
}
