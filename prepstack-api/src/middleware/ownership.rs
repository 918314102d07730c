/// Entity ownership checks
///
/// Mutating handlers call these before touching a row: absent entity → 404,
/// owner mismatch → 403. The fetch-then-compare runs against the owner
/// column only, not the full row.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use prepstack_shared::models::{answer::Answer, comment::Comment, post::Post};

fn check(owner: Option<Uuid>, user_id: Uuid, entity: &str) -> ApiResult<()> {
    match owner {
        None => Err(ApiError::NotFound(format!("{} not found", entity))),
        Some(owner) if owner != user_id => Err(ApiError::Forbidden(format!(
            "Not the owner of this {}",
            entity.to_lowercase()
        ))),
        Some(_) => Ok(()),
    }
}

pub async fn ensure_answer_owner(pool: &PgPool, answer_id: Uuid, user_id: Uuid) -> ApiResult<()> {
    check(Answer::owner_of(pool, answer_id).await?, user_id, "Answer")
}

pub async fn ensure_comment_owner(pool: &PgPool, comment_id: Uuid, user_id: Uuid) -> ApiResult<()> {
    check(
        Comment::owner_of(pool, comment_id).await?,
        user_id,
        "Comment",
    )
}

pub async fn ensure_post_owner(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> ApiResult<()> {
    check(Post::owner_of(pool, post_id).await?, user_id, "Post")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_missing_entity_is_not_found() {
        let result = check(None, Uuid::new_v4(), "Answer");
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_check_wrong_owner_is_forbidden() {
        let result = check(Some(Uuid::new_v4()), Uuid::new_v4(), "Answer");
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn test_check_owner_passes() {
        let user_id = Uuid::new_v4();
        assert!(check(Some(user_id), user_id, "Answer").is_ok());
    }
}
