use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    config::app_config::CONFIG,
    models::{
        discussion::{Discussion, DiscussionWithScore, VoteDirection, VoteOutcome},
        error::ServerError,
        page::page_bounds,
    },
};

pub async fn create_discussion(
    pool: &Pool<Postgres>,
    discussion: &Discussion,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO "discussion" (id, author_id, title, body, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(discussion.id)
    .bind(discussion.author_id)
    .bind(&discussion.title)
    .bind(&discussion.body)
    .bind(discussion.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Applies one vote request with toggle semantics. The caller's existing
/// vote row is locked for the duration of the transaction, so two rapid
/// clicks resolve sequentially instead of racing check-then-act.
pub async fn cast_vote(
    pool: &Pool<Postgres>,
    discussion_id: Uuid,
    subject_id: Uuid,
    direction: VoteDirection,
) -> Result<VoteOutcome, ServerError> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_scalar::<_, VoteDirection>(
        r#"
        SELECT direction FROM "discussion_vote"
        WHERE discussion_id = $1 AND subject_id = $2
        FOR UPDATE
        "#,
    )
    .bind(discussion_id)
    .bind(subject_id)
    .fetch_optional(&mut *tx)
    .await?;

    let outcome = VoteOutcome::resolve(existing, direction);
    match outcome {
        VoteOutcome::Added => {
            sqlx::query(
                r#"
                INSERT INTO "discussion_vote" (discussion_id, subject_id, direction, created_at)
                VALUES ($1, $2, $3, now())
                ON CONFLICT (discussion_id, subject_id) DO UPDATE SET direction = EXCLUDED.direction
                "#,
            )
            .bind(discussion_id)
            .bind(subject_id)
            .bind(direction)
            .execute(&mut *tx)
            .await?;
        }
        VoteOutcome::Removed => {
            sqlx::query(
                r#"
                DELETE FROM "discussion_vote"
                WHERE discussion_id = $1 AND subject_id = $2
                "#,
            )
            .bind(discussion_id)
            .bind(subject_id)
            .execute(&mut *tx)
            .await?;
        }
        VoteOutcome::Changed => {
            sqlx::query(
                r#"
                UPDATE "discussion_vote"
                SET direction = $3
                WHERE discussion_id = $1 AND subject_id = $2
                "#,
            )
            .bind(discussion_id)
            .bind(subject_id)
            .bind(direction)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(outcome)
}

/// Net score computed from the vote log at read time, never stored.
pub async fn get_score(pool: &Pool<Postgres>, discussion_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(
            COUNT(*) FILTER (WHERE direction = 'up')
            - COUNT(*) FILTER (WHERE direction = 'down'),
            0
        )
        FROM "discussion_vote"
        WHERE discussion_id = $1
        "#,
    )
    .bind(discussion_id)
    .fetch_one(pool)
    .await
}

pub async fn get_discussion(
    pool: &Pool<Postgres>,
    discussion_id: Uuid,
) -> Result<Option<Discussion>, sqlx::Error> {
    sqlx::query_as::<_, Discussion>(
        r#"
        SELECT id, author_id, title, body, created_at
        FROM "discussion"
        WHERE id = $1
        "#,
    )
    .bind(discussion_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_discussion_page(
    pool: &Pool<Postgres>,
    page_num: u16,
) -> Result<Vec<DiscussionWithScore>, sqlx::Error> {
    let (limit, offset) = page_bounds(CONFIG.server.page_size, page_num);

    sqlx::query_as::<_, DiscussionWithScore>(&format!(
        r#"
        SELECT d.id, d.author_id, d.title, d.body, d.created_at,
               COUNT(*) FILTER (WHERE v.direction = 'up') AS upvotes,
               COUNT(*) FILTER (WHERE v.direction = 'down') AS downvotes,
               COUNT(*) FILTER (WHERE v.direction = 'up')
                   - COUNT(*) FILTER (WHERE v.direction = 'down') AS score
        FROM "discussion" d
        LEFT JOIN "discussion_vote" v ON v.discussion_id = d.id
        GROUP BY d.id
        ORDER BY d.created_at DESC
        LIMIT {} OFFSET {}
        "#,
        limit, offset
    ))
    .fetch_all(pool)
    .await
}
