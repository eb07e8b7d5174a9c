use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::session::Answer;

/// Appends the answer row. The unique (participant, question) constraint is
/// the idempotency guard: a duplicate submission affects zero rows and the
/// caller rolls the surrounding transaction back.
pub async fn insert_answer(
    tx: &mut Transaction<'_, Postgres>,
    answer: &Answer,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO "answer" (
            id, session_id, participant_id, question_index, selected_option,
            is_correct, answer_time_ms, points_earned, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (participant_id, question_index) DO NOTHING
        "#,
    )
    .bind(answer.id)
    .bind(answer.session_id)
    .bind(answer.participant_id)
    .bind(answer.question_index)
    .bind(&answer.selected_option)
    .bind(answer.is_correct)
    .bind(answer.answer_time_ms)
    .bind(answer.points_earned)
    .bind(answer.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(row.rows_affected() > 0)
}

pub async fn get_answer(
    pool: &Pool<Postgres>,
    participant_id: Uuid,
    question_index: i32,
) -> Result<Option<Answer>, sqlx::Error> {
    sqlx::query_as::<_, Answer>(
        r#"
        SELECT id, session_id, participant_id, question_index, selected_option,
               is_correct, answer_time_ms, points_earned, created_at
        FROM "answer"
        WHERE participant_id = $1 AND question_index = $2
        "#,
    )
    .bind(participant_id)
    .bind(question_index)
    .fetch_optional(pool)
    .await
}

/// Raw (selection, correctness) pairs for one question, bucketed by the
/// caller.
pub async fn get_answer_rows(
    pool: &Pool<Postgres>,
    session_id: Uuid,
    question_index: i32,
) -> Result<Vec<(Option<String>, bool)>, sqlx::Error> {
    sqlx::query_as::<_, (Option<String>, bool)>(
        r#"
        SELECT selected_option, is_correct
        FROM "answer"
        WHERE session_id = $1 AND question_index = $2
        "#,
    )
    .bind(session_id)
    .bind(question_index)
    .fetch_all(pool)
    .await
}
