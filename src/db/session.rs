use chrono::{Duration, Utc};
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{config::app_config::CONFIG, models::session::QuizSession};

pub async fn create_session(
    pool: &Pool<Postgres>,
    session: &QuizSession,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO "quiz_session" (
            id, quiz_id, host_id, status, current_index, total_questions,
            points_per_question, question_timer_seconds, speed_bonus_enabled,
            max_speed_bonus, streak_multiplier_enabled, question_started_at,
            started_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(session.id)
    .bind(session.quiz_id)
    .bind(session.host_id)
    .bind(session.status)
    .bind(session.current_index)
    .bind(session.total_questions)
    .bind(session.points_per_question)
    .bind(session.question_timer_seconds)
    .bind(session.speed_bonus_enabled)
    .bind(session.max_speed_bonus)
    .bind(session.streak_multiplier_enabled)
    .bind(session.question_started_at)
    .bind(session.started_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_session(
    pool: &Pool<Postgres>,
    session_id: Uuid,
) -> Result<Option<QuizSession>, sqlx::Error> {
    sqlx::query_as::<_, QuizSession>(
        r#"
        SELECT
            id, quiz_id, host_id, status, current_index, total_questions,
            points_per_question, question_timer_seconds, speed_bonus_enabled,
            max_speed_bonus, streak_multiplier_enabled, question_started_at,
            started_at, finished_at
        FROM "quiz_session"
        WHERE id = $1
        "#,
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_active_session_by_quiz(
    pool: &Pool<Postgres>,
    quiz_id: Uuid,
) -> Result<Option<QuizSession>, sqlx::Error> {
    sqlx::query_as::<_, QuizSession>(
        r#"
        SELECT
            id, quiz_id, host_id, status, current_index, total_questions,
            points_per_question, question_timer_seconds, speed_bonus_enabled,
            max_speed_bonus, streak_multiplier_enabled, question_started_at,
            started_at, finished_at
        FROM "quiz_session"
        WHERE quiz_id = $1 AND status = 'active'
        ORDER BY started_at DESC
        LIMIT 1
        "#,
    )
    .bind(quiz_id)
    .fetch_optional(pool)
    .await
}

/// Single conditional update: only moves forward, only while active, only
/// when a next question exists. Returns the new index, or None when the
/// guard did not match (finished session or last question).
pub async fn advance_current_index(
    pool: &Pool<Postgres>,
    session_id: Uuid,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r#"
        UPDATE "quiz_session"
        SET current_index = current_index + 1, question_started_at = now()
        WHERE id = $1 AND status = 'active' AND current_index + 1 < total_questions
        RETURNING current_index
        "#,
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await
}

/// Flips the session to finished. The status guard makes the flip happen at
/// most once; callers skip the completion bookkeeping when no row matched.
pub async fn finish_session(
    tx: &mut Transaction<'_, Postgres>,
    session_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE "quiz_session"
        SET status = 'finished', finished_at = now()
        WHERE id = $1 AND status = 'active'
        "#,
    )
    .bind(session_id)
    .execute(&mut **tx)
    .await?;

    Ok(row.rows_affected() > 0)
}

pub async fn finish_participants(
    tx: &mut Transaction<'_, Postgres>,
    session_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE "participant"
        SET status = 'finished'
        WHERE session_id = $1
        "#,
    )
    .bind(session_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn delete_stale_finished_sessions(
    pool: &Pool<Postgres>,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let timeout = Utc::now() - Duration::hours(CONFIG.server.finished_session_retention as i64);

    sqlx::query_scalar::<_, Uuid>(
        r#"
        DELETE FROM "quiz_session"
        WHERE status = 'finished' AND finished_at < $1
        RETURNING id
        "#,
    )
    .bind(timeout)
    .fetch_all(pool)
    .await
}
