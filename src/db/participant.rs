use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::{leaderboard::SessionStandingRow, session::Participant};

/// Inserts the participant unless the subject already joined this session.
/// Returns false on the conflict so callers can fall back to the existing
/// row instead of double-registering.
pub async fn create_participant(
    pool: &Pool<Postgres>,
    participant: &Participant,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO "participant" (
            id, session_id, subject_id, nickname, score, streak, longest_streak,
            correct_count, answered_count, status, joined_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (session_id, subject_id) DO NOTHING
        "#,
    )
    .bind(participant.id)
    .bind(participant.session_id)
    .bind(participant.subject_id)
    .bind(&participant.nickname)
    .bind(participant.score)
    .bind(participant.streak)
    .bind(participant.longest_streak)
    .bind(participant.correct_count)
    .bind(participant.answered_count)
    .bind(participant.status)
    .bind(participant.joined_at)
    .execute(pool)
    .await?;

    Ok(row.rows_affected() > 0)
}

pub async fn get_by_session_and_subject(
    pool: &Pool<Postgres>,
    session_id: Uuid,
    subject_id: Uuid,
) -> Result<Option<Participant>, sqlx::Error> {
    sqlx::query_as::<_, Participant>(
        r#"
        SELECT id, session_id, subject_id, nickname, score, streak, longest_streak,
               correct_count, answered_count, status, joined_at
        FROM "participant"
        WHERE session_id = $1 AND subject_id = $2
        "#,
    )
    .bind(session_id)
    .bind(subject_id)
    .fetch_optional(pool)
    .await
}

/// Applies one scored answer to the participant's counters as a single
/// update, arithmetic done in SQL so concurrent submissions cannot lose
/// increments. Returns the new (score, streak).
pub async fn apply_score(
    tx: &mut Transaction<'_, Postgres>,
    participant_id: Uuid,
    points: i32,
    new_streak: i32,
    is_correct: bool,
) -> Result<(i32, i32), sqlx::Error> {
    sqlx::query_as::<_, (i32, i32)>(
        r#"
        UPDATE "participant"
        SET score = score + $2,
            streak = $3,
            longest_streak = GREATEST(longest_streak, $3),
            correct_count = correct_count + $4,
            answered_count = answered_count + 1
        WHERE id = $1
        RETURNING score, streak
        "#,
    )
    .bind(participant_id)
    .bind(points)
    .bind(new_streak)
    .bind(if is_correct { 1_i32 } else { 0_i32 })
    .fetch_one(&mut **tx)
    .await
}

/// Standings ordered by score, ties broken by join time. Rank numbers are
/// assigned by the caller.
pub async fn get_standings(
    pool: &Pool<Postgres>,
    session_id: Uuid,
) -> Result<Vec<SessionStandingRow>, sqlx::Error> {
    sqlx::query_as::<_, SessionStandingRow>(
        r#"
        SELECT id AS participant_id, nickname, score, joined_at
        FROM "participant"
        WHERE session_id = $1
        ORDER BY score DESC, joined_at ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
}
