use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    config::app_config::CONFIG,
    models::{
        leaderboard::{GlobalLeaderboardEntry, LeaderboardAggregate},
        page::page_bounds,
    },
};

/// Point and correct-answer increments one scored answer contributes to the
/// caller's aggregate row. Incorrect answers contribute nothing.
pub fn answer_credit_parts(points: i32, is_correct: bool) -> (i64, i32) {
    if is_correct {
        (points as i64, 1)
    } else {
        (0, 0)
    }
}

/// Credits one scored answer to the caller's running totals. A single atomic
/// upsert: the row is created on first contact and every counter moves by an
/// increment, so concurrent answers from the same user cannot clobber each
/// other with stale reads. Incorrect answers only move the attempt counter
/// and leave last_activity untouched.
pub async fn upsert_answer_credit(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    points: i32,
    is_correct: bool,
) -> Result<(), sqlx::Error> {
    let (points, correct) = answer_credit_parts(points, is_correct);

    sqlx::query(
        r#"
        INSERT INTO "leaderboard_aggregate" (
            user_id, total_points, quiz_points, quizzes_completed,
            correct_answers, total_attempts, last_activity
        )
        VALUES ($1, $2, $2, 0, $3, 1, now())
        ON CONFLICT (user_id) DO UPDATE SET
            total_points = leaderboard_aggregate.total_points + EXCLUDED.total_points,
            quiz_points = leaderboard_aggregate.quiz_points + EXCLUDED.quiz_points,
            correct_answers = leaderboard_aggregate.correct_answers + EXCLUDED.correct_answers,
            total_attempts = leaderboard_aggregate.total_attempts + 1,
            last_activity = CASE WHEN $4
                THEN EXCLUDED.last_activity
                ELSE leaderboard_aggregate.last_activity
            END
        "#,
    )
    .bind(user_id)
    .bind(points)
    .bind(correct)
    .bind(is_correct)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Bumps quizzes_completed for every participant of a finished session in
/// one statement. Runs only after the finalize status flip succeeded, which
/// keeps it from double-counting on a retried finalize.
pub async fn credit_completion(
    tx: &mut Transaction<'_, Postgres>,
    session_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO "leaderboard_aggregate" (
            user_id, total_points, quiz_points, quizzes_completed,
            correct_answers, total_attempts, last_activity
        )
        SELECT subject_id, 0, 0, 1, 0, 0, now()
        FROM "participant"
        WHERE session_id = $1
        ON CONFLICT (user_id) DO UPDATE SET
            quizzes_completed = leaderboard_aggregate.quizzes_completed + 1,
            last_activity = EXCLUDED.last_activity
        "#,
    )
    .bind(session_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn get_aggregate(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Option<LeaderboardAggregate>, sqlx::Error> {
    sqlx::query_as::<_, LeaderboardAggregate>(
        r#"
        SELECT user_id, total_points, quiz_points, quizzes_completed,
               correct_answers, total_attempts, last_activity
        FROM "leaderboard_aggregate"
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_global_page(
    pool: &Pool<Postgres>,
    page_num: u16,
) -> Result<Vec<GlobalLeaderboardEntry>, sqlx::Error> {
    let (limit, offset) = page_bounds(CONFIG.server.page_size, page_num);

    sqlx::query_as::<_, GlobalLeaderboardEntry>(&format!(
        r#"
        SELECT la.user_id, u.username, la.total_points, la.quizzes_completed,
               la.correct_answers, la.total_attempts
        FROM "leaderboard_aggregate" la
        JOIN "base_user" u ON u.id = la.user_id
        ORDER BY la.total_points DESC, la.last_activity ASC
        LIMIT {} OFFSET {}
        "#,
        limit, offset
    ))
    .fetch_all(pool)
    .await
}
