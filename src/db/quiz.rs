use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    config::app_config::CONFIG,
    models::{
        error::ServerError,
        page::page_bounds,
        quiz::{Quiz, QuizQuestion},
    },
};

pub async fn create_quiz(
    pool: &Pool<Postgres>,
    quiz: &Quiz,
    questions: &[QuizQuestion],
) -> Result<(), ServerError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO "quiz" (id, mentor_id, title, description, status, join_code, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(quiz.id)
    .bind(quiz.mentor_id)
    .bind(&quiz.title)
    .bind(&quiz.description)
    .bind(&quiz.status)
    .bind(&quiz.join_code)
    .bind(quiz.created_at)
    .bind(quiz.updated_at)
    .execute(&mut *tx)
    .await?;

    insert_questions(&mut tx, questions).await?;
    tx.commit().await?;

    Ok(())
}

async fn insert_questions(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    questions: &[QuizQuestion],
) -> Result<(), sqlx::Error> {
    for question in questions {
        sqlx::query(
            r#"
            INSERT INTO "quiz_question" (id, quiz_id, position, prompt, options, correct_option_index)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(question.id)
        .bind(question.quiz_id)
        .bind(question.position)
        .bind(&question.prompt)
        .bind(&question.options)
        .bind(question.correct_option_index)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Replaces a quiz's question list and demotes it to draft. Republishing
/// afterwards assigns a fresh join code.
pub async fn replace_questions(
    pool: &Pool<Postgres>,
    quiz_id: Uuid,
    mentor_id: Uuid,
    questions: &[QuizQuestion],
) -> Result<bool, ServerError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r#"
        UPDATE "quiz"
        SET status = 'draft', join_code = NULL, updated_at = $3
        WHERE id = $1 AND mentor_id = $2
        "#,
    )
    .bind(quiz_id)
    .bind(mentor_id)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    if row.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query(r#"DELETE FROM "quiz_question" WHERE quiz_id = $1"#)
        .bind(quiz_id)
        .execute(&mut *tx)
        .await?;

    insert_questions(&mut tx, questions).await?;
    tx.commit().await?;

    Ok(true)
}

pub async fn get_quiz(pool: &Pool<Postgres>, quiz_id: Uuid) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, mentor_id, title, description, status, join_code, created_at, updated_at
        FROM "quiz"
        WHERE id = $1
        "#,
    )
    .bind(quiz_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_quiz_by_code(
    pool: &Pool<Postgres>,
    code: &str,
) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, mentor_id, title, description, status, join_code, created_at, updated_at
        FROM "quiz"
        WHERE join_code = $1 AND status = 'published'
        "#,
    )
    .bind(code)
    .fetch_optional(pool)
    .await
}

pub async fn get_questions(
    pool: &Pool<Postgres>,
    quiz_id: Uuid,
) -> Result<Vec<QuizQuestion>, sqlx::Error> {
    sqlx::query_as::<_, QuizQuestion>(
        r#"
        SELECT id, quiz_id, position, prompt, options, correct_option_index
        FROM "quiz_question"
        WHERE quiz_id = $1
        ORDER BY position ASC
        "#,
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

/// Marks the quiz published with the given join code. Fails on the unique
/// code constraint if another quiz holds the code; the caller regenerates
/// and retries.
pub async fn publish_quiz(
    pool: &Pool<Postgres>,
    quiz_id: Uuid,
    mentor_id: Uuid,
    code: &str,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE "quiz"
        SET status = 'published', join_code = $3, updated_at = $4
        WHERE id = $1 AND mentor_id = $2
        "#,
    )
    .bind(quiz_id)
    .bind(mentor_id)
    .bind(code)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(row.rows_affected() > 0)
}

/// Join codes still assigned to published quizzes, re-adopted into the
/// vault at startup.
pub async fn get_published_join_codes(pool: &Pool<Postgres>) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT join_code
        FROM "quiz"
        WHERE join_code IS NOT NULL
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_quiz_page(
    pool: &Pool<Postgres>,
    mentor_id: Uuid,
    page_num: u16,
) -> Result<Vec<Quiz>, sqlx::Error> {
    let (limit, offset) = page_bounds(CONFIG.server.page_size, page_num);

    sqlx::query_as::<_, Quiz>(&format!(
        r#"
        SELECT id, mentor_id, title, description, status, join_code, created_at, updated_at
        FROM "quiz"
        WHERE mentor_id = $1
        ORDER BY updated_at DESC
        LIMIT {} OFFSET {}
        "#,
        limit, offset
    ))
    .bind(mentor_id)
    .fetch_all(pool)
    .await
}
