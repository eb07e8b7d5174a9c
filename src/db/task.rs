use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    config::app_config::CONFIG,
    models::{page::page_bounds, task::Task},
};

pub async fn create_task(pool: &Pool<Postgres>, task: &Task) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO "task" (id, mentor_id, student_id, title, description, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(task.id)
    .bind(task.mentor_id)
    .bind(task.student_id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.status)
    .bind(task.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Completion is a conditional update so a task can only go open -> done,
/// and only by the student it was assigned to.
pub async fn complete_task(
    pool: &Pool<Postgres>,
    task_id: Uuid,
    student_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE "task"
        SET status = 'done', completed_at = now()
        WHERE id = $1 AND student_id = $2 AND status = 'open'
        "#,
    )
    .bind(task_id)
    .bind(student_id)
    .execute(pool)
    .await?;

    Ok(row.rows_affected() > 0)
}

pub async fn get_tasks_for_student(
    pool: &Pool<Postgres>,
    student_id: Uuid,
    page_num: u16,
) -> Result<Vec<Task>, sqlx::Error> {
    get_task_page(pool, "student_id", student_id, page_num).await
}

pub async fn get_tasks_for_mentor(
    pool: &Pool<Postgres>,
    mentor_id: Uuid,
    page_num: u16,
) -> Result<Vec<Task>, sqlx::Error> {
    get_task_page(pool, "mentor_id", mentor_id, page_num).await
}

async fn get_task_page(
    pool: &Pool<Postgres>,
    owner_column: &str,
    owner_id: Uuid,
    page_num: u16,
) -> Result<Vec<Task>, sqlx::Error> {
    let (limit, offset) = page_bounds(CONFIG.server.page_size, page_num);

    sqlx::query_as::<_, Task>(&format!(
        r#"
        SELECT id, mentor_id, student_id, title, description, status, created_at, completed_at
        FROM "task"
        WHERE {} = $1
        ORDER BY created_at DESC
        LIMIT {} OFFSET {}
        "#,
        owner_column, limit, offset
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await
}
