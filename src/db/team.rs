use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::{
    error::ServerError,
    team::{Team, TeamWithCount},
};

/// Creates a team and enrolls its creator in one transaction. The unique
/// membership index rejects a creator who already belongs to a team; the
/// unique code constraint surfaces as a database error the caller retries
/// with a fresh code.
pub async fn create_team(pool: &Pool<Postgres>, team: &Team) -> Result<(), ServerError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO "team" (id, name, code, capacity, created_by, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(team.id)
    .bind(&team.name)
    .bind(&team.code)
    .bind(team.capacity)
    .bind(team.created_by)
    .bind(team.created_at)
    .execute(&mut *tx)
    .await?;

    let row = sqlx::query(
        r#"
        INSERT INTO "team_member" (team_id, user_id, joined_at)
        VALUES ($1, $2, now())
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(team.id)
    .bind(team.created_by)
    .execute(&mut *tx)
    .await?;

    if row.rows_affected() == 0 {
        return Err(ServerError::Conflict("User already has a team".into()));
    }

    tx.commit().await?;
    Ok(())
}

/// Conditional membership insert: the capacity check and the insert are one
/// statement, not a separate read followed by a write. Returns the joined
/// team id, or None when the guard rejected the join.
pub async fn insert_member_if_capacity(
    pool: &Pool<Postgres>,
    team_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO "team_member" (team_id, user_id, joined_at)
        SELECT t.id, $2, now()
        FROM "team" t
        WHERE t.id = $1
          AND (SELECT COUNT(*) FROM "team_member" m WHERE m.team_id = t.id) < t.capacity
        ON CONFLICT (user_id) DO NOTHING
        RETURNING team_id
        "#,
    )
    .bind(team_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn is_member(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(SELECT 1 FROM "team_member" WHERE user_id = $1)
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn get_team_codes(pool: &Pool<Postgres>) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(r#"SELECT code FROM "team""#)
        .fetch_all(pool)
        .await
}

pub async fn get_team_by_code(
    pool: &Pool<Postgres>,
    code: &str,
) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        SELECT id, name, code, capacity, created_by, created_at
        FROM "team"
        WHERE code = $1
        "#,
    )
    .bind(code)
    .fetch_optional(pool)
    .await
}

pub async fn get_team_for_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Option<TeamWithCount>, sqlx::Error> {
    sqlx::query_as::<_, TeamWithCount>(
        r#"
        SELECT t.id, t.name, t.code, t.capacity, t.created_by, t.created_at,
               (SELECT COUNT(*) FROM "team_member" c WHERE c.team_id = t.id) AS member_count
        FROM "team" t
        JOIN "team_member" m ON m.team_id = t.id
        WHERE m.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
