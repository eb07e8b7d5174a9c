use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::user::BaseUser;

/// Upserts a guest user row for a student who joined without an account.
/// Fired from the auth middleware, safe to repeat.
pub async fn ensure_guest_user(pool: &Pool<Postgres>, guest_id: Uuid) -> Result<(), sqlx::Error> {
    let username = format!("guest-{}", &guest_id.simple().to_string()[..8]);

    sqlx::query(
        r#"
        INSERT INTO "base_user" (id, username, auth0_id, is_guest, created_at)
        VALUES ($1, $2, NULL, true, now())
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(guest_id)
    .bind(username)
    .execute(pool)
    .await?;

    Ok(())
}

/// Upserts the registered user row for a verified token subject and returns
/// it. Keeps the user table in sync with the identity provider without a
/// separate webhook round trip.
pub async fn ensure_base_user(
    pool: &Pool<Postgres>,
    auth0_id: &str,
) -> Result<BaseUser, sqlx::Error> {
    let id = Uuid::new_v4();
    let username = format!("user-{}", &id.simple().to_string()[..8]);

    sqlx::query_as::<_, BaseUser>(
        r#"
        INSERT INTO "base_user" (id, username, auth0_id, is_guest, created_at)
        VALUES ($1, $2, $3, false, now())
        ON CONFLICT (auth0_id) DO UPDATE SET auth0_id = EXCLUDED.auth0_id
        RETURNING id, username, auth0_id, is_guest, created_at
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(auth0_id)
    .fetch_one(pool)
    .await
}

pub async fn get_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Option<BaseUser>, sqlx::Error> {
    sqlx::query_as::<_, BaseUser>(
        r#"
        SELECT id, username, auth0_id, is_guest, created_at
        FROM "base_user"
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
