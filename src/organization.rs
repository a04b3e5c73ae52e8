//! Organization lookup and ownership checks

use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Organization {
    pub id: String,
    pub creator_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

pub struct OrganizationRepository;

impl OrganizationRepository {
    /// Fetch an organization only if it is owned by the given user.
    ///
    /// An organization that exists but belongs to someone else is
    /// indistinguishable from a missing one, so callers surface 404 either
    /// way.
    pub async fn get_owned(
        pool: &PgPool,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Option<Organization>, sqlx::Error> {
        sqlx::query_as(
            r#"SELECT id, creator_id, name, created_at
               FROM organizations_tb WHERE id = $1 AND creator_id = $2"#,
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}
