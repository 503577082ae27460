//! User persistence behind a trait so handlers can run against Postgres or,
//! in tests, an in-memory map.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::user::User;
use crate::users::profile::ProfileRequest;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error>;

    /// Writes the profile fields and the insight link together.
    /// Fails with `RowNotFound` when the user does not exist.
    async fn save_profile(
        &self,
        user_id: Uuid,
        industry: &str,
        insight_id: Uuid,
        profile: &ProfileRequest,
    ) -> Result<User, sqlx::Error>;

    async fn link_insight(&self, user_id: Uuid, insight_id: Uuid) -> Result<User, sqlx::Error>;
}
