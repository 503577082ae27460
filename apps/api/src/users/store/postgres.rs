use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::UserStore;
use crate::models::user::User;
use crate::users::profile::ProfileRequest;

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn save_profile(
        &self,
        user_id: Uuid,
        industry: &str,
        insight_id: Uuid,
        profile: &ProfileRequest,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET industry = $2,
                industry_insight_id = $3,
                experience = $4,
                bio = $5,
                skills = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(industry)
        .bind(insight_id)
        .bind(profile.experience)
        .bind(profile.bio.as_deref())
        .bind(&profile.skills)
        .fetch_one(&self.pool)
        .await
    }

    async fn link_insight(&self, user_id: Uuid, insight_id: Uuid) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET industry_insight_id = $2 WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(insight_id)
        .fetch_one(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::insights::schema::tests::valid_payload;
    use crate::insights::schema::validate_candidate;
    use crate::insights::store::{InsightStore, PgInsightStore};

    async fn insert_user(pool: &PgPool) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (external_id, email) VALUES ('ext-1', 'ada@example.com') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore] // Requires database
    async fn test_save_profile_links_insight(pool: PgPool) {
        let insights = PgInsightStore::new(pool.clone());
        let candidate = validate_candidate(&valid_payload()).unwrap();
        let insight = insights
            .create("Software", &candidate, Utc::now())
            .await
            .unwrap();
        let user_id = insert_user(&pool).await;
        let store = PgUserStore::new(pool);

        let profile = ProfileRequest {
            industry: "Software".to_string(),
            experience: Some(4),
            bio: None,
            skills: vec!["Rust".to_string()],
        };
        let user = store
            .save_profile(user_id, "Software", insight.id, &profile)
            .await
            .unwrap();
        assert_eq!(user.industry.as_deref(), Some("Software"));
        assert_eq!(user.industry_insight_id, Some(insight.id));
        assert_eq!(user.skills, vec!["Rust"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore] // Requires database
    async fn test_unknown_user(pool: PgPool) {
        let store = PgUserStore::new(pool);
        let missing = Uuid::new_v4();
        assert!(store.find(missing).await.unwrap().is_none());
        assert!(matches!(
            store.link_insight(missing, Uuid::new_v4()).await,
            Err(sqlx::Error::RowNotFound)
        ));
    }
}
