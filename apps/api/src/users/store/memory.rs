//! In-memory `UserStore` for handler tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::UserStore;
use crate::models::user::User;
use crate::users::profile::ProfileRequest;

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user who has not picked an industry yet.
    pub async fn add_user(&self, email: &str) -> Uuid {
        let user = User {
            id: Uuid::new_v4(),
            external_id: format!("ext-{email}"),
            email: email.to_string(),
            industry: None,
            experience: None,
            bio: None,
            skills: Vec::new(),
            industry_insight_id: None,
            created_at: Utc::now(),
        };
        let id = user.id;
        self.users.lock().await.insert(id, user);
        id
    }

    /// Records an industry choice without linking an insight.
    pub async fn set_industry(&self, user_id: Uuid, industry: &str) {
        if let Some(user) = self.users.lock().await.get_mut(&user_id) {
            user.industry = Some(industry.to_string());
        }
    }

    pub async fn get(&self, user_id: Uuid) -> Option<User> {
        self.users.lock().await.get(&user_id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        Ok(self.get(user_id).await)
    }

    async fn save_profile(
        &self,
        user_id: Uuid,
        industry: &str,
        insight_id: Uuid,
        profile: &ProfileRequest,
    ) -> Result<User, sqlx::Error> {
        let mut users = self.users.lock().await;
        let user = users.get_mut(&user_id).ok_or(sqlx::Error::RowNotFound)?;
        user.industry = Some(industry.to_string());
        user.industry_insight_id = Some(insight_id);
        user.experience = profile.experience;
        user.bio = profile.bio.clone();
        user.skills = profile.skills.clone();
        Ok(user.clone())
    }

    async fn link_insight(&self, user_id: Uuid, insight_id: Uuid) -> Result<User, sqlx::Error> {
        let mut users = self.users.lock().await;
        let user = users.get_mut(&user_id).ok_or(sqlx::Error::RowNotFound)?;
        user.industry_insight_id = Some(insight_id);
        Ok(user.clone())
    }
}
