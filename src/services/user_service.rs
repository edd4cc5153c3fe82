use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::database::models::{NewUser, User, UserRole};

use super::{require_text, ServiceError, ServiceResult};

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_all_users(&self) -> ServiceResult<Vec<User>>;

    async fn get_users_by_role(&self, role: UserRole) -> ServiceResult<Vec<User>>;

    async fn create_user(&self, user: NewUser) -> ServiceResult<User>;
}

/// Minimal shape check; the provider's auth service owns real verification.
pub fn validate_new_user(user: &NewUser) -> ServiceResult<()> {
    require_text("nom", &user.nom)?;
    require_text("prenom", &user.prenom)?;

    let email = user.email.trim();
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !well_formed || email.contains(char::is_whitespace) {
        return Err(ServiceError::validation("Adresse email invalide"));
    }
    Ok(())
}

pub struct PgUserService {
    pool: PgPool,
}

impl PgUserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserService for PgUserService {
    async fn get_all_users(&self) -> ServiceResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY nom, prenom")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn get_users_by_role(&self, role: UserRole) -> ServiceResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = $1 ORDER BY nom, prenom")
            .bind(role)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn create_user(&self, user: NewUser) -> ServiceResult<User> {
        validate_new_user(&user)?;

        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, nom, prenom, role, telephone)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(user.email.trim().to_lowercase())
        .bind(user.nom.trim())
        .bind(user.prenom.trim())
        .bind(user.role)
        .bind(user.telephone)
        .fetch_one(&self.pool)
        .await?;

        info!("Created user {} with role {:?}", created.id, created.role);
        Ok(created)
    }
}
