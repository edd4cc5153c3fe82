pub mod demande_service;
pub mod document_service;
pub mod notification_service;
pub mod stagiaire_service;
pub mod template_service;
pub mod user_service;

pub use demande_service::{DemandeService, PgDemandeService};
pub use document_service::{DocumentService, PgDocumentService};
pub use notification_service::{NotificationService, PgNotificationService};
pub use stagiaire_service::{PgStagiaireService, StagiaireService};
pub use template_service::{GeneratedDocument, PgTemplateService, TemplateService};
pub use user_service::{PgUserService, UserService};

use thiserror::Error;

use crate::database::manager::DatabaseError;

/// Failure of a domain operation, classified so the HTTP layer can pick a
/// status code.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }
}

// Postgres SQLSTATE codes with a domain meaning
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        let code = match &err {
            sqlx::Error::RowNotFound => return ServiceError::not_found("Ressource introuvable"),
            sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
            _ => None,
        };

        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => ServiceError::conflict("Cette ressource existe déjà"),
            Some(FOREIGN_KEY_VIOLATION) => {
                ServiceError::validation("Référence vers une ressource inexistante")
            }
            Some(CHECK_VIOLATION) => ServiceError::validation("Données invalides"),
            _ => ServiceError::Database(DatabaseError::Sqlx(err)),
        }
    }
}

/// Reject empty or whitespace-only required text fields.
pub(crate) fn require_text(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{} requis", field)));
    }
    Ok(())
}
