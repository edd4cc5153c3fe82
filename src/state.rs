use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{AuthProvider, SupabaseAuthClient};
use crate::config::AppConfig;
use crate::database::{HealthCheck, PgHealthCheck};
use crate::services::{
    DemandeService, DocumentService, NotificationService, PgDemandeService, PgDocumentService,
    PgNotificationService, PgStagiaireService, PgTemplateService, PgUserService, StagiaireService,
    TemplateService, UserService,
};

/// Shared, read-only handles given to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub demandes: Arc<dyn DemandeService>,
    pub documents: Arc<dyn DocumentService>,
    pub notifications: Arc<dyn NotificationService>,
    pub stagiaires: Arc<dyn StagiaireService>,
    pub templates: Arc<dyn TemplateService>,
    pub users: Arc<dyn UserService>,
    pub auth: Arc<dyn AuthProvider>,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    /// Wire the Postgres-backed services and the hosted auth client
    pub fn postgres(config: AppConfig, pool: PgPool) -> Self {
        let auth = Arc::new(SupabaseAuthClient::new(&config.supabase));
        Self {
            config: Arc::new(config),
            demandes: Arc::new(PgDemandeService::new(pool.clone())),
            documents: Arc::new(PgDocumentService::new(pool.clone())),
            notifications: Arc::new(PgNotificationService::new(pool.clone())),
            stagiaires: Arc::new(PgStagiaireService::new(pool.clone())),
            templates: Arc::new(PgTemplateService::new(pool.clone())),
            users: Arc::new(PgUserService::new(pool.clone())),
            auth,
            health: Arc::new(PgHealthCheck::new(pool)),
        }
    }
}
