#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::PgPool;
use uuid::Uuid;

use stagiaires_api::auth::{AuthError, AuthProvider, AuthSession};
use stagiaires_api::config::AppConfig;
use stagiaires_api::database::models::*;
use stagiaires_api::database::{DatabaseError, DatabaseManager, HealthCheck};
use stagiaires_api::pdf::PdfDocument;
use stagiaires_api::services::demande_service::{transition_error, validate_new_demande};
use stagiaires_api::services::template_service::{placeholders, render_placeholders};
use stagiaires_api::services::user_service::validate_new_user;
use stagiaires_api::services::{
    DemandeService, DocumentService, GeneratedDocument, NotificationService, ServiceError,
    ServiceResult, StagiaireService, TemplateService, UserService,
};
use stagiaires_api::{app, AppState};

pub const VALID_CODE: &str = "valid-code";

pub fn store_failure() -> ServiceError {
    ServiceError::Database(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
}

/// In-memory stand-in for every service and the auth provider.
///
/// Every service call bumps `calls`; `fail_store()` makes each one fail the
/// way a lost database connection would.
#[derive(Default)]
pub struct Fakes {
    calls: AtomicUsize,
    fail: AtomicBool,
    db_down: AtomicBool,
    pub demandes: Mutex<Vec<Demande>>,
    pub commentaires: Mutex<Vec<Commentaire>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub stagiaires: Mutex<Vec<Stagiaire>>,
    pub templates: Mutex<Vec<Template>>,
    pub documents: Mutex<Vec<Document>>,
    pub users: Mutex<Vec<User>>,
    pub exchanges: Mutex<Vec<(String, Option<String>)>>,
}

impl Fakes {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_store(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn database_down(&self) {
        self.db_down.store(true, Ordering::SeqCst);
    }

    fn enter(&self) -> ServiceResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(store_failure());
        }
        Ok(())
    }

    pub fn insert_demande(&self, statut: DemandeStatut, type_demande: DemandeType) -> Demande {
        let now = Utc::now();
        let demande = Demande {
            id: Uuid::new_v4(),
            stagiaire_id: Uuid::new_v4(),
            tuteur_id: None,
            type_demande,
            titre: "Congé de fin d'année".to_string(),
            description: None,
            statut,
            date_debut: None,
            date_fin: None,
            commentaire_reponse: None,
            motif_rejet: None,
            date_traitement: None,
            created_at: now,
            updated_at: now,
        };
        self.demandes.lock().unwrap().push(demande.clone());
        demande
    }

    pub fn insert_notification(&self, user_id: Uuid, lu: bool) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id,
            titre: "Nouvelle demande".to_string(),
            message: "Une demande attend votre validation".to_string(),
            type_notification: "demande".to_string(),
            lu,
            lien: Some("/demandes".to_string()),
            created_at: Utc::now(),
        };
        self.notifications.lock().unwrap().push(notification.clone());
        notification
    }

    pub fn insert_template(&self, contenu: &str, actif: bool) -> Template {
        let now = Utc::now();
        let template = Template {
            id: Uuid::new_v4(),
            nom: "Attestation de stage".to_string(),
            type_template: TemplateType::Attestation,
            description: None,
            contenu: contenu.to_string(),
            variables: placeholders(contenu),
            actif,
            created_at: now,
            updated_at: now,
        };
        self.templates.lock().unwrap().push(template.clone());
        template
    }

    pub fn insert_stagiaire(&self, statut: StagiaireStatut, departement: Option<&str>, tuteur_id: Option<Uuid>) -> Stagiaire {
        let now = Utc::now();
        let stagiaire = Stagiaire {
            id: Uuid::new_v4(),
            nom: "Durand".to_string(),
            prenom: "Léa".to_string(),
            email: format!("lea.{}@example.fr", Uuid::new_v4().simple()),
            telephone: None,
            etablissement: Some("IUT".to_string()),
            niveau: None,
            specialite: None,
            departement: departement.map(str::to_string),
            date_debut: None,
            date_fin: None,
            statut,
            tuteur_id,
            created_at: now,
            updated_at: now,
        };
        self.stagiaires.lock().unwrap().push(stagiaire.clone());
        stagiaire
    }

    pub fn insert_user(&self, role: UserRole) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: format!("{}@example.fr", Uuid::new_v4().simple()),
            nom: "Martin".to_string(),
            prenom: "Claire".to_string(),
            role,
            telephone: None,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    fn transition(
        &self,
        id: Uuid,
        target: DemandeStatut,
        note: Option<String>,
    ) -> ServiceResult<Demande> {
        let mut demandes = self.demandes.lock().unwrap();
        let demande = demandes.iter_mut().find(|d| d.id == id);
        match demande {
            Some(d) if d.statut == DemandeStatut::EnAttente => {
                d.statut = target;
                match target {
                    DemandeStatut::Approuvee => d.commentaire_reponse = note,
                    _ => d.motif_rejet = note,
                }
                d.date_traitement = Some(Utc::now());
                d.updated_at = Utc::now();
                Ok(d.clone())
            }
            Some(d) => Err(transition_error(id, Some(d.statut))),
            None => Err(transition_error(id, None)),
        }
    }
}

#[async_trait]
impl DemandeService for Fakes {
    async fn get_all(&self, filters: DemandeFilters) -> ServiceResult<Vec<Demande>> {
        self.enter()?;
        let demandes = self.demandes.lock().unwrap();
        Ok(demandes
            .iter()
            .filter(|d| filters.statut.map_or(true, |s| d.statut == s))
            .filter(|d| filters.type_demande.map_or(true, |t| d.type_demande == t))
            .filter(|d| filters.stagiaire_id.map_or(true, |id| d.stagiaire_id == id))
            .filter(|d| filters.tuteur_id.map_or(true, |id| d.tuteur_id == Some(id)))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> ServiceResult<Demande> {
        self.enter()?;
        self.demandes
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(format!("Demande {} introuvable", id)))
    }

    async fn create(&self, demande: NewDemande) -> ServiceResult<Demande> {
        self.enter()?;
        validate_new_demande(&demande)?;
        let now = Utc::now();
        let created = Demande {
            id: Uuid::new_v4(),
            stagiaire_id: demande.stagiaire_id,
            tuteur_id: demande.tuteur_id,
            type_demande: demande.type_demande,
            titre: demande.titre.trim().to_string(),
            description: demande.description,
            statut: DemandeStatut::EnAttente,
            date_debut: demande.date_debut,
            date_fin: demande.date_fin,
            commentaire_reponse: None,
            motif_rejet: None,
            date_traitement: None,
            created_at: now,
            updated_at: now,
        };
        self.demandes.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn get_stats(&self) -> ServiceResult<DemandesStats> {
        self.enter()?;
        let rows: Vec<(DemandeStatut, DemandeType, i64)> = self
            .demandes
            .lock()
            .unwrap()
            .iter()
            .map(|d| (d.statut, d.type_demande, 1))
            .collect();
        Ok(DemandesStats::from_counts(&rows))
    }

    async fn approve(&self, id: Uuid, commentaire: Option<String>) -> ServiceResult<Demande> {
        self.enter()?;
        self.transition(id, DemandeStatut::Approuvee, commentaire)
    }

    async fn reject(&self, id: Uuid, motif: Option<String>) -> ServiceResult<Demande> {
        self.enter()?;
        self.transition(id, DemandeStatut::Rejetee, motif)
    }

    async fn add_commentaire(&self, id: Uuid, commentaire: NewCommentaire) -> ServiceResult<Commentaire> {
        self.enter()?;
        if commentaire.message.trim().is_empty() {
            return Err(ServiceError::validation("message requis"));
        }
        if !self.demandes.lock().unwrap().iter().any(|d| d.id == id) {
            return Err(ServiceError::not_found(format!("Demande {} introuvable", id)));
        }
        let created = Commentaire {
            id: Uuid::new_v4(),
            demande_id: id,
            auteur_id: commentaire.user_id,
            message: commentaire.message.trim().to_string(),
            created_at: Utc::now(),
        };
        self.commentaires.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn get_commentaires(&self, id: Uuid) -> ServiceResult<Vec<Commentaire>> {
        self.enter()?;
        Ok(self
            .commentaires
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.demande_id == id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationService for Fakes {
    async fn get_for_user(&self, user_id: Uuid, unread_only: bool) -> ServiceResult<Vec<Notification>> {
        self.enter()?;
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.lu))
            .cloned()
            .collect())
    }

    async fn mark_as_read(&self, id: Uuid) -> ServiceResult<Notification> {
        self.enter()?;
        let mut notifications = self.notifications.lock().unwrap();
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| ServiceError::not_found(format!("Notification {} introuvable", id)))?;
        notification.lu = true;
        Ok(notification.clone())
    }

    async fn mark_all_as_read(&self, user_id: Uuid) -> ServiceResult<MarkAllReadResult> {
        self.enter()?;
        let mut updated = 0;
        for n in self.notifications.lock().unwrap().iter_mut() {
            if n.user_id == user_id && !n.lu {
                n.lu = true;
                updated += 1;
            }
        }
        Ok(MarkAllReadResult { updated })
    }
}

#[async_trait]
impl StagiaireService for Fakes {
    async fn get_all(&self, filters: StagiaireFilters) -> ServiceResult<Vec<Stagiaire>> {
        self.enter()?;
        Ok(self
            .stagiaires
            .lock()
            .unwrap()
            .iter()
            .filter(|s| filters.statut.map_or(true, |st| s.statut == st))
            .filter(|s| filters.tuteur_id.map_or(true, |id| s.tuteur_id == Some(id)))
            .filter(|s| {
                filters
                    .departement
                    .as_deref()
                    .map_or(true, |dep| s.departement.as_deref() == Some(dep))
            })
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> ServiceResult<Stagiaire> {
        self.enter()?;
        self.stagiaires
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(format!("Stagiaire {} introuvable", id)))
    }

    async fn get_stats(&self) -> ServiceResult<StagiairesStats> {
        self.enter()?;
        let rows: Vec<(StagiaireStatut, Option<String>, i64, i64)> = self
            .stagiaires
            .lock()
            .unwrap()
            .iter()
            .map(|s| (s.statut, s.departement.clone(), 1, i64::from(s.tuteur_id.is_none())))
            .collect();
        Ok(StagiairesStats::from_counts(&rows))
    }
}

#[async_trait]
impl DocumentService for Fakes {
    async fn get_all(&self, filters: DocumentFilters) -> ServiceResult<Vec<Document>> {
        self.enter()?;
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| filters.stagiaire_id.map_or(true, |id| d.stagiaire_id == Some(id)))
            .filter(|d| filters.type_document.as_deref().map_or(true, |t| d.type_document == t))
            .filter(|d| filters.statut.map_or(true, |s| d.statut == s))
            .cloned()
            .collect())
    }

    async fn get_stats(&self) -> ServiceResult<DocumentsStats> {
        self.enter()?;
        let rows: Vec<(String, DocumentStatut, i64, i64)> = self
            .documents
            .lock()
            .unwrap()
            .iter()
            .map(|d| (d.type_document.clone(), d.statut, 1, 1))
            .collect();
        Ok(DocumentsStats::from_counts(&rows))
    }
}

#[async_trait]
impl TemplateService for Fakes {
    async fn get_all(&self, filters: TemplateFilters) -> ServiceResult<Vec<Template>> {
        self.enter()?;
        Ok(self
            .templates
            .lock()
            .unwrap()
            .iter()
            .filter(|t| filters.type_template.map_or(true, |ty| t.type_template == ty))
            .filter(|t| filters.actif.map_or(true, |a| t.actif == a))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> ServiceResult<Template> {
        self.enter()?;
        self.templates
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(format!("Modèle {} introuvable", id)))
    }

    async fn create(&self, template: NewTemplate) -> ServiceResult<Template> {
        self.enter()?;
        if template.nom.trim().is_empty() {
            return Err(ServiceError::validation("nom requis"));
        }
        if template.contenu.trim().is_empty() {
            return Err(ServiceError::validation("contenu requis"));
        }
        let now = Utc::now();
        let created = Template {
            id: Uuid::new_v4(),
            nom: template.nom.trim().to_string(),
            type_template: template.type_template,
            description: template.description,
            variables: placeholders(&template.contenu),
            contenu: template.contenu,
            actif: template.actif.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.templates.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn generate_document(&self, id: Uuid, data: Map<String, Value>) -> ServiceResult<GeneratedDocument> {
        self.enter()?;
        let template = self
            .templates
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(format!("Modèle {} introuvable", id)))?;
        if !template.actif {
            return Err(ServiceError::validation("Le modèle est désactivé"));
        }

        let bytes = PdfDocument::new()
            .with_title(template.nom.as_str())
            .push_text(&render_placeholders(&template.contenu, &data))
            .render();
        let document = Document {
            id: Uuid::new_v4(),
            nom: template.nom.clone(),
            type_document: template.type_template.as_str().to_string(),
            statut: DocumentStatut::Genere,
            template_id: Some(template.id),
            stagiaire_id: None,
            taille: Some(bytes.len() as i64),
            created_at: Utc::now(),
        };
        let document_id = document.id;
        self.documents.lock().unwrap().push(document);
        Ok(GeneratedDocument { document_id, bytes })
    }
}

#[async_trait]
impl UserService for Fakes {
    async fn get_all_users(&self) -> ServiceResult<Vec<User>> {
        self.enter()?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn get_users_by_role(&self, role: UserRole) -> ServiceResult<Vec<User>> {
        self.enter()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn create_user(&self, user: NewUser) -> ServiceResult<User> {
        self.enter()?;
        validate_new_user(&user)?;
        let email = user.email.trim().to_lowercase();
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(ServiceError::conflict("Cette ressource existe déjà"));
        }
        let created = User {
            id: Uuid::new_v4(),
            email,
            nom: user.nom.trim().to_string(),
            prenom: user.prenom.trim().to_string(),
            role: user.role,
            telephone: user.telephone,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl AuthProvider for Fakes {
    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, AuthError> {
        self.exchanges
            .lock()
            .unwrap()
            .push((code.to_string(), code_verifier.map(str::to_string)));
        if code != VALID_CODE {
            return Err(AuthError::Rejected {
                status: 400,
                message: "invalid flow state".to_string(),
            });
        }
        Ok(AuthSession {
            access_token: "access-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_in: Some(3600),
            token_type: Some("bearer".to_string()),
            user: None,
        })
    }
}

#[async_trait]
impl HealthCheck for Fakes {
    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.db_down.load(Ordering::SeqCst) {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

pub struct TestApp {
    pub base_url: String,
    pub fakes: Arc<Fakes>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn spawn_app() -> Result<TestApp> {
    spawn_app_with(AppConfig::development()).await
}

/// Serve the real router over the fakes on a free local port
pub async fn spawn_app_with(config: AppConfig) -> Result<TestApp> {
    let fakes = Arc::new(Fakes::default());
    let state = AppState {
        config: Arc::new(config),
        demandes: fakes.clone(),
        documents: fakes.clone(),
        notifications: fakes.clone(),
        stagiaires: fakes.clone(),
        templates: fakes.clone(),
        users: fakes.clone(),
        auth: fakes.clone(),
        health: fakes.clone(),
    };

    let (base_url, client) = serve(state).await?;
    Ok(TestApp {
        base_url,
        fakes,
        client,
    })
}

/// Bind the real router on a free local port
async fn serve(state: AppState) -> Result<(String, reqwest::Client)> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    Ok((format!("http://127.0.0.1:{}", port), client))
}

pub struct PgTestApp {
    pub base_url: String,
    pub pool: PgPool,
    pub client: reqwest::Client,
}

impl PgTestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serve the Postgres-backed services against a fresh database created next
/// to `DATABASE_URL`. Returns `None` when `DATABASE_URL` is unset.
pub async fn spawn_pg_app() -> Result<Option<PgTestApp>> {
    let Ok(admin_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping Postgres test");
        return Ok(None);
    };

    let admin = PgPool::connect(&admin_url)
        .await
        .context("failed to connect to DATABASE_URL")?;
    let name = format!("stagiaires_test_{}", Uuid::new_v4().simple());
    let create = format!("CREATE DATABASE {}", name);
    sqlx::query(&create).execute(&admin).await?;
    admin.close().await;

    let mut url = url::Url::parse(&admin_url)?;
    url.set_path(&name);

    let mut config = AppConfig::development();
    config.database.url = Some(url.to_string());
    let pool = DatabaseManager::connect(&config.database)?;
    DatabaseManager::migrate(&pool).await?;

    let (base_url, client) = serve(AppState::postgres(config, pool.clone())).await?;
    Ok(Some(PgTestApp {
        base_url,
        pool,
        client,
    }))
}
