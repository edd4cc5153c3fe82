pub mod demande;
pub mod document;
pub mod notification;
pub mod stagiaire;
pub mod template;
pub mod user;

pub use demande::{
    Commentaire, Demande, DemandeFilters, DemandeStatut, DemandeType, DemandesStats,
    NewCommentaire, NewDemande,
};
pub use document::{Document, DocumentFilters, DocumentStatut, DocumentsStats};
pub use notification::{MarkAllReadRequest, MarkAllReadResult, Notification, NotificationQuery};
pub use stagiaire::{Stagiaire, StagiaireFilters, StagiaireStatut, StagiairesStats};
pub use template::{NewTemplate, Template, TemplateFilters, TemplateType};
pub use user::{NewUser, User, UserQuery, UserRole};
