use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "template_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    Convention,
    Attestation,
    Evaluation,
    Certificat,
    Autre,
}

impl TemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Convention => "convention",
            TemplateType::Attestation => "attestation",
            TemplateType::Evaluation => "evaluation",
            TemplateType::Certificat => "certificat",
            TemplateType::Autre => "autre",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    pub nom: String,
    #[serde(rename = "type")]
    pub type_template: TemplateType,
    pub description: Option<String>,
    pub contenu: String,
    /// Placeholder names found in `contenu`
    pub variables: Vec<String>,
    pub actif: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of POST /api/templates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplate {
    pub nom: String,
    #[serde(rename = "type")]
    pub type_template: TemplateType,
    pub description: Option<String>,
    pub contenu: String,
    pub actif: Option<bool>,
}

/// Query string of GET /api/templates
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateFilters {
    #[serde(rename = "type")]
    pub type_template: Option<TemplateType>,
    pub actif: Option<bool>,
}
