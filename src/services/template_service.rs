use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::database::models::{NewTemplate, Template, TemplateFilters};
use crate::database::query::and_eq;
use crate::pdf::PdfDocument;

use super::{require_text, ServiceError, ServiceResult};

/// A rendered template, ready to be sent as a PDF attachment
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// Row recorded in `documents` for this generation
    pub document_id: Uuid,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait TemplateService: Send + Sync {
    async fn get_all(&self, filters: TemplateFilters) -> ServiceResult<Vec<Template>>;

    async fn get_by_id(&self, id: Uuid) -> ServiceResult<Template>;

    async fn create(&self, template: NewTemplate) -> ServiceResult<Template>;

    /// Fill the template's placeholders with `data` and render it as a PDF
    async fn generate_document(&self, id: Uuid, data: Map<String, Value>) -> ServiceResult<GeneratedDocument>;
}

pub struct PgTemplateService {
    pool: PgPool,
}

impl PgTemplateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateService for PgTemplateService {
    async fn get_all(&self, filters: TemplateFilters) -> ServiceResult<Vec<Template>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM templates WHERE TRUE");
        and_eq(&mut qb, "type_template", filters.type_template);
        and_eq(&mut qb, "actif", filters.actif);
        qb.push(" ORDER BY nom");

        let templates = qb.build_query_as::<Template>().fetch_all(&self.pool).await?;
        Ok(templates)
    }

    async fn get_by_id(&self, id: Uuid) -> ServiceResult<Template> {
        sqlx::query_as::<_, Template>("SELECT * FROM templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Modèle {} introuvable", id)))
    }

    async fn create(&self, template: NewTemplate) -> ServiceResult<Template> {
        require_text("nom", &template.nom)?;
        require_text("contenu", &template.contenu)?;

        let variables = placeholders(&template.contenu);
        let created = sqlx::query_as::<_, Template>(
            "INSERT INTO templates (nom, type_template, description, contenu, variables, actif)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(template.nom.trim())
        .bind(template.type_template)
        .bind(template.description)
        .bind(&template.contenu)
        .bind(variables)
        .bind(template.actif.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        info!("Created template {} ({} variables)", created.id, created.variables.len());
        Ok(created)
    }

    async fn generate_document(&self, id: Uuid, data: Map<String, Value>) -> ServiceResult<GeneratedDocument> {
        let template = self.get_by_id(id).await?;
        if !template.actif {
            return Err(ServiceError::validation(format!(
                "Le modèle {} est désactivé",
                template.nom
            )));
        }

        let contenu = render_placeholders(&template.contenu, &data);
        let bytes = PdfDocument::new()
            .with_title(template.nom.as_str())
            .push_text(&contenu)
            .render();

        let stagiaire_id = data
            .get("stagiaireId")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok());

        let document_id: Uuid = sqlx::query_scalar(
            "INSERT INTO documents (nom, type_document, statut, template_id, stagiaire_id, taille)
             VALUES ($1, $2, 'genere', $3, $4, $5)
             RETURNING id",
        )
        .bind(&template.nom)
        .bind(template.type_template.as_str())
        .bind(template.id)
        .bind(stagiaire_id)
        .bind(bytes.len() as i64)
        .fetch_one(&self.pool)
        .await?;

        info!("Generated document {} from template {} ({} bytes)", document_id, id, bytes.len());
        Ok(GeneratedDocument { document_id, bytes })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Placeholder { key: &'a str, raw: &'a str },
}

/// Splits template text into literal runs and `{{ key }}` placeholders.
struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if self.rest.is_empty() {
            return None;
        }

        let rest = self.rest;
        match rest.find("{{") {
            Some(0) => match rest[2..].find("}}") {
                Some(end) => {
                    let raw = &rest[..end + 4];
                    let key = rest[2..end + 2].trim();
                    self.rest = &rest[end + 4..];
                    if is_placeholder_key(key) {
                        Some(Segment::Placeholder { key, raw })
                    } else {
                        Some(Segment::Text(raw))
                    }
                }
                None => {
                    self.rest = "";
                    Some(Segment::Text(rest))
                }
            },
            Some(start) => {
                self.rest = &rest[start..];
                Some(Segment::Text(&rest[..start]))
            }
            None => {
                self.rest = "";
                Some(Segment::Text(rest))
            }
        }
    }
}

fn segments(contenu: &str) -> Segments<'_> {
    Segments { rest: contenu }
}

fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
}

/// Distinct placeholder names, in order of first appearance.
pub fn placeholders(contenu: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for segment in segments(contenu) {
        if let Segment::Placeholder { key, .. } = segment {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

/// Replace each placeholder with its value from `data`. Dotted keys walk
/// nested objects; placeholders without a value are left untouched.
pub fn render_placeholders(contenu: &str, data: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(contenu.len());
    for segment in segments(contenu) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder { key, raw } => match lookup(data, key) {
                Some(value) => out.push_str(&value_to_text(value)),
                None => out.push_str(raw),
            },
        }
    }
    out
}

fn lookup<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = data.get(key) {
        return Some(value);
    }
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "oui".to_string(),
        Value::Bool(false) => "non".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_to_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}
