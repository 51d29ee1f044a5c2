use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{non_blank, require, resolve_slug, Entity, ValidationError};

/// An agency service offering, shown at `/services/{slug}`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub description: String,
    pub features: Vec<String>,
    pub technologies: Vec<String>,
    pub pricing: String,
    pub delivery_time: String,
    pub gradient: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub og_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceDraft {
    pub title: String,
    pub slug: Option<String>,
    pub short_description: String,
    pub description: String,
    pub features: Vec<String>,
    pub technologies: Vec<String>,
    pub pricing: String,
    pub delivery_time: String,
    pub gradient: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub og_image: Option<String>,
}

impl Entity for Service {
    type Draft = ServiceDraft;
    const COLLECTION: &'static str = "services";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }

    fn prepare(mut draft: ServiceDraft) -> Result<ServiceDraft, ValidationError> {
        require(&draft.title, "title")?;
        draft.slug = Some(resolve_slug(draft.slug, &draft.title)?);
        draft.features.retain(|f| !f.trim().is_empty());
        draft.technologies.retain(|t| !t.trim().is_empty());
        draft.seo_title = non_blank(draft.seo_title);
        draft.seo_description = non_blank(draft.seo_description);
        draft.og_image = non_blank(draft.og_image);
        Ok(draft)
    }

    fn create(id: Uuid, draft: ServiceDraft, now: DateTime<Utc>) -> Self {
        let slug = draft
            .slug
            .unwrap_or_else(|| crate::slug::slugify(&draft.title));
        Self {
            id,
            title: draft.title,
            slug,
            short_description: draft.short_description,
            description: draft.description,
            features: draft.features,
            technologies: draft.technologies,
            pricing: draft.pricing,
            delivery_time: draft.delivery_time,
            gradient: draft.gradient,
            seo_title: draft.seo_title,
            seo_description: draft.seo_description,
            og_image: draft.og_image,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: ServiceDraft, now: DateTime<Utc>) {
        *self = Self {
            created_at: self.created_at,
            ..Self::create(self.id, draft, now)
        };
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = vec![
            self.title.as_str(),
            self.short_description.as_str(),
            self.description.as_str(),
        ];
        fields.extend(self.technologies.iter().map(String::as_str));
        fields
    }
}
