use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{non_blank, require, resolve_slug, Entity, ValidationError};

/// Technology stack grouped by category, e.g. `"frontend" -> ["React"]`.
pub type TechnologyMap = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortfolioResult {
    pub metric: String,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortfolioTestimonial {
    pub content: String,
    pub author: String,
    pub designation: String,
}

/// A case study. Nested fields live in JSONB columns in the relational store.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub description: String,
    pub image_url: String,
    pub gallery_urls: Vec<String>,
    pub tags: Vec<String>,
    pub category: String,
    pub client: String,
    pub year: i32,
    #[sqlx(json)]
    pub technologies: TechnologyMap,
    #[sqlx(json)]
    pub results: Vec<PortfolioResult>,
    #[sqlx(json)]
    pub testimonial: Option<PortfolioTestimonial>,
    pub featured: bool,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub og_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioDraft {
    pub title: String,
    pub slug: Option<String>,
    pub short_description: String,
    pub description: String,
    pub image_url: String,
    pub gallery_urls: Vec<String>,
    pub tags: Vec<String>,
    pub category: String,
    pub client: String,
    pub year: i32,
    pub technologies: TechnologyMap,
    pub results: Vec<PortfolioResult>,
    pub testimonial: Option<PortfolioTestimonial>,
    pub featured: bool,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub og_image: Option<String>,
}

impl Entity for PortfolioItem {
    type Draft = PortfolioDraft;
    const COLLECTION: &'static str = "portfolio";

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

    fn prepare(mut draft: PortfolioDraft) -> Result<PortfolioDraft, ValidationError> {
        require(&draft.title, "title")?;
        draft.slug = Some(resolve_slug(draft.slug, &draft.title)?);
        draft.tags.retain(|t| !t.trim().is_empty());
        draft.gallery_urls.retain(|u| !u.trim().is_empty());
        // Empty categories are noise from the admin form's add-row button.
        draft.technologies.retain(|_, items| {
            items.retain(|i| !i.trim().is_empty());
            !items.is_empty()
        });
        draft.results.retain(|r| !r.metric.trim().is_empty());
        draft.testimonial = draft
            .testimonial
            .filter(|t| !t.content.trim().is_empty());
        draft.seo_title = non_blank(draft.seo_title);
        draft.seo_description = non_blank(draft.seo_description);
        draft.og_image = non_blank(draft.og_image);
        Ok(draft)
    }

    fn create(id: Uuid, draft: PortfolioDraft, now: DateTime<Utc>) -> Self {
        let slug = draft
            .slug
            .unwrap_or_else(|| crate::slug::slugify(&draft.title));
        Self {
            id,
            title: draft.title,
            slug,
            short_description: draft.short_description,
            description: draft.description,
            image_url: draft.image_url,
            gallery_urls: draft.gallery_urls,
            tags: draft.tags,
            category: draft.category,
            client: draft.client,
            year: draft.year,
            technologies: draft.technologies,
            results: draft.results,
            testimonial: draft.testimonial,
            featured: draft.featured,
            seo_title: draft.seo_title,
            seo_description: draft.seo_description,
            og_image: draft.og_image,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: PortfolioDraft, now: DateTime<Utc>) {
        *self = Self {
            created_at: self.created_at,
            ..Self::create(self.id, draft, now)
        };
    }

    fn is_featured(&self) -> bool {
        self.featured
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = vec![
            self.title.as_str(),
            self.short_description.as_str(),
            self.client.as_str(),
            self.category.as_str(),
        ];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_drops_empty_nested_rows() {
        let mut technologies = TechnologyMap::new();
        technologies.insert("frontend".into(), vec!["React".into(), " ".into()]);
        technologies.insert("backend".into(), vec![String::new()]);

        let draft = PortfolioDraft {
            title: "Fintech Dashboard".into(),
            technologies,
            results: vec![
                PortfolioResult {
                    metric: "Conversion".into(),
                    value: "+40%".into(),
                    description: "after redesign".into(),
                },
                PortfolioResult::default(),
            ],
            testimonial: Some(PortfolioTestimonial::default()),
            ..Default::default()
        };

        let prepared = PortfolioItem::prepare(draft).unwrap();
        assert_eq!(prepared.slug.as_deref(), Some("fintech-dashboard"));
        assert_eq!(prepared.technologies.len(), 1);
        assert_eq!(prepared.technologies["frontend"], vec!["React".to_string()]);
        assert_eq!(prepared.results.len(), 1);
        assert!(prepared.testimonial.is_none());
    }

    #[test]
    fn test_nested_fields_serialize_camel_case() {
        let now = Utc::now();
        let item = PortfolioItem::create(
            Uuid::new_v4(),
            PortfolioDraft {
                title: "Shop".into(),
                slug: Some("shop".into()),
                ..Default::default()
            },
            now,
        );
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("shortDescription").is_some());
        assert!(json.get("galleryUrls").is_some());
        assert_eq!(json["testimonial"], serde_json::Value::Null);
    }
}
