use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;
use uuid::Uuid;

use super::{require, resolve_slug, Entity, ValidationError};

/// Blog post with pre-rendered HTML content.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPostDraft {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

/// Sanitize HTML content using ammonia
fn sanitize_html(html: &str) -> String {
    ammonia::clean(html)
}

impl BlogPost {
    /// Timestamp used for ordering and feeds.
    pub fn published_or_created(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }
}

impl Entity for BlogPost {
    type Draft = BlogPostDraft;
    const COLLECTION: &'static str = "blog";

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

    fn prepare(mut draft: BlogPostDraft) -> Result<BlogPostDraft, ValidationError> {
        require(&draft.title, "title")?;
        draft.slug = Some(resolve_slug(draft.slug, &draft.title)?);
        draft.content = sanitize_html(&draft.content);
        Ok(draft)
    }

    fn create(id: Uuid, draft: BlogPostDraft, now: DateTime<Utc>) -> Self {
        let slug = draft
            .slug
            .unwrap_or_else(|| crate::slug::slugify(&draft.title));
        let published_at = match (draft.published, draft.published_at) {
            (true, None) => Some(now),
            (_, stamp) => stamp,
        };
        Self {
            id,
            title: draft.title,
            slug,
            excerpt: draft.excerpt,
            content: draft.content,
            author: draft.author,
            category: draft.category,
            published: draft.published,
            published_at,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, mut draft: BlogPostDraft, now: DateTime<Utc>) {
        // Unpublishing or re-saving keeps the first publication stamp.
        draft.published_at = draft.published_at.or(self.published_at);
        *self = Self {
            created_at: self.created_at,
            ..Self::create(self.id, draft, now)
        };
    }

    fn is_public(&self) -> bool {
        self.published
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.excerpt.as_str(),
            self.author.as_str(),
            self.category.as_str(),
        ]
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        b.published_or_created().cmp(&a.published_or_created())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(published: bool) -> BlogPostDraft {
        BlogPostDraft {
            title: "Why Rust?".into(),
            content: "<p>Hello</p><script>alert(1)</script>".into(),
            published,
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_sanitizes_content_and_fills_slug() {
        let prepared = BlogPost::prepare(draft(false)).unwrap();
        assert_eq!(prepared.slug.as_deref(), Some("why-rust"));
        assert!(!prepared.content.contains("<script>"));
        assert!(prepared.content.contains("<p>Hello</p>"));
    }

    #[test]
    fn test_publishing_stamps_published_at() {
        let now = Utc::now();
        let post = BlogPost::create(Uuid::new_v4(), draft(true), now);
        assert_eq!(post.published_at, Some(now));

        let unpublished = BlogPost::create(Uuid::new_v4(), draft(false), now);
        assert_eq!(unpublished.published_at, None);
        assert!(!unpublished.is_public());
    }

    #[test]
    fn test_apply_keeps_first_publication_stamp() {
        let first = Utc::now() - chrono::Duration::days(3);
        let mut post = BlogPost::create(Uuid::new_v4(), draft(true), first);

        post.apply(draft(false), Utc::now());
        assert!(!post.published);
        assert_eq!(post.published_at, Some(first));

        post.apply(draft(true), Utc::now());
        assert_eq!(post.published_at, Some(first));
        assert_eq!(post.created_at, first);
    }
}
