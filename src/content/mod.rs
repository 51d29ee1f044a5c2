/*!
 * Content Module
 * Entity types for the agency site and the rules they share
 */
pub mod blog;
pub mod contact;
pub mod portfolio;
pub mod query;
pub mod service;
pub mod team;
pub mod testimonial;

pub use blog::{BlogPost, BlogPostDraft};
pub use contact::{ContactDraft, ContactStatus, ContactSubmission};
pub use portfolio::{PortfolioDraft, PortfolioItem, PortfolioResult, PortfolioTestimonial};
pub use query::ListQuery;
pub use service::{Service, ServiceDraft};
pub use team::{TeamMember, TeamMemberDraft};
pub use testimonial::{Testimonial, TestimonialDraft};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::cmp::Ordering;
use thiserror::Error;
use uuid::Uuid;

use crate::slug::{is_valid_slug, slugify};

/// Rejected draft input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("invalid slug '{0}': use lowercase letters, numbers, and hyphens")]
    InvalidSlug(String),
    #[error("rating must be between 1 and 5, got {0}")]
    Rating(i16),
    #[error("invalid email address")]
    Email,
}

/// A content record stored by every backend.
///
/// `Draft` is the writable part of the record: what the admin console
/// submits on create and update. Identity and timestamps are owned by the
/// repository.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    type Draft: Clone + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Stable collection name, used as the admin route segment and the
    /// document store's collection key.
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;

    fn slug(&self) -> Option<&str> {
        None
    }

    /// Validate and normalize a draft before it is written.
    fn prepare(draft: Self::Draft) -> Result<Self::Draft, ValidationError>;

    fn create(id: Uuid, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn apply(&mut self, draft: Self::Draft, now: DateTime<Utc>);

    /// Whether public routes may show this record.
    fn is_public(&self) -> bool {
        true
    }

    fn is_featured(&self) -> bool {
        false
    }

    /// `None` for collections without categories; the `category` filter skips them.
    fn category(&self) -> Option<&str> {
        None
    }

    /// Text fields matched by the `q` search filter.
    fn search_fields(&self) -> Vec<&str>;

    /// Natural display order; newest first unless overridden.
    fn display_order(a: &Self, b: &Self) -> Ordering {
        b.created_at().cmp(&a.created_at())
    }
}

pub(crate) fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

/// Fill an empty slug from the title, otherwise check the one supplied.
pub(crate) fn resolve_slug(slug: Option<String>, title: &str) -> Result<String, ValidationError> {
    match slug.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(s) if is_valid_slug(&s) => Ok(s),
        Some(s) => Err(ValidationError::InvalidSlug(s)),
        None => {
            let generated = slugify(title);
            if generated.is_empty() {
                Err(ValidationError::InvalidSlug(title.to_string()))
            } else {
                Ok(generated)
            }
        }
    }
}

/// Trim optional text, treating blank as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_slug_generates_from_title() {
        assert_eq!(
            resolve_slug(None, "Brand Strategy").unwrap(),
            "brand-strategy"
        );
        assert_eq!(
            resolve_slug(Some("   ".into()), "Brand Strategy").unwrap(),
            "brand-strategy"
        );
    }

    #[test]
    fn test_resolve_slug_keeps_valid_slug() {
        assert_eq!(
            resolve_slug(Some("custom-slug".into()), "Ignored").unwrap(),
            "custom-slug"
        );
    }

    #[test]
    fn test_resolve_slug_rejects_invalid_input() {
        assert_eq!(
            resolve_slug(Some("Bad Slug".into()), "x"),
            Err(ValidationError::InvalidSlug("Bad Slug".into()))
        );
        assert!(resolve_slug(None, "!!!").is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" x ".into())), Some("x".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
