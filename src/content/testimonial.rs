use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;
use uuid::Uuid;

use super::{require, Entity, ValidationError};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: Uuid,
    pub name: String,
    pub designation: String,
    pub company: String,
    pub content: String,
    pub rating: i16,
    pub featured: bool,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestimonialDraft {
    pub name: String,
    pub designation: String,
    pub company: String,
    pub content: String,
    pub rating: i16,
    pub featured: bool,
    pub order_index: i32,
}

impl Default for TestimonialDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            designation: String::new(),
            company: String::new(),
            content: String::new(),
            rating: 5,
            featured: false,
            order_index: 0,
        }
    }
}

impl Entity for Testimonial {
    type Draft = TestimonialDraft;
    const COLLECTION: &'static str = "testimonials";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn prepare(draft: TestimonialDraft) -> Result<TestimonialDraft, ValidationError> {
        require(&draft.name, "name")?;
        require(&draft.content, "content")?;
        if !(1..=5).contains(&draft.rating) {
            return Err(ValidationError::Rating(draft.rating));
        }
        Ok(draft)
    }

    fn create(id: Uuid, draft: TestimonialDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            designation: draft.designation,
            company: draft.company,
            content: draft.content,
            rating: draft.rating,
            featured: draft.featured,
            order_index: draft.order_index,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: TestimonialDraft, now: DateTime<Utc>) {
        *self = Self {
            created_at: self.created_at,
            ..Self::create(self.id, draft, now)
        };
    }

    fn is_featured(&self) -> bool {
        self.featured
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.company.as_str(), self.content.as_str()]
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        a.order_index
            .cmp(&b.order_index)
            .then_with(|| b.created_at.cmp(&a.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_must_be_one_to_five() {
        let base = TestimonialDraft {
            name: "Ada".into(),
            content: "Great work".into(),
            ..Default::default()
        };
        assert!(Testimonial::prepare(base.clone()).is_ok());

        for rating in [0, 6, -1] {
            let draft = TestimonialDraft {
                rating,
                ..base.clone()
            };
            assert_eq!(
                Testimonial::prepare(draft).unwrap_err(),
                ValidationError::Rating(rating)
            );
        }
    }
}
