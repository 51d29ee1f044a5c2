use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;
use uuid::Uuid;

use super::{non_blank, require, Entity, ValidationError};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub designation: String,
    pub bio: String,
    pub image_url: String,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMemberDraft {
    pub name: String,
    pub designation: String,
    pub bio: String,
    pub image_url: String,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub order_index: i32,
}

impl Entity for TeamMember {
    type Draft = TeamMemberDraft;
    const COLLECTION: &'static str = "team";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn prepare(mut draft: TeamMemberDraft) -> Result<TeamMemberDraft, ValidationError> {
        require(&draft.name, "name")?;
        require(&draft.designation, "designation")?;
        draft.linkedin_url = non_blank(draft.linkedin_url);
        draft.twitter_url = non_blank(draft.twitter_url);
        draft.github_url = non_blank(draft.github_url);
        draft.website_url = non_blank(draft.website_url);
        Ok(draft)
    }

    fn create(id: Uuid, draft: TeamMemberDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            designation: draft.designation,
            bio: draft.bio,
            image_url: draft.image_url,
            linkedin_url: draft.linkedin_url,
            twitter_url: draft.twitter_url,
            github_url: draft.github_url,
            website_url: draft.website_url,
            order_index: draft.order_index,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: TeamMemberDraft, now: DateTime<Utc>) {
        *self = Self {
            created_at: self.created_at,
            ..Self::create(self.id, draft, now)
        };
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.designation.as_str(), self.bio.as_str()]
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        a.order_index
            .cmp(&b.order_index)
            .then_with(|| a.name.cmp(&b.name))
    }
}
