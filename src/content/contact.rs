use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{non_blank, require, Entity, ValidationError};

/// Inbox state of a contact submission. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Replied,
    Archived,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Replied => "replied",
            ContactStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ContactStatus::New),
            "read" => Ok(ContactStatus::Read),
            "replied" => Ok(ContactStatus::Replied),
            "archived" => Ok(ContactStatus::Archived),
            other => Err(format!("unknown contact status '{}'", other)),
        }
    }
}

impl TryFrom<String> for ContactStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub service: Option<String>,
    pub budget: Option<String>,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub service: Option<String>,
    pub budget: Option<String>,
    pub message: String,
    pub status: ContactStatus,
}

impl From<ContactSubmission> for ContactDraft {
    fn from(submission: ContactSubmission) -> Self {
        Self {
            name: submission.name,
            email: submission.email,
            company: submission.company,
            service: submission.service,
            budget: submission.budget,
            message: submission.message,
            status: submission.status,
        }
    }
}

impl Entity for ContactSubmission {
    type Draft = ContactDraft;
    const COLLECTION: &'static str = "contacts";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn prepare(mut draft: ContactDraft) -> Result<ContactDraft, ValidationError> {
        require(&draft.name, "name")?;
        require(&draft.email, "email")?;
        require(&draft.message, "message")?;
        draft.email = draft.email.trim().to_string();
        if !draft.email.contains('@') {
            return Err(ValidationError::Email);
        }
        draft.company = non_blank(draft.company);
        draft.service = non_blank(draft.service);
        draft.budget = non_blank(draft.budget);
        Ok(draft)
    }

    fn create(id: Uuid, draft: ContactDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            company: draft.company,
            service: draft.service,
            budget: draft.budget,
            message: draft.message,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: ContactDraft, now: DateTime<Utc>) {
        *self = Self {
            created_at: self.created_at,
            ..Self::create(self.id, draft, now)
        };
    }

    /// Submissions never appear on public routes.
    fn is_public(&self) -> bool {
        false
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> =
            vec![self.name.as_str(), self.email.as_str(), self.message.as_str()];
        fields.extend(self.company.as_deref());
        fields
    }
}
