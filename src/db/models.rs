use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generator::GenerationPolicy;

/// One immutable row of the `passwords` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedPassword {
    pub id: i64,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub policy: Option<GenerationPolicy>,
    pub website: Option<String>,
    pub username: Option<String>,
}

/// Insert payload. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPassword {
    pub value: String,
    pub policy: Option<GenerationPolicy>,
    pub website: Option<String>,
    pub username: Option<String>,
}

impl NewPassword {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            policy: None,
            website: None,
            username: None,
        }
    }

    pub fn with_policy(mut self, policy: GenerationPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Attach labels; blank strings are treated as absent.
    pub fn with_labels(mut self, website: Option<String>, username: Option<String>) -> Self {
        self.website = non_blank(website);
        self.username = non_blank(username);
        self
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Listing window. `limit: None` returns every remaining row.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Page {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
