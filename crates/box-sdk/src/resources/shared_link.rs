//! Shared links on files and folders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharedLinkAccess {
    /// Anyone with the link.
    Open,
    /// People in the owner's enterprise.
    Company,
    /// Collaborators on the item only.
    Collaborators,
    #[serde(other)]
    Unknown,
}

impl SharedLinkAccess {
    pub fn as_str(&self) -> &'static str {
        match self {
            SharedLinkAccess::Open => "open",
            SharedLinkAccess::Company => "company",
            SharedLinkAccess::Collaborators => "collaborators",
            SharedLinkAccess::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedLinkPermissions {
    pub can_download: bool,
    pub can_preview: bool,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedLink {
    pub url: Option<String>,
    pub download_url: Option<String>,
    pub vanity_url: Option<String>,
    pub is_password_enabled: Option<bool>,
    #[serde(with = "crate::date::option")]
    pub unshared_at: Option<DateTime<Utc>>,
    pub download_count: Option<u64>,
    pub preview_count: Option<u64>,
    pub access: Option<SharedLinkAccess>,
    pub effective_access: Option<SharedLinkAccess>,
    pub permissions: Option<SharedLinkPermissions>,
}

impl SharedLink {
    pub fn new(access: SharedLinkAccess) -> Self {
        Self { access: Some(access), ..Self::default() }
    }

    /// The writable members only, as sent in a `shared_link` request body.
    /// Counters and URLs are assigned by Box.
    pub fn to_request(&self) -> Value {
        let mut body = Map::new();
        if let Some(access) = self.access {
            body.insert("access".to_owned(), json!(access.as_str()));
        }
        if let Some(at) = &self.unshared_at {
            body.insert("unshared_at".to_owned(), json!(date::format(at)));
        }
        if let Some(permissions) = self.permissions {
            body.insert("permissions".to_owned(), json!(permissions));
        }
        Value::Object(body)
    }
}
