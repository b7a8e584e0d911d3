//! Legal hold policies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::connection::BoxApiConnection;
use crate::date;
use crate::error::Result;
use crate::info::{impl_box_info, BoxInfo, PendingChanges};
use crate::pagination::BoxResourceIterable;
use crate::resource::{box_resource, BoxResource};
use crate::url_template::{QueryStringBuilder, UrlTemplate};

use super::fields_query;
use super::legal_hold_assignment::{BoxLegalHoldAssignment, LegalHoldAssignmentInfo};
use super::user::UserInfo;

const LEGAL_HOLD_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("legal_hold_policies/%s");
const ALL_LEGAL_HOLD_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("legal_hold_policies");
const LEGAL_HOLD_ASSIGNMENTS_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("legal_hold_policies/%s/assignments");

box_resource!(
    /// A legal hold policy. Content assigned to an active policy cannot be
    /// deleted.
    BoxLegalHold,
    "legal_hold"
);

impl BoxLegalHold {
    pub async fn create(
        api: &BoxApiConnection,
        name: &str,
        description: Option<&str>,
        filter_started_at: Option<DateTime<Utc>>,
        filter_ended_at: Option<DateTime<Utc>>,
    ) -> Result<LegalHoldInfo> {
        let mut body = Map::new();
        body.insert("policy_name".to_owned(), json!(name));
        if let Some(description) = description {
            body.insert("description".to_owned(), json!(description));
        }
        if let Some(at) = filter_started_at {
            body.insert("filter_started_at".to_owned(), json!(date::format(&at)));
        }
        if let Some(at) = filter_ended_at {
            body.insert("filter_ended_at".to_owned(), json!(date::format(&at)));
        }

        let url = ALL_LEGAL_HOLD_URL_TEMPLATE.build(api.base_url(), &[])?;
        LegalHoldInfo::from_json(api.post(url, &Value::Object(body)).await?)
    }

    pub async fn get_info(&self, fields: &[&str]) -> Result<LegalHoldInfo> {
        let url = LEGAL_HOLD_URL_TEMPLATE.build_with_query(
            self.api.base_url(),
            &fields_query(fields),
            &[self.id.as_str()],
        )?;
        LegalHoldInfo::from_json(self.api.get(url).await?)
    }

    pub async fn update_info(&self, info: &mut LegalHoldInfo) -> Result<()> {
        let url = LEGAL_HOLD_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        super::put_pending(&self.api, url, info).await
    }

    pub async fn delete(&self) -> Result<()> {
        let url = LEGAL_HOLD_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        self.api.delete(url).await
    }

    /// Every policy in the enterprise, optionally narrowed to names starting
    /// with `policy_name`.
    pub fn get_all(
        api: &BoxApiConnection,
        policy_name: Option<&str>,
        limit: u64,
        fields: &[&str],
    ) -> Result<BoxResourceIterable<LegalHoldInfo>> {
        let mut q = QueryStringBuilder::new();
        q.append_opt("policy_name", policy_name).append_fields(fields);
        let url = ALL_LEGAL_HOLD_URL_TEMPLATE.build_with_query(api.base_url(), &q.to_query(), &[])?;
        Ok(BoxResourceIterable::marker(api, url, limit))
    }

    /// Put `resource` on hold. Files, file versions, folders and users can be
    /// held.
    pub async fn assign_to<R: BoxResource>(&self, resource: &R) -> Result<LegalHoldAssignmentInfo> {
        BoxLegalHoldAssignment::create(&self.api, &self.id, R::RESOURCE_TYPE, resource.id()).await
    }

    pub fn get_assignments(
        &self,
        assign_to_type: Option<&str>,
        assign_to_id: Option<&str>,
        limit: u64,
        fields: &[&str],
    ) -> Result<BoxResourceIterable<LegalHoldAssignmentInfo>> {
        let mut q = QueryStringBuilder::new();
        q.append_opt("assign_to_type", assign_to_type)
            .append_opt("assign_to_id", assign_to_id)
            .append_fields(fields);
        let url = LEGAL_HOLD_ASSIGNMENTS_URL_TEMPLATE.build_with_query(
            self.api.base_url(),
            &q.to_query(),
            &[self.id.as_str()],
        )?;
        Ok(BoxResourceIterable::marker(&self.api, url, limit))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalHoldStatus {
    Active,
    Applying,
    Releasing,
    Released,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentCounts {
    pub user: u64,
    pub folder: u64,
    pub file: u64,
    pub file_version: u64,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalHoldInfo {
    pub id: Option<String>,
    pub policy_name: Option<String>,
    pub description: Option<String>,
    pub status: Option<LegalHoldStatus>,
    pub assignment_counts: Option<AssignmentCounts>,
    pub created_by: Option<UserInfo>,
    #[serde(with = "crate::date::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub filter_started_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub filter_ended_at: Option<DateTime<Utc>>,
    pub release_notes: Option<String>,
    #[serde(skip)]
    pending: PendingChanges,
}

impl_box_info!(LegalHoldInfo);

impl LegalHoldInfo {
    pub fn set_policy_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.add_pending_change("policy_name", name.clone());
        self.policy_name = Some(name);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        self.add_pending_change("description", description.clone());
        self.description = Some(description);
    }

    /// Notes shown once the policy is released.
    pub fn set_release_notes(&mut self, notes: impl Into<String>) {
        let notes = notes.into();
        self.add_pending_change("release_notes", notes.clone());
        self.release_notes = Some(notes);
    }
}
