//! Retention policies and their enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use serde_with::{serde_as, DefaultOnError, DisplayFromStr, PickFirst};

use crate::connection::BoxApiConnection;
use crate::error::Result;
use crate::info::{impl_box_info, BoxInfo, PendingChanges};
use crate::pagination::BoxResourceIterable;
use crate::resource::{box_resource, BoxResource};
use crate::url_template::{QueryStringBuilder, UrlTemplate};

use super::fields_query;
use super::folder::BoxFolder;
use super::retention_policy_assignment::{self, BoxRetentionPolicyAssignment, RetentionPolicyAssignmentInfo};
use super::user::UserInfo;

const RETENTION_POLICIES_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("retention_policies");
const POLICY_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("retention_policies/%s");
const ASSIGNMENTS_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("retention_policies/%s/assignments");

box_resource!(
    /// A retention policy.
    BoxRetentionPolicy,
    "retention_policy"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicyType {
    Finite,
    Indefinite,
    #[serde(other)]
    Unknown,
}

impl RetentionPolicyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetentionPolicyType::Finite => "finite",
            RetentionPolicyType::Indefinite => "indefinite",
            RetentionPolicyType::Unknown => "unknown",
        }
    }
}

/// What happens to content once its retention period ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispositionAction {
    PermanentlyDelete,
    RemoveRetention,
    #[serde(other)]
    Unknown,
}

impl DispositionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispositionAction::PermanentlyDelete => "permanently_delete",
            DispositionAction::RemoveRetention => "remove_retention",
            DispositionAction::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicyStatus {
    Active,
    Retired,
    #[serde(other)]
    Unknown,
}

impl RetentionPolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetentionPolicyStatus::Active => "active",
            RetentionPolicyStatus::Retired => "retired",
            RetentionPolicyStatus::Unknown => "unknown",
        }
    }
}

/// Filters for [`BoxRetentionPolicy::get_all`].
#[derive(Debug, Clone, Default)]
pub struct RetentionPolicyFilter {
    /// Trailing partial match on the policy name.
    pub policy_name: Option<String>,
    pub policy_type: Option<RetentionPolicyType>,
    pub created_by_user_id: Option<String>,
}

impl BoxRetentionPolicy {
    /// A policy that keeps content until it is manually released.
    pub async fn create_indefinite_policy(api: &BoxApiConnection, name: &str) -> Result<RetentionPolicyInfo> {
        Self::create_policy(api, name, RetentionPolicyType::Indefinite, None, DispositionAction::RemoveRetention).await
    }

    /// A policy that keeps content for `length` days, then applies `action`.
    pub async fn create_finite_policy(
        api: &BoxApiConnection,
        name: &str,
        length: u32,
        action: DispositionAction,
    ) -> Result<RetentionPolicyInfo> {
        Self::create_policy(api, name, RetentionPolicyType::Finite, Some(length), action).await
    }

    async fn create_policy(
        api: &BoxApiConnection,
        name: &str,
        policy_type: RetentionPolicyType,
        length: Option<u32>,
        action: DispositionAction,
    ) -> Result<RetentionPolicyInfo> {
        let mut body = Map::new();
        body.insert("policy_name".to_owned(), json!(name));
        body.insert("policy_type".to_owned(), json!(policy_type.as_str()));
        body.insert("disposition_action".to_owned(), json!(action.as_str()));
        if policy_type != RetentionPolicyType::Indefinite {
            if let Some(length) = length {
                body.insert("retention_length".to_owned(), json!(length));
            }
        }

        let url = RETENTION_POLICIES_URL_TEMPLATE.build(api.base_url(), &[])?;
        RetentionPolicyInfo::from_json(api.post(url, &Value::Object(body)).await?)
    }

    pub async fn get_info(&self, fields: &[&str]) -> Result<RetentionPolicyInfo> {
        let url = POLICY_URL_TEMPLATE.build_with_query(
            self.api.base_url(),
            &fields_query(fields),
            &[self.id.as_str()],
        )?;
        RetentionPolicyInfo::from_json(self.api.get(url).await?)
    }

    pub async fn update_info(&self, info: &mut RetentionPolicyInfo) -> Result<()> {
        let url = POLICY_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        super::put_pending(&self.api, url, info).await
    }

    pub fn get_all(
        api: &BoxApiConnection,
        filter: &RetentionPolicyFilter,
        limit: u64,
        fields: &[&str],
    ) -> Result<BoxResourceIterable<RetentionPolicyInfo>> {
        let mut q = QueryStringBuilder::new();
        q.append_opt("policy_name", filter.policy_name.as_deref())
            .append_opt("policy_type", filter.policy_type.map(|t| t.as_str()))
            .append_opt("created_by_user_id", filter.created_by_user_id.as_deref())
            .append_fields(fields);
        let url = RETENTION_POLICIES_URL_TEMPLATE.build_with_query(api.base_url(), &q.to_query(), &[])?;
        Ok(BoxResourceIterable::marker(api, url, limit))
    }

    pub async fn assign_to_enterprise(&self) -> Result<RetentionPolicyAssignmentInfo> {
        BoxRetentionPolicyAssignment::create(&self.api, &self.id, retention_policy_assignment::TYPE_ENTERPRISE, None)
            .await
    }

    pub async fn assign_to_folder(&self, folder: &BoxFolder) -> Result<RetentionPolicyAssignmentInfo> {
        let assign_to = retention_policy_assignment::TYPE_FOLDER;
        BoxRetentionPolicyAssignment::create(&self.api, &self.id, assign_to, Some(folder.id())).await
    }

    /// Assignments of this policy, optionally only those of `assign_to_type`
    /// (`enterprise` or `folder`).
    pub fn get_assignments(
        &self,
        assign_to_type: Option<&str>,
        limit: u64,
        fields: &[&str],
    ) -> Result<BoxResourceIterable<RetentionPolicyAssignmentInfo>> {
        let mut q = QueryStringBuilder::new();
        q.append_opt("type", assign_to_type).append_fields(fields);
        let url = ASSIGNMENTS_URL_TEMPLATE.build_with_query(self.api.base_url(), &q.to_query(), &[self.id.as_str()])?;
        Ok(BoxResourceIterable::marker(&self.api, url, limit))
    }
}

#[serde_as]
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicyInfo {
    pub id: Option<String>,
    pub policy_name: Option<String>,
    pub policy_type: Option<RetentionPolicyType>,
    /// Days, for finite policies. Box sends `"indefinite"` for the others.
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    pub retention_length: Option<u32>,
    pub disposition_action: Option<DispositionAction>,
    pub status: Option<RetentionPolicyStatus>,
    pub created_by: Option<UserInfo>,
    #[serde(with = "crate::date::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pending: PendingChanges,
}

impl_box_info!(RetentionPolicyInfo);

impl RetentionPolicyInfo {
    pub fn set_policy_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.add_pending_change("policy_name", name.clone());
        self.policy_name = Some(name);
    }

    pub fn set_disposition_action(&mut self, action: DispositionAction) {
        self.add_pending_change("disposition_action", action.as_str());
        self.disposition_action = Some(action);
    }

    /// Retiring a policy is permanent.
    pub fn set_status(&mut self, status: RetentionPolicyStatus) {
        self.add_pending_change("status", status.as_str());
        self.status = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_length_accepts_numbers_and_text() {
        let info = RetentionPolicyInfo::from_json(json!({"id": "1", "retention_length": 365})).unwrap();
        assert_eq!(info.retention_length, Some(365));
        let info = RetentionPolicyInfo::from_json(json!({"id": "1", "retention_length": "30"})).unwrap();
        assert_eq!(info.retention_length, Some(30));
        let info = RetentionPolicyInfo::from_json(json!({"id": "1", "retention_length": "indefinite"})).unwrap();
        assert_eq!(info.retention_length, None);
    }

    #[test]
    fn enum_setters_queue_wire_names() {
        let mut info = RetentionPolicyInfo::default();
        info.set_disposition_action(DispositionAction::PermanentlyDelete);
        info.set_status(RetentionPolicyStatus::Retired);
        assert_eq!(
            info.pending_changes(),
            Some(json!({"disposition_action": "permanently_delete", "status": "retired"}))
        );
    }
}
