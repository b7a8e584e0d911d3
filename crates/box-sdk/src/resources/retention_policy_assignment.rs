use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::connection::BoxApiConnection;
use crate::error::Result;
use crate::info::{impl_box_info, BoxInfo, PendingChanges, ResourceRef};
use crate::resource::box_resource;
use crate::url_template::UrlTemplate;

use super::fields_query;
use super::retention_policy::RetentionPolicyInfo;
use super::user::UserInfo;

const ASSIGNMENTS_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("retention_policy_assignments");
const RETENTION_POLICY_ASSIGNMENT_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("retention_policy_assignments/%s");

pub const TYPE_ENTERPRISE: &str = "enterprise";
pub const TYPE_FOLDER: &str = "folder";

box_resource!(
    /// Applies a retention policy to the whole enterprise or to one folder.
    BoxRetentionPolicyAssignment,
    "retention_policy_assignment"
);

impl BoxRetentionPolicyAssignment {
    /// `assign_to_id` is left out of the request for enterprise assignments.
    pub async fn create(
        api: &BoxApiConnection,
        policy_id: &str,
        assign_to_type: &str,
        assign_to_id: Option<&str>,
    ) -> Result<RetentionPolicyAssignmentInfo> {
        let mut assign_to = Map::new();
        assign_to.insert("type".to_owned(), json!(assign_to_type));
        if let Some(id) = assign_to_id {
            assign_to.insert("id".to_owned(), json!(id));
        }
        let body = json!({ "policy_id": policy_id, "assign_to": Value::Object(assign_to) });

        let url = ASSIGNMENTS_URL_TEMPLATE.build(api.base_url(), &[])?;
        RetentionPolicyAssignmentInfo::from_json(api.post(url, &body).await?)
    }

    pub async fn get_info(&self, fields: &[&str]) -> Result<RetentionPolicyAssignmentInfo> {
        let url = RETENTION_POLICY_ASSIGNMENT_URL_TEMPLATE.build_with_query(
            self.api.base_url(),
            &fields_query(fields),
            &[self.id.as_str()],
        )?;
        RetentionPolicyAssignmentInfo::from_json(self.api.get(url).await?)
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicyAssignmentInfo {
    pub id: Option<String>,
    pub retention_policy: Option<RetentionPolicyInfo>,
    pub assigned_to: Option<ResourceRef>,
    pub assigned_by: Option<UserInfo>,
    #[serde(with = "crate::date::option")]
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pending: PendingChanges,
}

impl_box_info!(RetentionPolicyAssignmentInfo);

impl RetentionPolicyAssignmentInfo {
    pub fn assigned_to_type(&self) -> Option<&str> {
        self.assigned_to.as_ref().and_then(|r| r.kind.as_deref())
    }

    pub fn assigned_to_id(&self) -> Option<&str> {
        self.assigned_to.as_ref().and_then(|r| r.id.as_deref())
    }
}
