use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::connection::BoxApiConnection;
use crate::error::Result;
use crate::info::{impl_box_info, BoxInfo, PendingChanges, ResourceRef};
use crate::resource::box_resource;
use crate::url_template::UrlTemplate;

use super::fields_query;
use super::legal_hold::LegalHoldInfo;
use super::user::UserInfo;

const ASSIGNMENTS_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("legal_hold_policy_assignments");
const LEGAL_HOLD_ASSIGNMENT_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("legal_hold_policy_assignments/%s");

pub const TYPE_FILE: &str = "file";
pub const TYPE_FILE_VERSION: &str = "file_version";
pub const TYPE_FOLDER: &str = "folder";
pub const TYPE_USER: &str = "user";

box_resource!(
    /// Links a legal hold policy to one held object.
    BoxLegalHoldAssignment,
    "legal_hold_assignment"
);

impl BoxLegalHoldAssignment {
    pub async fn create(
        api: &BoxApiConnection,
        policy_id: &str,
        resource_type: &str,
        resource_id: &str,
    ) -> Result<LegalHoldAssignmentInfo> {
        let url = ASSIGNMENTS_URL_TEMPLATE.build(api.base_url(), &[])?;
        let body = json!({
            "policy_id": policy_id,
            "assign_to": { "type": resource_type, "id": resource_id },
        });
        LegalHoldAssignmentInfo::from_json(api.post(url, &body).await?)
    }

    pub async fn get_info(&self, fields: &[&str]) -> Result<LegalHoldAssignmentInfo> {
        let url = LEGAL_HOLD_ASSIGNMENT_URL_TEMPLATE.build_with_query(
            self.api.base_url(),
            &fields_query(fields),
            &[self.id.as_str()],
        )?;
        LegalHoldAssignmentInfo::from_json(self.api.get(url).await?)
    }

    /// Release the held object from the policy.
    pub async fn delete(&self) -> Result<()> {
        let url = LEGAL_HOLD_ASSIGNMENT_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        self.api.delete(url).await
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalHoldAssignmentInfo {
    pub id: Option<String>,
    pub legal_hold_policy: Option<LegalHoldInfo>,
    pub assigned_to: Option<ResourceRef>,
    pub assigned_by: Option<UserInfo>,
    #[serde(with = "crate::date::option")]
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pending: PendingChanges,
}

impl_box_info!(LegalHoldAssignmentInfo);

impl LegalHoldAssignmentInfo {
    pub fn assigned_to_type(&self) -> Option<&str> {
        self.assigned_to.as_ref().and_then(|r| r.kind.as_deref())
    }

    pub fn assigned_to_id(&self) -> Option<&str> {
        self.assigned_to.as_ref().and_then(|r| r.id.as_deref())
    }
}
