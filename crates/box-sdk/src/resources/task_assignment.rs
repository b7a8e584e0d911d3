use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::info::{impl_box_info, BoxInfo, PendingChanges};
use crate::resource::box_resource;
use crate::url_template::UrlTemplate;

use super::fields_query;
use super::item::ItemInfo;
use super::user::UserInfo;

const TASK_ASSIGNMENT_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("task_assignments/%s");

box_resource!(
    /// One user's share of a task.
    BoxTaskAssignment,
    "task_assignment"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionState {
    Completed,
    Incomplete,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl ResolutionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionState::Completed => "completed",
            ResolutionState::Incomplete => "incomplete",
            ResolutionState::Approved => "approved",
            ResolutionState::Rejected => "rejected",
            ResolutionState::Unknown => "unknown",
        }
    }
}

impl BoxTaskAssignment {
    pub async fn get_info(&self, fields: &[&str]) -> Result<TaskAssignmentInfo> {
        let url = TASK_ASSIGNMENT_URL_TEMPLATE.build_with_query(
            self.api.base_url(),
            &fields_query(fields),
            &[self.id.as_str()],
        )?;
        TaskAssignmentInfo::from_json(self.api.get(url).await?)
    }

    pub async fn update_info(&self, info: &mut TaskAssignmentInfo) -> Result<()> {
        let url = TASK_ASSIGNMENT_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        super::put_pending(&self.api, url, info).await
    }

    pub async fn delete(&self) -> Result<()> {
        let url = TASK_ASSIGNMENT_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        self.api.delete(url).await
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskAssignmentInfo {
    pub id: Option<String>,
    pub item: Option<ItemInfo>,
    pub assigned_to: Option<UserInfo>,
    pub message: Option<String>,
    #[serde(with = "crate::date::option")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub reminded_at: Option<DateTime<Utc>>,
    pub resolution_state: Option<ResolutionState>,
    pub assigned_by: Option<UserInfo>,
    #[serde(skip)]
    pending: PendingChanges,
}

impl_box_info!(TaskAssignmentInfo);

impl TaskAssignmentInfo {
    pub fn set_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.add_pending_change("message", message.clone());
        self.message = Some(message);
    }

    pub fn set_resolution_state(&mut self, state: ResolutionState) {
        self.add_pending_change("resolution_state", state.as_str());
        self.resolution_state = Some(state);
    }
}
