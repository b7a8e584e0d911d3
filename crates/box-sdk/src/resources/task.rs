//! Tasks on files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::date;
use crate::error::Result;
use crate::info::{impl_box_info, BoxInfo, Collection, PendingChanges};
use crate::resource::{box_resource, BoxResource};
use crate::url_template::UrlTemplate;

use super::fields_query;
use super::file::FileInfo;
use super::task_assignment::TaskAssignmentInfo;
use super::user::{BoxUser, UserInfo};

const TASK_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("tasks/%s");
const ADD_TASK_ASSIGNMENT_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("task_assignments");
const GET_ASSIGNMENTS_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("tasks/%s/assignments");

box_resource!(
    /// A task attached to a file.
    BoxTask,
    "task"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    Review,
    Complete,
    #[serde(other)]
    Unknown,
}

impl TaskAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskAction::Review => "review",
            TaskAction::Complete => "complete",
            TaskAction::Unknown => "unknown",
        }
    }
}

impl BoxTask {
    pub async fn get_info(&self, fields: &[&str]) -> Result<TaskInfo> {
        let url = TASK_URL_TEMPLATE.build_with_query(self.api.base_url(), &fields_query(fields), &[self.id.as_str()])?;
        TaskInfo::from_json(self.api.get(url).await?)
    }

    pub async fn update_info(&self, info: &mut TaskInfo) -> Result<()> {
        let url = TASK_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        super::put_pending(&self.api, url, info).await
    }

    pub async fn delete(&self) -> Result<()> {
        let url = TASK_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        self.api.delete(url).await
    }

    pub async fn add_assignment(&self, user: &BoxUser) -> Result<TaskAssignmentInfo> {
        self.create_assignment(json!({ "id": user.id() })).await
    }

    /// Assign by login. Box invites the address if it has no account yet.
    pub async fn add_assignment_by_login(&self, login: &str) -> Result<TaskAssignmentInfo> {
        self.create_assignment(json!({ "login": login })).await
    }

    async fn create_assignment(&self, assign_to: serde_json::Value) -> Result<TaskAssignmentInfo> {
        let url = ADD_TASK_ASSIGNMENT_URL_TEMPLATE.build(self.api.base_url(), &[])?;
        let body = json!({ "task": self.to_reference(), "assign_to": assign_to });
        TaskAssignmentInfo::from_json(self.api.post(url, &body).await?)
    }

    pub async fn get_assignments(&self) -> Result<Vec<TaskAssignmentInfo>> {
        let url = GET_ASSIGNMENTS_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        let assignments: Collection<TaskAssignmentInfo> = self.api.get(url).await?;
        Ok(assignments.entries)
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskInfo {
    pub id: Option<String>,
    pub item: Option<FileInfo>,
    #[serde(with = "crate::date::option")]
    pub due_at: Option<DateTime<Utc>>,
    pub action: Option<TaskAction>,
    pub message: Option<String>,
    pub task_assignment_collection: Option<Collection<TaskAssignmentInfo>>,
    pub is_completed: Option<bool>,
    pub created_by: Option<UserInfo>,
    #[serde(with = "crate::date::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pending: PendingChanges,
}

impl_box_info!(TaskInfo);

impl TaskInfo {
    pub fn task_assignments(&self) -> &[TaskAssignmentInfo] {
        self.task_assignment_collection
            .as_ref()
            .map(|c| c.entries.as_slice())
            .unwrap_or_default()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.add_pending_change("message", message.clone());
        self.message = Some(message);
    }

    pub fn set_due_at(&mut self, due_at: DateTime<Utc>) {
        self.add_pending_change("due_at", date::format(&due_at));
        self.due_at = Some(due_at);
    }

    pub fn set_action(&mut self, action: TaskAction) {
        self.add_pending_change("action", action.as_str());
        self.action = Some(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_task_with_nested_file() {
        let info = TaskInfo::from_json(json!({
            "type": "task",
            "id": "1839355",
            "item": {
                "type": "file",
                "id": "7287087200",
                "sequence_id": "0",
                "etag": "0",
                "sha1": "0bbd79a105c504f99573e3799756debba4c760cd",
                "name": "box-logo.png"
            },
            "due_at": "2014-04-03T11:09:43-07:00",
            "action": "review",
            "message": "REVIEW PLZ K THX",
            "task_assignment_collection": {"total_count": 0, "entries": []},
            "is_completed": false,
            "created_by": {"type": "user", "id": "11993747", "name": "☁ sean ☁", "login": "sean@box.com"},
            "created_at": "2013-04-03T11:12:54-07:00"
        }))
        .unwrap();

        let item = info.item.as_ref().unwrap();
        assert_eq!(item.item.id.as_deref(), Some("7287087200"));
        assert_eq!(item.item.sequence_id.as_deref(), Some("0"));
        assert_eq!(item.sha1.as_deref(), Some("0bbd79a105c504f99573e3799756debba4c760cd"));
        assert_eq!(info.due_at, Some(Utc.with_ymd_and_hms(2014, 4, 3, 18, 9, 43).unwrap()));
        assert_eq!(info.action, Some(TaskAction::Review));
        assert!(info.task_assignments().is_empty());
        assert_eq!(info.is_completed, Some(false));
        assert_eq!(info.created_by.as_ref().and_then(|u| u.name.as_deref()), Some("☁ sean ☁"));
    }

    #[test]
    fn setters_render_wire_values() {
        let mut info = TaskInfo::default();
        info.set_action(TaskAction::Complete);
        info.set_due_at(Utc.with_ymd_and_hms(2016, 5, 10, 0, 41, 27).unwrap());
        assert_eq!(
            info.pending_changes(),
            Some(json!({"action": "complete", "due_at": "2016-05-10T00:41:27+00:00"}))
        );
    }
}
