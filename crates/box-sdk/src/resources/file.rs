use chrono::{DateTime, Utc};
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::date;
use crate::error::{BoxError, Result};
use crate::info::{impl_box_info, BoxInfo, Collection, PendingChanges};
use crate::resource::{box_resource, BoxResource};
use crate::url_template::UrlTemplate;

use super::fields_query;
use super::file_version::FileVersionInfo;
use super::folder::BoxFolder;
use super::item::{ItemFields, ItemRequests};
use super::metadata::item_metadata_methods;
use super::shared_link::{SharedLink, SharedLinkAccess, SharedLinkPermissions};
use super::task::{TaskAction, TaskInfo};
use super::user::UserInfo;

const FILE_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("files/%s");
const COPY_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("files/%s/copy");
const CONTENT_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("files/%s/content");
const VERSIONS_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("files/%s/versions");
const GET_TASKS_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("files/%s/tasks");
const ADD_TASK_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("tasks");

box_resource!(
    /// A file stored in Box.
    BoxFile,
    "file"
);

item_metadata_methods!(BoxFile, "files");

impl BoxFile {
    fn requests(&self) -> ItemRequests<'_> {
        ItemRequests { api: &self.api, item: FILE_URL_TEMPLATE, copy: COPY_URL_TEMPLATE, id: &self.id }
    }

    pub async fn get_info(&self, fields: &[&str]) -> Result<FileInfo> {
        let url = FILE_URL_TEMPLATE.build_with_query(self.api.base_url(), &fields_query(fields), &[self.id.as_str()])?;
        FileInfo::from_json(self.api.get(url).await?)
    }

    /// Send the pending changes of `info` and merge the result into it.
    pub async fn update_info(&self, info: &mut FileInfo) -> Result<()> {
        let url = FILE_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        super::put_pending(&self.api, url, info).await
    }

    pub async fn delete(&self) -> Result<()> {
        let url = FILE_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        self.api.delete(url).await
    }

    pub async fn copy(&self, destination: &BoxFolder, new_name: Option<&str>) -> Result<FileInfo> {
        FileInfo::from_json(self.requests().copy(destination.id(), new_name).await?)
    }

    pub async fn move_to(&self, destination: &BoxFolder, new_name: Option<&str>) -> Result<FileInfo> {
        FileInfo::from_json(self.requests().move_to(destination.id(), new_name).await?)
    }

    pub async fn rename(&self, name: &str) -> Result<FileInfo> {
        FileInfo::from_json(self.requests().rename(name).await?)
    }

    pub async fn lock(&self, expires_at: Option<DateTime<Utc>>, prevent_download: bool) -> Result<FileInfo> {
        let mut lock = Map::new();
        lock.insert("type".to_owned(), json!("lock"));
        if let Some(at) = expires_at {
            lock.insert("expires_at".to_owned(), json!(date::format(&at)));
        }
        lock.insert("is_download_prevented".to_owned(), json!(prevent_download));

        let url = FILE_URL_TEMPLATE.build_with_query(
            self.api.base_url(),
            &fields_query(&["lock"]),
            &[self.id.as_str()],
        )?;
        FileInfo::from_json(self.api.put(url, &json!({ "lock": Value::Object(lock) })).await?)
    }

    pub async fn unlock(&self) -> Result<FileInfo> {
        let url = FILE_URL_TEMPLATE.build_with_query(
            self.api.base_url(),
            &fields_query(&["lock"]),
            &[self.id.as_str()],
        )?;
        FileInfo::from_json(self.api.put(url, &json!({ "lock": null })).await?)
    }

    /// The raw bytes of the current version.
    pub async fn download(&self) -> Result<Vec<u8>> {
        let url = CONTENT_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        self.api.download(url).await
    }

    /// Bytes `start..=end` of the current version, or from `start` to the end
    /// of the file when `end` is `None`.
    pub async fn download_range(&self, start: u64, end: Option<u64>) -> Result<Vec<u8>> {
        if end.is_some_and(|end| end < start) {
            return Err(BoxError::InvalidArgument(format!("byte range {start}-{end:?} is empty")));
        }
        let url = CONTENT_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        self.api.download_range(url, start, end).await
    }

    /// Upload `content` as the new current version. The previous one joins
    /// [`get_versions`](Self::get_versions).
    pub async fn upload_version(&self, content: Vec<u8>, modified_at: Option<DateTime<Utc>>) -> Result<FileInfo> {
        let mut attributes = Map::new();
        if let Some(at) = modified_at {
            attributes.insert("content_modified_at".to_owned(), json!(date::format(&at)));
        }
        let form = multipart::Form::new()
            .text("attributes", Value::Object(attributes).to_string())
            .part("file", multipart::Part::bytes(content).file_name("file"));

        let url = CONTENT_URL_TEMPLATE.build(self.api.base_upload_url(), &[self.id.as_str()])?;
        single_upload(self.api.post_multipart(url, form).await?)
    }

    /// Share the file. `permissions` is only honored for `open` and
    /// `company` links.
    pub async fn create_shared_link(
        &self,
        access: SharedLinkAccess,
        unshared_at: Option<DateTime<Utc>>,
        permissions: Option<SharedLinkPermissions>,
    ) -> Result<SharedLink> {
        let link = SharedLink { unshared_at, permissions, ..SharedLink::new(access) };
        self.requests().create_shared_link(&link).await
    }

    /// Previous versions. The current one is not part of the list.
    pub async fn get_versions(&self) -> Result<Vec<FileVersionInfo>> {
        let url = VERSIONS_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        let versions: Collection<FileVersionInfo> = self.api.get(url).await?;
        Ok(versions.entries)
    }

    pub async fn add_task(
        &self,
        action: TaskAction,
        message: Option<&str>,
        due_at: Option<DateTime<Utc>>,
    ) -> Result<TaskInfo> {
        let mut body = Map::new();
        body.insert("item".to_owned(), self.to_reference());
        body.insert("action".to_owned(), json!(action.as_str()));
        if let Some(message) = message {
            body.insert("message".to_owned(), json!(message));
        }
        if let Some(due_at) = due_at {
            body.insert("due_at".to_owned(), json!(date::format(&due_at)));
        }

        let url = ADD_TASK_URL_TEMPLATE.build(self.api.base_url(), &[])?;
        TaskInfo::from_json(self.api.post(url, &Value::Object(body)).await?)
    }

    pub async fn get_tasks(&self, fields: &[&str]) -> Result<Vec<TaskInfo>> {
        let url = GET_TASKS_URL_TEMPLATE.build_with_query(
            self.api.base_url(),
            &fields_query(fields),
            &[self.id.as_str()],
        )?;
        let tasks: Collection<TaskInfo> = self.api.get(url).await?;
        Ok(tasks.entries)
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInfo {
    #[serde(flatten)]
    pub item: ItemFields,
    pub sha1: Option<String>,
    pub version_number: Option<String>,
    pub comment_count: Option<u64>,
    pub extension: Option<String>,
    pub is_package: Option<bool>,
    pub file_version: Option<FileVersionInfo>,
    pub lock: Option<FileLock>,
    #[serde(with = "crate::date::option")]
    pub content_created_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub content_modified_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pending: PendingChanges,
}

impl_box_info!(FileInfo);

impl FileInfo {
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.add_pending_change("name", name.clone());
        self.item.name = Some(name);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        self.add_pending_change("description", description.clone());
        self.item.description = Some(description);
    }

    /// Replace the shared link settings on the next `update_info`.
    pub fn set_shared_link(&mut self, link: SharedLink) {
        self.add_pending_change("shared_link", link.to_request());
        self.item.shared_link = Some(link);
    }
}

/// The file entry of an upload answer, which comes wrapped in a collection.
pub(crate) fn single_upload(uploaded: Collection<FileInfo>) -> Result<FileInfo> {
    uploaded
        .entries
        .into_iter()
        .next()
        .ok_or_else(|| BoxError::UnexpectedResponse("upload returned no file entry".to_owned()))
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLock {
    pub id: Option<String>,
    pub created_by: Option<UserInfo>,
    #[serde(with = "crate::date::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub expires_at: Option<DateTime<Utc>>,
    pub is_download_prevented: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_queue_pending_changes() {
        let mut info = FileInfo::default();
        info.set_name("renamed.txt");
        info.set_description("quarterly numbers");
        assert_eq!(info.item.name.as_deref(), Some("renamed.txt"));
        assert_eq!(
            info.pending_changes(),
            Some(json!({"name": "renamed.txt", "description": "quarterly numbers"}))
        );
    }

    #[test]
    fn update_merges_and_clears_pending() {
        let mut info = FileInfo::from_json(json!({
            "type": "file",
            "id": "5000948880",
            "name": "tigers.jpeg",
            "size": 629644,
            "created_by": {"type": "user", "id": "17738362", "name": "sean rose"}
        }))
        .unwrap();
        info.set_description("a picture of tigers");
        info.update(json!({
            "id": "5000948880",
            "description": "a picture of tigers",
            "size": null,
            "created_by": {"login": "sean@box.com"}
        }))
        .unwrap();

        assert_eq!(info.pending_changes(), None);
        assert_eq!(info.item.size, Some(629644));
        assert_eq!(info.item.description.as_deref(), Some("a picture of tigers"));
        let creator = info.item.created_by.unwrap();
        assert_eq!(creator.name.as_deref(), Some("sean rose"));
        assert_eq!(creator.login.as_deref(), Some("sean@box.com"));
    }
}
