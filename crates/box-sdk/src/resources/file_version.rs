use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::info::{impl_box_info, BoxInfo, PendingChanges};
use crate::resource::{box_resource, BoxResource};
use crate::url_template::{QueryStringBuilder, UrlTemplate};

use super::file::BoxFile;
use super::user::UserInfo;

const VERSION_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("files/%s/versions/%s");
const CURRENT_VERSION_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("files/%s/versions/current");
const CONTENT_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("files/%s/content");

box_resource!(
    /// One version of a file. Box addresses versions through their file, so
    /// the requests below take the owning [`BoxFile`].
    BoxFileVersion,
    "file_version"
);

impl BoxFileVersion {
    /// Move this version to the trash. Box keeps listing it with `trashed_at` set.
    pub async fn delete(&self, file: &BoxFile) -> Result<()> {
        let url = VERSION_URL_TEMPLATE.build(self.api.base_url(), &[file.id(), self.id.as_str()])?;
        self.api.delete(url).await
    }

    /// Make a copy of this version the file's new current version.
    pub async fn promote(&self, file: &BoxFile) -> Result<FileVersionInfo> {
        let url = CURRENT_VERSION_URL_TEMPLATE.build(self.api.base_url(), &[file.id()])?;
        let body = json!({ "type": Self::RESOURCE_TYPE, "id": self.id });
        FileVersionInfo::from_json(self.api.post(url, &body).await?)
    }

    pub async fn download(&self, file: &BoxFile) -> Result<Vec<u8>> {
        let mut q = QueryStringBuilder::new();
        q.append_param("version", &self.id);
        let url = CONTENT_URL_TEMPLATE.build_with_query(self.api.base_url(), &q.to_query(), &[file.id()])?;
        self.api.download(url).await
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVersionInfo {
    pub id: Option<String>,
    pub sha1: Option<String>,
    pub name: Option<String>,
    pub size: Option<u64>,
    pub version_number: Option<String>,
    #[serde(with = "crate::date::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub trashed_at: Option<DateTime<Utc>>,
    pub modified_by: Option<UserInfo>,
    #[serde(skip)]
    pending: PendingChanges,
}

impl_box_info!(FileVersionInfo);
