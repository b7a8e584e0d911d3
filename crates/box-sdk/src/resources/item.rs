//! Members and requests shared by files, folders and web links.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::connection::BoxApiConnection;
use crate::error::{BoxError, Result};
use crate::info::Collection;
use crate::url_template::UrlTemplate;

use super::fields_query;
use super::file::FileInfo;
use super::folder::FolderInfo;
use super::shared_link::SharedLink;
use super::user::UserInfo;
use super::web_link::WebLinkInfo;

/// Members every item kind has. Flattened into the item snapshots.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemFields {
    pub id: Option<String>,
    pub sequence_id: Option<String>,
    pub etag: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub size: Option<u64>,
    #[serde(with = "crate::date::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub trashed_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub purged_at: Option<DateTime<Utc>>,
    pub created_by: Option<UserInfo>,
    pub modified_by: Option<UserInfo>,
    pub owned_by: Option<UserInfo>,
    pub parent: Option<Box<FolderInfo>>,
    pub path_collection: Option<Collection<FolderInfo>>,
    pub item_status: Option<String>,
    pub shared_link: Option<SharedLink>,
}

/// A child entry of a folder listing, tagged by its `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemInfo {
    File(FileInfo),
    Folder(FolderInfo),
    WebLink(WebLinkInfo),
}

impl ItemInfo {
    pub fn fields(&self) -> &ItemFields {
        match self {
            ItemInfo::File(f) => &f.item,
            ItemInfo::Folder(f) => &f.item,
            ItemInfo::WebLink(w) => &w.item,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.fields().id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.fields().name.as_deref()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ItemInfo::File(_) => "file",
            ItemInfo::Folder(_) => "folder",
            ItemInfo::WebLink(_) => "web_link",
        }
    }
}

/// Copy, move, rename and shared links, which look the same for files and
/// folders.
pub(crate) struct ItemRequests<'a> {
    pub api: &'a BoxApiConnection,
    pub item: UrlTemplate,
    pub copy: UrlTemplate,
    pub id: &'a str,
}

impl ItemRequests<'_> {
    fn destination(parent_id: &str, new_name: Option<&str>) -> Value {
        let mut body = json!({ "parent": { "id": parent_id } });
        if let (Some(name), Some(obj)) = (new_name, body.as_object_mut()) {
            obj.insert("name".to_owned(), Value::String(name.to_owned()));
        }
        body
    }

    pub async fn copy<T: DeserializeOwned>(&self, parent_id: &str, new_name: Option<&str>) -> Result<T> {
        let url = self.copy.build(self.api.base_url(), &[self.id])?;
        self.api.post(url, &Self::destination(parent_id, new_name)).await
    }

    pub async fn move_to<T: DeserializeOwned>(&self, parent_id: &str, new_name: Option<&str>) -> Result<T> {
        let url = self.item.build(self.api.base_url(), &[self.id])?;
        self.api.put(url, &Self::destination(parent_id, new_name)).await
    }

    pub async fn rename<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let url = self.item.build(self.api.base_url(), &[self.id])?;
        self.api.put(url, &json!({ "name": name })).await
    }

    /// `PUT {item}?fields=shared_link` and pull the link out of the answer.
    pub async fn create_shared_link(&self, link: &SharedLink) -> Result<SharedLink> {
        let url = self.item.build_with_query(self.api.base_url(), &fields_query(&["shared_link"]), &[self.id])?;
        let answer: ItemFields = self.api.put(url, &json!({ "shared_link": link.to_request() })).await?;
        answer
            .shared_link
            .ok_or_else(|| BoxError::UnexpectedResponse("item answer has no shared_link".to_owned()))
    }
}
