use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::date;
use crate::error::Result;
use crate::info::{impl_box_info, BoxInfo, PendingChanges};
use crate::pagination::{BoxResourceIterable, OffsetPage, PartialCollection};
use crate::resource::{box_resource, BoxResource};
use crate::url_template::{QueryStringBuilder, UrlTemplate};

use super::fields_query;
use super::file::{single_upload, FileInfo};
use super::item::{ItemFields, ItemInfo, ItemRequests};
use super::metadata::item_metadata_methods;
use super::shared_link::{SharedLink, SharedLinkAccess, SharedLinkPermissions};
use super::web_link::WebLinkInfo;

const FOLDER_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("folders/%s");
const COPY_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("folders/%s/copy");
const CREATE_FOLDER_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("folders");
const GET_ITEMS_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("folders/%s/items/");
const CREATE_WEB_LINK_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("web_links");
const UPLOAD_FILE_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("files/content");

box_resource!(
    /// A folder stored in Box.
    BoxFolder,
    "folder"
);

item_metadata_methods!(BoxFolder, "folders");

impl BoxFolder {
    /// The "All Files" folder, which always has ID `0`.
    pub fn root(api: &crate::BoxApiConnection) -> Self {
        Self::new(api, "0")
    }

    fn requests(&self) -> ItemRequests<'_> {
        ItemRequests { api: &self.api, item: FOLDER_URL_TEMPLATE, copy: COPY_URL_TEMPLATE, id: &self.id }
    }

    pub async fn get_info(&self, fields: &[&str]) -> Result<FolderInfo> {
        let url = FOLDER_URL_TEMPLATE.build_with_query(
            self.api.base_url(),
            &fields_query(fields),
            &[self.id.as_str()],
        )?;
        FolderInfo::from_json(self.api.get(url).await?)
    }

    pub async fn update_info(&self, info: &mut FolderInfo) -> Result<()> {
        let url = FOLDER_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        super::put_pending(&self.api, url, info).await
    }

    pub async fn create_folder(&self, name: &str) -> Result<FolderInfo> {
        let url = CREATE_FOLDER_URL_TEMPLATE.build(self.api.base_url(), &[])?;
        let body = json!({ "name": name, "parent": { "id": self.id } });
        FolderInfo::from_json(self.api.post(url, &body).await?)
    }

    /// Delete the folder. A non-empty folder is only deleted when `recursive`.
    pub async fn delete(&self, recursive: bool) -> Result<()> {
        let mut q = QueryStringBuilder::new();
        q.append_param("recursive", recursive);
        let url = FOLDER_URL_TEMPLATE.build_with_query(self.api.base_url(), &q.to_query(), &[self.id.as_str()])?;
        self.api.delete(url).await
    }

    pub async fn copy(&self, destination: &BoxFolder, new_name: Option<&str>) -> Result<FolderInfo> {
        FolderInfo::from_json(self.requests().copy(destination.id(), new_name).await?)
    }

    pub async fn move_to(&self, destination: &BoxFolder, new_name: Option<&str>) -> Result<FolderInfo> {
        FolderInfo::from_json(self.requests().move_to(destination.id(), new_name).await?)
    }

    pub async fn rename(&self, name: &str) -> Result<FolderInfo> {
        FolderInfo::from_json(self.requests().rename(name).await?)
    }

    /// Every child of this folder, paged by offset with `limit` per page.
    pub fn get_children(&self, limit: u64, fields: &[&str]) -> Result<BoxResourceIterable<ItemInfo>> {
        let url = GET_ITEMS_URL_TEMPLATE.build_with_query(
            self.api.base_url(),
            &fields_query(fields),
            &[self.id.as_str()],
        )?;
        Ok(BoxResourceIterable::offset(&self.api, url, limit))
    }

    /// One page of children starting at `offset`.
    pub async fn get_children_range(
        &self,
        offset: u64,
        limit: u64,
        fields: &[&str],
    ) -> Result<PartialCollection<ItemInfo>> {
        let mut q = QueryStringBuilder::new();
        q.append_fields(fields).append_param("limit", limit).append_param("offset", offset);
        let url = GET_ITEMS_URL_TEMPLATE.build_with_query(self.api.base_url(), &q.to_query(), &[self.id.as_str()])?;
        let page: OffsetPage<ItemInfo> = self.api.get(url).await?;
        Ok(page.into())
    }

    pub async fn create_web_link(
        &self,
        url: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<WebLinkInfo> {
        let mut body = Map::new();
        body.insert("url".to_owned(), json!(url));
        body.insert("parent".to_owned(), json!({ "id": self.id }));
        if let Some(name) = name {
            body.insert("name".to_owned(), json!(name));
        }
        if let Some(description) = description {
            body.insert("description".to_owned(), json!(description));
        }

        let endpoint = CREATE_WEB_LINK_URL_TEMPLATE.build(self.api.base_url(), &[])?;
        WebLinkInfo::from_json(self.api.post(endpoint, &Value::Object(body)).await?)
    }

    /// Upload a new file into this folder in one multipart request.
    pub async fn upload_file(&self, name: &str, content: Vec<u8>) -> Result<FileInfo> {
        self.upload_file_with(FileUploadParams::new(name, content)).await
    }

    /// Upload with the optional content timestamps of `params`.
    pub async fn upload_file_with(&self, params: FileUploadParams) -> Result<FileInfo> {
        let form = multipart::Form::new()
            .text("attributes", params.attributes(&self.id).to_string())
            .part("file", multipart::Part::bytes(params.content).file_name(params.name));

        let url = UPLOAD_FILE_URL_TEMPLATE.build(self.api.base_upload_url(), &[])?;
        single_upload(self.api.post_multipart(url, form).await?)
    }

    pub async fn create_shared_link(
        &self,
        access: SharedLinkAccess,
        unshared_at: Option<DateTime<Utc>>,
        permissions: Option<SharedLinkPermissions>,
    ) -> Result<SharedLink> {
        let link = SharedLink { unshared_at, permissions, ..SharedLink::new(access) };
        self.requests().create_shared_link(&link).await
    }
}

/// A file to upload plus the creation and modification times to record for
/// its content. Box uses the upload time when they are left out.
#[derive(Debug, Clone, Default)]
pub struct FileUploadParams {
    pub name: String,
    pub content: Vec<u8>,
    pub content_created_at: Option<DateTime<Utc>>,
    pub content_modified_at: Option<DateTime<Utc>>,
}

impl FileUploadParams {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self { name: name.into(), content, ..Self::default() }
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.content_created_at = Some(at);
        self
    }

    pub fn modified_at(mut self, at: DateTime<Utc>) -> Self {
        self.content_modified_at = Some(at);
        self
    }

    fn attributes(&self, parent_id: &str) -> Value {
        let mut attributes = Map::new();
        attributes.insert("name".to_owned(), json!(self.name));
        attributes.insert("parent".to_owned(), json!({ "id": parent_id }));
        if let Some(at) = &self.content_created_at {
            attributes.insert("content_created_at".to_owned(), json!(date::format(at)));
        }
        if let Some(at) = &self.content_modified_at {
            attributes.insert("content_modified_at".to_owned(), json!(date::format(at)));
        }
        Value::Object(attributes)
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderInfo {
    #[serde(flatten)]
    pub item: ItemFields,
    pub has_collaborations: Option<bool>,
    pub sync_state: Option<String>,
    pub can_non_owners_invite: Option<bool>,
    pub is_externally_owned: Option<bool>,
    #[serde(with = "permissions")]
    pub permissions: Option<BTreeSet<FolderPermission>>,
    #[serde(skip)]
    pending: PendingChanges,
}

impl_box_info!(FolderInfo);

impl FolderInfo {
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

    pub fn has_permission(&self, permission: FolderPermission) -> bool {
        self.permissions.as_ref().is_some_and(|p| p.contains(&permission))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FolderPermission {
    CanDownload,
    CanUpload,
    CanRename,
    CanDelete,
    CanShare,
    CanInviteCollaborator,
    CanSetShareAccess,
}

impl FolderPermission {
    pub const ALL: [FolderPermission; 7] = [
        FolderPermission::CanDownload,
        FolderPermission::CanUpload,
        FolderPermission::CanRename,
        FolderPermission::CanDelete,
        FolderPermission::CanShare,
        FolderPermission::CanInviteCollaborator,
        FolderPermission::CanSetShareAccess,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FolderPermission::CanDownload => "can_download",
            FolderPermission::CanUpload => "can_upload",
            FolderPermission::CanRename => "can_rename",
            FolderPermission::CanDelete => "can_delete",
            FolderPermission::CanShare => "can_share",
            FolderPermission::CanInviteCollaborator => "can_invite_collaborator",
            FolderPermission::CanSetShareAccess => "can_set_share_access",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == key)
    }
}

/// `{"can_download": true, "can_upload": false}` <-> set of granted permissions.
mod permissions {
    use std::collections::{BTreeMap, BTreeSet};

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::FolderPermission;

    pub fn serialize<S: Serializer>(
        value: &Option<BTreeSet<FolderPermission>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(set) => {
                let flags: BTreeMap<&str, bool> = set.iter().map(|p| (p.as_str(), true)).collect();
                flags.serialize(serializer)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BTreeSet<FolderPermission>>, D::Error> {
        let flags = Option::<BTreeMap<String, Option<bool>>>::deserialize(deserializer)?;
        Ok(flags.map(|flags| {
            flags
                .into_iter()
                .filter(|(_, granted)| granted.unwrap_or(false))
                .filter_map(|(key, _)| FolderPermission::from_key(&key))
                .collect()
        }))
    }
}
