use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::info::{impl_box_info, BoxInfo, PendingChanges};
use crate::resource::{box_resource, BoxResource};
use crate::url_template::UrlTemplate;

use super::fields_query;

const USER_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("users/%s");

box_resource!(
    /// A Box user.
    BoxUser,
    "user"
);

impl BoxUser {
    /// The user the access token belongs to.
    pub fn current(api: &crate::BoxApiConnection) -> Self {
        Self::new(api, "me")
    }

    pub async fn get_info(&self, fields: &[&str]) -> Result<UserInfo> {
        let url = USER_URL_TEMPLATE.build_with_query(self.api().base_url(), &fields_query(fields), &[self.id()])?;
        UserInfo::from_json(self.api().get(url).await?)
    }
}

/// Mini or full user object, depending on where it came from.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub login: Option<String>,
    #[serde(skip)]
    pending: PendingChanges,
}

impl_box_info!(UserInfo);
