use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::info::{impl_box_info, BoxInfo, PendingChanges};
use crate::resource::box_resource;
use crate::url_template::UrlTemplate;

use super::fields_query;
use super::item::ItemFields;

const WEB_LINK_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("web_links/%s");

box_resource!(
    /// A bookmark to an external URL, stored like a file.
    BoxWebLink,
    "web_link"
);

impl BoxWebLink {
    pub async fn get_info(&self, fields: &[&str]) -> Result<WebLinkInfo> {
        let url = WEB_LINK_URL_TEMPLATE.build_with_query(
            self.api.base_url(),
            &fields_query(fields),
            &[self.id.as_str()],
        )?;
        WebLinkInfo::from_json(self.api.get(url).await?)
    }

    pub async fn delete(&self) -> Result<()> {
        let url = WEB_LINK_URL_TEMPLATE.build(self.api.base_url(), &[self.id.as_str()])?;
        self.api.delete(url).await
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebLinkInfo {
    #[serde(flatten)]
    pub item: ItemFields,
    pub url: Option<String>,
    #[serde(skip)]
    pending: PendingChanges,
}

impl_box_info!(WebLinkInfo);
