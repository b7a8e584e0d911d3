//! One module per Box object type: a handle, its Info snapshot and the
//! requests it can make.

pub mod file;
pub mod file_version;
pub mod file_version_retention;
pub mod folder;
pub mod item;
pub mod legal_hold;
pub mod legal_hold_assignment;
pub mod metadata;
pub mod metadata_template;
pub mod retention_policy;
pub mod retention_policy_assignment;
pub mod shared_link;
pub mod task;
pub mod task_assignment;
pub mod user;
pub mod web_link;

use serde_json::{Map, Value};
use url::Url;

use crate::connection::BoxApiConnection;
use crate::error::Result;
use crate::info::BoxInfo;
use crate::url_template::QueryStringBuilder;

/// `fields=a,b` or an empty string.
pub(crate) fn fields_query(fields: &[&str]) -> String {
    let mut q = QueryStringBuilder::new();
    q.append_fields(fields);
    q.to_query()
}

/// `PUT` the pending changes of `info` to `url` and merge the answer back.
pub(crate) async fn put_pending<I: BoxInfo>(api: &BoxApiConnection, url: Url, info: &mut I) -> Result<()> {
    let body = info.pending_changes().unwrap_or_else(|| Value::Object(Map::new()));
    let json: Value = api.put(url, &body).await?;
    info.update(json)
}
