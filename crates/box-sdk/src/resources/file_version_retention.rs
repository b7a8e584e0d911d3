//! Retention records of individual file versions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::connection::BoxApiConnection;
use crate::date;
use crate::error::Result;
use crate::info::{impl_box_info, BoxInfo, PendingChanges};
use crate::pagination::BoxResourceIterable;
use crate::resource::box_resource;
use crate::url_template::{QueryStringBuilder, UrlTemplate};

use super::fields_query;
use super::file::FileInfo;
use super::file_version::FileVersionInfo;
use super::retention_policy::{DispositionAction, RetentionPolicyInfo};

const ALL_RETENTIONS_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("file_version_retentions");
const RETENTION_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("file_version_retentions/%s");

box_resource!(
    /// The retention applied to one file version. Read-only.
    BoxFileVersionRetention,
    "file_version_retention"
);

/// Filters for [`BoxFileVersionRetention::get_all`]. Unset members are not sent.
#[derive(Debug, Clone, Default)]
pub struct FileVersionRetentionQuery {
    pub file_id: Option<String>,
    pub file_version_id: Option<String>,
    pub policy_id: Option<String>,
    pub disposition_action: Option<DispositionAction>,
    pub disposition_before: Option<DateTime<Utc>>,
    pub disposition_after: Option<DateTime<Utc>>,
}

impl FileVersionRetentionQuery {
    fn to_query(&self, fields: &[&str]) -> String {
        let mut q = QueryStringBuilder::new();
        q.append_opt("file_id", self.file_id.as_deref())
            .append_opt("file_version_id", self.file_version_id.as_deref())
            .append_opt("policy_id", self.policy_id.as_deref())
            .append_opt("disposition_action", self.disposition_action.map(|a| a.as_str()))
            .append_opt("disposition_before", self.disposition_before.as_ref().map(date::format))
            .append_opt("disposition_after", self.disposition_after.as_ref().map(date::format))
            .append_fields(fields);
        q.to_query()
    }
}

impl BoxFileVersionRetention {
    pub async fn get_info(&self, fields: &[&str]) -> Result<FileVersionRetentionInfo> {
        let url = RETENTION_URL_TEMPLATE.build_with_query(
            self.api.base_url(),
            &fields_query(fields),
            &[self.id.as_str()],
        )?;
        FileVersionRetentionInfo::from_json(self.api.get(url).await?)
    }

    pub fn get_all(
        api: &BoxApiConnection,
        query: &FileVersionRetentionQuery,
        limit: u64,
        fields: &[&str],
    ) -> Result<BoxResourceIterable<FileVersionRetentionInfo>> {
        let url = ALL_RETENTIONS_URL_TEMPLATE.build_with_query(api.base_url(), &query.to_query(fields), &[])?;
        Ok(BoxResourceIterable::marker(api, url, limit))
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVersionRetentionInfo {
    pub id: Option<String>,
    pub file_version: Option<FileVersionInfo>,
    pub file: Option<FileInfo>,
    #[serde(with = "crate::date::option")]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::date::option")]
    pub disposition_at: Option<DateTime<Utc>>,
    pub winning_retention_policy: Option<RetentionPolicyInfo>,
    #[serde(skip)]
    pending: PendingChanges,
}

impl_box_info!(FileVersionRetentionInfo);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn query_skips_unset_filters() {
        let query = FileVersionRetentionQuery {
            policy_id: Some("41173".into()),
            disposition_action: Some(DispositionAction::PermanentlyDelete),
            disposition_before: Some(Utc.with_ymd_and_hms(2016, 8, 7, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert_eq!(
            query.to_query(&["file"]),
            "policy_id=41173&disposition_action=permanently_delete&disposition_before=2016-08-07T00%3A00%3A00%2B00%3A00&fields=file"
        );
        assert_eq!(FileVersionRetentionQuery::default().to_query(&[]), "");
    }
}
