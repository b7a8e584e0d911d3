//! Metadata template schemas. Unlike the rest of the API these use camelCase
//! member names.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::connection::BoxApiConnection;
use crate::error::Result;
use crate::pagination::BoxResourceIterable;
use crate::url_template::UrlTemplate;

use super::fields_query;

const METADATA_TEMPLATE_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("metadata_templates/%s/%s/schema");
const ENTERPRISE_METADATA_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("metadata_templates/%s");
const METADATA_TEMPLATE_SCHEMA_URL_TEMPLATE: UrlTemplate = UrlTemplate::new("metadata_templates/schema");

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetadataTemplate {
    pub id: Option<String>,
    pub template_key: Option<String>,
    pub scope: Option<String>,
    pub display_name: Option<String>,
    pub hidden: Option<bool>,
    pub fields: Vec<MetadataTemplateField>,
}

/// One field of a template. `options` holds the keys of an enum field.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetadataTemplateField {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub key: Option<String>,
    pub display_name: Option<String>,
    pub hidden: Option<bool>,
    pub description: Option<String>,
    #[serde(with = "option_keys", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl MetadataTemplateField {
    pub fn new(kind: &str, key: &str, display_name: &str) -> Self {
        Self {
            kind: Some(kind.to_owned()),
            key: Some(key.to_owned()),
            display_name: Some(display_name.to_owned()),
            ..Default::default()
        }
    }
}

/// `[{"key": "Beauty"}, ...]` <-> `["Beauty", ...]`.
mod option_keys {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct TemplateOption {
        key: String,
    }

    pub fn serialize<S: Serializer>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        let options: Vec<TemplateOption> = keys.iter().map(|k| TemplateOption { key: k.clone() }).collect();
        options.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let options = Option::<Vec<TemplateOption>>::deserialize(deserializer)?;
        Ok(options.unwrap_or_default().into_iter().map(|o| o.key).collect())
    }
}

impl MetadataTemplate {
    pub async fn get_metadata_template(
        api: &BoxApiConnection,
        template: &str,
        scope: &str,
        fields: &[&str],
    ) -> Result<MetadataTemplate> {
        let url = METADATA_TEMPLATE_URL_TEMPLATE.build_with_query(
            api.base_url(),
            &fields_query(fields),
            &[scope, template],
        )?;
        api.get(url).await
    }

    /// Every template defined in `scope`, usually `enterprise`.
    pub fn get_enterprise_metadata_templates(
        api: &BoxApiConnection,
        scope: &str,
        limit: u64,
        fields: &[&str],
    ) -> Result<BoxResourceIterable<MetadataTemplate>> {
        let url = ENTERPRISE_METADATA_URL_TEMPLATE.build_with_query(api.base_url(), &fields_query(fields), &[scope])?;
        Ok(BoxResourceIterable::marker(api, url, limit))
    }

    pub async fn create_metadata_template(
        api: &BoxApiConnection,
        scope: &str,
        template_key: &str,
        display_name: &str,
        hidden: bool,
        fields: &[MetadataTemplateField],
    ) -> Result<MetadataTemplate> {
        let body = json!({
            "scope": scope,
            "templateKey": template_key,
            "displayName": display_name,
            "hidden": hidden,
            "fields": fields,
        });
        let url = METADATA_TEMPLATE_SCHEMA_URL_TEMPLATE.build(api.base_url(), &[])?;
        api.post(url, &body).await
    }

    pub async fn delete_metadata_template(api: &BoxApiConnection, scope: &str, template: &str) -> Result<()> {
        let url = METADATA_TEMPLATE_URL_TEMPLATE.build(api.base_url(), &[scope, template])?;
        api.delete(url).await
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }

    pub fn field(&self, key: &str) -> Option<&MetadataTemplateField> {
        self.fields.iter().find(|f| f.key.as_deref() == Some(key))
    }
}
