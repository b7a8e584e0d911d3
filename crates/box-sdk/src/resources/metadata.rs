//! Metadata instances attached to files and folders.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::connection::BoxApiConnection;
use crate::error::{BoxError, Result};
use crate::pagination::BoxResourceIterable;
use crate::url_template::UrlTemplate;

use super::fields_query;

/// Template of the free-form key/value metadata every item can carry.
pub const DEFAULT_METADATA_TYPE: &str = "properties";
pub const GLOBAL_METADATA_SCOPE: &str = "global";
pub const ENTERPRISE_METADATA_SCOPE: &str = "enterprise";

/// The values of one metadata instance plus the JSON-patch operations queued
/// against it since it was loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    values: Map<String, Value>,
    operations: Vec<Value>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: Value) -> Result<Self> {
        match json {
            Value::Object(values) => Ok(Self { values, operations: Vec::new() }),
            other => Err(BoxError::InvalidArgument(format!("metadata must be a JSON object, got {other}"))),
        }
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    fn system(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.system("$id")
    }

    pub fn type_name(&self) -> Option<&str> {
        self.system("$type")
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.system("$parent")
    }

    pub fn scope(&self) -> Option<&str> {
        self.system("$scope")
    }

    pub fn template_name(&self) -> Option<&str> {
        self.system("$template")
    }

    pub fn add(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Self> {
        let property = path_to_property(path)?;
        let value = value.into();
        self.values.insert(property.to_owned(), value.clone());
        self.push_op("add", path, Some(value));
        Ok(self)
    }

    pub fn replace(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Self> {
        let property = path_to_property(path)?;
        let value = value.into();
        self.values.insert(property.to_owned(), value.clone());
        self.push_op("replace", path, Some(value));
        Ok(self)
    }

    pub fn remove(&mut self, path: &str) -> Result<&mut Self> {
        let property = path_to_property(path)?;
        self.values.remove(property);
        self.push_op("remove", path, None);
        Ok(self)
    }

    /// Queue a `test` operation. Local values are left alone.
    pub fn test(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Self> {
        path_to_property(path)?;
        self.push_op("test", path, Some(value.into()));
        Ok(self)
    }

    /// The value at `path` as text. Numbers are rendered in their JSON form.
    /// A path without a leading `/` is rejected like it is by the mutators.
    pub fn get(&self, path: &str) -> Result<Option<String>> {
        let property = path_to_property(path)?;
        Ok(match self.values.get(property) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        })
    }

    /// `/name` for every user property, skipping `$`-prefixed system members.
    pub fn property_paths(&self) -> Vec<String> {
        self.values
            .keys()
            .filter(|k| !k.starts_with('$'))
            .map(|k| format!("/{k}"))
            .collect()
    }

    /// The queued operations as a JSON-patch document.
    pub fn patch(&self) -> String {
        Value::Array(self.operations.clone()).to_string()
    }

    pub fn has_pending_operations(&self) -> bool {
        !self.operations.is_empty()
    }

    fn push_op(&mut self, op: &str, path: &str, value: Option<Value>) {
        let mut entry = json!({ "op": op, "path": path });
        if let (Some(value), Some(obj)) = (value, entry.as_object_mut()) {
            obj.insert("value".to_owned(), value);
        }
        self.operations.push(entry);
    }
}

fn path_to_property(path: &str) -> Result<&str> {
    path.strip_prefix('/')
        .ok_or_else(|| BoxError::InvalidArgument(format!("metadata path must start with \"/\": {path:?}")))
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.values.clone()))
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let values = Map::deserialize(deserializer)?;
        Ok(Self { values, operations: Vec::new() })
    }
}

// ── Item operations ──────────────────────────────────────────────────────────

/// `global` for the `properties` template, `enterprise` for everything else.
pub(crate) fn resolve_scope<'a>(template: Option<&'a str>, scope: Option<&'a str>) -> (&'a str, &'a str) {
    let template = template.unwrap_or(DEFAULT_METADATA_TYPE);
    let scope = scope.unwrap_or(if template == DEFAULT_METADATA_TYPE {
        GLOBAL_METADATA_SCOPE
    } else {
        ENTERPRISE_METADATA_SCOPE
    });
    (template, scope)
}

/// Requests shared by every item kind. `item` is the item's collection path,
/// `files` or `folders`.
pub(crate) struct ItemMetadata<'a> {
    pub api: &'a BoxApiConnection,
    pub instance: UrlTemplate,
    pub all: UrlTemplate,
    pub id: &'a str,
}

impl ItemMetadata<'_> {
    pub async fn create(&self, template: Option<&str>, scope: Option<&str>, metadata: &Metadata) -> Result<Metadata> {
        let (template, scope) = resolve_scope(template, scope);
        let url = self.instance.build(self.api.base_url(), &[self.id, scope, template])?;
        let body = Value::Object(metadata.values.clone());
        Metadata::from_json(self.api.post(url, &body).await?)
    }

    pub async fn get(&self, template: Option<&str>, scope: Option<&str>) -> Result<Metadata> {
        let (template, scope) = resolve_scope(template, scope);
        let url = self.instance.build(self.api.base_url(), &[self.id, scope, template])?;
        Metadata::from_json(self.api.get(url).await?)
    }

    pub async fn update(&self, metadata: &Metadata) -> Result<Metadata> {
        let (Some(scope), Some(template)) = (metadata.scope(), metadata.template_name()) else {
            return Err(BoxError::InvalidArgument(
                "metadata needs $scope and $template to be updated".to_owned(),
            ));
        };
        let url = self.instance.build(self.api.base_url(), &[self.id, scope, template])?;
        Metadata::from_json(self.api.put_json_patch(url, metadata.patch()).await?)
    }

    pub async fn delete(&self, template: Option<&str>, scope: Option<&str>) -> Result<()> {
        let (template, scope) = resolve_scope(template, scope);
        let url = self.instance.build(self.api.base_url(), &[self.id, scope, template])?;
        self.api.delete(url).await
    }

    pub fn all(&self, limit: u64, fields: &[&str]) -> Result<BoxResourceIterable<Metadata>> {
        let url = self.all.build_with_query(self.api.base_url(), &fields_query(fields), &[self.id])?;
        Ok(BoxResourceIterable::marker(self.api, url, limit))
    }
}

/// Adds the metadata methods to an item handle.
macro_rules! item_metadata_methods {
    ($name:ident, $collection:literal) => {
        impl $name {
            fn metadata_ops(&self) -> $crate::resources::metadata::ItemMetadata<'_> {
                $crate::resources::metadata::ItemMetadata {
                    api: &self.api,
                    instance: $crate::url_template::UrlTemplate::new(concat!($collection, "/%s/metadata/%s/%s")),
                    all: $crate::url_template::UrlTemplate::new(concat!($collection, "/%s/metadata")),
                    id: &self.id,
                }
            }

            /// Attach a metadata instance. `None` picks the `properties`
            /// template and its matching scope.
            pub async fn create_metadata(
                &self,
                template: Option<&str>,
                scope: Option<&str>,
                metadata: &$crate::resources::metadata::Metadata,
            ) -> $crate::error::Result<$crate::resources::metadata::Metadata> {
                self.metadata_ops().create(template, scope, metadata).await
            }

            pub async fn get_metadata(
                &self,
                template: Option<&str>,
                scope: Option<&str>,
            ) -> $crate::error::Result<$crate::resources::metadata::Metadata> {
                self.metadata_ops().get(template, scope).await
            }

            /// Send the operations queued on `metadata` as a JSON patch.
            pub async fn update_metadata(
                &self,
                metadata: &$crate::resources::metadata::Metadata,
            ) -> $crate::error::Result<$crate::resources::metadata::Metadata> {
                self.metadata_ops().update(metadata).await
            }

            pub async fn delete_metadata(
                &self,
                template: Option<&str>,
                scope: Option<&str>,
            ) -> $crate::error::Result<()> {
                self.metadata_ops().delete(template, scope).await
            }

            /// Every metadata instance on the item, `limit` per page.
            pub fn get_all_metadata(
                &self,
                limit: u64,
                fields: &[&str],
            ) -> $crate::error::Result<
                $crate::pagination::BoxResourceIterable<$crate::resources::metadata::Metadata>,
            > {
                self.metadata_ops().all(limit, fields)
            }
        }
    };
}

pub(crate) use item_metadata_methods;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queues_operations_in_order() {
        let mut md = Metadata::new();
        md.add("/foo", "bar").unwrap().replace("/amount", 5).unwrap().remove("/gone").unwrap();
        md.test("/foo", "bar").unwrap();
        assert_eq!(
            md.patch(),
            r#"[{"op":"add","path":"/foo","value":"bar"},{"op":"replace","path":"/amount","value":5},{"op":"remove","path":"/gone"},{"op":"test","path":"/foo","value":"bar"}]"#
        );
        assert_eq!(md.get("/foo").unwrap().as_deref(), Some("bar"));
        assert_eq!(md.get("/amount").unwrap().as_deref(), Some("5"));
        assert_eq!(md.get("/gone").unwrap(), None);
    }

    #[test]
    fn empty_patch_is_empty_array() {
        assert_eq!(Metadata::new().patch(), "[]");
    }

    #[test]
    fn rejects_paths_without_slash() {
        let mut md = Metadata::new();
        assert!(matches!(md.add("foo", "bar"), Err(BoxError::InvalidArgument(_))));
        assert!(matches!(md.remove("foo"), Err(BoxError::InvalidArgument(_))));
        assert!(matches!(md.replace("foo", 1), Err(BoxError::InvalidArgument(_))));
        assert!(matches!(md.test("foo", "bar"), Err(BoxError::InvalidArgument(_))));
        assert!(matches!(md.get("foo"), Err(BoxError::InvalidArgument(_))));
        assert!(!md.has_pending_operations());
    }

    #[test]
    fn system_members_and_property_paths() {
        let md = Metadata::from_json(serde_json::json!({
            "$id": "c79896a0-a33f-11e3-a5e2-0800200c9a66",
            "$type": "properties",
            "$parent": "file_5010739061",
            "$scope": "global",
            "$template": "properties",
            "client": "Acme",
            "amount": 1.5
        }))
        .unwrap();
        assert_eq!(md.id(), Some("c79896a0-a33f-11e3-a5e2-0800200c9a66"));
        assert_eq!(md.parent_id(), Some("file_5010739061"));
        assert_eq!(md.scope(), Some("global"));
        assert_eq!(md.template_name(), Some("properties"));
        assert_eq!(md.property_paths(), vec!["/amount".to_owned(), "/client".to_owned()]);
        assert_eq!(md.get("/amount").unwrap().as_deref(), Some("1.5"));
    }

    #[test]
    fn scope_follows_template() {
        assert_eq!(resolve_scope(None, None), ("properties", "global"));
        assert_eq!(resolve_scope(Some("marketing"), None), ("marketing", "enterprise"));
        assert_eq!(resolve_scope(Some("marketing"), Some("enterprise_1")), ("marketing", "enterprise_1"));
    }

    #[test]
    fn display_shows_values() {
        let mut md = Metadata::new();
        md.add("/a", "b").unwrap();
        assert_eq!(md.to_string(), r#"{"a":"b"}"#);
    }
}
