//! Info snapshots: typed views over the JSON Box returned.
//!
//! A snapshot only carries the members it has seen. Absent and `null` members
//! both read as `None`. Merging a later response overlays its members on the
//! ones already known, recursing into nested objects, and never lets a `null`
//! erase a known value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Locally modified members waiting to be sent by an `update_info` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingChanges(Map<String, Value>);

impl PendingChanges {
    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_owned(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn to_json(&self) -> Option<Value> {
        if self.0.is_empty() {
            None
        } else {
            Some(Value::Object(self.0.clone()))
        }
    }
}

pub trait BoxInfo: Serialize + DeserializeOwned + Default {
    #[doc(hidden)]
    fn pending(&self) -> &PendingChanges;
    #[doc(hidden)]
    fn pending_mut(&mut self) -> &mut PendingChanges;

    fn from_json(json: Value) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }

    fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Merge a newer response into this snapshot and drop pending changes.
    fn update(&mut self, json: Value) -> Result<()> {
        let mut current = serde_json::to_value(&*self)?;
        merge_json(&mut current, json);
        *self = serde_json::from_value(current)?;
        Ok(())
    }

    fn add_pending_change(&mut self, key: &str, value: impl Into<Value>) {
        self.pending_mut().insert(key, value.into());
    }

    /// The dirty members as one JSON object, or `None` if nothing changed.
    fn pending_changes(&self) -> Option<Value> {
        self.pending().to_json()
    }

    fn clear_pending_changes(&mut self) {
        self.pending_mut().clear();
    }
}

/// Overlay `patch` onto `target`. `null` members in `patch` are skipped and
/// objects are merged member by member. Anything else replaces.
pub fn merge_json(target: &mut Value, patch: Value) {
    match (target, patch) {
        (_, Value::Null) => {}
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                if value.is_null() {
                    continue;
                }
                let nested = value.is_object() && target.get(&key).is_some_and(Value::is_object);
                match target.get_mut(&key) {
                    Some(existing) if nested => merge_json(existing, value),
                    Some(existing) => *existing = value,
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

/// A `{total_count, entries}` collection as nested inside other objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub entries: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { total_count: None, entries: Vec::new() }
    }
}

/// A `{type, id}` reference to some other object.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRef {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub id: Option<String>,
}

/// Implements [`BoxInfo`] for snapshot structs holding a `pending` field.
macro_rules! impl_box_info {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::info::BoxInfo for $ty {
                fn pending(&self) -> &$crate::info::PendingChanges {
                    &self.pending
                }

                fn pending_mut(&mut self) -> &mut $crate::info::PendingChanges {
                    &mut self.pending
                }
            }
        )+
    };
}

pub(crate) use impl_box_info;
