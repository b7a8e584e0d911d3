//! Resource handles: a connection plus an ID, built without any request.

use serde_json::{json, Value};

use crate::connection::BoxApiConnection;

pub trait BoxResource {
    /// The Box `type` string, e.g. `legal_hold`.
    const RESOURCE_TYPE: &'static str;

    fn id(&self) -> &str;

    fn api(&self) -> &BoxApiConnection;

    /// `{"type": ..., "id": ...}` as used in `assign_to` bodies.
    fn to_reference(&self) -> Value
    where
        Self: Sized,
    {
        json!({ "type": Self::RESOURCE_TYPE, "id": self.id() })
    }
}

/// Declares a handle struct. Handles compare and hash by ID.
macro_rules! box_resource {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            api: $crate::connection::BoxApiConnection,
            id: String,
        }

        impl $name {
            pub fn new(api: &$crate::connection::BoxApiConnection, id: impl Into<String>) -> Self {
                Self { api: api.clone(), id: id.into() }
            }
        }

        impl $crate::resource::BoxResource for $name {
            const RESOURCE_TYPE: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn api(&self) -> &$crate::connection::BoxApiConnection {
                &self.api
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $name {}

        impl std::hash::Hash for $name {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }
    };
}

pub(crate) use box_resource;
