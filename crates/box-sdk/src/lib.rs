//! Box content API client for Rust.
//!
//! Every Box object comes in two halves: a handle (`BoxFile`, `BoxLegalHold`,
//! ...) that is just a connection plus an ID, and an Info snapshot
//! (`FileInfo`, `LegalHoldInfo`, ...) holding whatever the API returned.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use box_sdk::{BoxApiConnection, BoxLegalHold, BoxFile, pagination::DEFAULT_LIMIT};
//! use futures_util::{pin_mut, TryStreamExt};
//!
//! #[tokio::main]
//! async fn main() -> box_sdk::Result<()> {
//!     let api = BoxApiConnection::new("developer-token")?;
//!
//!     let policy = BoxLegalHold::create(&api, "Trial Documents", None, None, None).await?;
//!     let hold = BoxLegalHold::new(&api, policy.id.unwrap_or_default());
//!     hold.assign_to(&BoxFile::new(&api, "5010739061")).await?;
//!
//!     let policies = BoxLegalHold::get_all(&api, None, DEFAULT_LIMIT, &[])?;
//!     let stream = policies.stream();
//!     pin_mut!(stream);
//!     while let Some(info) = stream.try_next().await? {
//!         println!("{:?}", info.policy_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod date;
pub mod error;
pub mod info;
pub mod pagination;
pub mod resource;
pub mod resources;
pub mod url_template;

pub use config::BoxConfig;
pub use connection::BoxApiConnection;
pub use error::{BoxError, Result};
pub use info::{BoxInfo, Collection, ResourceRef};
pub use pagination::{BoxResourceIterable, PartialCollection};
pub use resource::BoxResource;

pub use resources::file::{BoxFile, FileInfo, FileLock};
pub use resources::file_version::{BoxFileVersion, FileVersionInfo};
pub use resources::file_version_retention::{
    BoxFileVersionRetention, FileVersionRetentionInfo, FileVersionRetentionQuery,
};
pub use resources::folder::{BoxFolder, FileUploadParams, FolderInfo, FolderPermission};
pub use resources::item::{ItemFields, ItemInfo};
pub use resources::legal_hold::{AssignmentCounts, BoxLegalHold, LegalHoldInfo, LegalHoldStatus};
pub use resources::legal_hold_assignment::{BoxLegalHoldAssignment, LegalHoldAssignmentInfo};
pub use resources::metadata::Metadata;
pub use resources::metadata_template::{MetadataTemplate, MetadataTemplateField};
pub use resources::retention_policy::{
    BoxRetentionPolicy, DispositionAction, RetentionPolicyFilter, RetentionPolicyInfo, RetentionPolicyStatus,
    RetentionPolicyType,
};
pub use resources::retention_policy_assignment::{BoxRetentionPolicyAssignment, RetentionPolicyAssignmentInfo};
pub use resources::shared_link::{SharedLink, SharedLinkAccess, SharedLinkPermissions};
pub use resources::task::{BoxTask, TaskAction, TaskInfo};
pub use resources::task_assignment::{BoxTaskAssignment, ResolutionState, TaskAssignmentInfo};
pub use resources::user::{BoxUser, UserInfo};
pub use resources::web_link::{BoxWebLink, WebLinkInfo};
