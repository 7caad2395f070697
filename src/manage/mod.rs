//! Form-state managers for the admin pages.
//!
//! `DocumentManager` edits one nested JSON document, `ListManager` edits an ordered
//! collection of records. Both are parameterized by page schemas (see `crate::pages`)
//! and persist through a `ContentApi`.

pub mod api;
pub mod completion;
pub mod document;
pub mod http;
pub mod lens;
pub mod list;
pub mod local;
pub mod merge;
pub mod modal;
pub mod plan;
pub mod records;
pub mod reorder;
pub mod status;

pub use api::{ApiError, ContentApi, FileField, PendingFile, WriteMode};
pub use completion::{Completable, Completion};
pub use document::{Document, DocumentManager};
pub use lens::Field;
pub use list::ListManager;
pub use modal::{DeleteModal, DeleteTarget};
pub use plan::{PlanLimits, PlanType, SiteContext};
pub use records::{Record, RecordList, UploadSlot};
pub use reorder::DragState;
pub use status::{Phase, Status};

#[derive(Debug, Clone, PartialEq)]
pub enum ManageError {
    /// Fetching the stored record failed; the form fell back to defaults.
    Load(String),
    /// Nothing submittable; carries the message shown to the operator.
    Validation(String),
    LimitReached {
        kind: &'static str,
        limit: usize,
        plan: PlanType,
    },
    IndexOutOfRange(usize),
    /// A save or delete is already in flight.
    Busy,
    Api(ApiError),
}

impl std::fmt::Display for ManageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManageError::Load(msg) => write!(f, "Could not load content: {}", msg),
            ManageError::Validation(msg) => write!(f, "{}", msg),
            ManageError::LimitReached { kind, limit, plan } => write!(
                f,
                "You reached the {} plan limit ({} {} items).",
                plan.as_str(),
                limit,
                kind
            ),
            ManageError::IndexOutOfRange(i) => write!(f, "No item at position {}", i + 1),
            ManageError::Busy => write!(f, "Another save is still in progress"),
            ManageError::Api(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ManageError {}

impl From<ApiError> for ManageError {
    fn from(e: ApiError) -> Self {
        ManageError::Api(e)
    }
}
