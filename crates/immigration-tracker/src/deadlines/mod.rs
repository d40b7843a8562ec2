//! OPT, STEM OPT and H1B deadline rules, status transitions and the
//! per-student deadline planner.

pub mod documents;
pub mod domain;
pub mod planner;
pub mod rules;
pub mod status;
pub mod timeline;
pub mod transitions;

pub use documents::{DocumentCheck, DocumentStatus, DOCUMENT_EXPIRY_WARNING_DAYS};

pub use domain::{
    Deadline, DeadlineKind, DeadlinePlan, DeadlinePriority, DeadlineStatus, StudentProfile,
};
pub use planner::DeadlinePlanner;
pub use rules::{DateWindow, DeadlineUrgency};
pub use status::{ImmigrationPhase, ImmigrationStatus, UnknownStatus};
pub use timeline::{ActionCategory, ActionItem, ResourceKind, ResourceLink, TimelineEvent};
pub use transitions::{TransitionError, TransitionSuggestion};
